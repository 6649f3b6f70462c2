// Host-side tests for report generation and the local fallback table.

use focus_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn request(minutes: f64, language: Language) -> ReportRequest {
    ReportRequest {
        duration_minutes: minutes,
        task_context: "write chapter two".into(),
        tier: 1,
        language,
    }
}

fn sample_data() -> ReportData {
    ReportData {
        dimension_code: "XR-7".into(),
        environment: "A quiet moon".into(),
        log: "All calm.".into(),
        entropy: 0.4,
        stability: Stability::Stable,
    }
}

#[test]
fn network_failure_on_micro_session_uses_fallback() {
    let mut rng = StdRng::seed_from_u64(1);
    let report = pollster::block_on(generate_report(
        request(1.0, Language::En),
        |_| async { Err::<ReportData, _>(ReportError::Network("offline".into())) },
        &mut rng,
    ));
    assert!(report.is_system_generated);
    assert!(report.data.dimension_code.starts_with("MC-"));
    assert!(matches!(
        report.data.stability,
        Stability::Stable | Stability::Unstable | Stability::Critical | Stability::Collapsed
    ));
    assert!((0.0..=1.0).contains(&report.data.entropy));
}

#[test]
fn long_chinese_session_uses_chinese_long_table() {
    let mut rng = StdRng::seed_from_u64(2);
    let report = pollster::block_on(generate_report(
        request(90.0, Language::Zh),
        |_| async { Err::<ReportData, _>(ReportError::Status(503)) },
        &mut rng,
    ));
    assert!(report.is_system_generated);
    assert!(report.data.dimension_code.starts_with("LG-"));
    assert!(!report.data.log.is_ascii());
}

#[test]
fn service_response_is_passed_through() {
    let mut rng = StdRng::seed_from_u64(3);
    let report = pollster::block_on(generate_report(
        request(25.0, Language::En),
        |req| async move {
            assert_eq!(req.duration_minutes, 25.0);
            Ok(sample_data())
        },
        &mut rng,
    ));
    assert!(!report.is_system_generated);
    assert_eq!(report.data, sample_data());
}

#[test]
fn malformed_payload_falls_back() {
    let mut rng = StdRng::seed_from_u64(4);
    let report = pollster::block_on(generate_report(
        request(40.0, Language::En),
        |_| async {
            Ok(ReportData {
                dimension_code: "  ".into(),
                ..sample_data()
            })
        },
        &mut rng,
    ));
    assert!(report.is_system_generated);
    assert!(report.data.dimension_code.starts_with("MD-"));
}

#[test]
fn entropy_is_clamped() {
    let data = ReportData {
        entropy: 3.0,
        ..sample_data()
    };
    assert_eq!(data.validated().map(|d| d.entropy).ok(), Some(1.0));
    let nan = ReportData {
        entropy: f32::NAN,
        ..sample_data()
    };
    assert!(nan.validated().is_err());
}

#[test]
fn bucket_boundaries() {
    assert_eq!(DurationBucket::from_minutes(0.5), DurationBucket::Micro);
    assert_eq!(DurationBucket::from_minutes(1.0), DurationBucket::Micro);
    assert_eq!(DurationBucket::from_minutes(1.5), DurationBucket::Short);
    assert_eq!(DurationBucket::from_minutes(25.0), DurationBucket::Short);
    assert_eq!(DurationBucket::from_minutes(60.0), DurationBucket::Medium);
    assert_eq!(DurationBucket::from_minutes(61.0), DurationBucket::Long);
}

#[test]
fn parses_camel_case_payload() {
    let body = r#"{"dimensionCode":"AB-1","environment":"e","log":"l","entropy":-0.2,"stability":"Critical"}"#;
    let data = parse_report_data(body).expect("valid payload");
    assert_eq!(data.dimension_code, "AB-1");
    assert_eq!(data.entropy, 0.0);
    assert_eq!(data.stability, Stability::Critical);

    assert!(parse_report_data("{}").is_err());
    assert!(parse_report_data("not json").is_err());
}

#[test]
fn request_serializes_with_camel_case_keys() {
    let json = request(5.0, Language::Zh).to_json().expect("serializable");
    assert!(json.contains("\"durationMinutes\":5.0"));
    assert!(json.contains("\"taskContext\""));
    assert!(json.contains("\"language\":\"zh\""));
}

#[test]
fn language_tags_parse_leniently() {
    assert_eq!(Language::parse("zh"), Language::Zh);
    assert_eq!(Language::parse("ZH-CN"), Language::Zh);
    assert_eq!(Language::parse("fr"), Language::En);
}

#[test]
fn observation_report_keeps_the_generated_flag() {
    let generated = GeneratedReport {
        data: sample_data(),
        is_system_generated: true,
    };
    let report = ObservationReport::new("r-1", 1_700_000_000_000.0, 25.0, generated);
    assert_eq!(report.dimension_code, "XR-7");
    assert!(report.is_system_generated);
}
