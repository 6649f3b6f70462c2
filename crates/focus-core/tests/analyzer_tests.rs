// Host-side tests for band reduction and beat detection.

use focus_core::constants::*;
use focus_core::*;

#[test]
fn band_edges_split_ten_forty_fifty() {
    assert_eq!(band_edges(1024), (102, 512));
    assert_eq!(band_edges(0), (0, 0));
    let (bass, mid) = band_edges(3);
    assert_eq!(bass, 1);
    assert!(mid >= bass && mid <= 3);
}

#[test]
fn band_levels_are_normalized_means() {
    let full = vec![255u8; 1024];
    let levels = band_levels(&full);
    assert_eq!(levels, BandLevels { bass: 1.0, mid: 1.0, high: 1.0 });

    let mut bass_only = vec![0u8; 1024];
    for b in bass_only.iter_mut().take(102) {
        *b = 255;
    }
    let levels = band_levels(&bass_only);
    assert_eq!(levels.bass, 1.0);
    assert_eq!(levels.mid, 0.0);
    assert_eq!(levels.high, 0.0);
}

#[test]
fn missing_analyser_yields_silence_and_no_beats() {
    let mut bridge = AnalyzerBridge::new();
    for i in 0..600 {
        let frame = bridge.sample(None, i as f64 / 60.0);
        assert_eq!(frame, AudioFrame::default());
        assert!(!bridge.sample(Some(&[]), i as f64 / 60.0).beat);
    }
}

#[test]
fn first_sample_never_beats() {
    let mut detector = BeatDetector::new();
    assert!(!detector.push(1.0, 0.0));
}

#[test]
fn onset_over_quiet_history_beats() {
    let mut detector = BeatDetector::new();
    for i in 0..BEAT_HISTORY_LEN {
        assert!(!detector.push(0.1, i as f64 * 0.016));
    }
    assert!(detector.push(0.9, 1.0));
}

#[test]
fn quiet_onsets_below_floor_are_ignored() {
    let mut detector = BeatDetector::new();
    for i in 0..BEAT_HISTORY_LEN {
        detector.push(0.01, i as f64 * 0.016);
    }
    assert!(!detector.push(BEAT_FLOOR * 0.9, 1.0));
}

#[test]
fn refractory_interval_prevents_double_fire() {
    let mut detector = BeatDetector::new();
    let mut beats = Vec::new();
    // Alternate silence and full bass every 50 ms for five seconds.
    for i in 0..100 {
        let t = i as f64 * 0.05;
        let bass = if i % 2 == 0 { 0.0 } else { 1.0 };
        if detector.push(bass, t) {
            beats.push(t);
        }
    }
    assert!(!beats.is_empty());
    for pair in beats.windows(2) {
        assert!(pair[1] - pair[0] >= BEAT_REFRACTORY_SEC - 1e-9);
    }
}

#[test]
fn reset_clears_history() {
    let mut bridge = AnalyzerBridge::new();
    let loud = vec![255u8; 64];
    let quiet = vec![10u8; 64];
    for i in 0..10 {
        bridge.sample(Some(&quiet), i as f64);
    }
    bridge.reset();
    assert!(!bridge.sample(Some(&loud), 100.0).beat);
}
