use crate::constants::REPORT_ENDPOINT;
use focus_core::{
    generate_report as generate, parse_report_data, Language, ObservationReport, ReportData,
    ReportError, ReportRequest,
};
use rand::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn js_err(e: JsValue) -> ReportError {
    ReportError::Network(format!("{:?}", e))
}

async fn fetch_report(request: ReportRequest) -> Result<ReportData, ReportError> {
    let window = web::window().ok_or_else(|| ReportError::Network("no window".into()))?;
    let body = request.to_json()?;

    let headers = web::Headers::new().map_err(js_err)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(js_err)?;
    let init = web::RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body));

    let response = JsFuture::from(window.fetch_with_str_and_init(REPORT_ENDPOINT, &init))
        .await
        .map_err(js_err)?
        .dyn_into::<web::Response>()
        .map_err(js_err)?;
    if !response.ok() {
        return Err(ReportError::Status(response.status()));
    }
    let text = JsFuture::from(response.text().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .as_string()
        .ok_or_else(|| ReportError::Malformed("response body is not text".into()))?;
    parse_report_data(&text)
}

/// Produce the observation report for a finished session. Always resolves;
/// service failures fall back to the local table.
#[wasm_bindgen(js_name = generateReport)]
pub async fn generate_report(
    duration_minutes: f64,
    task_context: String,
    tier: u8,
    language: String,
) -> Result<JsValue, JsValue> {
    let mut rng = StdRng::from_entropy();
    let request = ReportRequest {
        duration_minutes,
        task_context,
        tier,
        language: Language::parse(&language),
    };
    let generated = generate(request, fetch_report, &mut rng).await;
    log::info!(
        "[report] {} ({})",
        generated.data.dimension_code,
        if generated.is_system_generated {
            "fallback"
        } else {
            "service"
        }
    );

    let id = format!("{:016x}", rng.gen::<u64>());
    let report = ObservationReport::new(id, js_sys::Date::now(), duration_minutes, generated);
    let json = serde_json::to_string(&report).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}
