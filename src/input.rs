use focus_core::Capabilities;
use glam::Vec2;
use wasm_bindgen::JsValue;
use web_sys as web;

/// Sample platform capabilities. `orientation_granted` starts false; it is
/// only set once a permission request resolves.
pub fn detect_capabilities(window: &web::Window) -> Capabilities {
    let touch = js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    let fine_pointer = window
        .match_media("(pointer: fine)")
        .ok()
        .flatten()
        .map_or(!touch, |mql| mql.matches());
    let viewport_width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as f32;
    let orientation_api =
        js_sys::Reflect::has(window, &JsValue::from_str("DeviceOrientationEvent")).unwrap_or(false);
    Capabilities {
        touch,
        fine_pointer,
        viewport_width,
        orientation_api,
        orientation_granted: false,
    }
}

#[inline]
pub fn viewport_size(window: &web::Window) -> (f32, f32) {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w as f32, h as f32)
}

/// Client coordinates mapped into the canvas backing store (device px).
#[inline]
pub fn client_to_canvas_px(client_x: f32, client_y: f32, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let w = rect.width() as f32;
    let h = rect.height() as f32;
    if w <= 0.0 || h <= 0.0 {
        return Vec2::ZERO;
    }
    let x_css = client_x - rect.left() as f32;
    let y_css = client_y - rect.top() as f32;
    Vec2::new(
        x_css / w * canvas.width() as f32,
        y_css / h * canvas.height() as f32,
    )
}

#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    client_to_canvas_px(ev.client_x() as f32, ev.client_y() as f32, canvas)
}

/// First touch of a touch list, in canvas pixels.
pub fn touch_canvas_px(list: &web::TouchList, canvas: &web::HtmlCanvasElement) -> Option<Vec2> {
    let t = list.get(0)?;
    Some(client_to_canvas_px(
        t.client_x() as f32,
        t.client_y() as f32,
        canvas,
    ))
}
