//! Canvas 2D drawing for the star tunnel and the pulse entity.
//!
//! Everything here is stateless: simulations produce frames, these functions
//! paint them.

pub mod pulse;
pub mod starfield;

use crate::dom::rgba;
use wasm_bindgen::JsValue;
use web_sys as web;

#[allow(deprecated)]
#[inline]
pub(crate) fn set_fill(ctx: &web::CanvasRenderingContext2d, style: &str) {
    ctx.set_fill_style(&JsValue::from_str(style));
}

#[allow(deprecated)]
#[inline]
pub(crate) fn set_stroke(ctx: &web::CanvasRenderingContext2d, style: &str) {
    ctx.set_stroke_style(&JsValue::from_str(style));
}

pub(crate) fn fill_circle(ctx: &web::CanvasRenderingContext2d, x: f64, y: f64, r: f64) {
    ctx.begin_path();
    if ctx.arc(x, y, r.max(0.0), 0.0, std::f64::consts::TAU).is_ok() {
        ctx.fill();
    }
}

/// Soft disc: `rgb` at `alpha` in the middle fading to transparent at `radius`.
pub(crate) fn radial_glow(
    ctx: &web::CanvasRenderingContext2d,
    x: f64,
    y: f64,
    radius: f64,
    rgb: [u8; 3],
    alpha: f32,
) {
    if radius <= 0.0 || alpha <= 0.0 {
        return;
    }
    let gradient = match ctx.create_radial_gradient(x, y, 0.0, x, y, radius) {
        Ok(g) => g,
        Err(e) => {
            log::warn!("[render] gradient error: {:?}", e);
            return;
        }
    };
    _ = gradient.add_color_stop(0.0, &rgba(rgb, alpha));
    _ = gradient.add_color_stop(0.5, &rgba(rgb, alpha * 0.4));
    _ = gradient.add_color_stop(1.0, &rgba(rgb, 0.0));
    #[allow(deprecated)]
    ctx.set_fill_style(&gradient);
    fill_circle(ctx, x, y, radius);
}
