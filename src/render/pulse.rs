use super::{fill_circle, radial_glow, set_fill, set_stroke};
use crate::constants::{PULSE_CORE_RGB, PULSE_PARTICLE_RGB, PULSE_RIPPLE_RGB, RIPPLE_LINE_WIDTH};
use crate::dom::rgba;
use focus_core::PulseFrame;
use web_sys as web;

/// Paint the pulse entity: core bloom, ripples, particles, then feedback glow.
pub fn draw(ctx: &web::CanvasRenderingContext2d, width: f32, height: f32, frame: &PulseFrame<'_>) {
    ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    if !frame.visible {
        return;
    }
    let fade = frame.fade;
    let cx = frame.center.x as f64;
    let cy = frame.center.y as f64;

    // Core: widest bloom first so the bright center sits on top.
    for layer in frame.bloom.iter().rev() {
        radial_glow(ctx, cx, cy, layer.radius as f64, PULSE_CORE_RGB, layer.opacity);
    }

    ctx.set_line_width(RIPPLE_LINE_WIDTH);
    for ripple in frame.ripples.iter() {
        set_stroke(ctx, &rgba(PULSE_RIPPLE_RGB, ripple.opacity * fade));
        ctx.begin_path();
        if ctx
            .arc(cx, cy, ripple.radius as f64, 0.0, std::f64::consts::TAU)
            .is_ok()
        {
            ctx.stroke();
        }
    }

    for p in frame.particles {
        set_fill(ctx, &rgba(PULSE_PARTICLE_RGB, p.opacity * fade));
        fill_circle(ctx, p.position.x as f64, p.position.y as f64, p.size as f64);
    }

    if let Some(glow) = frame.feedback {
        radial_glow(
            ctx,
            glow.position.x as f64,
            glow.position.y as f64,
            glow.radius as f64,
            PULSE_PARTICLE_RGB,
            glow.opacity,
        );
    }
}
