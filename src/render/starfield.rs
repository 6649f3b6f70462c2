use super::{fill_circle, set_fill, set_stroke};
use crate::constants::BACKGROUND_RGB;
use crate::dom::rgba;
use focus_core::StarSprite;
use web_sys as web;

/// Paint one starfield frame. The background is a translucent fill rather
/// than a clear so previous frames linger as trails.
pub fn draw(
    ctx: &web::CanvasRenderingContext2d,
    width: f32,
    height: f32,
    sprites: &[StarSprite],
    trail_alpha: f32,
) {
    set_fill(ctx, &rgba(BACKGROUND_RGB, trail_alpha));
    ctx.fill_rect(0.0, 0.0, width as f64, height as f64);

    for s in sprites {
        if s.opacity <= 0.0 || s.size <= 0.0 {
            continue;
        }
        let style = rgba(s.color, s.opacity);
        if let Some(tail) = s.streak_to {
            set_stroke(ctx, &style);
            ctx.set_line_width(s.size as f64);
            ctx.begin_path();
            ctx.move_to(tail.x as f64, tail.y as f64);
            ctx.line_to(s.x as f64, s.y as f64);
            ctx.stroke();
        }
        set_fill(ctx, &style);
        fill_circle(ctx, s.x as f64, s.y as f64, s.size as f64);
    }
}
