//! Motion input tracking: pointer and device-orientation events mapped onto a
//! normalized target vector for the parallax engine.

use crate::constants::{ORIENTATION_BETA_NEUTRAL_DEG, ORIENTATION_RANGE_DEG, SMALL_VIEWPORT_MAX_WIDTH};
use glam::Vec2;

/// Normalized displacement from the viewport center, each axis in [-1, 1].
pub type MotionVector = Vec2;

/// Which raw input currently drives the motion target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSource {
    Pointer,
    Orientation,
    None,
}

/// Platform capabilities sampled once at startup (and again when the
/// orientation permission resolves).
#[derive(Clone, Copy, Debug, Default)]
pub struct Capabilities {
    pub touch: bool,
    pub fine_pointer: bool,
    pub viewport_width: f32,
    pub orientation_api: bool,
    pub orientation_granted: bool,
}

impl Capabilities {
    pub fn small_viewport(&self) -> bool {
        self.viewport_width > 0.0 && self.viewport_width < SMALL_VIEWPORT_MAX_WIDTH
    }
}

/// Pick the single active input source.
///
/// Orientation wins on touch-capable small viewports once permission is
/// granted. A pure touch device without orientation has no usable source, so
/// parallax stays pinned near zero instead of following stray touches.
pub fn resolve_input_source(caps: &Capabilities) -> InputSource {
    let prefers_orientation = caps.touch && caps.small_viewport();
    if prefers_orientation && caps.orientation_api && caps.orientation_granted {
        return InputSource::Orientation;
    }
    if caps.touch && !caps.fine_pointer {
        return InputSource::None;
    }
    InputSource::Pointer
}

/// Map an absolute pointer position to [-1, 1] relative to the viewport center.
#[inline]
pub fn pointer_to_motion(px: f32, py: f32, width: f32, height: f32) -> MotionVector {
    if width <= 0.0 || height <= 0.0 {
        return MotionVector::ZERO;
    }
    let x = (px / width - 0.5) * 2.0;
    let y = (py / height - 0.5) * 2.0;
    MotionVector::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0))
}

/// Map device tilt (degrees) to [-1, 1]. `gamma` is left/right, `beta` is
/// front/back and is measured relative to a hand-held neutral angle.
#[inline]
pub fn orientation_to_motion(beta_deg: f32, gamma_deg: f32) -> MotionVector {
    let x = gamma_deg / ORIENTATION_RANGE_DEG;
    let y = (beta_deg - ORIENTATION_BETA_NEUTRAL_DEG) / ORIENTATION_RANGE_DEG;
    let x = if x.is_finite() { x.clamp(-1.0, 1.0) } else { 0.0 };
    let y = if y.is_finite() { y.clamp(-1.0, 1.0) } else { 0.0 };
    MotionVector::new(x, y)
}

/// Event-driven holder of the current motion target. Events from a source
/// other than the active one are ignored.
#[derive(Clone, Debug)]
pub struct MotionTracker {
    source: InputSource,
    target: MotionVector,
}

impl Default for MotionTracker {
    fn default() -> Self {
        Self::new(InputSource::Pointer)
    }
}

impl MotionTracker {
    pub fn new(source: InputSource) -> Self {
        Self {
            source,
            target: MotionVector::ZERO,
        }
    }

    pub fn source(&self) -> InputSource {
        self.source
    }

    /// Switch the active source. The target resets so a stale value from the
    /// previous source cannot linger.
    pub fn set_source(&mut self, source: InputSource) {
        if self.source != source {
            log::info!("[motion] input source {:?} -> {:?}", self.source, source);
            self.source = source;
            self.target = MotionVector::ZERO;
        }
    }

    pub fn target(&self) -> MotionVector {
        self.target
    }

    pub fn on_pointer_move(&mut self, px: f32, py: f32, width: f32, height: f32) {
        if self.source == InputSource::Pointer {
            self.target = pointer_to_motion(px, py, width, height);
        }
    }

    pub fn on_pointer_leave(&mut self) {
        if self.source == InputSource::Pointer {
            self.target = MotionVector::ZERO;
        }
    }

    pub fn on_orientation(&mut self, beta_deg: f32, gamma_deg: f32) {
        if self.source == InputSource::Orientation {
            self.target = orientation_to_motion(beta_deg, gamma_deg);
        }
    }
}
