//! Damped follow of the motion target, producing the displacement signal
//! shared by every visual layer.

use crate::constants::{PARALLAX_CENTER_ATTRACTION, PARALLAX_FOLLOW_SPEED};
use crate::motion::MotionVector;
use glam::Vec2;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug)]
pub struct ParallaxParams {
    /// Fraction of the remaining gap closed each frame, in (0, 1).
    pub follow_speed: f32,
    /// Per-frame decay toward center, in (0, 1) and close to 1.
    pub center_attraction: f32,
}

impl Default for ParallaxParams {
    fn default() -> Self {
        Self {
            follow_speed: PARALLAX_FOLLOW_SPEED,
            center_attraction: PARALLAX_CENTER_ATTRACTION,
        }
    }
}

/// Read-only view of the latest displacement. Cheap to clone; every visual
/// component holds one while the engine remains the single writer.
#[derive(Clone, Debug, Default)]
pub struct Displacement {
    current: Rc<Cell<Vec2>>,
}

impl Displacement {
    /// Last computed `current` scaled to pixels: `current * max * depth`.
    #[inline]
    pub fn get(&self, depth: f32, max_displacement: f32) -> Vec2 {
        self.current.get() * max_displacement * depth
    }

    #[inline]
    pub fn current(&self) -> Vec2 {
        self.current.get()
    }
}

#[derive(Debug)]
pub struct ParallaxEngine {
    params: ParallaxParams,
    enabled: bool,
    target: MotionVector,
    current: Rc<Cell<Vec2>>,
}

impl Default for ParallaxEngine {
    fn default() -> Self {
        Self::new(ParallaxParams::default())
    }
}

impl ParallaxEngine {
    pub fn new(params: ParallaxParams) -> Self {
        let params = ParallaxParams {
            follow_speed: params.follow_speed.clamp(f32::EPSILON, 1.0 - f32::EPSILON),
            center_attraction: params
                .center_attraction
                .clamp(f32::EPSILON, 1.0 - f32::EPSILON),
        };
        Self {
            params,
            enabled: false,
            target: MotionVector::ZERO,
            current: Rc::new(Cell::new(Vec2::ZERO)),
        }
    }

    pub fn params(&self) -> ParallaxParams {
        self.params
    }

    pub fn reader(&self) -> Displacement {
        Displacement {
            current: self.current.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling pins the displacement to zero immediately so dependent
    /// visuals snap back on their next read.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if !enabled {
            self.current.set(Vec2::ZERO);
        }
        log::info!("[parallax] enabled={}", enabled);
    }

    pub fn set_target(&mut self, target: MotionVector) {
        self.target = target.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    }

    pub fn target(&self) -> MotionVector {
        self.target
    }

    /// Advance one animation frame.
    pub fn step(&mut self) {
        if !self.enabled {
            return;
        }
        let mut current = self.current.get();
        current += (self.target - current) * self.params.follow_speed;
        current *= self.params.center_attraction;
        self.current.set(current);
    }

    #[inline]
    pub fn displacement(&self, depth: f32, max_displacement: f32) -> Vec2 {
        self.current.get() * max_displacement * depth
    }
}
