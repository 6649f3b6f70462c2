use crate::constants::*;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    pub radius: f32,
    pub opacity: f32,
    /// Growth in px/s.
    pub speed: f32,
    pub max_radius: f32,
}

impl Ripple {
    /// Ripple spawned by a detected beat; bass energy scales speed and opacity.
    pub fn from_beat(base_radius: f32, bass: f32) -> Self {
        let bass = bass.clamp(0.0, 1.0);
        Self {
            radius: base_radius,
            opacity: 0.3 + 0.4 * bass,
            speed: BEAT_RIPPLE_SPEED + BEAT_RIPPLE_SPEED_BASS * bass,
            max_radius: base_radius * BEAT_RIPPLE_MAX_RADIUS,
        }
    }

    /// Larger, faster ripple spawned when a press or touch is released.
    pub fn from_release(base_radius: f32) -> Self {
        Self {
            radius: base_radius,
            opacity: RELEASE_RIPPLE_OPACITY,
            speed: RELEASE_RIPPLE_SPEED,
            max_radius: base_radius * RELEASE_RIPPLE_MAX_RADIUS,
        }
    }

    #[inline]
    pub fn is_spent(&self) -> bool {
        self.radius > self.max_radius || self.opacity < RIPPLE_EPSILON
    }
}

/// Bounded set of live ripples. Spawning above the cap is rejected.
#[derive(Clone, Debug, Default)]
pub struct RippleSet {
    live: SmallVec<[Ripple; MAX_RIPPLES]>,
}

impl RippleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the cap is reached and the ripple was dropped.
    pub fn spawn(&mut self, ripple: Ripple) -> bool {
        if self.live.len() >= MAX_RIPPLES {
            return false;
        }
        self.live.push(ripple);
        true
    }

    /// Grow and fade every ripple, then remove spent ones.
    pub fn step(&mut self, dt_sec: f32) {
        let dt = dt_sec.max(0.0);
        let fade = RIPPLE_FADE_PER_FRAME.powf(dt * 60.0);
        for r in self.live.iter_mut() {
            r.radius += r.speed * dt;
            r.opacity *= fade;
        }
        self.live.retain(|r| !r.is_spent());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ripple> {
        self.live.iter()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}
