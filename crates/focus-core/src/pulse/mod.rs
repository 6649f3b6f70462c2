//! The audio- and interaction-reactive "pulse" entity.
//!
//! Four layers are produced per frame, back to front: breathing core with
//! bloom, ripples, orbiting particle swarm, and interaction feedback glow.

mod particles;
mod ripples;

pub use particles::*;
pub use ripples::*;

use crate::analyzer::AudioFrame;
use crate::constants::*;
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug)]
pub struct PulseParams {
    pub particle_count: usize,
    /// Base radius relative to min(viewport width, height).
    pub base_radius_ratio: f32,
}

impl Default for PulseParams {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            base_radius_ratio: BASE_RADIUS_RATIO,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Contact {
    position: Vec2,
    pressed: bool,
    press_started: f32,
}

/// Pointer and touch tracked independently. Touch takes precedence whenever
/// it is active; the pointer drives the swarm only when no touch is down.
#[derive(Clone, Copy, Debug, Default)]
struct InteractionState {
    pointer: Option<Contact>,
    touch: Option<Contact>,
}

impl InteractionState {
    fn resolve(&self, clock: f32) -> Option<InteractionPoint> {
        let contact = self.touch.or(self.pointer)?;
        let strength = if contact.pressed {
            ((clock - contact.press_started) / PRESS_RAMP_SEC).clamp(0.0, 1.0)
        } else {
            HOVER_STRENGTH
        };
        Some(InteractionPoint {
            position: contact.position,
            strength,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomLayer {
    pub radius: f32,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeedbackGlow {
    pub position: Vec2,
    pub radius: f32,
    pub opacity: f32,
}

/// Everything the renderer needs for one frame, in draw order.
pub struct PulseFrame<'a> {
    /// False when fully faded out and inactive; drawing can be skipped.
    pub visible: bool,
    pub fade: f32,
    pub center: Vec2,
    pub core_radius: f32,
    pub bloom: [BloomLayer; 4],
    pub ripples: &'a RippleSet,
    pub particles: &'a [Particle],
    pub feedback: Option<FeedbackGlow>,
}

pub struct PulseEntity {
    params: PulseParams,
    width: f32,
    height: f32,
    center: Vec2,
    base_radius: f32,
    clock: f32,
    active: bool,
    fade: f32,
    core_radius: f32,
    ripples: RippleSet,
    swarm: ParticleSwarm,
    interaction: InteractionState,
}

impl PulseEntity {
    pub fn new(params: PulseParams, width: f32, height: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let width = width.max(1.0);
        let height = height.max(1.0);
        let center = Vec2::new(width * 0.5, height * 0.5);
        let base_radius = width.min(height) * params.base_radius_ratio;
        let swarm = ParticleSwarm::new(params.particle_count, center, base_radius, &mut rng);
        Self {
            params,
            width,
            height,
            center,
            base_radius,
            clock: 0.0,
            active: false,
            fade: 0.0,
            core_radius: base_radius,
            ripples: RippleSet::new(),
            swarm,
            interaction: InteractionState::default(),
        }
    }

    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn fade(&self) -> f32 {
        self.fade
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn ripples(&self) -> &RippleSet {
        &self.ripples
    }

    pub fn particles(&self) -> &[Particle] {
        self.swarm.particles()
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        let center = Vec2::new(self.width * 0.5, self.height * 0.5);
        self.swarm.translate(center - self.center);
        self.center = center;
        self.base_radius = self.width.min(self.height) * self.params.base_radius_ratio;
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    // ---------------- interaction ----------------

    pub fn pointer_move(&mut self, position: Vec2) {
        match &mut self.interaction.pointer {
            Some(c) => c.position = position,
            None => {
                self.interaction.pointer = Some(Contact {
                    position,
                    pressed: false,
                    press_started: self.clock,
                })
            }
        }
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        self.interaction.pointer = Some(Contact {
            position,
            pressed: true,
            press_started: self.clock,
        });
    }

    pub fn pointer_up(&mut self, position: Vec2) {
        let was_pressed = self.interaction.pointer.map_or(false, |c| c.pressed);
        self.interaction.pointer = Some(Contact {
            position,
            pressed: false,
            press_started: self.clock,
        });
        if was_pressed {
            self.release_ripple();
        }
    }

    pub fn pointer_leave(&mut self) {
        self.interaction.pointer = None;
    }

    pub fn touch_start(&mut self, position: Vec2) {
        self.interaction.touch = Some(Contact {
            position,
            pressed: true,
            press_started: self.clock,
        });
    }

    pub fn touch_move(&mut self, position: Vec2) {
        if let Some(c) = &mut self.interaction.touch {
            c.position = position;
        }
    }

    pub fn touch_end(&mut self) {
        if self.interaction.touch.take().is_some() {
            self.release_ripple();
        }
    }

    /// Interaction currently acting on the swarm, after precedence.
    pub fn interaction(&self) -> Option<InteractionPoint> {
        self.interaction.resolve(self.clock)
    }

    /// Inactive and fully faded out.
    fn is_hidden(&self) -> bool {
        !self.active && self.fade <= FADE_SKIP_EPSILON
    }

    fn release_ripple(&mut self) {
        if self.is_hidden() {
            return;
        }
        if !self.ripples.spawn(Ripple::from_release(self.core_radius)) {
            log::debug!("[pulse] ripple cap reached; release ripple dropped");
        }
    }

    // ---------------- frame ----------------

    /// Advance one animation frame. `offset` is the parallax displacement.
    pub fn step(&mut self, dt_sec: f32, audio: &AudioFrame, offset: Vec2) -> PulseFrame<'_> {
        let dt = dt_sec.max(0.0);
        self.clock += dt;

        let fade_target = if self.active { 1.0 } else { 0.0 };
        self.fade += (fade_target - self.fade) * (1.0 - (-dt / FADE_TAU_SEC).exp());
        let center = self.center + offset;

        let visible = self.active || self.fade > FADE_SKIP_EPSILON;
        if !visible {
            self.fade = 0.0;
            self.ripples.clear();
            return PulseFrame {
                visible,
                fade: 0.0,
                center,
                core_radius: self.core_radius,
                bloom: [BloomLayer {
                    radius: 0.0,
                    opacity: 0.0,
                }; 4],
                ripples: &self.ripples,
                particles: self.swarm.particles(),
                feedback: None,
            };
        }

        let levels = audio.levels;
        let breathing = BREATH_AMPLITUDE * (TAU * self.clock / BREATH_PERIOD_SEC).sin();
        self.core_radius = self.base_radius * (1.0 + breathing + BASS_RADIUS_GAIN * levels.bass);

        if audio.beat && !self.ripples.spawn(Ripple::from_beat(self.core_radius, levels.bass)) {
            log::debug!("[pulse] ripple cap reached; beat ripple dropped");
        }
        self.ripples.step(dt);

        let interaction = self.interaction.resolve(self.clock);
        self.swarm.step(
            dt,
            self.clock,
            center,
            self.base_radius,
            interaction,
            levels.high,
        );

        let bloom = BLOOM_LAYERS.map(|(scale, opacity)| BloomLayer {
            radius: self.core_radius * scale,
            opacity: opacity * self.fade,
        });
        let feedback = interaction.map(|point| FeedbackGlow {
            position: point.position,
            radius: FEEDBACK_GLOW_RADIUS,
            opacity: FEEDBACK_GLOW_OPACITY * point.strength * self.fade,
        });

        PulseFrame {
            visible,
            fade: self.fade,
            center,
            core_radius: self.core_radius,
            bloom,
            ripples: &self.ripples,
            particles: self.swarm.particles(),
            feedback,
        }
    }
}
