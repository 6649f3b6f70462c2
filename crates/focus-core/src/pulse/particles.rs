use crate::constants::*;
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// px per frame at 60 fps.
    pub velocity: Vec2,
    /// Orbit radius in multiples of the entity base radius.
    pub base_orbit_radius: f32,
    pub orbit_angle: f32,
    /// rad/s, signed.
    pub orbit_speed: f32,
    pub size: f32,
    pub base_size: f32,
    pub opacity: f32,
    pub phase: f32,
}

/// Active pointer or touch acting on the swarm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionPoint {
    pub position: Vec2,
    /// 0..1
    pub strength: f32,
}

/// Force exerted on a particle offset `delta` away from the interaction point
/// (`delta = point - particle`).
///
/// Magnitude falls off linearly from `INTERACTION_MAX_FORCE * strength` at the
/// point to exactly zero at `INFLUENCE_RADIUS`. Direction blends attraction
/// with a perpendicular swirl.
pub fn interaction_force(delta: Vec2, strength: f32) -> Vec2 {
    let distance = delta.length();
    if distance >= INFLUENCE_RADIUS || !distance.is_finite() {
        return Vec2::ZERO;
    }
    let toward = if distance > 1e-4 { delta / distance } else { Vec2::X };
    let swirl = toward.perp();
    let dir = (toward * INTERACTION_ATTRACT_WEIGHT + swirl * INTERACTION_SWIRL_WEIGHT).normalize();
    let falloff = 1.0 - distance / INFLUENCE_RADIUS;
    dir * INTERACTION_MAX_FORCE * strength.clamp(0.0, 1.0) * falloff
}

/// Per-frame blend factor for an exponential approach expressed at 60 fps.
#[inline]
fn blend(per_frame: f32, frames: f32) -> f32 {
    1.0 - (1.0 - per_frame).powf(frames)
}

#[derive(Clone, Debug)]
pub struct ParticleSwarm {
    particles: Vec<Particle>,
}

impl ParticleSwarm {
    pub fn new<R: Rng>(count: usize, center: Vec2, base_radius: f32, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|_| {
                let base_orbit_radius = rng.gen_range(PARTICLE_ORBIT_MIN..PARTICLE_ORBIT_MAX);
                let orbit_angle = rng.gen_range(0.0..TAU);
                let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                let base_size = rng.gen_range(PARTICLE_SIZE_MIN..PARTICLE_SIZE_MAX);
                let r = base_orbit_radius * base_radius;
                Particle {
                    position: center + Vec2::from_angle(orbit_angle) * r,
                    velocity: Vec2::ZERO,
                    base_orbit_radius,
                    orbit_angle,
                    orbit_speed: direction * rng.gen_range(0.08..0.35),
                    size: base_size,
                    base_size,
                    opacity: PARTICLE_OPACITY_MIN,
                    phase: rng.gen_range(0.0..TAU),
                }
            })
            .collect();
        Self { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Shift every particle when the entity center moves (resize).
    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.particles {
            p.position += delta;
        }
    }

    /// Advance the swarm by `dt_sec`; `time_sec` drives wobble and twinkle,
    /// `high` is the high-band audio level.
    /// Particles are held within `PARTICLE_FIELD_RADIUS` x `base_radius` of
    /// `center`, wider than the interaction influence radius.
    pub fn step(
        &mut self,
        dt_sec: f32,
        time_sec: f32,
        center: Vec2,
        base_radius: f32,
        interaction: Option<InteractionPoint>,
        high: f32,
    ) {
        let dt = dt_sec.max(0.0);
        let frames = dt * 60.0;
        let damping = PARTICLE_DAMPING.powf(frames);
        let size_alpha = blend(PARTICLE_SIZE_SMOOTHING, frames);
        let opacity_alpha = blend(PARTICLE_OPACITY_SMOOTHING, frames);
        let field_radius = PARTICLE_FIELD_RADIUS * base_radius;
        let high = high.clamp(0.0, 1.0);

        for p in &mut self.particles {
            p.orbit_angle = (p.orbit_angle + p.orbit_speed * dt) % TAU;
            let orbit = p.base_orbit_radius * base_radius;
            let wobble = (time_sec * PARTICLE_WOBBLE_RATE + p.phase).sin() * PARTICLE_WOBBLE * orbit;
            let target = center + Vec2::from_angle(p.orbit_angle) * (orbit + wobble);

            let mut spring = PARTICLE_SPRING;
            if let Some(point) = interaction {
                let force = interaction_force(point.position - p.position, point.strength);
                if force != Vec2::ZERO {
                    p.velocity += force * frames;
                    spring *= PARTICLE_SPRING_INFLUENCED;
                }
            }
            p.velocity += (target - p.position) * spring * frames;
            p.velocity *= damping;
            p.position += p.velocity * frames;

            let offset = p.position - center;
            let distance = offset.length();
            if distance > field_radius {
                let normal = offset / distance;
                p.position = center + normal * field_radius;
                let outward = p.velocity.dot(normal);
                if outward > 0.0 {
                    p.velocity -= normal * outward;
                }
            }

            let size_target = p.base_size * (1.0 + high * PARTICLE_HIGH_SIZE_GAIN);
            p.size += (size_target - p.size) * size_alpha;

            let twinkle = 0.5 + 0.5 * (time_sec * PARTICLE_TWINKLE_RATE + p.phase).sin();
            let opacity_target =
                PARTICLE_OPACITY_MIN + (PARTICLE_OPACITY_MAX - PARTICLE_OPACITY_MIN) * twinkle;
            p.opacity += (opacity_target - p.opacity) * opacity_alpha;
        }
    }
}
