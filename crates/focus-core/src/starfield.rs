//! Star-tunnel particle simulation with perspective projection.
//!
//! The population is allocated once and never grows or shrinks: a star that
//! crosses the viewer plane is respawned at the far plane in the same slot.

use crate::constants::*;
use glam::Vec2;
use rand::prelude::*;

/// Session stage selecting the star palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Start,
    Mid,
    End,
}

impl Stage {
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => Stage::Start,
            1 => Stage::Mid,
            _ => Stage::End,
        }
    }

    pub fn palette(self) -> &'static [[u8; 3]; STAR_PALETTE_SIZE] {
        match self {
            Stage::Start => &[[235, 240, 255], [180, 205, 255], [200, 245, 255]],
            Stage::Mid => &[[120, 230, 255], [175, 140, 255], [140, 170, 255]],
            Stage::End => &[[255, 200, 120], [255, 140, 170], [255, 225, 150]],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Stable palette index, rolled once per star.
    pub color_slot: u8,
}

#[derive(Clone, Copy, Debug)]
pub struct StarfieldParams {
    pub count: usize,
    pub max_depth: f32,
    pub focal_length: f32,
    pub size: f32,
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            count: STAR_COUNT,
            max_depth: STAR_MAX_DEPTH,
            focal_length: STAR_FOCAL_LENGTH,
            size: STAR_SIZE,
        }
    }
}

/// External drive for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct StarfieldInput {
    /// 0..1 warp speed from the session.
    pub speed: f32,
    pub collapsed: bool,
    pub stage: Stage,
}

/// One projected star ready for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarSprite {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub opacity: f32,
    pub color: [u8; 3],
    /// Tail end of the motion streak, when one is drawn.
    pub streak_to: Option<Vec2>,
}

/// Depth units travelled per frame for a 0..1 speed input.
#[inline]
pub fn speed_factor(speed: f32, collapsed: bool) -> f32 {
    if collapsed {
        return STAR_COLLAPSED_SPEED;
    }
    (speed.clamp(0.0, 1.0) * STAR_SPEED_GAIN).max(STAR_SPEED_FLOOR)
}

/// Alpha of the per-frame background fill; lower alpha leaves longer trails.
#[inline]
pub fn trail_alpha(collapsed: bool) -> f32 {
    if collapsed {
        STAR_TRAIL_ALPHA_COLLAPSED
    } else {
        STAR_TRAIL_ALPHA_ACTIVE
    }
}

pub struct Starfield {
    params: StarfieldParams,
    stars: Vec<Star>,
    width: f32,
    height: f32,
    rng: StdRng,
}

impl Starfield {
    pub fn new(params: StarfieldParams, seed: u64) -> Self {
        Self {
            params,
            stars: Vec::with_capacity(params.count),
            width: 0.0,
            height: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Populate the field once. Calling again while populated is a no-op.
    pub fn init(&mut self, width: f32, height: f32) {
        if self.stars.len() == self.params.count {
            return;
        }
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        self.populate();
    }

    /// Replace viewport-dependent state in one step: dimensions first, then a
    /// full repopulation against them.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        self.populate();
        log::info!(
            "[starfield] resized to {:.0}x{:.0}, {} stars",
            self.width,
            self.height,
            self.stars.len()
        );
    }

    fn populate(&mut self) {
        self.stars.clear();
        for _ in 0..self.params.count {
            let (x, y) = self.random_offset();
            let z = self.rng.gen_range(1.0..=self.params.max_depth);
            let color_slot = self.rng.gen_range(0..STAR_PALETTE_SIZE) as u8;
            self.stars.push(Star { x, y, z, color_slot });
        }
    }

    fn random_offset(&mut self) -> (f32, f32) {
        let x = self.rng.gen_range(-self.width..=self.width);
        let y = self.rng.gen_range(-self.height..=self.height);
        (x, y)
    }

    /// Advance every star and collect the visible ones into `out`.
    ///
    /// `center_offset` is the parallax displacement in pixels.
    pub fn step(&mut self, input: &StarfieldInput, center_offset: Vec2, out: &mut Vec<StarSprite>) {
        out.clear();
        let speed = speed_factor(input.speed, input.collapsed);
        let streaks = !input.collapsed && input.speed > STAR_STREAK_THRESHOLD;
        let (size_scale, opacity_scale) = if input.collapsed {
            (STAR_COLLAPSED_SIZE_SCALE, STAR_COLLAPSED_OPACITY_SCALE)
        } else {
            (1.0, 1.0)
        };
        let palette = input.stage.palette();
        let center = Vec2::new(self.width * 0.5, self.height * 0.5) + center_offset;
        let max_depth = self.params.max_depth;

        for i in 0..self.stars.len() {
            self.stars[i].z -= speed;
            if self.stars[i].z <= 0.0 {
                let (x, y) = self.random_offset();
                let star = &mut self.stars[i];
                star.x = x;
                star.y = y;
                star.z = max_depth;
            }
            let star = self.stars[i];

            let scale = self.params.focal_length / star.z;
            let pos = Vec2::new(star.x * scale, star.y * scale) + center;
            if pos.x < 0.0 || pos.x > self.width || pos.y < 0.0 || pos.y > self.height {
                continue;
            }
            let nearness = (1.0 - star.z / max_depth).clamp(0.0, 1.0);
            let size = nearness * self.params.size * size_scale;
            let opacity = nearness * opacity_scale;

            let streak_to = if streaks {
                let dir = (pos - center).normalize_or_zero();
                (dir != Vec2::ZERO).then(|| pos - dir * size * speed * STAR_STREAK_GAIN)
            } else {
                None
            };

            out.push(StarSprite {
                x: pos.x,
                y: pos.y,
                size,
                opacity,
                color: palette[star.color_slot as usize % STAR_PALETTE_SIZE],
                streak_to,
            });
        }
    }
}
