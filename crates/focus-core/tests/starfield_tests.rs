// Host-side tests for the star tunnel simulation.

use focus_core::constants::*;
use focus_core::*;
use glam::Vec2;

fn field() -> Starfield {
    let mut f = Starfield::new(StarfieldParams::default(), 7);
    f.init(800.0, 600.0);
    f
}

#[test]
fn init_populates_exactly_once() {
    let mut f = field();
    assert_eq!(f.len(), STAR_COUNT);
    let before: Vec<Star> = f.stars().to_vec();
    f.init(1920.0, 1080.0);
    assert_eq!(f.stars(), &before[..]);
    assert_eq!(f.viewport(), (800.0, 600.0));
}

#[test]
fn population_is_constant_across_respawns() {
    let mut f = field();
    let mut sprites = Vec::new();
    let input = StarfieldInput {
        speed: 1.0,
        ..Default::default()
    };
    for _ in 0..2000 {
        f.step(&input, Vec2::ZERO, &mut sprites);
        assert_eq!(f.len(), STAR_COUNT);
        assert!(sprites.len() <= STAR_COUNT);
    }
    for s in f.stars() {
        assert!(s.z > 0.0 && s.z <= STAR_MAX_DEPTH, "z out of range: {}", s.z);
    }
}

#[test]
fn color_slots_survive_frames_and_respawns() {
    let mut f = field();
    let mut sprites = Vec::new();
    let input = StarfieldInput {
        speed: 1.0,
        ..Default::default()
    };
    let slots: Vec<u8> = f.stars().iter().map(|s| s.color_slot).collect();
    let mut respawns = 0;
    for _ in 0..2000 {
        let before: Vec<f32> = f.stars().iter().map(|s| s.z).collect();
        f.step(&input, Vec2::ZERO, &mut sprites);
        respawns += f
            .stars()
            .iter()
            .zip(&before)
            .filter(|(s, z)| s.z > **z)
            .count();
        let now: Vec<u8> = f.stars().iter().map(|s| s.color_slot).collect();
        assert_eq!(now, slots);
    }
    assert!(respawns > 0, "no star crossed the viewer plane");
}

#[test]
fn resize_repopulates_against_new_viewport() {
    let mut f = field();
    f.resize(200.0, 100.0);
    assert_eq!(f.len(), STAR_COUNT);
    assert_eq!(f.viewport(), (200.0, 100.0));
    for s in f.stars() {
        assert!(s.x.abs() <= 200.0);
        assert!(s.y.abs() <= 100.0);
    }
}

#[test]
fn sprites_stay_on_screen() {
    let mut f = field();
    let mut sprites = Vec::new();
    f.step(&StarfieldInput::default(), Vec2::new(15.0, -10.0), &mut sprites);
    assert!(!sprites.is_empty());
    for s in &sprites {
        assert!(s.x >= 0.0 && s.x <= 800.0);
        assert!(s.y >= 0.0 && s.y <= 600.0);
        assert!(s.opacity >= 0.0 && s.opacity <= 1.0);
    }
}

#[test]
fn streaks_only_at_high_speed() {
    let mut f = field();
    let mut sprites = Vec::new();

    f.step(
        &StarfieldInput {
            speed: 0.1,
            ..Default::default()
        },
        Vec2::ZERO,
        &mut sprites,
    );
    assert!(sprites.iter().all(|s| s.streak_to.is_none()));

    f.step(
        &StarfieldInput {
            speed: 1.0,
            ..Default::default()
        },
        Vec2::ZERO,
        &mut sprites,
    );
    assert!(sprites.iter().any(|s| s.streak_to.is_some()));
}

#[test]
fn collapsed_mode_is_slow_dim_and_without_streaks() {
    assert_eq!(speed_factor(1.0, true), STAR_COLLAPSED_SPEED);
    assert!(trail_alpha(true) < trail_alpha(false));

    let mut f = field();
    let mut sprites = Vec::new();
    let input = StarfieldInput {
        speed: 1.0,
        collapsed: true,
        stage: Stage::End,
    };
    f.step(&input, Vec2::ZERO, &mut sprites);
    let palette = Stage::End.palette();
    for s in &sprites {
        assert!(s.streak_to.is_none());
        assert!(s.opacity <= STAR_COLLAPSED_OPACITY_SCALE + 1e-6);
        assert!(palette.contains(&s.color));
    }
}

#[test]
fn speed_has_a_floor_when_active() {
    assert_eq!(speed_factor(0.0, false), STAR_SPEED_FLOOR);
    assert_eq!(speed_factor(1.0, false), STAR_SPEED_GAIN);
    assert_eq!(speed_factor(7.0, false), STAR_SPEED_GAIN);
}

#[test]
fn stage_index_maps_to_palettes() {
    assert_eq!(Stage::from_index(0), Stage::Start);
    assert_eq!(Stage::from_index(1), Stage::Mid);
    assert_eq!(Stage::from_index(9), Stage::End);
}
