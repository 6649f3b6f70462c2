// Host-side tests for the damped parallax follower.

use focus_core::*;
use glam::Vec2;

#[test]
fn disabled_engine_never_moves() {
    let mut engine = ParallaxEngine::default();
    engine.set_target(Vec2::new(1.0, 1.0));
    for _ in 0..100 {
        engine.step();
    }
    assert_eq!(engine.displacement(1.0, 20.0), Vec2::ZERO);
}

#[test]
fn converges_below_target_because_of_center_attraction() {
    let mut engine = ParallaxEngine::default();
    engine.set_enabled(true);
    engine.set_target(Vec2::new(1.0, 0.0));
    for _ in 0..2000 {
        engine.step();
    }
    let p = engine.params();
    let a = p.center_attraction;
    let f = p.follow_speed;
    let fixed_point = a * f / (1.0 - a * (1.0 - f));

    let x = engine.reader().current().x;
    assert!(x < 1.0);
    assert!((x - fixed_point).abs() < 1e-4, "x={x} expected {fixed_point}");
}

#[test]
fn current_stays_within_unit_box_for_any_target_sequence() {
    let mut engine = ParallaxEngine::default();
    engine.set_enabled(true);
    for i in 0..5000 {
        let t = i as f32 * 0.37;
        engine.set_target(Vec2::new(t.sin() * 3.0, (t * 1.3).cos() * 3.0));
        engine.step();
        let c = engine.reader().current();
        assert!(c.x.abs() <= 1.0 && c.y.abs() <= 1.0, "escaped at {i}: {c:?}");
    }
}

#[test]
fn disabling_zeroes_displacement_immediately() {
    let mut engine = ParallaxEngine::default();
    let reader = engine.reader();
    engine.set_enabled(true);
    engine.set_target(Vec2::new(-1.0, 1.0));
    for _ in 0..50 {
        engine.step();
    }
    assert_ne!(reader.get(1.0, 20.0), Vec2::ZERO);

    engine.set_enabled(false);
    assert_eq!(reader.get(1.0, 20.0), Vec2::ZERO);
}

#[test]
fn displacement_scales_by_depth_and_max() {
    let mut engine = ParallaxEngine::default();
    engine.set_enabled(true);
    engine.set_target(Vec2::new(1.0, 0.0));
    engine.step();
    let c = engine.reader().current();
    let near = engine.displacement(1.0, 20.0);
    let far = engine.displacement(0.35, 20.0);
    assert!((near.x - c.x * 20.0).abs() < 1e-6);
    assert!((far.x - c.x * 20.0 * 0.35).abs() < 1e-6);
}

#[test]
fn out_of_range_params_are_clamped() {
    let engine = ParallaxEngine::new(ParallaxParams {
        follow_speed: 4.0,
        center_attraction: -1.0,
    });
    let p = engine.params();
    assert!(p.follow_speed > 0.0 && p.follow_speed < 1.0);
    assert!(p.center_attraction > 0.0 && p.center_attraction < 1.0);
}
