// Host-side tests for motion input mapping and source selection.

use focus_core::*;
use glam::Vec2;

fn phone(granted: bool) -> Capabilities {
    Capabilities {
        touch: true,
        fine_pointer: false,
        viewport_width: 390.0,
        orientation_api: true,
        orientation_granted: granted,
    }
}

#[test]
fn pointer_maps_center_to_zero_and_corners_to_unit() {
    assert_eq!(pointer_to_motion(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    assert_eq!(pointer_to_motion(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, -1.0));
    assert_eq!(pointer_to_motion(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, 1.0));
}

#[test]
fn pointer_outside_viewport_is_clamped() {
    let m = pointer_to_motion(-500.0, 5000.0, 800.0, 600.0);
    assert_eq!(m, Vec2::new(-1.0, 1.0));
    assert_eq!(pointer_to_motion(10.0, 10.0, 0.0, 600.0), Vec2::ZERO);
}

#[test]
fn orientation_neutral_pose_is_centered() {
    let m = orientation_to_motion(45.0, 0.0);
    assert!(m.length() < 1e-6);
}

#[test]
fn orientation_is_clamped_and_finite() {
    assert_eq!(orientation_to_motion(75.0, 30.0), Vec2::new(1.0, 1.0));
    assert_eq!(orientation_to_motion(-180.0, -90.0), Vec2::new(-1.0, -1.0));
    assert_eq!(orientation_to_motion(f32::NAN, f32::INFINITY), Vec2::ZERO);
}

#[test]
fn orientation_chosen_on_granted_small_touch_device() {
    assert_eq!(resolve_input_source(&phone(true)), InputSource::Orientation);
}

#[test]
fn pure_touch_without_orientation_has_no_source() {
    assert_eq!(resolve_input_source(&phone(false)), InputSource::None);
    let mut caps = phone(true);
    caps.orientation_api = false;
    assert_eq!(resolve_input_source(&caps), InputSource::None);
}

#[test]
fn desktop_and_hybrid_devices_use_pointer() {
    let desktop = Capabilities {
        touch: false,
        fine_pointer: true,
        viewport_width: 1440.0,
        orientation_api: false,
        orientation_granted: false,
    };
    assert_eq!(resolve_input_source(&desktop), InputSource::Pointer);

    let tablet_with_mouse = Capabilities {
        touch: true,
        fine_pointer: true,
        viewport_width: 1024.0,
        orientation_api: true,
        orientation_granted: true,
    };
    assert_eq!(resolve_input_source(&tablet_with_mouse), InputSource::Pointer);
}

#[test]
fn tracker_ignores_inactive_source() {
    let mut tracker = MotionTracker::new(InputSource::Pointer);
    tracker.on_orientation(90.0, 30.0);
    assert_eq!(tracker.target(), Vec2::ZERO);

    tracker.on_pointer_move(800.0, 300.0, 800.0, 600.0);
    assert_eq!(tracker.target(), Vec2::new(1.0, 0.0));

    tracker.on_pointer_leave();
    assert_eq!(tracker.target(), Vec2::ZERO);
}

#[test]
fn switching_source_resets_target() {
    let mut tracker = MotionTracker::new(InputSource::Pointer);
    tracker.on_pointer_move(0.0, 0.0, 800.0, 600.0);
    assert_ne!(tracker.target(), Vec2::ZERO);

    tracker.set_source(InputSource::Orientation);
    assert_eq!(tracker.target(), Vec2::ZERO);

    tracker.on_pointer_move(0.0, 0.0, 800.0, 600.0);
    assert_eq!(tracker.target(), Vec2::ZERO);
    tracker.on_orientation(75.0, 0.0);
    assert_eq!(tracker.target(), Vec2::new(0.0, 1.0));
}
