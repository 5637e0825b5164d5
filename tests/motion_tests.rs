//! Drives `TrackballController` directly through its event methods and
//! per-tick update, without an `App`, to pin down the motion math.

use bevy::{
    math::{DVec2, DVec3},
    prelude::*,
};
use bevy_trackball_cam::prelude::*;

fn surface() -> Rect {
    Rect::from_corners(Vec2::ZERO, Vec2::new(800.0, 600.0))
}

/// A default controller over an 800x600 surface, with the camera at
/// `position` looking at the origin.
fn camera_at(position: DVec3) -> (TrackballController, Transform) {
    let mut controller = TrackballController::default();
    controller.set_viewport(surface());
    let transform =
        Transform::from_translation(position.as_vec3()).looking_at(Vec3::ZERO, Vec3::Y);
    (controller, transform)
}

#[test]
fn test_idle_ticks_leave_camera_in_place_and_silent() {
    let (mut controller, mut transform) = camera_at(DVec3::new(0.0, 0.0, 10.0));
    assert!(!controller.update_transform(&mut transform));
    let resting = transform.translation;
    for _ in 0..10 {
        assert!(!controller.update_transform(&mut transform));
    }
    assert_eq!(transform.translation, resting);
    assert!(controller.drain_pending().is_empty());
}

#[test]
fn test_horizontal_drag_rotates_about_axis_perpendicular_to_eye_and_motion() {
    let (mut controller, mut transform) = camera_at(DVec3::new(0.0, 0.0, 10.0));
    controller.damping = Damping::none();
    controller.update_transform(&mut transform);

    // Screen center, then a drag a quarter of the half-width to the right.
    controller.pointer_down(MouseButton::Left, DVec2::new(400.0, 300.0));
    controller.pointer_move(DVec2::new(500.0, 300.0));
    assert!(controller.update_transform(&mut transform));

    // The projected delta is (0.25, 0), and rotate sensitivity is 1.
    let momentum = controller.momentum;
    assert!((momentum.angle - 0.25).abs() < 1e-12);
    assert!((momentum.axis.length() - 1.0).abs() < 1e-9);
    // Perpendicular to the pre-rotation eye vector and to the sideways
    // direction the drag moved along.
    assert!(momentum.axis.dot(DVec3::Z).abs() < 1e-9);
    assert!(momentum.axis.dot(DVec3::X).abs() < 1e-9);

    // Orbit radius is preserved; a rightward drag swings the camera the
    // other way, with no vertical component.
    assert!((transform.translation.length() - 10.0).abs() < 1e-4);
    assert!(transform.translation.x < 0.0);
    assert!(transform.translation.y.abs() < 1e-6);

    // Without damping, a consumed drag leaves nothing to replay.
    let resting = transform.translation;
    assert!(!controller.update_transform(&mut transform));
    assert_eq!(transform.translation, resting);
}

#[test]
fn test_rotation_momentum_decays_after_release() {
    let (mut controller, mut transform) = camera_at(DVec3::new(0.0, 0.0, 10.0));
    controller.update_transform(&mut transform);
    controller.pointer_down(MouseButton::Left, DVec2::new(400.0, 300.0));
    controller.pointer_move(DVec2::new(500.0, 300.0));
    controller.update_transform(&mut transform);
    controller.pointer_up();

    // Default damping factor is 0.2, so each idle tick multiplies the
    // leftover angle by sqrt(0.8).
    controller.update_transform(&mut transform);
    let expected = 0.25 * 0.8f64.sqrt();
    assert!((controller.momentum.angle - expected).abs() < 1e-12);

    let mut previous = controller.momentum.angle;
    for _ in 0..50 {
        controller.update_transform(&mut transform);
        let angle = controller.momentum.angle;
        assert!(angle > 0.0);
        assert!(angle < previous);
        previous = angle;
    }
}

#[test]
fn test_zoom_factor_at_or_below_zero_is_skipped() {
    let (mut controller, mut transform) = camera_at(DVec3::new(0.0, 0.0, 10.0));
    controller.damping = Damping::none();
    controller.update_transform(&mut transform);
    let resting = transform.translation;

    // -4000 pixels of wheel makes the zoom delta -1, and with the default
    // zoom sensitivity of 1.2 the factor comes out negative.
    controller.wheel(WheelUnit::Pixels, -4000.0);
    assert_eq!(
        controller.drain_pending(),
        vec![ControlEventKind::GestureStart, ControlEventKind::GestureEnd]
    );
    assert!(!controller.update_transform(&mut transform));
    assert_eq!(transform.translation, resting);
}

#[test]
fn test_wheel_zoom_scales_orbit_distance() {
    let (mut controller, mut transform) = camera_at(DVec3::new(0.0, 0.0, 10.0));
    controller.damping = Damping::none();
    controller.update_transform(&mut transform);

    // One line out: factor = 1 + 0.01 * 1.2.
    controller.wheel(WheelUnit::Lines, 1.0);
    controller.update_transform(&mut transform);
    assert!((transform.translation.length() - 10.12).abs() < 1e-3);

    // And back in.
    controller.wheel(WheelUnit::Lines, -1.0);
    controller.update_transform(&mut transform);
    assert!(transform.translation.length() < 10.12);
}

#[test]
fn test_damped_zoom_consumes_a_fraction_per_tick() {
    let (mut controller, mut transform) = camera_at(DVec3::new(0.0, 0.0, 10.0));
    controller.update_transform(&mut transform);

    controller.wheel(WheelUnit::Lines, 1.0);
    assert!((controller.zoom.start.y + 0.01).abs() < 1e-12);

    // The first tick applies the full pending delta but only consumes 20%
    // of it; the tail then shrinks geometrically.
    controller.update_transform(&mut transform);
    assert!((controller.zoom.start.y + 0.008).abs() < 1e-12);

    let mut previous = transform.translation.length();
    for _ in 0..5 {
        controller.update_transform(&mut transform);
        let length = transform.translation.length();
        assert!(length > previous);
        previous = length;
    }

    let mut changed = true;
    for _ in 0..60 {
        changed = controller.update_transform(&mut transform);
    }
    assert!(controller.zoom.start.y.abs() < 1e-6);
    assert!(!changed);
}

#[test]
fn test_pinch_distance_ratio_scales_eye_exactly() {
    let (mut controller, mut transform) = camera_at(DVec3::new(0.0, 0.0, 10.0));
    controller.update_transform(&mut transform);

    controller.touch_start(&[DVec2::new(350.0, 300.0), DVec2::new(450.0, 300.0)]);
    assert!(matches!(controller.gesture, Gesture::TouchZoom(_)));
    controller.touch_move(&[DVec2::new(375.0, 300.0), DVec2::new(425.0, 300.0)]);

    // 100px -> 50px of separation doubles the orbit distance exactly.
    assert!(controller.update_transform(&mut transform));
    assert_eq!(transform.translation, Vec3::new(0.0, 0.0, 20.0));

    // The ratio was consumed; holding still zooms no further.
    assert!(!controller.update_transform(&mut transform));
    assert_eq!(transform.translation, Vec3::new(0.0, 0.0, 20.0));
}

#[test]
fn test_pan_translates_camera_and_target_together() {
    let (mut controller, mut transform) = camera_at(DVec3::new(0.0, 0.0, 10.0));
    controller.damping = Damping::none();
    controller.update_transform(&mut transform);

    let target_before = controller.target;
    let position_before = transform.translation;

    controller.pointer_down(MouseButton::Right, DVec2::new(400.0, 300.0));
    controller.pointer_move(DVec2::new(440.0, 300.0));
    controller.update_transform(&mut transform);

    let target_delta = controller.target - target_before;
    let position_delta = (transform.translation - position_before).as_dvec3();
    assert!(target_delta.length() > 0.0);
    assert!((target_delta - position_delta).length() < 1e-5);
    // The orbit frame slides; the camera keeps facing the same way.
    assert!(transform.forward().distance(Vec3::NEG_Z) < 1e-6);
}

#[test]
fn test_distance_clamp_bounds_the_orbit() {
    let (mut controller, mut transform) = camera_at(DVec3::new(0.0, 0.0, 5.0));
    controller.limits = DistanceLimits::between(2.0, 8.0);
    controller.update_transform(&mut transform);

    // A huge zoom-out is caught by the far limit, and the leftover damped
    // zoom input is dropped so it cannot keep fighting the clamp.
    controller.wheel(WheelUnit::Pages, 100.0);
    controller.update_transform(&mut transform);
    assert_eq!(transform.translation, Vec3::new(0.0, 0.0, 8.0));
    assert_eq!(controller.zoom.delta(), DVec2::ZERO);

    // A strong zoom-in is caught by the near limit.
    controller.wheel(WheelUnit::Pages, -26.0);
    controller.update_transform(&mut transform);
    assert_eq!(transform.translation, Vec3::new(0.0, 0.0, 2.0));
}

#[test]
fn test_inverted_limits_resolve_to_min() {
    let (mut controller, mut transform) = camera_at(DVec3::new(0.0, 0.0, 10.0));
    // min > max: the far limit pulls to 4, then the near limit pushes out
    // to 6, so the near limit wins.
    controller.limits = DistanceLimits::between(6.0, 4.0);
    controller.update_transform(&mut transform);
    assert_eq!(transform.translation, Vec3::new(0.0, 0.0, 6.0));
}

#[test]
fn test_reset_restores_construction_framing() {
    let mut controller = TrackballController::new(DVec3::new(1.0, 2.0, 3.0));
    controller.set_viewport(surface());
    let mut transform =
        Transform::from_xyz(3.0, 4.0, 12.0).looking_at(Vec3::new(1.0, 2.0, 3.0), Vec3::Y);

    controller.update_transform(&mut transform);
    let position0 = transform.translation;
    let rotation0 = transform.rotation;
    let up0 = controller.up;

    // Rotate with momentum, zoom, and pan away from the baseline.
    controller.pointer_down(MouseButton::Left, DVec2::new(400.0, 300.0));
    controller.pointer_move(DVec2::new(500.0, 250.0));
    controller.update_transform(&mut transform);
    controller.pointer_up();
    controller.update_transform(&mut transform);
    controller.wheel(WheelUnit::Lines, 3.0);
    controller.pointer_down(MouseButton::Right, DVec2::new(400.0, 300.0));
    controller.pointer_move(DVec2::new(420.0, 320.0));
    controller.update_transform(&mut transform);
    controller.pointer_up();
    assert_ne!(transform.translation, position0);

    controller.reset(&mut transform);
    assert_eq!(transform.translation, position0);
    assert_eq!(transform.rotation, rotation0);
    assert_eq!(controller.target, DVec3::new(1.0, 2.0, 3.0));
    assert_eq!(controller.up, up0);
    assert!(controller.gesture.is_idle());
    assert!(controller.prev_gesture.is_idle());
    assert_eq!(
        controller.drain_pending().last(),
        Some(&ControlEventKind::Changed)
    );
    // Reset restores the framing but not the input state: leftover momentum
    // keeps coasting afterwards.
    assert!(controller.momentum.angle != 0.0);
}

#[test]
fn test_reset_publishes_unconditionally() {
    let (mut controller, mut transform) = camera_at(DVec3::new(0.0, 0.0, 10.0));
    controller.update_transform(&mut transform);
    assert!(controller.drain_pending().is_empty());

    // Nothing moved, so only the reset can explain the notification, and
    // the restored framing produces no second one on the next tick.
    controller.reset(&mut transform);
    assert_eq!(controller.drain_pending(), vec![ControlEventKind::Changed]);
    assert!(!controller.update_transform(&mut transform));
    assert!(controller.drain_pending().is_empty());
}

#[test]
fn test_reset_before_first_update_is_a_no_op() {
    let mut controller = TrackballController::default();
    controller.set_viewport(surface());
    let mut transform = Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y);
    let before = transform.translation;

    controller.reset(&mut transform);
    assert_eq!(transform.translation, before);
    assert!(controller.drain_pending().is_empty());
    assert!(!controller.update_transform(&mut transform));
}

#[test]
fn test_modifier_key_selects_mode_and_rearms_on_release() {
    let mut controller = TrackballController::default();
    controller.set_viewport(surface());

    controller.key_down(KeyCode::KeyD);
    assert!(matches!(controller.gesture, Gesture::Pan));
    // Key handling is one-shot until the key comes back up.
    controller.key_down(KeyCode::KeyA);
    assert!(matches!(controller.gesture, Gesture::Pan));

    controller.key_up();
    assert!(controller.gesture.is_idle());

    controller.key_down(KeyCode::KeyA);
    assert!(matches!(controller.gesture, Gesture::Rotate(_)));
}

#[test]
fn test_key_release_mid_drag_keeps_live_gesture() {
    let mut controller = TrackballController::default();
    controller.set_viewport(surface());

    controller.pointer_down(MouseButton::Left, DVec2::new(400.0, 300.0));
    controller.pointer_move(DVec2::new(500.0, 300.0));
    let Gesture::Rotate(span_before) = controller.gesture else {
        panic!("expected an active rotate");
    };
    assert!(span_before.delta().length() > 0.0);

    // Tapping a modifier key during the drag must not rewind the drag.
    controller.key_down(KeyCode::KeyA);
    controller.key_up();
    let Gesture::Rotate(span_after) = controller.gesture else {
        panic!("expected the rotate to stay active");
    };
    assert_eq!(span_before, span_after);
}

#[test]
fn test_disabled_rotation_records_mode_without_motion() {
    let (mut controller, mut transform) = camera_at(DVec3::new(0.0, 0.0, 10.0));
    controller.enabled_motion.rotate = false;
    controller.update_transform(&mut transform);
    let resting = transform.translation;

    controller.pointer_down(MouseButton::Left, DVec2::new(400.0, 300.0));
    controller.pointer_move(DVec2::new(500.0, 300.0));

    // The mode is recorded, but its buffer is never seeded or written.
    let Gesture::Rotate(span) = controller.gesture else {
        panic!("expected the rotate mode to be recorded");
    };
    assert_eq!(span.delta(), DVec2::ZERO);
    assert!(!controller.update_transform(&mut transform));
    assert_eq!(transform.translation, resting);
    // The gesture lifecycle still announces itself.
    assert_eq!(
        controller.drain_pending(),
        vec![ControlEventKind::GestureStart]
    );
}

#[test]
fn test_touch_modes_ignore_disable_flags_for_mode_entry() {
    // Touch mode selection deliberately ignores `EnabledMotion`, unlike the
    // mouse path. Disabling a motion gates movement, not mode entry.
    let (mut controller, mut transform) = camera_at(DVec3::new(0.0, 0.0, 10.0));
    controller.enabled_motion.rotate = false;
    controller.update_transform(&mut transform);
    let resting = transform.translation;

    controller.touch_start(&[DVec2::new(400.0, 300.0)]);
    assert!(matches!(controller.gesture, Gesture::TouchRotate(_)));

    controller.touch_move(&[DVec2::new(500.0, 300.0)]);
    assert!(!controller.update_transform(&mut transform));
    assert_eq!(transform.translation, resting);

    // Re-enabling lets the same gesture move the camera again.
    controller.enabled_motion.rotate = true;
    controller.touch_move(&[DVec2::new(550.0, 300.0)]);
    assert!(controller.update_transform(&mut transform));
    assert_ne!(transform.translation, resting);
}

#[test]
fn test_touch_counts_map_to_modes() {
    let mut controller = TrackballController::default();
    controller.set_viewport(surface());

    controller.touch_start(&[DVec2::new(100.0, 100.0)]);
    assert!(matches!(controller.gesture, Gesture::TouchRotate(_)));

    controller.touch_start(&[DVec2::new(100.0, 100.0), DVec2::new(200.0, 100.0)]);
    assert!(matches!(controller.gesture, Gesture::TouchZoom(_)));

    controller.touch_start(&[
        DVec2::new(100.0, 100.0),
        DVec2::new(200.0, 100.0),
        DVec2::new(300.0, 100.0),
    ]);
    assert!(matches!(controller.gesture, Gesture::TouchPan));

    controller.touch_start(&[
        DVec2::new(100.0, 100.0),
        DVec2::new(200.0, 100.0),
        DVec2::new(300.0, 100.0),
        DVec2::new(400.0, 100.0),
    ]);
    assert!(controller.gesture.is_idle());
}

#[test]
fn test_lifting_to_three_touches_reseeds_pan() {
    let mut controller = TrackballController::default();
    controller.set_viewport(surface());

    controller.touch_start(&[
        DVec2::new(100.0, 100.0),
        DVec2::new(200.0, 100.0),
        DVec2::new(300.0, 100.0),
        DVec2::new(400.0, 100.0),
    ]);
    controller.touch_end(&[
        DVec2::new(400.0, 300.0),
        DVec2::new(200.0, 100.0),
        DVec2::new(300.0, 100.0),
    ]);

    // The lead remaining touch seeds the pan start so a follow-up pan
    // begins without a stale delta.
    assert_eq!(controller.pan.start, DVec2::new(0.5, 0.5));
    assert!(controller.gesture.is_idle());
}

#[test]
fn test_disabling_input_freezes_handlers_not_momentum() {
    let (mut controller, mut transform) = camera_at(DVec3::new(0.0, 0.0, 10.0));
    controller.update_transform(&mut transform);
    controller.pointer_down(MouseButton::Left, DVec2::new(400.0, 300.0));
    controller.pointer_move(DVec2::new(500.0, 300.0));
    controller.update_transform(&mut transform);
    controller.pointer_up();
    controller.drain_pending();

    controller.enabled = false;
    controller.pointer_down(MouseButton::Left, DVec2::new(400.0, 300.0));
    assert!(controller.gesture.is_idle());
    assert!(controller.drain_pending().is_empty());

    // The update still runs while disabled, so momentum coasts on.
    let before = transform.translation;
    assert!(controller.update_transform(&mut transform));
    assert_ne!(transform.translation, before);
}
