//! The primary [`Component`] of the controller, [`TrackballController`].

use std::mem;

use bevy_ecs::prelude::*;
use bevy_input::prelude::*;
use bevy_log::prelude::*;
use bevy_math::{prelude::*, DQuat, DVec2, DVec3};
use bevy_reflect::prelude::*;
use bevy_transform::prelude::*;
use bevy_window::RequestRedraw;

use super::{
    constraint::DistanceLimits,
    gesture::{Gesture, InputSpan, PinchSpan, RotationMomentum},
    screen::{circle_coords, screen_coords},
    ControlEvent, ControlEventKind,
};

/// Positions closer together than the square root of this are treated as the
/// same position when deciding whether to publish a change.
const CHANGE_EPSILON: f64 = 1e-6;

/// Tracks all state of a camera's trackball controller, including its gesture
/// state, accumulated inputs, and settings.
///
/// The camera orbits [`target`](Self::target): dragging with the left button
/// rolls the scene like a trackball, the middle button or the scroll wheel
/// zooms, and the right button pans the orbit frame. Touch input maps one,
/// two, and three fingers to the same three motions. See the documentation on
/// the contained fields and types to learn more about each setting.
///
/// # Driving the controller
///
/// The [`DefaultTrackballPlugins`](crate::DefaultTrackballPlugins) will
/// automatically feed mouse, touch, and keyboard input to every camera with
/// this component, and update the camera [`Transform`] once per frame.
///
/// To drive the controller manually, e.g. from a custom input source:
///
/// 1. Describe the control surface with [`TrackballController::set_viewport`].
/// 2. Forward input through the event methods: [`pointer_down`], [`pointer_move`],
///    [`pointer_up`], [`wheel`], [`touch_start`], [`touch_move`], [`touch_end`],
///    [`key_down`], [`key_up`].
/// 3. Call [`update_transform`] once per frame with the camera's [`Transform`].
///
/// [`pointer_down`]: Self::pointer_down
/// [`pointer_move`]: Self::pointer_move
/// [`pointer_up`]: Self::pointer_up
/// [`wheel`]: Self::wheel
/// [`touch_start`]: Self::touch_start
/// [`touch_move`]: Self::touch_move
/// [`touch_end`]: Self::touch_end
/// [`key_down`]: Self::key_down
/// [`key_up`]: Self::key_up
/// [`update_transform`]: Self::update_transform
#[derive(Debug, Clone, Reflect, Component)]
pub struct TrackballController {
    /// Is input handling enabled? When false the event methods become no-ops.
    /// The per-frame update keeps running, so in-flight damped motion plays
    /// out instead of freezing mid-arc.
    pub enabled: bool,
    /// What input motions are currently allowed?
    pub enabled_motion: EnabledMotion,
    /// Input sensitivity of the camera.
    pub sensitivity: Sensitivity,
    /// Momentum and delta-consumption damping after inputs stop.
    pub damping: Damping,
    /// Near and far limits on the camera's distance from the target.
    pub limits: DistanceLimits,
    /// Keys that select a mouse motion regardless of which button is pressed.
    pub keys: ModifierKeys,
    /// The point the camera orbits and looks at. Moved by panning. You may set
    /// this when spawning or to re-frame the camera manually.
    pub target: DVec3,
    /// The active gesture. Managed by the controller, but exposed publicly to
    /// allow for overriding motion.
    pub gesture: Gesture,
    /// Gesture saved when a modifier key goes down, restored when it comes
    /// back up. Managed by the controller.
    pub prev_gesture: Gesture,
    /// Whether the next key-down may change the gesture. Disarmed by every
    /// handled key-down and re-armed on key-up, so holding a key cannot
    /// repeatedly re-enter a mode. Managed by the controller.
    pub keys_armed: bool,
    /// Whether a pointer button is currently held. Pointer-move input is
    /// ignored while this is false. Managed by the controller.
    pub pointer_pressed: bool,
    /// Camera position minus [`target`](Self::target). Recomputed from the
    /// camera [`Transform`] at the start of every update and written back at
    /// the end. Managed by the controller.
    pub eye: DVec3,
    /// The camera's up direction, rotated together with
    /// [`eye`](Self::eye) and used to orient the camera toward the target.
    /// Captured from the [`Transform`] when the controller first updates.
    pub up: DVec3,
    /// Accumulated zoom input in normalized screen coordinates. Only the
    /// vertical axis is integrated. Written by drag-zoom and by the wheel.
    pub zoom: InputSpan,
    /// Accumulated pan input in normalized screen coordinates.
    pub pan: InputSpan,
    /// The most recent trackball rotation, replayed with decaying angle while
    /// idle to produce coasting. Managed by the controller.
    pub momentum: RotationMomentum,
    /// The camera position most recently announced through a
    /// [`ControlEventKind::Changed`] notification. Managed by the controller.
    pub last_published: DVec3,
    surface: Rect,
    baseline: Option<Baseline>,
    pending: Vec<ControlEventKind>,
}

impl Default for TrackballController {
    fn default() -> Self {
        TrackballController {
            enabled: true,
            enabled_motion: Default::default(),
            sensitivity: Default::default(),
            damping: Default::default(),
            limits: Default::default(),
            keys: Default::default(),
            target: DVec3::ZERO,
            gesture: Gesture::Idle,
            prev_gesture: Gesture::Idle,
            keys_armed: true,
            pointer_pressed: false,
            eye: DVec3::ZERO,
            up: DVec3::Y,
            zoom: InputSpan::default(),
            pan: InputSpan::default(),
            momentum: RotationMomentum::default(),
            last_published: DVec3::ZERO,
            // A unit surface keeps the screen mappers well defined until the
            // real viewport is supplied.
            surface: Rect::from_corners(Vec2::ZERO, Vec2::ONE),
            baseline: None,
            pending: Vec::new(),
        }
    }
}

impl TrackballController {
    /// Create a controller that orbits `target`.
    pub fn new(target: DVec3) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    /// Set the input sensitivity.
    #[must_use = "with_sensitivity returns a modified TrackballController"]
    pub fn with_sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Set the damping behavior.
    #[must_use = "with_damping returns a modified TrackballController"]
    pub fn with_damping(mut self, damping: Damping) -> Self {
        self.damping = damping;
        self
    }

    /// Set the distance limits.
    #[must_use = "with_limits returns a modified TrackballController"]
    pub fn with_limits(mut self, limits: DistanceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The control surface's bounding rectangle in window coordinates.
    pub fn viewport(&self) -> Rect {
        self.surface
    }

    /// Describe the control surface the input coordinates are measured
    /// against. Call whenever the viewport may have moved or resized; the
    /// default input plugin does this every frame.
    ///
    /// Degenerate rectangles are rejected, keeping the previous surface.
    pub fn set_viewport(&mut self, rect: Rect) {
        if !rect.min.is_finite() || !rect.max.is_finite() || rect.width() <= 0.0 || rect.height() <= 0.0 {
            warn_once!("ignoring degenerate control surface rect {rect:?}");
            return;
        }
        self.surface = rect;
    }

    /// Handle a pointer button press at `position` (window coordinates).
    ///
    /// While idle, the button selects the gesture: left rotates, middle zooms,
    /// right pans, and any other button presses without entering a mode. If a
    /// gesture is already active, e.g. armed by a modifier key, the press
    /// seeds that gesture's buffers instead of selecting a new one. A disabled
    /// motion still records its mode but seeds nothing, so it produces no
    /// movement.
    pub fn pointer_down(&mut self, button: MouseButton, position: DVec2) {
        if !self.enabled {
            return;
        }
        if self.gesture.is_idle() {
            self.gesture = match button {
                MouseButton::Left => Gesture::Rotate(InputSpan::default()),
                MouseButton::Middle => Gesture::Zoom,
                MouseButton::Right => Gesture::Pan,
                _ => Gesture::Idle,
            };
        }
        match &mut self.gesture {
            Gesture::Rotate(span) if self.enabled_motion.rotate => {
                *span = InputSpan::at(circle_coords(position, self.surface));
            }
            Gesture::Zoom if self.enabled_motion.zoom => {
                self.zoom = InputSpan::at(screen_coords(position, self.surface));
            }
            Gesture::Pan if self.enabled_motion.pan => {
                self.pan = InputSpan::at(screen_coords(position, self.surface));
            }
            _ => (),
        }
        self.pointer_pressed = true;
        self.pending.push(ControlEventKind::GestureStart);
    }

    /// Handle pointer motion to `position` (window coordinates). Ignored
    /// unless a button is held.
    pub fn pointer_move(&mut self, position: DVec2) {
        if !self.enabled || !self.pointer_pressed {
            return;
        }
        match &mut self.gesture {
            Gesture::Rotate(span) if self.enabled_motion.rotate => {
                // Coalescing: only the segment since the last move survives
                // until the next update consumes it.
                span.start = span.end;
                span.end = circle_coords(position, self.surface);
            }
            Gesture::Zoom if self.enabled_motion.zoom => {
                self.zoom.end = screen_coords(position, self.surface);
            }
            Gesture::Pan if self.enabled_motion.pan => {
                self.pan.end = screen_coords(position, self.surface);
            }
            _ => (),
        }
    }

    /// Handle the pointer button release: unconditionally back to idle.
    pub fn pointer_up(&mut self) {
        if !self.enabled || !self.pointer_pressed {
            return;
        }
        self.pointer_pressed = false;
        self.gesture = Gesture::Idle;
        self.pending.push(ControlEventKind::GestureEnd);
    }

    /// Handle a wheel step of `delta` units. Positive deltas zoom out.
    ///
    /// The wheel perturbs the zoom input directly without entering a gesture,
    /// so it composes with whatever else is active, and each step announces
    /// itself as an atomic start/end notification pulse.
    pub fn wheel(&mut self, unit: WheelUnit, delta: f64) {
        if !self.enabled {
            return;
        }
        self.zoom.start.y -= delta * unit.zoom_per_unit();
        self.pending.push(ControlEventKind::GestureStart);
        self.pending.push(ControlEventKind::GestureEnd);
    }

    /// Handle a change in the set of active touches, selecting the gesture
    /// from the touch count alone: one finger rotates, two pinch-zoom, three
    /// pan, and any other count leaves the controller idle.
    ///
    /// Unlike the mouse path, touch mode selection ignores
    /// [`enabled_motion`](Self::enabled_motion); disabling a motion only stops
    /// it from moving the camera.
    pub fn touch_start(&mut self, touches: &[DVec2]) {
        if !self.enabled {
            return;
        }
        self.gesture = match touches {
            [point] => Gesture::TouchRotate(InputSpan::at(circle_coords(*point, self.surface))),
            [a, b] => Gesture::TouchZoom(PinchSpan::at(a.distance(*b))),
            [lead, _, _] => {
                self.pan = InputSpan::at(screen_coords(*lead, self.surface));
                Gesture::TouchPan
            }
            _ => Gesture::Idle,
        };
        self.pending.push(ControlEventKind::GestureStart);
    }

    /// Handle movement of the active touches. Writes the active gesture's end
    /// buffer while the touch count still matches it; never changes mode.
    pub fn touch_move(&mut self, touches: &[DVec2]) {
        if !self.enabled {
            return;
        }
        match (&mut self.gesture, touches) {
            (Gesture::TouchRotate(span), [point]) => {
                span.end = circle_coords(*point, self.surface);
            }
            (Gesture::TouchZoom(pinch), [a, b]) => {
                pinch.end = a.distance(*b);
            }
            (Gesture::TouchPan, [lead, _, _]) => {
                self.pan.end = screen_coords(*lead, self.surface);
            }
            _ => (),
        }
    }

    /// Handle the end of a touch gesture; `touches` holds the touches still
    /// on the surface. Unconditionally returns to idle, re-seeding the pan
    /// span from the lead remaining touch when three fingers remain so a
    /// follow-up pan starts cleanly.
    pub fn touch_end(&mut self, touches: &[DVec2]) {
        if !self.enabled {
            return;
        }
        if let [lead, _, _] = touches {
            self.pan.start = screen_coords(*lead, self.surface);
        }
        self.gesture = Gesture::Idle;
        self.pending.push(ControlEventKind::GestureEnd);
    }

    /// Handle a key press. If the key matches one of
    /// [`keys`](Self::keys) while idle, the corresponding enabled motion is
    /// armed; the next pointer press seeds it regardless of button.
    ///
    /// Repeats are one-shot: once a key-down is handled, further presses are
    /// ignored until [`key_up`](Self::key_up) re-arms them.
    pub fn key_down(&mut self, key: KeyCode) {
        if !self.enabled || !self.keys_armed {
            return;
        }
        self.keys_armed = false;
        self.prev_gesture = self.gesture;
        if !self.gesture.is_idle() {
            return;
        }
        if key == self.keys.rotate && self.enabled_motion.rotate {
            self.gesture = Gesture::Rotate(InputSpan::default());
        } else if key == self.keys.zoom && self.enabled_motion.zoom {
            self.gesture = Gesture::Zoom;
        } else if key == self.keys.pan && self.enabled_motion.pan {
            self.gesture = Gesture::Pan;
        }
    }

    /// Handle a key release: re-arms key handling and restores the gesture
    /// saved by the last key press. A still-live gesture of the same kind is
    /// kept rather than overwritten, so releasing a modifier mid-drag does not
    /// rewind the drag.
    pub fn key_up(&mut self) {
        if !self.enabled {
            return;
        }
        self.keys_armed = true;
        if !self.gesture.same_kind(&self.prev_gesture) {
            self.gesture = self.prev_gesture.settled();
        }
    }

    /// Restore the target, camera position, and up direction captured when
    /// the controller first updated, and drop any active gesture.
    ///
    /// Accumulated zoom/pan input and rotation momentum are left in place; a
    /// reset changes where the camera is, not what its inputs are doing. A
    /// change notification is queued unconditionally, with no movement
    /// threshold: a reset always counts as a change.
    pub fn reset(&mut self, transform: &mut Transform) {
        let Some(baseline) = self.baseline else {
            warn_once!("TrackballController::reset before the first update is a no-op");
            return;
        };
        self.gesture = Gesture::Idle;
        self.prev_gesture = Gesture::Idle;
        self.target = baseline.target;
        self.up = baseline.up;
        self.eye = baseline.position - baseline.target;
        transform.translation = baseline.position.as_vec3();
        transform.look_at(self.target.as_vec3(), self.up.as_vec3());
        self.last_published = baseline.position;
        self.pending.push(ControlEventKind::Changed);
    }

    /// Take the notifications queued by the event methods and the update.
    /// The plugin's update system drains these into [`ControlEvent`]s; call
    /// manually when driving the controller without the plugin.
    pub fn drain_pending(&mut self) -> Vec<ControlEventKind> {
        mem::take(&mut self.pending)
    }

    /// Advance the controller by one tick, applying the pending rotate, zoom,
    /// and pan deltas to the camera `transform`. Returns whether the camera
    /// moved enough for a change notification.
    ///
    /// Runs the full pipeline every call, whatever the gesture state, which
    /// is what lets damped motion continue after input stops: recompute the
    /// eye vector from the transform, rotate, zoom, pan, clamp the distance,
    /// then write the translation back and face the target.
    pub fn update_transform(&mut self, transform: &mut Transform) -> bool {
        if self.baseline.is_none() {
            self.up = transform.up().as_dvec3();
            self.baseline = Some(Baseline {
                target: self.target,
                position: transform.translation.as_dvec3(),
                up: self.up,
            });
            self.last_published = transform.translation.as_dvec3();
        }
        self.eye = transform.translation.as_dvec3() - self.target;
        if self.enabled_motion.rotate {
            self.rotate_camera();
        }
        if self.enabled_motion.zoom {
            self.zoom_camera();
        }
        if self.enabled_motion.pan {
            self.pan_camera();
        }
        let mut position = self.target + self.eye;
        if let Some(clamped) = self.limits.clamp_offset(self.eye) {
            self.eye = clamped;
            position = self.target + clamped;
            // Drop pending zoom input so it does not fight the clamp.
            self.zoom.start = self.zoom.end;
        }
        transform.translation = position.as_vec3();
        transform.look_at(self.target.as_vec3(), self.up.as_vec3());

        let changed = self.last_published.distance_squared(position) > CHANGE_EPSILON;
        if changed {
            self.last_published = position;
            self.pending.push(ControlEventKind::Changed);
        }
        changed
    }

    /// Apply the pending rotate delta, or replay decaying momentum when there
    /// is none, then consume the delta.
    fn rotate_camera(&mut self) {
        let delta = match &self.gesture {
            Gesture::Rotate(span) | Gesture::TouchRotate(span) => span.delta(),
            _ => DVec2::ZERO,
        };
        let raw_angle = delta.length();
        if raw_angle > 0.0 {
            let angle = raw_angle * self.sensitivity.rotate;
            if let Some((axis, rotation)) = self.trackball_rotation(delta, angle) {
                self.eye = rotation * self.eye;
                self.up = rotation * self.up;
                self.momentum = RotationMomentum { axis, angle };
            }
        } else if self.damping.enabled && self.momentum.angle != 0.0 {
            self.momentum.angle *= (1.0 - self.damping.factor).sqrt();
            if let Some(axis) = self.momentum.axis.try_normalize() {
                let rotation = DQuat::from_axis_angle(axis, self.momentum.angle);
                self.eye = rotation * self.eye;
                self.up = rotation * self.up;
            }
        }
        if let Gesture::Rotate(span) | Gesture::TouchRotate(span) = &mut self.gesture {
            span.settle();
        }
    }

    /// The axis-angle rotation for a circle-space `delta`: move sideways and
    /// up in the camera frame by the delta components, then rotate about the
    /// axis perpendicular to that motion and the eye vector. `None` when the
    /// frame is degenerate, e.g. the eye is parallel to up; the tick skips the
    /// rotation rather than corrupting the orientation.
    fn trackball_rotation(&self, delta: DVec2, angle: f64) -> Option<(DVec3, DQuat)> {
        let eye_direction = self.eye.try_normalize()?;
        let up_direction = self.up.try_normalize()?;
        let sideways = up_direction.cross(eye_direction).try_normalize()?;
        let move_direction = up_direction * delta.y + sideways * delta.x;
        let axis = move_direction.cross(self.eye).try_normalize()?;
        Some((axis, DQuat::from_axis_angle(axis, angle)))
    }

    /// Apply the pending zoom by rescaling the eye vector: the pinch distance
    /// ratio while a pinch is active, otherwise the vertical zoom delta.
    fn zoom_camera(&mut self) {
        if let Gesture::TouchZoom(pinch) = &mut self.gesture {
            let factor = pinch.start / pinch.end;
            pinch.start = pinch.end;
            if factor.is_finite() && factor > 0.0 {
                self.eye *= factor;
            }
        } else {
            let factor = 1.0 + (self.zoom.end.y - self.zoom.start.y) * self.sensitivity.zoom;
            if factor != 1.0 && factor > 0.0 {
                self.eye *= factor;
            }
            if self.damping.enabled {
                self.zoom.start.y += (self.zoom.end.y - self.zoom.start.y) * self.damping.factor;
            } else {
                self.zoom.start = self.zoom.end;
            }
        }
    }

    /// Apply the pending pan delta by translating the target (the camera
    /// follows, since its position is rebuilt as `target + eye`), scaled by
    /// the orbit distance so panning covers the same fraction of the view at
    /// any zoom level.
    fn pan_camera(&mut self) {
        let change = self.pan.delta();
        if change.is_finite() && change.length_squared() > 0.0 {
            let (Some(sideways), Some(up_direction)) = (
                self.eye.cross(self.up).try_normalize(),
                self.up.try_normalize(),
            ) else {
                return;
            };
            let scaled = change * (self.eye.length() * self.sensitivity.pan);
            self.target += sideways * scaled.x + up_direction * scaled.y;
            if self.damping.enabled {
                self.pan.approach(self.damping.factor);
            } else {
                self.pan.settle();
            }
        }
    }

    /// Update transforms for all cameras with a [`TrackballController`], once
    /// per frame, draining each controller's queued notifications into
    /// [`ControlEvent`]s. A redraw is requested whenever a camera moved.
    pub fn update_controllers(
        mut cameras: Query<(Entity, &mut TrackballController, &mut Transform)>,
        mut control_events: EventWriter<ControlEvent>,
        mut redraw: EventWriter<RequestRedraw>,
    ) {
        for (camera, mut controller, mut transform) in cameras.iter_mut() {
            controller.update_transform(&mut transform);
            for kind in controller.drain_pending() {
                if kind == ControlEventKind::Changed {
                    redraw.write(RequestRedraw);
                }
                control_events.write(ControlEvent { camera, kind });
            }
        }
    }
}

/// The camera framing captured on the controller's first update, restored by
/// [`TrackballController::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
struct Baseline {
    target: DVec3,
    position: DVec3,
    up: DVec3,
}

/// The unit a wheel step is measured in. Each unit maps to a fixed zoom
/// increment, so a line of wheel scroll zooms the same amount whether the
/// device reports lines or the equivalent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum WheelUnit {
    /// High-resolution deltas, typically from a trackpad.
    Pixels,
    /// Detented scroll wheel steps.
    Lines,
    /// Page-scroll steps.
    Pages,
}

impl WheelUnit {
    fn zoom_per_unit(self) -> f64 {
        match self {
            WheelUnit::Pixels => 0.00025,
            WheelUnit::Lines => 0.01,
            WheelUnit::Pages => 0.025,
        }
    }
}

/// The sensitivity of the controller to inputs.
#[derive(Debug, Clone, Copy, Reflect)]
pub struct Sensitivity {
    /// Radians of rotation per unit of circle-space drag, multiplied.
    pub rotate: f64,
    /// Scale applied to the zoom delta before it becomes an eye-length
    /// factor, multiplied.
    pub zoom: f64,
    /// Scale applied to the pan delta, multiplied. The pan distance also
    /// scales with the current orbit distance.
    pub pan: f64,
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self {
            rotate: 1.0,
            zoom: 1.2,
            pan: 0.3,
        }
    }
}

/// Controls what kinds of motions are allowed to initiate. Does not affect
/// motion already in flight.
#[derive(Debug, Clone, Reflect)]
pub struct EnabledMotion {
    /// Should rotation be enabled?
    pub rotate: bool,
    /// Should zoom be enabled?
    pub zoom: bool,
    /// Should pan be enabled?
    pub pan: bool,
}

impl Default for EnabledMotion {
    fn default() -> Self {
        Self {
            rotate: true,
            zoom: true,
            pan: true,
        }
    }
}

/// How camera motion behaves once the input stops.
///
/// While enabled, each update consumes only `factor` of the pending zoom and
/// pan deltas and rotation coasts with an exponentially decaying angle.
/// Disable for static moving: every update consumes its whole delta and the
/// camera stops the instant input does.
#[derive(Debug, Clone, Copy, Reflect)]
pub struct Damping {
    /// Whether damped motion is on.
    pub enabled: bool,
    /// Fraction of the pending delta consumed per update, in `0..=1`. Also
    /// sets the momentum decay rate: a leftover rotation shrinks by
    /// `sqrt(1 - factor)` each idle update.
    pub factor: f64,
}

impl Default for Damping {
    fn default() -> Self {
        Self {
            enabled: true,
            factor: 0.2,
        }
    }
}

impl Damping {
    /// No damping at all: input maps rigidly to motion.
    pub fn none() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// Keys that select a motion for subsequent pointer input, whatever button it
/// uses. Holding the rotate key and dragging with the right button rotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct ModifierKeys {
    /// Selects rotation.
    pub rotate: KeyCode,
    /// Selects zoom.
    pub zoom: KeyCode,
    /// Selects pan.
    pub pan: KeyCode,
}

impl Default for ModifierKeys {
    fn default() -> Self {
        Self {
            rotate: KeyCode::KeyA,
            zoom: KeyCode::KeyS,
            pan: KeyCode::KeyD,
        }
    }
}
