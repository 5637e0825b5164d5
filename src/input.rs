//! The default input adapter: turns Bevy's mouse, touch, and keyboard events
//! into [`TrackballController`] method calls and keeps each controller's
//! control surface in sync with its camera viewport.

use std::collections::HashMap;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_input::{
    keyboard::KeyboardInput,
    mouse::{MouseButtonInput, MouseScrollUnit, MouseWheel},
    touch::{TouchInput, TouchPhase},
    ButtonState, InputSystem,
};
use bevy_math::{DVec2, Vec2};
use bevy_render::prelude::*;
use bevy_window::CursorMoved;

use crate::controller::component::{TrackballController, WheelUnit};

/// Forwards window input to every [`TrackballController`] in the world.
///
/// Input is read in [`PreUpdate`] after Bevy's own input collection, so the
/// controllers integrate it in the same frame's [`Update`]. Consumed event
/// types are registered here as well, which lets the plugin run in headless
/// apps that skip the window and input plugins. To stop feeding a controller,
/// clear its [`enabled`](TrackballController::enabled) flag or remove this
/// plugin.
pub struct TrackballInputPlugin;

impl Plugin for TrackballInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CursorMoved>()
            .add_event::<MouseButtonInput>()
            .add_event::<MouseWheel>()
            .add_event::<TouchInput>()
            .add_event::<KeyboardInput>()
            .add_systems(
                PreUpdate,
                (refresh_viewports, mouse_input, touch_input, keyboard_input)
                    .chain()
                    .after(InputSystem),
            );
    }
}

/// Keep each controller's control surface matched to its camera's logical
/// viewport, so input normalization tracks resizes.
fn refresh_viewports(mut cameras: Query<(&Camera, &mut TrackballController)>) {
    for (camera, mut controller) in &mut cameras {
        if let Some(rect) = camera.logical_viewport_rect() {
            if controller.viewport() != rect {
                controller.set_viewport(rect);
            }
        }
    }
}

/// Forward cursor motion, button presses, and wheel scroll.
///
/// Button events carry no position, so the last cursor position seen on the
/// event's window is remembered and used to seed the press; a press on a
/// window the cursor never reported on is dropped.
fn mouse_input(
    mut cursor_moves: EventReader<CursorMoved>,
    mut button_events: EventReader<MouseButtonInput>,
    mut wheel_events: EventReader<MouseWheel>,
    mut cursor_latest: Local<HashMap<Entity, Vec2>>,
    mut controllers: Query<&mut TrackballController>,
) {
    for ev in cursor_moves.read() {
        cursor_latest.insert(ev.window, ev.position);
        for mut controller in &mut controllers {
            controller.pointer_move(ev.position.as_dvec2());
        }
    }
    for ev in button_events.read() {
        match ev.state {
            ButtonState::Pressed => {
                let Some(position) = cursor_latest.get(&ev.window).copied() else {
                    continue;
                };
                for mut controller in &mut controllers {
                    controller.pointer_down(ev.button, position.as_dvec2());
                }
            }
            ButtonState::Released => {
                for mut controller in &mut controllers {
                    controller.pointer_up();
                }
            }
        }
    }
    for ev in wheel_events.read() {
        let unit = match ev.unit {
            MouseScrollUnit::Line => WheelUnit::Lines,
            MouseScrollUnit::Pixel => WheelUnit::Pixels,
        };
        // Scrolling up is positive in Bevy; the controller zooms out on
        // positive deltas.
        for mut controller in &mut controllers {
            controller.wheel(unit, -f64::from(ev.y));
        }
    }
}

/// The active touches in contact order, so the controllers always see a
/// stable, ordered touch list.
#[derive(Default)]
struct ActiveTouches(Vec<(u64, Vec2)>);

fn touch_positions(active: &ActiveTouches) -> Vec<DVec2> {
    active
        .0
        .iter()
        .map(|(_, position)| position.as_dvec2())
        .collect()
}

/// Fold Bevy's per-finger touch events into the ordered roster and forward
/// each change to the controllers. A canceled touch counts as ended.
fn touch_input(
    mut touch_events: EventReader<TouchInput>,
    mut active: Local<ActiveTouches>,
    mut controllers: Query<&mut TrackballController>,
) {
    for ev in touch_events.read() {
        match ev.phase {
            TouchPhase::Started => {
                if let Some(entry) = active.0.iter_mut().find(|(id, _)| *id == ev.id) {
                    entry.1 = ev.position;
                } else {
                    active.0.push((ev.id, ev.position));
                }
                let touches = touch_positions(&active);
                for mut controller in &mut controllers {
                    controller.touch_start(&touches);
                }
            }
            TouchPhase::Moved => {
                if let Some(entry) = active.0.iter_mut().find(|(id, _)| *id == ev.id) {
                    entry.1 = ev.position;
                }
                let touches = touch_positions(&active);
                for mut controller in &mut controllers {
                    controller.touch_move(&touches);
                }
            }
            TouchPhase::Ended | TouchPhase::Canceled => {
                active.0.retain(|(id, _)| *id != ev.id);
                let touches = touch_positions(&active);
                for mut controller in &mut controllers {
                    controller.touch_end(&touches);
                }
            }
        }
    }
}

/// Forward key presses and releases. Repeats are forwarded as-is; the
/// controller's one-shot arming ignores them.
fn keyboard_input(
    mut key_events: EventReader<KeyboardInput>,
    mut controllers: Query<&mut TrackballController>,
) {
    for ev in key_events.read() {
        match ev.state {
            ButtonState::Pressed => {
                for mut controller in &mut controllers {
                    controller.key_down(ev.key_code);
                }
            }
            ButtonState::Released => {
                for mut controller in &mut controllers {
                    controller.key_up();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_roster_preserves_contact_order() {
        let mut active = ActiveTouches::default();
        active.0.push((7, Vec2::new(10.0, 10.0)));
        active.0.push((3, Vec2::new(20.0, 20.0)));
        active.0.push((5, Vec2::new(30.0, 30.0)));

        // Lifting the middle finger keeps the others in contact order.
        active.0.retain(|(id, _)| *id != 3);
        let positions = touch_positions(&active);
        assert_eq!(
            positions,
            vec![DVec2::new(10.0, 10.0), DVec2::new(30.0, 30.0)]
        );
    }
}
