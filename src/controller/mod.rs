//! The trackball controller core: the [`component`] holding all state, the
//! [`gesture`] state machine types, the [`screen`] coordinate mappers, and the
//! distance [`constraint`].

pub mod component;
pub mod constraint;
pub mod gesture;
pub mod screen;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_reflect::prelude::*;
use bevy_window::RequestRedraw;

use self::component::TrackballController;

/// Adds the per-frame controller update and registers the controller's
/// notification events. Pair with [`TrackballInputPlugin`] to feed it window
/// input, or send inputs to [`TrackballController`] yourself.
///
/// [`TrackballInputPlugin`]: crate::input::TrackballInputPlugin
pub struct TrackballControllerPlugin;

impl Plugin for TrackballControllerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ControlEvent>()
            .add_event::<RequestRedraw>()
            .register_type::<TrackballController>()
            .add_systems(Update, TrackballController::update_controllers);
    }
}

/// Notification from a camera's [`TrackballController`], announcing gesture
/// boundaries and meaningful camera movement to outside observers.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlEvent {
    /// The camera entity whose controller fired.
    pub camera: Entity,
    /// What the controller announced.
    pub kind: ControlEventKind,
}

/// The three notifications a controller can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ControlEventKind {
    /// An interaction began: a pointer press, a touch contact, or the leading
    /// edge of a wheel step.
    GestureStart,
    /// An interaction ended: a pointer release, a touch lift, or the trailing
    /// edge of a wheel step.
    GestureEnd,
    /// The last update moved the camera beyond the publish threshold.
    Changed,
}
