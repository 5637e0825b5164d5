//! A trackball-style camera controller for Bevy.
//!
//! The camera orbits a target point like a ball rolling under the pointer:
//! dragging with the left button rotates the scene in any direction, with no
//! fixed poles, the scroll wheel or middle-button drag zooms, and the right
//! button pans the orbit frame. One, two, and three finger touch gestures map
//! to the same motions, and the `A`/`S`/`D` keys re-route any drag to rotate,
//! zoom, or pan. Released inputs coast to a stop with configurable damping,
//! or snap instantly when damping is disabled.
//!
//! Add [`DefaultTrackballPlugins`] and attach a
//! [`TrackballController`](prelude::TrackballController) to a camera:
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_trackball_cam::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins((DefaultPlugins, DefaultTrackballPlugins))
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     commands.spawn((
//!         Camera3d::default(),
//!         Transform::from_xyz(0.0, 2.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
//!         TrackballController::default(),
//!     ));
//! }
//! ```
//!
//! The controller itself never touches the window: it consumes typed input
//! through plain methods and integrates them once per frame. The
//! [`input`] module's plugin is one adapter for those methods; anything able
//! to call them, including a test, can drive the camera the same way.

#![warn(missing_docs)]

pub mod controller;
pub mod input;

/// Common imports for using this crate.
pub mod prelude {
    pub use crate::{
        controller::{
            component::{
                Damping, EnabledMotion, ModifierKeys, Sensitivity, TrackballController, WheelUnit,
            },
            constraint::DistanceLimits,
            gesture::{Gesture, InputSpan, PinchSpan, RotationMomentum},
            ControlEvent, ControlEventKind, TrackballControllerPlugin,
        },
        input::TrackballInputPlugin,
        DefaultTrackballPlugins,
    };
}

use bevy_app::{prelude::*, PluginGroupBuilder};

/// Adds the camera controller and its default input adapter.
///
/// Use the plugins individually if you only want part of this: the
/// [`TrackballControllerPlugin`](controller::TrackballControllerPlugin) runs
/// the controllers and emits their notifications, while the
/// [`TrackballInputPlugin`](input::TrackballInputPlugin) feeds them window
/// input.
pub struct DefaultTrackballPlugins;

impl PluginGroup for DefaultTrackballPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(controller::TrackballControllerPlugin)
            .add(input::TrackballInputPlugin)
    }
}
