//! Types for the gesture state machine: which interaction is currently driving
//! the camera, and the coordinate buffers each gesture accumulates.

use bevy_math::{DVec2, DVec3};
use bevy_reflect::prelude::*;

/// The interaction mode currently driving a
/// [`TrackballController`](super::component::TrackballController).
///
/// Exactly one gesture is active at a time. Mouse modes are selected by button
/// (left/middle/right) or by the configured modifier keys; touch modes are
/// selected purely by the number of active touch points. A gesture that owns
/// its input exclusively while active carries it as a payload, so one mode's
/// buffer can never be read while another mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub enum Gesture {
    /// No gesture is active. Damped motion may still be playing out.
    #[default]
    Idle,
    /// Left-drag (or rotate-key) trackball rotation, carrying its
    /// circle-projected coordinate pair.
    Rotate(InputSpan),
    /// Middle-drag (or zoom-key) zoom. The zoom span lives on the controller
    /// because wheel input also writes it while idle.
    Zoom,
    /// Right-drag (or pan-key) pan. The pan span lives on the controller so it
    /// can keep damping toward its end point after release.
    Pan,
    /// One-finger trackball rotation.
    TouchRotate(InputSpan),
    /// Two-finger pinch zoom, carrying its point-to-point distance pair.
    TouchZoom(PinchSpan),
    /// Three-finger pan.
    TouchPan,
}

impl Gesture {
    /// Returns true when no gesture is active.
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Whether `self` and `other` are the same gesture kind, ignoring payload.
    pub fn same_kind(&self, other: &Gesture) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// This gesture with any motion pair settled, so restoring a saved gesture
    /// cannot replay a delta that was already consumed.
    pub(crate) fn settled(mut self) -> Self {
        if let Gesture::Rotate(span) | Gesture::TouchRotate(span) = &mut self {
            span.settle();
        }
        self
    }
}

/// A gesture's accumulated screen-space input: where it started and where it
/// currently is.
///
/// The integrator consumes the `end - start` delta once per tick, either fully
/// (static moving) or a fraction at a time (damped).
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct InputSpan {
    /// Coordinate the pending delta is measured from.
    pub start: DVec2,
    /// Most recent input coordinate.
    pub end: DVec2,
}

impl InputSpan {
    /// A settled span at `point`: both ends coincide, no pending delta.
    pub fn at(point: DVec2) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    /// The unconsumed delta.
    pub fn delta(&self) -> DVec2 {
        self.end - self.start
    }

    /// Consume the whole delta.
    pub fn settle(&mut self) {
        self.start = self.end;
    }

    /// Consume `fraction` of the delta by moving the start toward the end.
    /// The remainder is consumed over the following ticks, which is what
    /// produces the damped tail after input stops.
    pub fn approach(&mut self, fraction: f64) {
        self.start += (self.end - self.start) * fraction;
    }
}

/// Distance between the two touch points of a pinch, at the start and end of
/// the pending zoom step, in window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct PinchSpan {
    /// Distance the pending zoom factor is measured from.
    pub start: f64,
    /// Most recent distance.
    pub end: f64,
}

impl PinchSpan {
    /// A settled span at `distance`.
    pub fn at(distance: f64) -> Self {
        Self {
            start: distance,
            end: distance,
        }
    }
}

/// The most recent rotation applied by the trackball, kept so rotation can
/// coast after input stops.
///
/// While damping is enabled, each idle tick decays the angle by
/// `sqrt(1 - factor)` and reapplies the rotation, so the camera keeps moving
/// along the same arc with exponentially fading speed. The angle approaches
/// zero but never reaches it; the change-notification epsilon is what makes
/// the tail fall silent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct RotationMomentum {
    /// Unit rotation axis of the last applied rotation.
    pub axis: DVec3,
    /// Remaining rotation angle in radians.
    pub angle: f64,
}
