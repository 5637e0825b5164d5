//! Keeps the camera's distance from its orbit target inside a configured
//! range.

use bevy_math::DVec3;
use bevy_reflect::prelude::*;

/// Minimum and maximum allowed distance between the camera and its orbit
/// target.
///
/// The maximum is applied before the minimum, so when the range is inverted
/// (`min > max`) the minimum wins and the camera is pushed out to it.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct DistanceLimits {
    /// Closest the camera may sit to the target.
    pub min: f64,
    /// Farthest the camera may sit from the target.
    pub max: f64,
}

impl Default for DistanceLimits {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }
}

impl DistanceLimits {
    /// Limits that only keep the camera at least `min` away from the target.
    pub fn at_least(min: f64) -> Self {
        Self {
            min,
            max: f64::INFINITY,
        }
    }

    /// Limits spanning `min..=max`.
    pub fn between(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp the target-to-camera offset into range.
    ///
    /// Returns the corrected offset when a limit was exceeded, or `None` when
    /// the offset already lies inside the range. An offset too short to define
    /// a direction is left alone.
    pub fn clamp_offset(&self, offset: DVec3) -> Option<DVec3> {
        let direction = offset.try_normalize()?;
        let mut clamped = offset;
        let mut exceeded = false;
        if clamped.length_squared() > self.max * self.max {
            clamped = direction * self.max;
            exceeded = true;
        }
        if clamped.length_squared() < self.min * self.min {
            clamped = direction * self.min;
            exceeded = true;
        }
        exceeded.then_some(clamped)
    }
}
