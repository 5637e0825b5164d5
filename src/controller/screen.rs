//! Maps window-space cursor positions into the two normalized coordinate
//! spaces the gestures integrate over.

use bevy_math::{DVec2, Rect};

/// Normalize `point` against `surface` so the viewport spans `0..1` on both
/// axes, with the origin at the top-left corner.
///
/// Zoom and pan integrate deltas in this space, which makes their speed
/// proportional to viewport size rather than to raw pixels.
pub fn screen_coords(point: DVec2, surface: Rect) -> DVec2 {
    let origin = surface.min.as_dvec2();
    let size = surface.size().as_dvec2();
    DVec2::new(
        (point.x - origin.x) / size.x,
        (point.y - origin.y) / size.y,
    )
}

/// Map `point` onto the trackball circle: the viewport center becomes the
/// origin, half the viewport width becomes one unit, and up is positive.
///
/// Both axes are normalized by the width so a diagonal drag rotates the same
/// arc regardless of aspect ratio. A point on the left or right viewport edge
/// lands at `x = -1` or `x = 1`.
pub fn circle_coords(point: DVec2, surface: Rect) -> DVec2 {
    let origin = surface.min.as_dvec2();
    let size = surface.size().as_dvec2();
    let half_width = size.x * 0.5;
    DVec2::new(
        (point.x - origin.x - half_width) / half_width,
        (size.y + 2.0 * (origin.y - point.y)) / size.x,
    )
}
