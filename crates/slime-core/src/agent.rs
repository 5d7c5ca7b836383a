//! The [`Agent`] value record.

use std::f32::consts::TAU;

use crate::boundary::quantize;

/// A point agent with a sub-cell position and a heading.
///
/// Positions are in field coordinates: `x` runs along the width, `y` along
/// the height, and the cell containing the agent is `(floor(x), floor(y))`.
/// Headings are in radians, measured from the +x axis towards +y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    /// Position `(x, y)` in field coordinates.
    pub position: (f32, f32),
    /// Heading angle in radians.
    pub heading: f32,
}

impl Agent {
    /// Create an agent at `(x, y)` facing `heading`.
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self {
            position: (x, y),
            heading,
        }
    }

    /// Unit vector `(cos, sin)` of the current heading.
    pub fn direction(&self) -> (f32, f32) {
        direction_of(self.heading)
    }

    /// The integer cell containing the agent, without bounds checking.
    ///
    /// Returns signed coordinates so that positions left of or above the
    /// field map to negative cells instead of saturating at zero. A NaN
    /// coordinate has no cell.
    pub fn cell(&self) -> Option<(i64, i64)> {
        Some((quantize(self.position.0)?, quantize(self.position.1)?))
    }

    /// The point `distance` units ahead along `angle`.
    pub fn probe(&self, angle: f32, distance: f32) -> (f32, f32) {
        let (dx, dy) = direction_of(angle);
        (
            self.position.0 + dx * distance,
            self.position.1 + dy * distance,
        )
    }
}

/// Unit vector `(cos, sin)` for an angle in radians.
pub fn direction_of(angle: f32) -> (f32, f32) {
    let (sin, cos) = angle.sin_cos();
    (cos, sin)
}

/// Wrap an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Heading that points from `(x, y)` towards `(tx, ty)`.
///
/// Returns `0.0` when the two points coincide.
pub fn heading_towards(x: f32, y: f32, tx: f32, ty: f32) -> f32 {
    let dx = tx - x;
    let dy = ty - y;
    if dx == 0.0 && dy == 0.0 {
        0.0
    } else {
        normalize_angle(dy.atan2(dx))
    }
}
