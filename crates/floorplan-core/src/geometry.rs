//! Coordinate and size normalization for floor-plan geometry.
//!
//! Every spatial value in a floor plan is a percentage of the plan's
//! intrinsic extent. These helpers never fail: out-of-range input is pulled
//! back into range instead of being rejected.

use serde::{Deserialize, Serialize};

/// Upper bound of the percent coordinate space.
pub const PERCENT_MAX: f64 = 100.0;

/// Smallest width or height a zone may have, in percent.
pub const MIN_ZONE_SIZE: f64 = 5.0;

/// Axis-aligned rectangle in percent coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ZoneRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn x1(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn y1(&self) -> f64 {
        self.y + self.height
    }

    /// Closed-interval containment: points on the border count as inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x1() && y >= self.y && y <= self.y1()
    }

    /// Convert to a kurbo rectangle (same units).
    pub fn to_kurbo(&self) -> kurbo::Rect {
        kurbo::Rect::new(self.x, self.y, self.x1(), self.y1())
    }
}

/// Replace NaN and infinities with `fallback`.
fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Clamp a single percent coordinate into `[0, 100]`.
pub fn clamp_percent(value: f64) -> f64 {
    finite_or(value, 0.0).clamp(0.0, PERCENT_MAX)
}

/// Bound a point to the plan extent.
pub fn clamp_position(x: f64, y: f64) -> (f64, f64) {
    (clamp_percent(x), clamp_percent(y))
}

/// Normalize a rectangle so that it has at least the minimum size and lies
/// entirely within `[0, 100] x [0, 100]`.
///
/// Size is fixed first, then the origin is pulled back so the far edges do
/// not cross the boundary.
pub fn clamp_rect(x: f64, y: f64, width: f64, height: f64) -> ZoneRect {
    let width = finite_or(width, MIN_ZONE_SIZE).clamp(MIN_ZONE_SIZE, PERCENT_MAX);
    let height = finite_or(height, MIN_ZONE_SIZE).clamp(MIN_ZONE_SIZE, PERCENT_MAX);
    let x = finite_or(x, 0.0).clamp(0.0, PERCENT_MAX - width);
    let y = finite_or(y, 0.0).clamp(0.0, PERCENT_MAX - height);
    ZoneRect::new(x, y, width, height)
}

/// Slack allowed when checking derived edges like `x + width`.
const EDGE_TOLERANCE: f64 = 1e-9;

/// Check the zone bounds invariants.
pub fn is_normalized(rect: &ZoneRect) -> bool {
    rect.x >= 0.0
        && rect.y >= 0.0
        && rect.width >= MIN_ZONE_SIZE
        && rect.height >= MIN_ZONE_SIZE
        && rect.x1() <= PERCENT_MAX + EDGE_TOLERANCE
        && rect.y1() <= PERCENT_MAX + EDGE_TOLERANCE
}
