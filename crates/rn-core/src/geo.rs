//! Planar coordinate type and distance utilities.
//!
//! `Point` uses `f64` coordinates.  Equality and hashing are by value, so a
//! `Point` doubles as the identity of a graph node: two points are the same
//! node iff they compare equal.
//!
//! The distance formula is deliberately the textbook one (sum of squared
//! differences, then `sqrt`) rather than `f64::hypot`.  Radius queries compare
//! raw distances against caller-supplied bounds, and changing the formula
//! would shift results at the boundary.

use std::fmt;
use std::hash::{Hash, Hasher};

/// An immutable 2-D coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance: `sqrt((x1-x2)^2 + (y1-y2)^2)` in double precision.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// `true` if neither coordinate is NaN or infinite.  Non-finite points
    /// cannot take part in a graph or a query.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// The point `fraction` of the way from `self` to `towards`.
    ///
    /// `fraction` is not clamped; `0.0` yields `self` and `1.0` yields
    /// `towards` exactly.
    pub fn lerp(self, towards: Point, fraction: f64) -> Point {
        if fraction >= 1.0 {
            return towards;
        }
        Point::new(
            self.x + (towards.x - self.x) * fraction,
            self.y + (towards.y - self.y) * fraction,
        )
    }

    /// Bit patterns used for hashing; `-0.0` folds onto `0.0` so that the
    /// hash agrees with `==`.
    #[inline]
    fn key(self) -> (u64, u64) {
        let norm = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
        (norm(self.x), norm(self.y))
    }
}

// Graph code never stores NaN coordinates (they are rejected on insertion),
// which makes `==` reflexive for every point that reaches a hash map.
impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
