//! Geometric primitives shared by every measurement.

use glam::DVec2;
use serde::Serialize;

/// A point in SVG user space (Y-down, raw user units).
pub type Point = DVec2;

/// Round `v` to `decimals` decimal places, half away from zero.
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let p = 10_f64.powi(decimals as i32);
    (v * p).round() / p
}

/// Axis-aligned bounding box.
///
/// A freshly created box is empty: its minimums sit at +∞ and its maximums at
/// -∞, so the first expanded point initializes it. Once a point went in,
/// `min_x <= max_x` and `min_y <= max_y` hold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// The identity for [`Bounds::expand`].
    pub const EMPTY: Bounds = Bounds {
        min_x: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        min_y: f64::INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Bounds {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Degenerate box covering a single point
    pub fn from_point(p: Point) -> Self {
        Bounds::new(p.x, p.x, p.y, p.y)
    }

    /// Check if the box never saw a point
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Component-wise union of two boxes. Commutative, associative, and
    /// idempotent; [`Bounds::EMPTY`] is its identity.
    pub fn expand(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    /// Zero for an empty box.
    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_x - self.min_x }
    }

    /// Zero for an empty box.
    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max_y - self.min_y }
    }

    /// Round every edge to `decimals` places. Empty boxes stay empty.
    pub fn rounded(self, decimals: u32) -> Bounds {
        if self.is_empty() {
            return self;
        }
        Bounds {
            min_x: round_to(self.min_x, decimals),
            max_x: round_to(self.max_x, decimals),
            min_y: round_to(self.min_y, decimals),
            max_y: round_to(self.max_y, decimals),
        }
    }

    /// `None` for an empty box, so it never leaks infinities to callers.
    pub fn non_empty(self) -> Option<Bounds> {
        (!self.is_empty()).then_some(self)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::EMPTY
    }
}

impl FromIterator<Point> for Bounds {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut bounds = Bounds::EMPTY;
        for p in iter {
            bounds.expand_point(p);
        }
        bounds
    }
}

/// Length of the open polyline through `points`.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}
