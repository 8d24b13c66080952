//! Quadratic and cubic Bezier curves: de Casteljau evaluation, arc length by
//! polyline refinement, and sampled bounds.

use crate::defaults::{DECIMALS, MAX_BEZIER_REFINEMENTS};
use crate::log::trace;
use crate::types::{Bounds, Point, polyline_length, round_to};

/// Evaluate the curve with control polygon `points` at parameter `t`.
///
/// Each pass linearly interpolates between neighbours until one point is
/// left; that point lies on the curve. Returns `None` for an empty polygon.
pub fn subdivide(t: f64, points: &[Point]) -> Option<Point> {
    let mut work = points.to_vec();
    while work.len() > 1 {
        for i in 0..work.len() - 1 {
            work[i] = work[i] * (1.0 - t) + work[i + 1] * t;
        }
        work.pop();
    }
    work.first().copied()
}

/// A Bezier segment, including its shared start point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bezier {
    Quadratic([Point; 3]),
    Cubic([Point; 4]),
}

impl Bezier {
    pub fn points(&self) -> &[Point] {
        match self {
            Bezier::Quadratic(p) => p,
            Bezier::Cubic(p) => p,
        }
    }

    pub fn start(&self) -> Point {
        self.points()[0]
    }

    pub fn end(&self) -> Point {
        let points = self.points();
        points[points.len() - 1]
    }

    /// Point on the curve at `t` in [0, 1].
    pub fn point_at(&self, t: f64) -> Point {
        // Both variants have at least three control points.
        subdivide(t, self.points()).unwrap_or_else(|| self.start())
    }

    /// Arc length, rounded to two decimals.
    ///
    /// Starts from the chord and doubles the segment count each round by
    /// inserting the curve point at every segment's parameter midpoint. The
    /// polyline grows toward the true length from below; refinement stops
    /// when a round changes it by no more than `precision`.
    pub fn length(&self, precision: f64) -> f64 {
        let mut polyline = vec![self.start(), self.end()];
        let mut length = 0.0;
        let mut last_length = f64::INFINITY;
        let mut step = 0.5;
        let mut rounds = 0;

        while (last_length - length).abs() > precision && rounds < MAX_BEZIER_REFINEMENTS {
            last_length = length;
            let mut refined = Vec::with_capacity(polyline.len() * 2 - 1);
            for (i, &p) in polyline[..polyline.len() - 1].iter().enumerate() {
                refined.push(p);
                refined.push(self.point_at(step * (2 * i + 1) as f64));
            }
            refined.push(self.end());

            step /= 2.0;
            length = polyline_length(&refined);
            polyline = refined;
            rounds += 1;
        }

        trace!(rounds, length, "bezier length converged");
        round_to(length, DECIMALS)
    }

    /// Bounding box from `samples` uniform parameter steps plus both endpoints.
    ///
    /// Extrema falling between two samples are missed; at 100 samples the
    /// error is well below the rounding applied to path bounds.
    pub fn bounds(&self, samples: usize) -> Bounds {
        let samples = samples.max(1);
        let mut bounds = Bounds::from_point(self.start());
        bounds.expand_point(self.end());
        for i in 1..samples {
            bounds.expand_point(self.point_at(i as f64 / samples as f64));
        }
        bounds
    }
}
