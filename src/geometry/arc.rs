//! Elliptic arcs: SVG endpoint parameters converted to center form, then
//! measured by fixed-step angular sampling.
//!
//! The conversion follows the W3C SVG implementation notes, "Conversion from
//! endpoint to center parameterization", including the correction for radii
//! too small to span both endpoints.

use std::f64::consts::TAU;

use glam::dvec2;

use crate::defaults::MAX_ARC_SAMPLES;
use crate::errors::MeasureError;
use crate::types::{Bounds, Point};

/// An elliptic arc in center parameterization.
///
/// Angles are ellipse parameters in radians, measured in the ellipse's local
/// frame. `end_angle - start_angle` is the signed sweep: positive when
/// `clockwise` (SVG sweep-flag 1, which is clockwise on a Y-down screen).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub start: Point,
    pub end: Point,
    pub rx: f64,
    pub ry: f64,
    /// x-axis rotation in radians
    pub phi: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub clockwise: bool,
}

/// Signed angle from `u` to `v`.
fn angle_between(u: Point, v: Point) -> f64 {
    u.perp_dot(v).atan2(u.dot(v))
}

impl Arc {
    /// Build an arc from the parameters of an SVG `A` command.
    ///
    /// `rotation` is in degrees. Returns `Ok(None)` when both endpoints
    /// coincide: there is no ellipse to draw, only the point.
    pub fn from_svg_params(
        start: Point,
        end: Point,
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
    ) -> Result<Option<Arc>, MeasureError> {
        if rx == 0.0 || ry == 0.0 {
            return Err(MeasureError::DegenerateArc { rx, ry });
        }
        let (mut rx, mut ry) = (rx.abs(), ry.abs());
        let phi = rotation.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        // Step 1: midpoint difference in the ellipse's local frame
        let half_diff = (start - end) / 2.0;
        let x1 = cos_phi * half_diff.x + sin_phi * half_diff.y;
        let y1 = -sin_phi * half_diff.x + cos_phi * half_diff.y;
        if x1 == 0.0 && y1 == 0.0 {
            return Ok(None);
        }

        // Out-of-range radii are scaled up until the ellipse reaches both ends.
        let lambda = (x1 * x1) / (rx * rx) + (y1 * y1) / (ry * ry);
        if lambda > 1.0 {
            rx *= lambda.sqrt();
            ry *= lambda.sqrt();
        }

        // Step 2: local-frame center
        let rxy1 = rx * y1;
        let ryx1 = ry * x1;
        let radicand =
            (rx * rx * ry * ry - rxy1 * rxy1 - ryx1 * ryx1) / (rxy1 * rxy1 + ryx1 * ryx1);
        let mut coef = radicand.max(0.0).sqrt();
        if large_arc == sweep {
            coef = -coef;
        }
        let cx1 = coef * rxy1 / ry;
        let cy1 = -coef * ryx1 / rx;

        // Step 3: back to user space
        let half_sum = (start + end) / 2.0;
        let center = dvec2(
            cos_phi * cx1 - sin_phi * cy1 + half_sum.x,
            sin_phi * cx1 + cos_phi * cy1 + half_sum.y,
        );

        // Step 4: start angle and signed sweep
        let u = dvec2((x1 - cx1) / rx, (y1 - cy1) / ry);
        let v = dvec2((-x1 - cx1) / rx, (-y1 - cy1) / ry);
        let start_angle = angle_between(Point::X, u);
        let mut delta = angle_between(u, v);
        if sweep && delta < 0.0 {
            delta += TAU;
        } else if !sweep && delta > 0.0 {
            delta -= TAU;
        }

        Ok(Some(Arc {
            center,
            start,
            end,
            rx,
            ry,
            phi,
            start_angle,
            end_angle: start_angle + delta,
            clockwise: sweep,
        }))
    }

    /// Signed angle swept from start to end.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Point on the ellipse at parameter `t`.
    pub fn point(&self, t: f64) -> Point {
        let (sin_t, cos_t) = t.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        dvec2(
            self.center.x + self.rx * cos_t * cos_phi - self.ry * sin_t * sin_phi,
            self.center.y + self.rx * cos_t * sin_phi + self.ry * sin_t * cos_phi,
        )
    }

    /// Evenly spaced points from start to end angle, no more than `step`
    /// radians apart, both ends included.
    fn samples(&self, step: f64) -> impl Iterator<Item = Point> + '_ {
        let sweep = self.sweep();
        let count = if step > 0.0 {
            ((sweep.abs() / step).ceil() as usize).clamp(1, MAX_ARC_SAMPLES)
        } else {
            MAX_ARC_SAMPLES
        };
        let dt = sweep / count as f64;
        (0..=count).map(move |i| self.point(self.start_angle + dt * i as f64))
    }

    /// Length of the polyline through the angular samples.
    pub fn length(&self, step: f64) -> f64 {
        let mut samples = self.samples(step);
        let Some(mut prev) = samples.next() else {
            return 0.0;
        };
        let mut length = 0.0;
        for p in samples {
            length += prev.distance(p);
            prev = p;
        }
        length
    }

    /// Bounding box of the angular samples.
    pub fn bounds(&self, step: f64) -> Bounds {
        self.samples(step).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const STEP: f64 = PI / 100_000.0;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn zero_radius_is_rejected() {
        let err = Arc::from_svg_params(dvec2(0.0, 0.0), dvec2(1.0, 1.0), 0.0, 5.0, 0.0, false, true)
            .unwrap_err();
        assert!(matches!(err, MeasureError::DegenerateArc { .. }));
    }

    #[test]
    fn coincident_endpoints_are_omitted() {
        let arc = Arc::from_svg_params(dvec2(3.0, 3.0), dvec2(3.0, 3.0), 5.0, 5.0, 0.0, true, true)
            .unwrap();
        assert!(arc.is_none());
    }

    #[test]
    fn small_arc_positive_sweep() {
        let arc = Arc::from_svg_params(dvec2(10.0, 0.0), dvec2(0.0, 10.0), 10.0, 10.0, 0.0, false, true)
            .unwrap()
            .unwrap();
        assert!(close(arc.center, dvec2(0.0, 0.0)));
        assert!(arc.start_angle.abs() < 1e-12);
        assert!((arc.sweep() - FRAC_PI_2).abs() < 1e-12);
        assert!(arc.clockwise);
    }

    #[test]
    fn large_arc_negative_sweep() {
        let arc = Arc::from_svg_params(dvec2(10.0, 0.0), dvec2(0.0, 10.0), 10.0, 10.0, 0.0, true, false)
            .unwrap()
            .unwrap();
        assert!(close(arc.center, dvec2(0.0, 0.0)));
        assert!((arc.sweep() + 3.0 * FRAC_PI_2).abs() < 1e-12);
        assert!(close(arc.point(arc.end_angle), dvec2(0.0, 10.0)));
        assert!(!arc.clockwise);
    }

    #[test]
    fn large_arc_positive_sweep() {
        let arc = Arc::from_svg_params(dvec2(10.0, 0.0), dvec2(0.0, 10.0), 10.0, 10.0, 0.0, true, true)
            .unwrap()
            .unwrap();
        assert!(close(arc.center, dvec2(10.0, 10.0)));
        assert!((arc.start_angle + FRAC_PI_2).abs() < 1e-12);
        assert!((arc.end_angle - PI).abs() < 1e-12);
    }

    #[test]
    fn point_at_zero_is_rightmost() {
        let arc = Arc {
            center: dvec2(0.0, 0.0),
            start: dvec2(10.0, 0.0),
            end: dvec2(10.0, 0.0),
            rx: 10.0,
            ry: 10.0,
            phi: 0.0,
            start_angle: 0.0,
            end_angle: 0.0,
            clockwise: true,
        };
        assert_eq!(arc.point(0.0), dvec2(10.0, 0.0));
    }

    #[test]
    fn full_circle_converges_to_circumference() {
        for r in [1.0, 10.0, 294.1] {
            let arc = Arc {
                center: dvec2(5.0, -5.0),
                start: dvec2(5.0 + r, -5.0),
                end: dvec2(5.0 + r, -5.0),
                rx: r,
                ry: r,
                phi: 0.0,
                start_angle: 0.0,
                end_angle: TAU,
                clockwise: true,
            };
            let length = arc.length(STEP);
            assert!((length - TAU * r).abs() < 1e-6 * r, "r={r}: {length}");
        }
    }

    #[test]
    fn quarter_and_three_quarter_lengths() {
        let quarter = Arc::from_svg_params(dvec2(10.0, 0.0), dvec2(0.0, 10.0), 10.0, 10.0, 0.0, false, true)
            .unwrap()
            .unwrap();
        assert!((quarter.length(STEP) - 15.7076).abs() < 1e-3);

        let rest = Arc::from_svg_params(dvec2(10.0, 0.0), dvec2(0.0, 10.0), 10.0, 10.0, 0.0, true, false)
            .unwrap()
            .unwrap();
        assert!((rest.length(STEP) - 47.1239).abs() < 1e-3);
    }

    #[test]
    fn radii_too_small_are_scaled_up() {
        // Endpoints 20 apart, radius 5: becomes a half circle of radius 10.
        let arc = Arc::from_svg_params(dvec2(0.0, 0.0), dvec2(20.0, 0.0), 5.0, 5.0, 0.0, false, true)
            .unwrap()
            .unwrap();
        assert!((arc.rx - 10.0).abs() < 1e-12);
        assert!(close(arc.center, dvec2(10.0, 0.0)));
        assert!((arc.length(STEP) - 10.0 * PI).abs() < 1e-6);
    }

    #[test]
    fn bounds_follow_sweep_direction() {
        // Clockwise on screen from (0,0) to (20,0) bulges toward negative y.
        let up = Arc::from_svg_params(dvec2(0.0, 0.0), dvec2(20.0, 0.0), 10.0, 10.0, 0.0, false, true)
            .unwrap()
            .unwrap();
        let b = up.bounds(STEP);
        assert!((b.min_y + 10.0).abs() < 1e-6, "{b:?}");
        assert!(b.max_y.abs() < 1e-9, "{b:?}");

        let down = Arc::from_svg_params(dvec2(0.0, 0.0), dvec2(20.0, 0.0), 10.0, 10.0, 0.0, false, false)
            .unwrap()
            .unwrap();
        let b = down.bounds(STEP);
        assert!((b.max_y - 10.0).abs() < 1e-6, "{b:?}");
        assert!(b.min_y.abs() < 1e-9, "{b:?}");
    }

    #[test]
    fn rotated_ellipse_passes_through_endpoints() {
        let start = dvec2(3.0, 7.0);
        let end = dvec2(18.0, -2.0);
        let arc = Arc::from_svg_params(start, end, 12.0, 6.0, 30.0, true, false)
            .unwrap()
            .unwrap();
        assert!(arc.point(arc.start_angle).distance(start) < 1e-9);
        assert!(arc.point(arc.end_angle).distance(end) < 1e-9);
    }
}
