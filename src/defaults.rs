//! Numeric tolerances and fixed names the engine works with

use std::f64::consts::PI;

/// Bezier refinement stops once the polyline length changes by at most this.
pub const BEZIER_PRECISION: f64 = 0.01;
/// Uniform parameter steps sampled for a Bezier bounding box.
pub const BEZIER_SAMPLES: usize = 100;
/// Angular step between elliptic arc samples, in radians.
pub const ARC_ANGLE_STEP: f64 = PI / 100_000.0;

/// Hard cap on Bezier refinement rounds (2^20 segments).
pub const MAX_BEZIER_REFINEMENTS: u32 = 20;
/// Hard cap on samples along a single arc.
pub const MAX_ARC_SAMPLES: usize = 10_000_000;

/// Decimal places kept for Bezier lengths and path bounds.
pub const DECIMALS: u32 = 2;

/// Id of the cut-line layer, which is never measured.
pub const CUT_LAYER_ID: &str = "DECOUPE";

/// Tolerances handed to every length/bounds computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub bezier_precision: f64,
    pub bezier_samples: usize,
    pub arc_angle_step: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            bezier_precision: BEZIER_PRECISION,
            bezier_samples: BEZIER_SAMPLES,
            arc_angle_step: ARC_ANGLE_STEP,
        }
    }
}

impl Tolerances {
    /// Values that are not finite and positive leave the precision unchanged.
    pub fn with_bezier_precision(mut self, precision: f64) -> Self {
        if precision.is_finite() && precision > 0.0 {
            self.bezier_precision = precision;
        }
        self
    }

    /// At least one sample.
    pub fn with_bezier_samples(mut self, samples: usize) -> Self {
        self.bezier_samples = samples.max(1);
        self
    }

    /// Values that are not finite and positive leave the step unchanged.
    pub fn with_arc_angle_step(mut self, step: f64) -> Self {
        if step.is_finite() && step > 0.0 {
            self.arc_angle_step = step;
        }
        self
    }
}
