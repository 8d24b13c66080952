//! Path interpreter: the current-point state machine.
//!
//! A single walk over the tokens resolves relative coordinates and smooth
//! control-point reflections into absolute [`Segment`]s. Length and bounds
//! are both derived from those segments, so the two can never disagree
//! about where the pen is.

use glam::dvec2;

use super::{Command, PathToken};
use crate::defaults::Tolerances;
use crate::errors::MeasureError;
use crate::geometry::{Arc, Bezier};
use crate::log::trace;
use crate::types::{Bounds, Point};

/// An absolute, drawable piece of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line { from: Point, to: Point },
    Bezier(Bezier),
    Arc(Arc),
}

impl Segment {
    pub fn length(&self, tolerances: &Tolerances) -> f64 {
        match self {
            Segment::Line { from, to } => from.distance(*to),
            Segment::Bezier(curve) => curve.length(tolerances.bezier_precision),
            Segment::Arc(arc) => arc.length(tolerances.arc_angle_step),
        }
    }

    pub fn bounds(&self, tolerances: &Tolerances) -> Bounds {
        match self {
            Segment::Line { from, to } => [*from, *to].into_iter().collect(),
            Segment::Bezier(curve) => curve.bounds(tolerances.bezier_samples),
            Segment::Arc(arc) => arc.bounds(tolerances.arc_angle_step),
        }
    }
}

/// The control point a following smooth command may reflect.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LastControl {
    None,
    Cubic(Point),
    Quadratic(Point),
}

/// reflection(p, m) = 2m - p
fn reflect(p: Point, m: Point) -> Point {
    m * 2.0 - p
}

#[derive(Debug)]
struct Pen {
    current: Point,
    subpath_start: Point,
    last_control: LastControl,
    segments: Vec<Segment>,
}

impl Pen {
    fn new() -> Self {
        Self {
            current: Point::ZERO,
            subpath_start: Point::ZERO,
            last_control: LastControl::None,
            segments: Vec::new(),
        }
    }

    /// Resolve a coordinate pair against the current point when relative.
    fn at(&self, relative: bool, x: f64, y: f64) -> Point {
        let p = dvec2(x, y);
        if relative { self.current + p } else { p }
    }

    fn line_to(&mut self, to: Point) {
        self.segments.push(Segment::Line {
            from: self.current,
            to,
        });
        self.current = to;
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, to: Point) {
        self.segments
            .push(Segment::Bezier(Bezier::Cubic([self.current, c1, c2, to])));
        self.current = to;
        self.last_control = LastControl::Cubic(c2);
    }

    fn quadratic_to(&mut self, c: Point, to: Point) {
        self.segments
            .push(Segment::Bezier(Bezier::Quadratic([self.current, c, to])));
        self.current = to;
        self.last_control = LastControl::Quadratic(c);
    }

    /// First control point of a smooth cubic.
    fn smooth_cubic_control(&self) -> Point {
        match self.last_control {
            LastControl::Cubic(c) => reflect(c, self.current),
            _ => self.current,
        }
    }

    /// Control point of a smooth quadratic.
    fn smooth_quadratic_control(&self) -> Point {
        match self.last_control {
            LastControl::Quadratic(c) => reflect(c, self.current),
            _ => self.current,
        }
    }

    fn apply(&mut self, token: &PathToken) -> Result<(), MeasureError> {
        token.check_arity()?;
        let rel = token.relative;
        let p = &token.parameters;

        // Every command outside the Bezier family forgets the last control point.
        let previous_control = self.last_control;
        self.last_control = LastControl::None;

        match token.command {
            Command::MoveTo => {
                self.current = self.at(rel, p[0], p[1]);
                self.subpath_start = self.current;
            }
            Command::HorizontalLineTo => {
                let x = if rel { self.current.x + p[0] } else { p[0] };
                self.line_to(dvec2(x, self.current.y));
            }
            Command::VerticalLineTo => {
                let y = if rel { self.current.y + p[0] } else { p[0] };
                self.line_to(dvec2(self.current.x, y));
            }
            Command::LineTo => {
                for g in p.chunks_exact(2) {
                    let to = self.at(rel, g[0], g[1]);
                    self.line_to(to);
                }
            }
            Command::CurveTo => {
                for g in p.chunks_exact(6) {
                    let c1 = self.at(rel, g[0], g[1]);
                    let c2 = self.at(rel, g[2], g[3]);
                    let to = self.at(rel, g[4], g[5]);
                    self.cubic_to(c1, c2, to);
                }
            }
            Command::SmoothCurveTo => {
                self.last_control = previous_control;
                for g in p.chunks_exact(4) {
                    let c1 = self.smooth_cubic_control();
                    let c2 = self.at(rel, g[0], g[1]);
                    let to = self.at(rel, g[2], g[3]);
                    self.cubic_to(c1, c2, to);
                }
            }
            Command::QuadraticCurveTo => {
                for g in p.chunks_exact(4) {
                    let c = self.at(rel, g[0], g[1]);
                    let to = self.at(rel, g[2], g[3]);
                    self.quadratic_to(c, to);
                }
            }
            Command::SmoothQuadraticCurveTo => {
                self.last_control = previous_control;
                for g in p.chunks_exact(2) {
                    let c = self.smooth_quadratic_control();
                    let to = self.at(rel, g[0], g[1]);
                    self.quadratic_to(c, to);
                }
            }
            Command::EllipticalArc => {
                for g in p.chunks_exact(7) {
                    let to = self.at(rel, g[5], g[6]);
                    let arc =
                        Arc::from_svg_params(self.current, to, g[0], g[1], g[2], g[3] != 0.0, g[4] != 0.0)?;
                    match arc {
                        Some(arc) => {
                            self.segments.push(Segment::Arc(arc));
                            self.current = to;
                        }
                        // Coincident endpoints: only the point itself remains.
                        None => self.line_to(to),
                    }
                }
            }
            Command::ClosePath => {
                let start = self.subpath_start;
                self.line_to(start);
            }
        }
        Ok(())
    }
}

/// Walk `tokens` from the origin and return the segments they draw.
///
/// Moves draw nothing, so a path made only of moves has no segments.
pub fn interpret(tokens: &[PathToken]) -> Result<Vec<Segment>, MeasureError> {
    let mut pen = Pen::new();
    for token in tokens {
        pen.apply(token)?;
        trace!(command = %token.letter(), x = pen.current.x, y = pen.current.y, "pen moved");
    }
    Ok(pen.segments)
}
