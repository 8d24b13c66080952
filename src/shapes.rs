//! Measurable primitives: rectangles, circles, lines and paths.
//!
//! Each primitive is built from an element's attributes and answers two
//! questions through [`Measure`]: how long is its outline, and what box
//! does it occupy.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::f64::consts::TAU;

use enum_dispatch::enum_dispatch;
use glam::dvec2;

use crate::defaults::{DECIMALS, Tolerances};
use crate::errors::MeasureError;
use crate::path::{Path, PathLexer, interpret};
use crate::types::{Bounds, Point};

/// Outline length and bounding box of a primitive.
#[enum_dispatch]
pub trait Measure {
    fn length(&self, tolerances: &Tolerances) -> Result<f64, MeasureError>;

    fn bounds(&self, tolerances: &Tolerances) -> Result<Bounds, MeasureError>;

    /// Both at once. Shapes that do real work per call override this.
    fn measure(&self, tolerances: &Tolerances) -> Result<(f64, Bounds), MeasureError> {
        Ok((self.length(tolerances)?, self.bounds(tolerances)?))
    }
}

/// Any element the meter knows how to measure.
#[enum_dispatch(Measure)]
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Line(Line),
    Path(Path),
}

impl Shape {
    /// Build the shape for element `tag`, or `None` for tags that draw nothing
    /// we measure.
    pub fn from_element(
        tag: &str,
        attrs: &impl Attributes,
        lexer: &PathLexer,
    ) -> Result<Option<Shape>, MeasureError> {
        let shape = match tag {
            "rect" => Rectangle::from_attributes(attrs)?.into(),
            "circle" => Circle::from_attributes(attrs)?.into(),
            "line" => Line::from_attributes(attrs)?.into(),
            "path" => path_from_attributes(attrs, lexer)?.into(),
            _ => return Ok(None),
        };
        Ok(Some(shape))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Rectangle(_) => "rect",
            Shape::Circle(_) => "circle",
            Shape::Line(_) => "line",
            Shape::Path(_) => "path",
        }
    }
}

/// Read access to an element's attributes.
pub trait Attributes {
    fn attribute(&self, name: &str) -> Option<&str>;
}

impl Attributes for roxmltree::Node<'_, '_> {
    fn attribute(&self, name: &str) -> Option<&str> {
        roxmltree::Node::attribute(self, name)
    }
}

impl<K: Borrow<str> + Ord, V: AsRef<str>> Attributes for BTreeMap<K, V> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(|v| v.as_ref())
    }
}

impl<K: Borrow<str> + std::hash::Hash + Eq, V: AsRef<str>> Attributes for HashMap<K, V> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.get(name).map(|v| v.as_ref())
    }
}

/// Parse attribute `name`; `None` when absent.
fn number(attrs: &impl Attributes, name: &str) -> Result<Option<f64>, MeasureError> {
    let Some(raw) = attrs.attribute(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(MeasureError::InvalidNumber {
            name: name.to_string(),
            raw: raw.to_string(),
        }),
    }
}

fn required(
    attrs: &impl Attributes,
    element: &'static str,
    name: &'static str,
) -> Result<f64, MeasureError> {
    number(attrs, name)?.ok_or(MeasureError::MissingAttribute { element, name })
}

fn or_zero(attrs: &impl Attributes, name: &str) -> Result<f64, MeasureError> {
    Ok(number(attrs, name)?.unwrap_or(0.0))
}

fn path_from_attributes(attrs: &impl Attributes, lexer: &PathLexer) -> Result<Path, MeasureError> {
    match attrs.attribute("d") {
        Some(d) => Path::parse(lexer, d),
        None => Ok(Path::default()),
    }
}

/// `<rect>`: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    /// `x` and `y` default to 0; `width` and `height` are required.
    pub fn from_attributes(attrs: &impl Attributes) -> Result<Self, MeasureError> {
        Ok(Self {
            x: or_zero(attrs, "x")?,
            y: or_zero(attrs, "y")?,
            width: required(attrs, "rect", "width")?,
            height: required(attrs, "rect", "height")?,
        })
    }
}

impl Measure for Rectangle {
    fn length(&self, _: &Tolerances) -> Result<f64, MeasureError> {
        Ok(2.0 * (self.width + self.height))
    }

    fn bounds(&self, _: &Tolerances) -> Result<Bounds, MeasureError> {
        Ok(Bounds::new(
            self.x,
            self.x + self.width,
            self.y,
            self.y + self.height,
        ))
    }
}

/// `<circle>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn from_attributes(attrs: &impl Attributes) -> Result<Self, MeasureError> {
        Ok(Self {
            x: required(attrs, "circle", "cx")?,
            y: required(attrs, "circle", "cy")?,
            r: required(attrs, "circle", "r")?,
        })
    }
}

impl Measure for Circle {
    fn length(&self, _: &Tolerances) -> Result<f64, MeasureError> {
        Ok(TAU * self.r)
    }

    fn bounds(&self, _: &Tolerances) -> Result<Bounds, MeasureError> {
        Ok(Bounds::new(
            self.x - self.r,
            self.x + self.r,
            self.y - self.r,
            self.y + self.r,
        ))
    }
}

/// `<line>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub p1: Point,
    pub p2: Point,
}

impl Line {
    /// Missing coordinates default to 0.
    pub fn from_attributes(attrs: &impl Attributes) -> Result<Self, MeasureError> {
        Ok(Self {
            p1: dvec2(or_zero(attrs, "x1")?, or_zero(attrs, "y1")?),
            p2: dvec2(or_zero(attrs, "x2")?, or_zero(attrs, "y2")?),
        })
    }
}

impl Measure for Line {
    fn length(&self, _: &Tolerances) -> Result<f64, MeasureError> {
        Ok(self.p1.distance(self.p2))
    }

    fn bounds(&self, _: &Tolerances) -> Result<Bounds, MeasureError> {
        Ok([self.p1, self.p2].into_iter().collect())
    }
}

impl Measure for Path {
    fn length(&self, tolerances: &Tolerances) -> Result<f64, MeasureError> {
        Ok(self.measure(tolerances)?.0)
    }

    fn bounds(&self, tolerances: &Tolerances) -> Result<Bounds, MeasureError> {
        Ok(self.measure(tolerances)?.1)
    }

    /// One walk of the pen yields both values; bounds are rounded to
    /// [`DECIMALS`] places.
    fn measure(&self, tolerances: &Tolerances) -> Result<(f64, Bounds), MeasureError> {
        let segments = interpret(&self.tokens)?;
        let mut length = 0.0;
        let mut bounds = Bounds::EMPTY;
        for segment in &segments {
            length += segment.length(tolerances);
            bounds = bounds.expand(segment.bounds(tolerances));
        }
        Ok((length, bounds.rounded(DECIMALS)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&'static str, &'static str)]) -> BTreeMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    fn shape(tag: &str, pairs: &[(&'static str, &'static str)]) -> Shape {
        Shape::from_element(tag, &attrs(pairs), &PathLexer::new())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn rectangle_perimeter_and_box() {
        let tol = Tolerances::default();
        let rect = shape(
            "rect",
            &[("x", "5"), ("y", "10"), ("width", "10"), ("height", "20")],
        );
        assert_eq!(rect.length(&tol).unwrap(), 60.0);
        assert_eq!(rect.bounds(&tol).unwrap(), Bounds::new(5.0, 15.0, 10.0, 30.0));
    }

    #[test]
    fn rectangle_corner_defaults_to_origin() {
        let rect = Rectangle::from_attributes(&attrs(&[("width", "4"), ("height", "2")])).unwrap();
        assert_eq!((rect.x, rect.y), (0.0, 0.0));
    }

    #[test]
    fn rectangle_without_width_is_an_error() {
        let err = Rectangle::from_attributes(&attrs(&[("height", "2")])).unwrap_err();
        assert!(matches!(
            err,
            MeasureError::MissingAttribute {
                element: "rect",
                name: "width"
            }
        ));
    }

    #[test]
    fn circle() {
        let tol = Tolerances::default();
        let circle = shape("circle", &[("cx", "10"), ("cy", "10"), ("r", "5")]);
        assert_eq!(circle.length(&tol).unwrap(), 10.0 * std::f64::consts::PI);
        assert_eq!(circle.bounds(&tol).unwrap(), Bounds::new(5.0, 15.0, 5.0, 15.0));
    }

    #[test]
    fn circle_needs_all_three_attributes() {
        let err = Circle::from_attributes(&attrs(&[("cx", "1"), ("r", "5")])).unwrap_err();
        assert!(matches!(
            err,
            MeasureError::MissingAttribute { name: "cy", .. }
        ));
    }

    #[test]
    fn line() {
        let tol = Tolerances::default();
        let line = shape("line", &[("x1", "0"), ("y1", "0"), ("x2", "3"), ("y2", "4")]);
        assert_eq!(line.length(&tol).unwrap(), 5.0);
        assert_eq!(line.bounds(&tol).unwrap(), Bounds::new(0.0, 3.0, 0.0, 4.0));
    }

    #[test]
    fn numbers_are_trimmed_but_checked() {
        let rect =
            Rectangle::from_attributes(&attrs(&[("width", " 3.5 "), ("height", "1e1")])).unwrap();
        assert_eq!((rect.width, rect.height), (3.5, 10.0));

        let err = Rectangle::from_attributes(&attrs(&[("width", "3px"), ("height", "1")]))
            .unwrap_err();
        assert!(matches!(err, MeasureError::InvalidNumber { ref name, ref raw } if name == "width" && raw == "3px"));

        let err =
            Circle::from_attributes(&attrs(&[("cx", "NaN"), ("cy", "0"), ("r", "1")])).unwrap_err();
        assert!(matches!(err, MeasureError::InvalidNumber { .. }));
    }

    #[test]
    fn path_measures_in_one_walk() {
        let tol = Tolerances::default();
        let path = shape("path", &[("d", "M10,10 h10 v5")]);
        let (length, bounds) = path.measure(&tol).unwrap();
        assert_eq!(length, 15.0);
        assert_eq!(bounds, Bounds::new(10.0, 20.0, 10.0, 15.0));
        assert_eq!(path.length(&tol).unwrap(), length);
    }

    #[test]
    fn path_without_data_is_empty() {
        let tol = Tolerances::default();
        let path = shape("path", &[]);
        assert_eq!(path.length(&tol).unwrap(), 0.0);
        assert!(path.bounds(&tol).unwrap().is_empty());
    }

    #[test]
    fn path_bounds_are_rounded() {
        let tol = Tolerances::default();
        let path = shape("path", &[("d", "M0.004,0 L10.126,1")]);
        assert_eq!(path.bounds(&tol).unwrap(), Bounds::new(0.0, 10.13, 0.0, 1.0));
    }

    #[test]
    fn other_tags_are_ignored() {
        let found = Shape::from_element("text", &attrs(&[]), &PathLexer::new()).unwrap();
        assert!(found.is_none());
    }
}
