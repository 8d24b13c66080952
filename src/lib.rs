//! Length and bounding-box measurement for SVG drawings.
//!
//! A drawing is split into groups (`<g id="...">`); every rectangle, circle,
//! line and path inside a group contributes its outline length and its box.
//! Paths go through a full interpreter for the SVG path mini-language,
//! including Bezier curves and elliptic arcs.
//!
//! ```
//! let svg = r#"<svg><g id="_x38_MM"><rect width="10" height="20"/></g></svg>"#;
//! let report = neonmeter::measure(svg, &neonmeter::Options::default()).unwrap();
//! assert_eq!(report.get("8MM").unwrap().length, 60.0);
//! ```

pub mod defaults;
pub mod document;
pub mod errors;
pub mod geometry;
pub mod log;
pub mod path;
pub mod report;
pub mod shapes;
pub mod types;

pub use defaults::Tolerances;
pub use document::{Groups, parse_document, sanitize_group_id};
pub use errors::MeasureError;
pub use report::{GroupMeasure, Report};
pub use shapes::{Measure, Shape};
pub use types::{Bounds, Point};

/// What to measure and how precisely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    /// Only measure groups with this id, raw or sanitized.
    pub group: Option<String>,
    pub tolerances: Tolerances,
}

impl Options {
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }
}

/// Parse an SVG document and measure its groups.
pub fn measure(source: &str, options: &Options) -> Result<Report, MeasureError> {
    let groups = parse_document(source, options.group.as_deref())?;
    log::debug!(groups = groups.len(), "document parsed");
    Report::from_groups(&groups, &options.tolerances)
}
