//! Error types with diagnostics using miette
//!
//! Path data errors carry the offending `d` string and a span, so the
//! terminal report points at the exact character that broke lexing.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Everything that can stop a measurement.
///
/// Errors are never recovered locally: the first one aborts the whole
/// document, for length and bounds alike.
#[derive(Error, Diagnostic, Debug)]
pub enum MeasureError {
    // ========================================================================
    // Shape attributes
    // ========================================================================
    #[error("missing attribute `{name}` on <{element}>")]
    #[diagnostic(code(neonmeter::shape::missing_attribute))]
    MissingAttribute {
        element: &'static str,
        name: &'static str,
    },

    #[error("invalid number for `{name}`: {raw:?}")]
    #[diagnostic(
        code(neonmeter::shape::invalid_number),
        help("only plain user-space numbers are supported, without units")
    )]
    InvalidNumber { name: String, raw: String },

    // ========================================================================
    // Path data
    // ========================================================================
    #[error("unterminated expression in path data")]
    #[diagnostic(code(neonmeter::path::unterminated_expression))]
    UnterminatedExpression {
        #[source_code]
        src: String,
        #[label("nothing follows this")]
        span: SourceSpan,
    },

    #[error("unknown path command `{command}`")]
    #[diagnostic(
        code(neonmeter::path::unknown_command),
        help("supported commands are M H V L C S Q T A Z, in either case")
    )]
    UnknownCommand {
        command: char,
        #[source_code]
        src: String,
        #[label("not a path command")]
        span: SourceSpan,
    },

    #[error("invalid number of parameters ({count}) for command {command}")]
    #[diagnostic(code(neonmeter::path::invalid_arity), help("{command} expects {expected}"))]
    InvalidArity {
        command: char,
        count: usize,
        expected: String,
    },

    #[error("arc radii cannot be zero (rx={rx}, ry={ry})")]
    #[diagnostic(code(neonmeter::path::degenerate_arc))]
    DegenerateArc { rx: f64, ry: f64 },

    // ========================================================================
    // Document
    // ========================================================================
    #[error("invalid escape sequence `{escape}` in group id {id:?}")]
    #[diagnostic(
        code(neonmeter::document::invalid_group_id),
        help("escapes look like `_x38_`: an even number of hex digits between `_x` and `_`")
    )]
    InvalidGroupId { id: String, escape: String },

    #[error("parsing svg document")]
    #[diagnostic(code(neonmeter::document::xml))]
    Xml(#[from] roxmltree::Error),

    /// Wraps an error with the element or group it came from.
    #[error("{context}")]
    #[diagnostic(code(neonmeter::context))]
    InShape {
        context: String,
        #[source]
        source: Box<MeasureError>,
    },
}

impl MeasureError {
    /// Attach the location the error surfaced in.
    pub fn within(self, context: impl Into<String>) -> Self {
        MeasureError::InShape {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all context layers peeled off.
    pub fn root_cause(&self) -> &MeasureError {
        let mut err = self;
        while let MeasureError::InShape { source, .. } = err {
            err = source.as_ref();
        }
        err
    }
}
