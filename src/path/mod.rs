//! SVG path data: commands, tokens, and the `Path` shape.
//!
//! - `lexer`: splits a `d` attribute into [`PathToken`]s
//! - `interpreter`: walks tokens with the current-point state machine and
//!   turns them into measurable [`Segment`]s

pub mod interpreter;
pub mod lexer;

pub use interpreter::{Segment, interpret};
pub use lexer::PathLexer;

use crate::errors::MeasureError;

/// A path command, independent of absolute/relative case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveTo,
    HorizontalLineTo,
    VerticalLineTo,
    LineTo,
    CurveTo,
    SmoothCurveTo,
    QuadraticCurveTo,
    SmoothQuadraticCurveTo,
    EllipticalArc,
    ClosePath,
}

impl Command {
    /// Map a command letter to its command and whether it is relative.
    pub fn from_letter(letter: char) -> Option<(Command, bool)> {
        let command = match letter.to_ascii_uppercase() {
            'M' => Command::MoveTo,
            'H' => Command::HorizontalLineTo,
            'V' => Command::VerticalLineTo,
            'L' => Command::LineTo,
            'C' => Command::CurveTo,
            'S' => Command::SmoothCurveTo,
            'Q' => Command::QuadraticCurveTo,
            'T' => Command::SmoothQuadraticCurveTo,
            'A' => Command::EllipticalArc,
            'Z' => Command::ClosePath,
            _ => return None,
        };
        Some((command, letter.is_ascii_lowercase()))
    }

    /// Upper-case command letter
    pub fn letter(self) -> char {
        match self {
            Command::MoveTo => 'M',
            Command::HorizontalLineTo => 'H',
            Command::VerticalLineTo => 'V',
            Command::LineTo => 'L',
            Command::CurveTo => 'C',
            Command::SmoothCurveTo => 'S',
            Command::QuadraticCurveTo => 'Q',
            Command::SmoothQuadraticCurveTo => 'T',
            Command::EllipticalArc => 'A',
            Command::ClosePath => 'Z',
        }
    }

    /// Parameters consumed by one application of the command.
    pub fn arity(self) -> usize {
        match self {
            Command::ClosePath => 0,
            Command::HorizontalLineTo | Command::VerticalLineTo => 1,
            Command::MoveTo | Command::LineTo | Command::SmoothQuadraticCurveTo => 2,
            Command::SmoothCurveTo | Command::QuadraticCurveTo => 4,
            Command::CurveTo => 6,
            Command::EllipticalArc => 7,
        }
    }

    /// Whether the parameter list may hold several groups in a row.
    /// M, H, V and Z take exactly one.
    pub fn repeatable(self) -> bool {
        !matches!(
            self,
            Command::MoveTo
                | Command::HorizontalLineTo
                | Command::VerticalLineTo
                | Command::ClosePath
        )
    }

    pub fn accepts(self, count: usize) -> bool {
        if self.repeatable() {
            count % self.arity() == 0
        } else {
            count == self.arity()
        }
    }
}

/// One command letter with its numeric parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PathToken {
    pub command: Command,
    pub relative: bool,
    pub parameters: Vec<f64>,
}

impl PathToken {
    pub fn new(command: Command, relative: bool, parameters: Vec<f64>) -> Self {
        Self {
            command,
            relative,
            parameters,
        }
    }

    /// The letter as written in the path data
    pub fn letter(&self) -> char {
        let letter = self.command.letter();
        if self.relative {
            letter.to_ascii_lowercase()
        } else {
            letter
        }
    }

    /// Fail with `InvalidArity` unless the parameter count fits the command.
    pub fn check_arity(&self) -> Result<(), MeasureError> {
        let count = self.parameters.len();
        if self.command.accepts(count) {
            return Ok(());
        }
        let arity = self.command.arity();
        let expected = if self.command.repeatable() {
            format!("a multiple of {arity} parameters")
        } else {
            format!("exactly {arity} parameters")
        };
        Err(MeasureError::InvalidArity {
            command: self.letter(),
            count,
            expected,
        })
    }
}

/// A `<path>` element: its tokens in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub tokens: Vec<PathToken>,
}

impl Path {
    pub fn new(tokens: Vec<PathToken>) -> Self {
        Self { tokens }
    }

    /// Lex `d` into a path.
    pub fn parse(lexer: &PathLexer, d: &str) -> Result<Path, MeasureError> {
        lexer.tokenize(d).map(Path::new)
    }
}
