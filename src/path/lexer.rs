//! Path data lexer.
//!
//! Two patterns do the work: one matches a command letter followed by its
//! numeric tail, the other picks individual numbers out of that tail.
//! Numbers need no explicit separator when a sign or a second decimal point
//! starts the next one, so `815.22-1429` is `[815.22, -1429]` and `.98.89`
//! is `[0.98, 0.89]`.

use regex_lite::Regex;

use super::{Command, PathToken};
use crate::errors::MeasureError;
use crate::log::warn;

/// A command letter and the run of numeric characters after it.
pub const COMMAND_PATTERN: &str = r"[A-Za-z](?:[0-9.,+\-]|[eE][+\-]?[0-9])*";

/// A single number inside a command's tail.
pub const NUMBER_PATTERN: &str = r"[+\-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+\-]?[0-9]+)?";

/// Compiled lexer patterns. Build one per document and share it across paths.
#[derive(Debug, Clone)]
pub struct PathLexer {
    command: Regex,
    number: Regex,
}

impl Default for PathLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl PathLexer {
    pub fn new() -> Self {
        Self::with_patterns(COMMAND_PATTERN, NUMBER_PATTERN)
            .expect("built-in path patterns compile")
    }

    /// Lexer with custom patterns, for dialects with a different number syntax.
    pub fn with_patterns(command: &str, number: &str) -> Result<Self, regex_lite::Error> {
        Ok(Self {
            command: Regex::new(command)?,
            number: Regex::new(number)?,
        })
    }

    /// Split `d` into tokens.
    ///
    /// Data without any command yields an empty list rather than an error.
    pub fn tokenize(&self, d: &str) -> Result<Vec<PathToken>, MeasureError> {
        // Whitespace is only noise between tokens; keep byte offsets stable
        // for error spans by turning it into the comma separator.
        let normalized: String = d
            .chars()
            .map(|c| if c.is_ascii_whitespace() { ',' } else { c })
            .collect();

        let mut tokens = Vec::new();
        let mut cursor = 0;
        for m in self.command.find_iter(&normalized) {
            let skipped = normalized[cursor..m.start()].trim_matches(',');
            if !skipped.is_empty() {
                warn!(skipped, "ignoring stray characters in path data");
            }
            cursor = m.end();

            let letter = m.as_str().chars().next().unwrap_or_default();
            let Some((command, relative)) = Command::from_letter(letter) else {
                return Err(MeasureError::UnknownCommand {
                    command: letter,
                    src: d.to_string(),
                    span: (m.start(), 1).into(),
                });
            };
            let tail_start = m.start() + letter.len_utf8();
            let parameters = self.numbers(d, &normalized[tail_start..m.end()], tail_start)?;
            tokens.push(PathToken::new(command, relative, parameters));
        }
        Ok(tokens)
    }

    /// Parse every number in `tail`, which sits at `offset` in the path data.
    fn numbers(&self, d: &str, tail: &str, offset: usize) -> Result<Vec<f64>, MeasureError> {
        let mut numbers = Vec::new();
        let mut cursor = 0;
        for m in self.number.find_iter(tail) {
            check_separator(d, tail, cursor, m.start(), offset)?;
            let raw = m.as_str();
            let value = raw.parse::<f64>().map_err(|_| MeasureError::InvalidNumber {
                name: "d".into(),
                raw: raw.to_string(),
            })?;
            numbers.push(value);
            cursor = m.end();
        }
        check_separator(d, tail, cursor, tail.len(), offset)?;
        Ok(numbers)
    }
}

/// Between two numbers only commas may appear. Leftovers at the end of the
/// tail are a dangling sign or exponent; anywhere else they are a bad number.
fn check_separator(
    d: &str,
    tail: &str,
    from: usize,
    to: usize,
    offset: usize,
) -> Result<(), MeasureError> {
    let gap = &tail[from..to];
    let Some(first) = gap.find(|c| c != ',') else {
        return Ok(());
    };
    let leftover = gap.trim_matches(',');
    if to == tail.len() {
        Err(MeasureError::UnterminatedExpression {
            src: d.to_string(),
            span: (offset + from + first, leftover.len()).into(),
        })
    } else {
        Err(MeasureError::InvalidNumber {
            name: "d".into(),
            raw: leftover.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(d: &str) -> Vec<PathToken> {
        PathLexer::new().tokenize(d).unwrap()
    }

    fn params(tail: &str) -> Vec<f64> {
        let tokens = lex(&format!("L{tail}"));
        assert_eq!(tokens.len(), 1);
        tokens[0].parameters.clone()
    }

    #[test]
    fn one_command_two_parameters() {
        assert_eq!(
            lex("M1479,815.22"),
            vec![PathToken::new(Command::MoveTo, false, vec![1479.0, 815.22])]
        );
    }

    #[test]
    fn three_commands() {
        let tokens = lex(
            "M715,371.73h3.29c26.16,3.52,97.36,16.63,161,75.59,73.24,67.81,88,151.38,91.47,175.83",
        );
        assert_eq!(
            tokens,
            vec![
                PathToken::new(Command::MoveTo, false, vec![715.0, 371.73]),
                PathToken::new(Command::HorizontalLineTo, true, vec![3.29]),
                PathToken::new(
                    Command::CurveTo,
                    true,
                    vec![
                        26.16, 3.52, 97.36, 16.63, 161.0, 75.59, 73.24, 67.81, 88.0, 151.38,
                        91.47, 175.83
                    ]
                ),
            ]
        );
    }

    #[test]
    fn number_separators() {
        assert_eq!(params("815.22"), vec![815.22]);
        assert_eq!(params("-815.22"), vec![-815.22]);
        assert_eq!(params("815.22,1429"), vec![815.22, 1429.0]);
        assert_eq!(params("815.22-1429"), vec![815.22, -1429.0]);
        assert_eq!(params(".98.89"), vec![0.98, 0.89]);
        assert_eq!(params("1e2,-2.5E-1"), vec![100.0, -0.25]);
    }

    #[test]
    fn whitespace_is_noise() {
        let spaced = lex("M 10 10\n\th 10 \r\n z");
        assert_eq!(
            spaced,
            vec![
                PathToken::new(Command::MoveTo, false, vec![10.0, 10.0]),
                PathToken::new(Command::HorizontalLineTo, true, vec![10.0]),
                PathToken::new(Command::ClosePath, true, vec![]),
            ]
        );
    }

    #[test]
    fn no_commands_means_no_tokens() {
        assert!(lex("").is_empty());
        assert!(lex("   ").is_empty());
        assert!(lex("12,34").is_empty());
    }

    #[test]
    fn unknown_command_is_fatal() {
        let err = PathLexer::new().tokenize("M0,0 X5").unwrap_err();
        match err {
            MeasureError::UnknownCommand { command, span, .. } => {
                assert_eq!(command, 'X');
                assert_eq!(span.offset(), 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn dangling_sign_is_unterminated() {
        let err = PathLexer::new().tokenize("M10,-").unwrap_err();
        match err {
            MeasureError::UnterminatedExpression { span, .. } => {
                assert_eq!(span.offset(), 4);
                assert_eq!(span.len(), 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn stray_sign_between_numbers_is_invalid() {
        let err = PathLexer::new().tokenize("L1,-,2").unwrap_err();
        assert!(matches!(err, MeasureError::InvalidNumber { ref raw, .. } if raw == "-"));
    }
}
