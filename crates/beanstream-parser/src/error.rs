//! Parse error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A source location: 1-based line number, cumulative across input chunks.
///
/// The tokenizer is line-oriented and chunks may arrive incrementally, so byte
/// offsets into "the file" are not meaningful here; errors point at lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinePos {
    /// 1-based line number.
    pub line: usize,
}

impl LinePos {
    /// Create a new line position.
    #[must_use]
    pub const fn new(line: usize) -> Self {
        Self { line }
    }
}

impl fmt::Display for LinePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.line)
    }
}

/// Which field of a date token failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateField {
    /// The year component
    Year,
    /// The month component
    Month,
    /// The day component
    Day,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year => write!(f, "year"),
            Self::Month => write!(f, "month"),
            Self::Day => write!(f, "day"),
        }
    }
}

/// Kinds of parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A year/month/day component of a date token was not an integer.
    #[error("the {field} value '{value}' is not a number")]
    InvalidDateField {
        /// Which component failed
        field: DateField,
        /// The offending component text
        value: String,
    },
    /// A date token was well-formed but out of calendar range (month 13, day 32).
    #[error("the date value '{0}' is not a valid date")]
    InvalidDate(String),
    /// A token was neither a symbolic literal nor a decimal number.
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    /// The directive grammar required more tokens than the line supplied.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// The leading keyword (or date-prefixed keyword) is not in the recognized set.
    #[error("unrecognized directive '{0}'")]
    UnknownDirective(String),
    /// Cost sub-grammar tokens were present but ill-formed.
    #[error("malformed cost specification: {0}")]
    MalformedCost(String),
    /// Price sub-grammar tokens were present but ill-formed.
    #[error("malformed price annotation: {0}")]
    MalformedPrice(String),
}

/// A parse error with enough context to locate the offending source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Where the error occurred.
    pub pos: LinePos,
    /// The offending token line, whitespace-joined.
    pub line: String,
}

impl ParseError {
    /// Create a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, pos: LinePos, line: impl Into<String>) -> Self {
        Self {
            kind,
            pos,
            line: line.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pos, self.kind)?;
        if !self.line.is_empty() {
            write!(f, " (in '{}')", self.line)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
