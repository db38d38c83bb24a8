//! Streaming ledger parser.
//!
//! This crate parses the plain-text ledger format into a stream of
//! [`Directive`]s. The pipeline has two stages:
//!
//! 1. [`Tokenizer`] - turns raw text chunks into comment-stripped, quote-aware
//!    token lines, lazily.
//! 2. [`parse_line`] / [`DirectiveStream`] - classifies each token line by its
//!    leading token (date, keyword, or posting account) and decodes it into a
//!    directive, threading the open-transaction context between lines.
//!
//! Errors are isolated per line: one malformed line yields an `Err` carrying
//! the line number and offending text, and parsing continues.
//!
//! # Example
//!
//! ```
//! use beanstream_parser::parse;
//!
//! let source = "\
//! 2014-01-01 open Assets:Checking USD
//! 2014-01-02 balance Assets:Checking 100.00 USD ; asserted monthly
//! ";
//!
//! let result = parse(source);
//! assert!(result.errors.is_empty());
//! assert_eq!(result.directives.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod parser;
mod scalar;
mod stream;
mod tokenizer;

pub use error::{DateField, LinePos, ParseError, ParseErrorKind};
pub use parser::{parse_line, ParseContext};
pub use scalar::{parse_date, parse_number};
pub use stream::DirectiveStream;
pub use tokenizer::{TokenLine, Tokenizer};

use beanstream_core::Directive;

/// Result of parsing a complete source text.
#[derive(Debug)]
pub struct ParseResult {
    /// Successfully parsed directives, in input order.
    pub directives: Vec<Directive>,
    /// Parse errors encountered, in input order.
    pub errors: Vec<ParseError>,
}

/// Parse ledger source text eagerly.
///
/// Collects the directive stream into directives and errors. For incremental
/// input, use [`parse_chunks`] instead.
#[must_use]
pub fn parse(source: &str) -> ParseResult {
    let mut directives = Vec::new();
    let mut errors = Vec::new();
    for result in parse_chunks(std::iter::once(source)) {
        match result {
            Ok(directive) => directives.push(directive),
            Err(error) => errors.push(error),
        }
    }
    ParseResult { directives, errors }
}

/// Parse a lazy sequence of text chunks.
///
/// Each chunk must contain only complete lines; splitting a logical line
/// across chunk boundaries is the caller's responsibility. The returned
/// stream yields one `Result` per non-blank source line and may be dropped
/// early at any point.
pub fn parse_chunks<I, S>(chunks: I) -> DirectiveStream<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    DirectiveStream::new(chunks)
}
