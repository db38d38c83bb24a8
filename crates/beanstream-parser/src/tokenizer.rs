//! Streaming tokenizer turning raw text chunks into token lines.
//!
//! The tokenizer consumes an iterator of text chunks, splits them into lines,
//! strips trailing `;` comments, and splits each line into whitespace-delimited
//! tokens while keeping double-quoted substrings intact. Blank and comment-only
//! lines are skipped. The output is lazy and forward-only: consuming the
//! iterator twice requires re-supplying the chunk source.
//!
//! Two long-standing rules are kept for compatibility:
//!
//! - A line is truncated at the first `;` even when it appears inside a quoted
//!   string (known quirk).
//! - Adjacent quoted and unquoted runs merge into one token (`"foo"bar` is a
//!   single token).

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::VecDeque;

use crate::error::LinePos;

/// Matches either a maximal run of non-whitespace, non-quote characters or a
/// fully quoted `"..."` run, with adjacent runs concatenated into one token.
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:[^\s"]+|"[^"]*")+"#).expect("token pattern is valid"));

/// The tokens extracted from one non-blank, comment-stripped source line.
///
/// Invariant: non-empty. Balanced quotes remain part of the token text and the
/// decoder strips them when interpreting string fields; an unclosed quote
/// (possible after comment truncation) is dropped by the token pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLine {
    /// The tokens, in source order.
    pub tokens: Vec<String>,
    /// Where the line came from.
    pub pos: LinePos,
}

impl TokenLine {
    /// Create a token line. Callers must ensure `tokens` is non-empty.
    #[must_use]
    pub const fn new(tokens: Vec<String>, pos: LinePos) -> Self {
        Self { tokens, pos }
    }

    /// Get the token at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// The tokens rejoined with single spaces, for error context.
    #[must_use]
    pub fn joined(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Tokenize a single comment-stripped line.
fn tokens_of(line: &str) -> Vec<String> {
    // Truncate at the first ';', quoted or not.
    let line = match line.find(';') {
        Some(index) => &line[..index],
        None => line,
    };
    TOKEN_PATTERN
        .find_iter(line)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A lazy tokenizer over a sequence of text chunks.
///
/// Each chunk must contain only complete lines; splitting a logical line across
/// chunk boundaries is the caller's responsibility. Line numbers are 1-based
/// and cumulative across chunks.
///
/// # Example
///
/// ```
/// use beanstream_parser::Tokenizer;
///
/// let chunks = ["2014-01-01 open Assets:Checking USD ; opening\n".to_string()];
/// let mut lines = Tokenizer::new(chunks.into_iter());
///
/// let line = lines.next().unwrap();
/// assert_eq!(line.tokens, ["2014-01-01", "open", "Assets:Checking", "USD"]);
/// assert!(lines.next().is_none());
/// ```
#[derive(Debug)]
pub struct Tokenizer<I> {
    chunks: I,
    buffer: VecDeque<TokenLine>,
    next_line: usize,
}

impl<I, S> Tokenizer<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    /// Create a tokenizer over the given chunk source.
    pub fn new(chunks: I) -> Self {
        Self {
            chunks,
            buffer: VecDeque::new(),
            next_line: 1,
        }
    }

    fn refill(&mut self) -> bool {
        while self.buffer.is_empty() {
            let Some(chunk) = self.chunks.next() else {
                return false;
            };
            // split_inclusive keeps a trailing '\n' from producing a phantom
            // empty line, so numbering stays physical across chunk boundaries.
            for line in chunk.as_ref().split_inclusive('\n') {
                let pos = LinePos::new(self.next_line);
                self.next_line += 1;
                let tokens = tokens_of(line.strip_suffix('\n').unwrap_or(line));
                if !tokens.is_empty() {
                    self.buffer.push_back(TokenLine::new(tokens, pos));
                }
            }
        }
        true
    }
}

impl<I, S> Iterator for Tokenizer<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = TokenLine;

    fn next(&mut self) -> Option<TokenLine> {
        if !self.refill() {
            return None;
        }
        self.buffer.pop_front()
    }
}
