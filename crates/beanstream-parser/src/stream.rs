//! Lazy directive stream over a chunk source.

use beanstream_core::Directive;
use tracing::debug;

use crate::error::ParseError;
use crate::parser::{parse_line, ParseContext};
use crate::tokenizer::Tokenizer;

/// A lazy stream of decoded directives.
///
/// Wraps a [`Tokenizer`] and threads the open-transaction context from one
/// line to the next. Yields one `Result` per non-blank, non-comment source
/// line, in input order. A decode failure on one line is isolated: the error
/// is yielded and the stream continues with the next line. Stopping
/// consumption early is always safe.
#[derive(Debug)]
pub struct DirectiveStream<I> {
    lines: Tokenizer<I>,
    ctx: ParseContext,
}

impl<I, S> DirectiveStream<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    /// Create a directive stream over the given chunk source.
    pub fn new(chunks: I) -> Self {
        Self {
            lines: Tokenizer::new(chunks),
            ctx: ParseContext::new(),
        }
    }
}

impl<I, S> Iterator for DirectiveStream<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<Directive, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        let (ctx, result) = parse_line(self.ctx, &line);
        self.ctx = ctx;
        if let Err(error) = &result {
            debug!(line = line.pos.line, %error, "skipping malformed line");
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beanstream_core::{Amount, Directive};
    use rust_decimal_macros::dec;

    #[test]
    fn test_end_to_end_two_directives() {
        let input = "2014-01-01 open Assets:Checking USD\n2014-01-02 balance Assets:Checking 100.00 USD\n";
        let directives: Vec<_> = DirectiveStream::new(std::iter::once(input))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(directives.len(), 2);
        if let Directive::Open(open) = &directives[0] {
            assert_eq!(open.account, "Assets:Checking");
            assert_eq!(open.currency, Some("USD".to_string()));
        } else {
            panic!("expected open");
        }
        if let Directive::Balance(balance) = &directives[1] {
            assert_eq!(balance.account, "Assets:Checking");
            assert_eq!(balance.amount, Amount::new(dec!(100.00), "USD"));
        } else {
            panic!("expected balance");
        }
    }

    #[test]
    fn test_bad_line_is_isolated() {
        let input = "2014-01-01 open Assets:Checking\nnot a directive\n2014-01-03 close Assets:Checking\n";
        let results: Vec<_> = DirectiveStream::new(std::iter::once(input)).collect();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        let error = results[1].as_ref().unwrap_err();
        assert_eq!(error.pos.line, 2);
        assert_eq!(error.line, "not a directive");
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_transaction_context_spans_chunks() {
        let chunks = [
            "2014-05-05 * \"Coffee\"\n",
            "  Expenses:Food 5.00 USD\n  Assets:Cash\n",
        ];
        let directives: Vec<_> = DirectiveStream::new(chunks.into_iter())
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(directives.len(), 3);
        assert!(directives[0].is_transaction());
        assert!(directives[1].as_posting().is_some());
        assert!(directives[2].as_posting().is_some());
    }

    #[test]
    fn test_early_stop_is_safe() {
        let input = "2014-01-01 open Assets:A\n2014-01-01 open Assets:B\n";
        let mut stream = DirectiveStream::new(std::iter::once(input));
        assert!(stream.next().is_some());
        // Dropping the stream with lines unconsumed is fine.
        drop(stream);
    }
}
