//! Directive classifier and decoder.
//!
//! Given one [`TokenLine`], the decoder inspects the first token: a
//! digit-leading token is a date and selects a dated directive, a bare keyword
//! selects a control directive, and anything else inside an open transaction is
//! a posting line. The decoder is a pure function of (context, token line); the
//! open-transaction flag is threaded functionally from one line to the next
//! rather than held in hidden state.

use beanstream_core::{
    Amount, Balance, Close, Commodity, CostSpec, Custom, CustomValue, Directive, Document, Event,
    Include, Lot, NaiveDate, Note, Open, Opt, Pad, Plugin, PopTag, Posting, Price, PriceAnnotation,
    PushTag, Transaction,
};

use crate::error::{ParseError, ParseErrorKind};
use crate::scalar::{parse_date, parse_number};
use crate::tokenizer::TokenLine;

/// Parser context threaded between line decodes.
///
/// Whether a bare-account line is a posting depends on whether the most recent
/// directive was a transaction header (or another posting of the same
/// transaction).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseContext {
    in_transaction: bool,
}

impl ParseContext {
    /// Create a fresh context with no open transaction.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            in_transaction: false,
        }
    }

    /// Whether a transaction is currently open.
    #[must_use]
    pub const fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    const fn open_transaction() -> Self {
        Self {
            in_transaction: true,
        }
    }
}

/// Decode one token line into a directive.
///
/// Returns the context for the next line along with the decode result. A
/// failed line closes any open transaction: a malformed header must not cause
/// the postings below it to be attached to nothing.
pub fn parse_line(
    ctx: ParseContext,
    line: &TokenLine,
) -> (ParseContext, Result<Directive, ParseError>) {
    match decode(ctx, &line.tokens) {
        Ok((next, directive)) => (next, Ok(directive)),
        Err(kind) => (
            ParseContext::new(),
            Err(ParseError::new(kind, line.pos, line.joined())),
        ),
    }
}

fn decode(
    ctx: ParseContext,
    tokens: &[String],
) -> Result<(ParseContext, Directive), ParseErrorKind> {
    let first = req(tokens, 0, "directive")?;

    if first.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return decode_dated(first, tokens);
    }

    let directive = match first {
        "option" => Directive::Opt(Opt::new(
            strip_quotes(req(tokens, 1, "option key")?),
            strip_quotes(req(tokens, 2, "option value")?),
        )),
        "pushtag" => Directive::PushTag(PushTag::new(bare_tag(req(tokens, 1, "tag")?))),
        "poptag" => Directive::PopTag(PopTag::new(bare_tag(req(tokens, 1, "tag")?))),
        "include" => Directive::Include(Include::new(strip_quotes(req(tokens, 1, "path")?))),
        "plugin" => Directive::Plugin(decode_plugin(tokens, 1)?),
        _ if ctx.in_transaction() => {
            return Ok((
                ParseContext::open_transaction(),
                Directive::Posting(decode_posting(tokens)?),
            ));
        }
        other => return Err(ParseErrorKind::UnknownDirective(other.to_string())),
    };
    Ok((ParseContext::new(), directive))
}

fn decode_dated(
    first: &str,
    tokens: &[String],
) -> Result<(ParseContext, Directive), ParseErrorKind> {
    // A date-leading line that fails date parsing is fatal for this line.
    let date = parse_date(first)?;
    let keyword = req(tokens, 1, "directive keyword")?;

    let directive = match keyword {
        "open" => {
            let account = req(tokens, 2, "account")?;
            let mut open = Open::new(date, account);
            // Tolerate the optional '|' separator between account and currency.
            let index = if tokens.get(3).map(String::as_str) == Some("|") {
                4
            } else {
                3
            };
            if let Some(currency) = tokens.get(index) {
                open = open.with_currency(currency.clone());
            }
            Directive::Open(open)
        }
        "close" => Directive::Close(Close::new(date, req(tokens, 2, "account")?)),
        "commodity" => Directive::Commodity(Commodity::new(date, req(tokens, 2, "currency")?)),
        "balance" => {
            let account = req(tokens, 2, "account")?;
            let number = parse_number(req(tokens, 3, "amount")?)?;
            let currency = req(tokens, 4, "currency")?;
            Directive::Balance(Balance::new(date, account, Amount::new(number, currency)))
        }
        "pad" => Directive::Pad(Pad::new(
            date,
            req(tokens, 2, "account")?,
            req(tokens, 3, "target account")?,
        )),
        "note" => {
            let account = req(tokens, 2, "account")?;
            req(tokens, 3, "comment")?;
            let comment = tokens[3..].join(" ");
            Directive::Note(Note::new(date, account, strip_quotes(&comment)))
        }
        "document" => Directive::Document(Document::new(
            date,
            req(tokens, 2, "account")?,
            strip_quotes(req(tokens, 3, "path")?),
        )),
        "price" => {
            let commodity = req(tokens, 2, "commodity")?;
            let number = parse_number(req(tokens, 3, "amount")?)?;
            let currency = req(tokens, 4, "currency")?;
            Directive::Price(Price::new(date, commodity, Amount::new(number, currency)))
        }
        "event" => Directive::Event(Event::new(
            date,
            strip_quotes(req(tokens, 2, "event name")?),
            strip_quotes(req(tokens, 3, "event value")?),
        )),
        "plugin" => Directive::Plugin(decode_plugin(tokens, 2)?),
        "custom" => {
            let mut custom = Custom::new(date, strip_quotes(req(tokens, 2, "custom name")?));
            for token in &tokens[3..] {
                custom = custom.with_arg(custom_value(token));
            }
            Directive::Custom(custom)
        }
        "*" | "!" => {
            let flag = if keyword == "*" { '*' } else { '!' };
            let txn = decode_transaction(date, flag, &tokens[2..]);
            return Ok((
                ParseContext::open_transaction(),
                Directive::Transaction(txn),
            ));
        }
        other => return Err(ParseErrorKind::UnknownDirective(other.to_string())),
    };
    Ok((ParseContext::new(), directive))
}

fn decode_transaction(date: NaiveDate, flag: char, rest: &[String]) -> Transaction {
    let mut txn = Transaction::new(date, "").with_flag(flag);
    let mut strings: Vec<String> = Vec::new();
    for token in rest {
        if let Some(tag) = token.strip_prefix('#') {
            txn.push_tag(tag);
        } else if let Some(link) = token.strip_prefix('^') {
            txn.push_link(link);
        } else if token.starts_with('"') && strings.len() < 2 {
            strings.push(strip_quotes(token).to_string());
        }
        // Anything else on the header line is ignored.
    }
    let mut strings = strings.into_iter();
    match (strings.next(), strings.next()) {
        (Some(payee), Some(narration)) => {
            txn.narration = narration;
            txn.with_payee(payee)
        }
        (Some(narration), None) => {
            txn.narration = narration;
            txn
        }
        _ => txn,
    }
}

fn decode_plugin(tokens: &[String], base: usize) -> Result<Plugin, ParseErrorKind> {
    let mut plugin = Plugin::new(strip_quotes(req(tokens, base, "plugin name")?));
    if let Some(config) = tokens.get(base + 1) {
        plugin = plugin.with_config(strip_quotes(config));
    }
    Ok(plugin)
}

fn decode_posting(tokens: &[String]) -> Result<Posting, ParseErrorKind> {
    let mut index = 0;
    let flag = if tokens.first().map(String::as_str) == Some("!") {
        index = 1;
        Some('!')
    } else {
        None
    };

    let mut posting = Posting::auto(req(tokens, index, "account")?);
    posting.flag = flag;
    index += 1;

    // Optional amount + currency pair.
    if let Some(token) = tokens.get(index) {
        if !token.starts_with('{') && token != "@" && token != "@@" {
            let number = parse_number(token)?;
            let currency = req(tokens, index + 1, "currency")?;
            posting.amount = Some(Amount::new(number, currency));
            index += 2;
        }
    }

    // Optional cost block. Braces arrive glued to adjacent tokens
    // ("{183.07", "USD}"), so gather up to the closing brace and re-join.
    if tokens
        .get(index)
        .is_some_and(|token| token.starts_with('{'))
    {
        let close = tokens
            .iter()
            .enumerate()
            .skip(index)
            .find(|(_, token)| token.ends_with('}'))
            .map(|(i, _)| i)
            .ok_or_else(|| {
                ParseErrorKind::MalformedCost(format!("unclosed '{}'", tokens[index..].join(" ")))
            })?;
        posting.cost = Some(decode_cost(&tokens[index..=close].join(" "))?);
        index = close + 1;
    }

    // Optional price annotation.
    if let Some(token) = tokens.get(index) {
        if token == "@" || token == "@@" {
            let number_token = tokens
                .get(index + 1)
                .ok_or_else(|| ParseErrorKind::MalformedPrice(format!("missing amount after '{token}'")))?;
            let number = parse_number(number_token)
                .map_err(|_| ParseErrorKind::MalformedPrice(format!("'{number_token}' is not a number")))?;
            let currency = tokens.get(index + 2).ok_or_else(|| {
                ParseErrorKind::MalformedPrice(format!("missing currency after '{token}'"))
            })?;
            let amount = Amount::new(number, currency.clone());
            posting.price = Some(if token == "@" {
                PriceAnnotation::Unit(amount)
            } else {
                PriceAnnotation::Total(amount)
            });
        }
    }

    Ok(posting)
}

/// Decode the text between (and including) cost braces.
///
/// Accepted shapes: `{}`, `{183.07 USD}`, `{183.07 USD, "ref-001"}`,
/// `{183.07 USD, 2014-02-11}`, `{2014-02-11}`, `{"ref-001"}`.
fn decode_cost(text: &str) -> Result<CostSpec, ParseErrorKind> {
    let interior = text
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .ok_or_else(|| ParseErrorKind::MalformedCost(text.to_string()))?
        .trim();

    if interior.is_empty() {
        return Ok(CostSpec::any_lot());
    }

    let (amount_part, lot_part) = match find_unquoted_comma(interior) {
        Some(comma) => (interior[..comma].trim(), Some(interior[comma + 1..].trim())),
        None => (interior, None),
    };

    let amount_tokens: Vec<&str> = amount_part.split_whitespace().collect();
    let mut spec = match amount_tokens.as_slice() {
        [] => CostSpec::default(),
        [single] if lot_part.is_none() => {
            // A lone token is a lot qualifier, not a cost amount.
            return Ok(CostSpec::default().with_lot(decode_lot(single)?));
        }
        [number, currency] => {
            let number = parse_number(number)
                .map_err(|_| ParseErrorKind::MalformedCost(format!("'{number}' is not a number")))?;
            CostSpec::new(number, (*currency).to_string())
        }
        _ => return Err(ParseErrorKind::MalformedCost(text.to_string())),
    };

    if let Some(lot) = lot_part {
        if lot.is_empty() {
            return Err(ParseErrorKind::MalformedCost(
                "empty lot qualifier after ','".to_string(),
            ));
        }
        spec = spec.with_lot(decode_lot(lot)?);
    }
    Ok(spec)
}

// The amount/lot separator; a comma inside a quoted lot label does not count.
fn find_unquoted_comma(text: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (index, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return Some(index),
            _ => {}
        }
    }
    None
}

fn decode_lot(token: &str) -> Result<Lot, ParseErrorKind> {
    if token.starts_with('"') {
        return Ok(Lot::Label(strip_quotes(token).to_string()));
    }
    parse_date(token)
        .map(Lot::Date)
        .map_err(|_| ParseErrorKind::MalformedCost(format!("'{token}' is not a lot qualifier")))
}

fn custom_value(token: &str) -> CustomValue {
    if let Ok(date) = parse_date(token) {
        return CustomValue::Date(date);
    }
    if let Ok(number) = parse_number(token) {
        return CustomValue::Number(number);
    }
    CustomValue::String(strip_quotes(token).to_string())
}

fn req<'a>(
    tokens: &'a [String],
    index: usize,
    field: &'static str,
) -> Result<&'a str, ParseErrorKind> {
    tokens
        .get(index)
        .map(String::as_str)
        .ok_or(ParseErrorKind::MissingField(field))
}

/// Strip one pair of surrounding double quotes, if present.
fn strip_quotes(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token)
}

fn bare_tag(token: &str) -> &str {
    token.strip_prefix('#').unwrap_or(token)
}
