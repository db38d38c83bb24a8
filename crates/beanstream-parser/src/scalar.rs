//! Scalar token parsers for dates and numbers.
//!
//! Both functions are pure and total: they return a `Result` and never panic.

use beanstream_core::{Decimal, NaiveDate};
use std::str::FromStr;

use crate::error::{DateField, ParseErrorKind};

/// Parse a `YYYY-MM-DD` token into a date.
///
/// Each of year/month/day must parse as an integer, failing with an error
/// naming the offending field; the assembled date is then range-validated
/// (month 13 or day 32 fail). Months are 1-based as written in source text.
///
/// # Examples
///
/// ```
/// use beanstream_parser::parse_date;
/// use chrono::Datelike;
///
/// let date = parse_date("2014-07-09").unwrap();
/// assert_eq!((date.year(), date.month(), date.day()), (2014, 7, 9));
/// assert!(parse_date("2014-13-40").is_err());
/// ```
pub fn parse_date(token: &str) -> Result<NaiveDate, ParseErrorKind> {
    let mut parts = token.split('-');
    let year: i32 = date_field(parts.next(), DateField::Year)?;
    let month: u32 = date_field(parts.next(), DateField::Month)?;
    let day: u32 = date_field(parts.next(), DateField::Day)?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ParseErrorKind::InvalidDate(token.to_string()))
}

fn date_field<T: FromStr>(part: Option<&str>, field: DateField) -> Result<T, ParseErrorKind> {
    let value = part.unwrap_or_default();
    value.parse().map_err(|_| ParseErrorKind::InvalidDateField {
        field,
        value: value.to_string(),
    })
}

/// Parse a number token into a decimal.
///
/// Three case-sensitive symbolic literals are checked first (`ZERO`, `ONE`,
/// `HALF`); otherwise all `,` thousands separators are stripped and the
/// remainder is parsed as a decimal.
///
/// # Examples
///
/// ```
/// use beanstream_parser::parse_number;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_number("HALF").unwrap(), dec!(0.5));
/// assert_eq!(parse_number("1,123,123.456").unwrap(), dec!(1123123.456));
/// assert!(parse_number("Howdy!").is_err());
/// ```
pub fn parse_number(token: &str) -> Result<Decimal, ParseErrorKind> {
    match token {
        "ZERO" => Ok(Decimal::ZERO),
        "ONE" => Ok(Decimal::ONE),
        "HALF" => Ok(Decimal::new(5, 1)),
        _ => {
            let stripped: String = token.chars().filter(|&c| c != ',').collect();
            Decimal::from_str(&stripped)
                .map_err(|_| ParseErrorKind::InvalidNumber(token.to_string()))
        }
    }
}
