//! Core types for beanstream
//!
//! This crate provides the directive model produced by the beanstream parser:
//!
//! - [`Amount`] - A decimal number with a currency
//! - [`CostSpec`] / [`Lot`] - Cost-lot specification attached to a posting
//! - [`PriceAnnotation`] - Per-unit (`@`) or total (`@@`) price on a posting
//! - [`Directive`] - All directive types (Transaction, Balance, Open, etc.)
//!
//! The model is purely data: every value is immutable once constructed, and no
//! cross-directive state (account registries, running balances) lives here.
//!
//! # Example
//!
//! ```
//! use beanstream_core::{Amount, Balance, Directive};
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let date = NaiveDate::from_ymd_opt(2014, 1, 2).unwrap();
//! let balance = Balance::new(date, "Assets:Checking", Amount::new(dec!(100.00), "USD"));
//! let directive = Directive::Balance(balance);
//!
//! assert_eq!(directive.date(), Some(date));
//! assert_eq!(directive.type_name(), "balance");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod cost;
pub mod directive;

pub use amount::Amount;
pub use cost::{CostSpec, Lot, PriceAnnotation};
pub use directive::{
    Balance, Close, Commodity, Custom, CustomValue, Directive, Document, Event, Include, Note,
    Open, Opt, Pad, Plugin, PopTag, Posting, Price, PushTag, Transaction,
};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
