//! Cost-lot and price annotation types attached to postings.
//!
//! A [`CostSpec`] records the acquisition cost written inside `{...}` braces on
//! a posting, with an optional [`Lot`] qualifier used for lot matching on
//! disposal. A [`PriceAnnotation`] records the `@` (per-unit) or `@@` (total)
//! conversion rate on a posting.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Amount;

/// A lot qualifier disambiguating which cost lot a posting refers to.
///
/// Written after the cost amount inside braces:
///
/// - `{183.07 USD, "ref-001"}` - a free-text lot label
/// - `{2014-02-11}` - an acquisition date
/// - `{}` - any lot, no further qualifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lot {
    /// Explicit lot label
    Label(String),
    /// Acquisition date of the lot
    Date(NaiveDate),
    /// Any lot; written as empty braces
    Any,
}

impl fmt::Display for Lot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => write!(f, "\"{label}\""),
            Self::Date(date) => write!(f, "{date}"),
            Self::Any => Ok(()),
        }
    }
}

/// A cost specification from a posting's `{...}` block.
///
/// All fields are optional: `{}` carries only the any-lot marker, `{2014-02-11}`
/// carries only a lot date, and `{183.07 USD}` carries only the per-unit cost.
///
/// # Examples
///
/// ```
/// use beanstream_core::{CostSpec, Lot};
/// use rust_decimal_macros::dec;
///
/// let spec = CostSpec::new(dec!(183.07), "USD").with_lot(Lot::Label("ref-001".into()));
/// assert_eq!(spec.number, Some(dec!(183.07)));
/// assert_eq!(format!("{spec}"), "{183.07 USD, \"ref-001\"}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostSpec {
    /// Cost per unit (if specified)
    pub number: Option<Decimal>,
    /// Currency of the cost (if specified)
    pub currency: Option<String>,
    /// Lot qualifier (if specified)
    pub lot: Option<Lot>,
}

impl CostSpec {
    /// Create a cost spec with a per-unit cost amount.
    #[must_use]
    pub fn new(number: Decimal, currency: impl Into<String>) -> Self {
        Self {
            number: Some(number),
            currency: Some(currency.into()),
            lot: None,
        }
    }

    /// Create an empty cost spec matching any lot, as written `{}`.
    #[must_use]
    pub const fn any_lot() -> Self {
        Self {
            number: None,
            currency: None,
            lot: Some(Lot::Any),
        }
    }

    /// Add a lot qualifier.
    #[must_use]
    pub fn with_lot(mut self, lot: Lot) -> Self {
        self.lot = Some(lot);
        self
    }

    /// Get the cost as an amount, if both number and currency are present.
    #[must_use]
    pub fn as_amount(&self) -> Option<Amount> {
        match (self.number, &self.currency) {
            (Some(number), Some(currency)) => Some(Amount::new(number, currency.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for CostSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        if let (Some(number), Some(currency)) = (self.number, &self.currency) {
            write!(f, "{number} {currency}")?;
            if let Some(lot) = &self.lot {
                if !matches!(lot, Lot::Any) {
                    write!(f, ", {lot}")?;
                }
            }
        } else if let Some(lot) = &self.lot {
            write!(f, "{lot}")?;
        }
        write!(f, "}}")
    }
}

/// Price annotation for a posting (`@` or `@@`).
///
/// Both conventions normalize to an amount plus the per-unit/total distinction,
/// which downstream consumers need to compute total cost.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceAnnotation {
    /// Per-unit price, written `@`
    Unit(Amount),
    /// Total price, written `@@`
    Total(Amount),
}

impl PriceAnnotation {
    /// Get the annotated amount.
    #[must_use]
    pub const fn amount(&self) -> &Amount {
        match self {
            Self::Unit(amount) | Self::Total(amount) => amount,
        }
    }

    /// Check if this is a per-unit price (`@` vs `@@`).
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self, Self::Unit(_))
    }
}

impl fmt::Display for PriceAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit(amount) => write!(f, "@ {amount}"),
            Self::Total(amount) => write!(f, "@@ {amount}"),
        }
    }
}
