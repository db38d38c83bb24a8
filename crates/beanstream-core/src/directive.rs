//! Directive types representing every parsed ledger entry.
//!
//! The parser yields one [`Directive`] per non-blank source line:
//!
//! - [`Transaction`] - A transaction header, recording payee/narration/tags
//! - [`Posting`] - A single account leg nested inside a transaction
//! - [`Balance`] - Assert that an account has a specific balance
//! - [`Open`] / [`Close`] - Open or close an account
//! - [`Commodity`] - Declare a commodity/currency
//! - [`Pad`] - Pad an account to match a later balance assertion
//! - [`Note`] / [`Document`] - Attach free text or a file to an account
//! - [`Price`] - Record a price for a commodity
//! - [`Event`] - Record a named event value
//! - [`Plugin`] - Load a plugin module
//! - [`Custom`] - Free-form directive with typed arguments
//! - [`Opt`], [`PushTag`], [`PopTag`], [`Include`] - Undated control directives
//!
//! All values are immutable once constructed; the core holds no shared ledger
//! state.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Amount, CostSpec, PriceAnnotation};

/// A typed argument of a [`Custom`] directive.
///
/// Custom directive arguments are re-typed best-effort by the parser: a token
/// that parses as a date becomes [`CustomValue::Date`], then a number, and
/// anything else stays a (quote-stripped) string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomValue {
    /// Date argument
    Date(NaiveDate),
    /// Numeric argument
    Number(Decimal),
    /// String argument
    String(String),
}

impl fmt::Display for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{date}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::String(s) => write!(f, "\"{s}\""),
        }
    }
}

/// All directive shapes a ledger line can parse into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directive {
    /// Open account directive
    Open(Open),
    /// Close account directive
    Close(Close),
    /// Commodity declaration
    Commodity(Commodity),
    /// Balance assertion
    Balance(Balance),
    /// Pad directive
    Pad(Pad),
    /// Note attached to an account
    Note(Note),
    /// Document attached to an account
    Document(Document),
    /// Price point for a commodity
    Price(Price),
    /// Named event value
    Event(Event),
    /// Plugin declaration
    Plugin(Plugin),
    /// Custom directive with typed arguments
    Custom(Custom),
    /// Transaction header
    Transaction(Transaction),
    /// Posting line inside a transaction
    Posting(Posting),
    /// `option` control directive
    Opt(Opt),
    /// `pushtag` control directive
    PushTag(PushTag),
    /// `poptag` control directive
    PopTag(PopTag),
    /// `include` control directive
    Include(Include),
}

impl Directive {
    /// Get the date of this directive, if it carries one.
    ///
    /// Control directives, plugins, and postings are undated.
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Open(d) => Some(d.date),
            Self::Close(d) => Some(d.date),
            Self::Commodity(d) => Some(d.date),
            Self::Balance(d) => Some(d.date),
            Self::Pad(d) => Some(d.date),
            Self::Note(d) => Some(d.date),
            Self::Document(d) => Some(d.date),
            Self::Price(d) => Some(d.date),
            Self::Event(d) => Some(d.date),
            Self::Custom(d) => Some(d.date),
            Self::Transaction(d) => Some(d.date),
            Self::Plugin(_)
            | Self::Posting(_)
            | Self::Opt(_)
            | Self::PushTag(_)
            | Self::PopTag(_)
            | Self::Include(_) => None,
        }
    }

    /// Check if this is a transaction header.
    #[must_use]
    pub const fn is_transaction(&self) -> bool {
        matches!(self, Self::Transaction(_))
    }

    /// Get as a posting, if this is one.
    #[must_use]
    pub const fn as_posting(&self) -> Option<&Posting> {
        match self {
            Self::Posting(p) => Some(p),
            _ => None,
        }
    }

    /// Get the directive type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Open(_) => "open",
            Self::Close(_) => "close",
            Self::Commodity(_) => "commodity",
            Self::Balance(_) => "balance",
            Self::Pad(_) => "pad",
            Self::Note(_) => "note",
            Self::Document(_) => "document",
            Self::Price(_) => "price",
            Self::Event(_) => "event",
            Self::Plugin(_) => "plugin",
            Self::Custom(_) => "custom",
            Self::Transaction(_) => "transaction",
            Self::Posting(_) => "posting",
            Self::Opt(_) => "option",
            Self::PushTag(_) => "pushtag",
            Self::PopTag(_) => "poptag",
            Self::Include(_) => "include",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(d) => write!(f, "{d}"),
            Self::Close(d) => write!(f, "{d}"),
            Self::Commodity(d) => write!(f, "{d}"),
            Self::Balance(d) => write!(f, "{d}"),
            Self::Pad(d) => write!(f, "{d}"),
            Self::Note(d) => write!(f, "{d}"),
            Self::Document(d) => write!(f, "{d}"),
            Self::Price(d) => write!(f, "{d}"),
            Self::Event(d) => write!(f, "{d}"),
            Self::Plugin(d) => write!(f, "{d}"),
            Self::Custom(d) => write!(f, "{d}"),
            Self::Transaction(d) => write!(f, "{d}"),
            Self::Posting(d) => write!(f, "{d}"),
            Self::Opt(d) => write!(f, "{d}"),
            Self::PushTag(d) => write!(f, "{d}"),
            Self::PopTag(d) => write!(f, "{d}"),
            Self::Include(d) => write!(f, "{d}"),
        }
    }
}

/// An open account directive.
///
/// `YYYY-MM-DD open Assets:Checking [USD]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Open {
    /// Date the account was opened
    pub date: NaiveDate,
    /// Account name (e.g., "Assets:Bank:Checking")
    pub account: String,
    /// Optional constraining currency
    pub currency: Option<String>,
}

impl Open {
    /// Create a new open directive.
    #[must_use]
    pub fn new(date: NaiveDate, account: impl Into<String>) -> Self {
        Self {
            date,
            account: account.into(),
            currency: None,
        }
    }

    /// Set the constraining currency.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

impl fmt::Display for Open {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} open {}", self.date, self.account)?;
        if let Some(currency) = &self.currency {
            write!(f, " {currency}")?;
        }
        Ok(())
    }
}

/// A close account directive.
///
/// `YYYY-MM-DD close Assets:Checking`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Close {
    /// Date the account was closed
    pub date: NaiveDate,
    /// Account name
    pub account: String,
}

impl Close {
    /// Create a new close directive.
    #[must_use]
    pub fn new(date: NaiveDate, account: impl Into<String>) -> Self {
        Self {
            date,
            account: account.into(),
        }
    }
}

impl fmt::Display for Close {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} close {}", self.date, self.account)
    }
}

/// A commodity declaration.
///
/// `YYYY-MM-DD commodity USD`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commodity {
    /// Declaration date
    pub date: NaiveDate,
    /// Currency/commodity code
    pub currency: String,
}

impl Commodity {
    /// Create a new commodity declaration.
    #[must_use]
    pub fn new(date: NaiveDate, currency: impl Into<String>) -> Self {
        Self {
            date,
            currency: currency.into(),
        }
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} commodity {}", self.date, self.currency)
    }
}

/// A balance assertion.
///
/// `YYYY-MM-DD balance Assets:Checking 100.00 USD`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Assertion date
    pub date: NaiveDate,
    /// Account to check
    pub account: String,
    /// Expected amount
    pub amount: Amount,
}

impl Balance {
    /// Create a new balance assertion.
    #[must_use]
    pub fn new(date: NaiveDate, account: impl Into<String>, amount: Amount) -> Self {
        Self {
            date,
            account: account.into(),
            amount,
        }
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} balance {} {}", self.date, self.account, self.amount)
    }
}

/// A pad directive.
///
/// `YYYY-MM-DD pad Assets:Checking Equity:Opening-Balances`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pad {
    /// Pad date
    pub date: NaiveDate,
    /// Account to pad
    pub account: String,
    /// Source account for the padding
    pub source_account: String,
}

impl Pad {
    /// Create a new pad directive.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        account: impl Into<String>,
        source_account: impl Into<String>,
    ) -> Self {
        Self {
            date,
            account: account.into(),
            source_account: source_account.into(),
        }
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pad {} {}",
            self.date, self.account, self.source_account
        )
    }
}

/// A note directive.
///
/// `YYYY-MM-DD note Assets:Checking "Called about the fees"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Note date
    pub date: NaiveDate,
    /// Account
    pub account: String,
    /// Note text
    pub comment: String,
}

impl Note {
    /// Create a new note directive.
    #[must_use]
    pub fn new(date: NaiveDate, account: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            date,
            account: account.into(),
            comment: comment.into(),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} note {} \"{}\"", self.date, self.account, self.comment)
    }
}

/// A document directive.
///
/// `YYYY-MM-DD document Assets:Checking "statement.pdf"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document date
    pub date: NaiveDate,
    /// Account
    pub account: String,
    /// Path to the document file
    pub path: String,
}

impl Document {
    /// Create a new document directive.
    #[must_use]
    pub fn new(date: NaiveDate, account: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            date,
            account: account.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} document {} \"{}\"", self.date, self.account, self.path)
    }
}

/// A price directive.
///
/// `YYYY-MM-DD price USD 1.08 CAD`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Price date
    pub date: NaiveDate,
    /// Commodity being priced
    pub currency: String,
    /// Price amount (in another currency)
    pub amount: Amount,
}

impl Price {
    /// Create a new price directive.
    #[must_use]
    pub fn new(date: NaiveDate, currency: impl Into<String>, amount: Amount) -> Self {
        Self {
            date,
            currency: currency.into(),
            amount,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} price {} {}", self.date, self.currency, self.amount)
    }
}

/// An event directive.
///
/// `YYYY-MM-DD event "location" "Paris, France"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event date
    pub date: NaiveDate,
    /// Event name
    pub name: String,
    /// Event value
    pub value: String,
}

impl Event {
    /// Create a new event directive.
    #[must_use]
    pub fn new(date: NaiveDate, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} event \"{}\" \"{}\"", self.date, self.name, self.value)
    }
}

/// A plugin declaration.
///
/// `plugin "beancount.plugins.module_name" "configuration data"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Plugin module name
    pub name: String,
    /// Optional configuration string
    pub config: Option<String>,
}

impl Plugin {
    /// Create a new plugin declaration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: None,
        }
    }

    /// Set the configuration string.
    #[must_use]
    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config = Some(config.into());
        self
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plugin \"{}\"", self.name)?;
        if let Some(config) = &self.config {
            write!(f, " \"{config}\"")?;
        }
        Ok(())
    }
}

/// A custom directive.
///
/// `YYYY-MM-DD custom "budget" "..." 45.30 USD`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Custom {
    /// Custom directive date
    pub date: NaiveDate,
    /// Custom type name (e.g., "budget")
    pub name: String,
    /// Typed arguments
    pub args: Vec<CustomValue>,
}

impl Custom {
    /// Create a new custom directive.
    #[must_use]
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument.
    #[must_use]
    pub fn with_arg(mut self, arg: CustomValue) -> Self {
        self.args.push(arg);
        self
    }
}

impl fmt::Display for Custom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} custom \"{}\"", self.date, self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// A transaction header.
///
/// `YYYY-MM-DD * "Payee" "Narration" #tag ^link`
///
/// Posting lines follow on subsequent lines and are yielded as separate
/// [`Posting`] values; the header itself carries no posting list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction date
    pub date: NaiveDate,
    /// Transaction flag (`*` cleared, `!` pending)
    pub flag: char,
    /// Payee, when two quoted strings are present
    pub payee: Option<String>,
    /// Narration (description)
    pub narration: String,
    /// Tags in order of appearance, duplicates skipped
    pub tags: Vec<String>,
    /// Links in order of appearance, duplicates skipped
    pub links: Vec<String>,
}

impl Transaction {
    /// Create a new transaction header.
    #[must_use]
    pub fn new(date: NaiveDate, narration: impl Into<String>) -> Self {
        Self {
            date,
            flag: '*',
            payee: None,
            narration: narration.into(),
            tags: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Set the flag.
    #[must_use]
    pub const fn with_flag(mut self, flag: char) -> Self {
        self.flag = flag;
        self
    }

    /// Set the payee.
    #[must_use]
    pub fn with_payee(mut self, payee: impl Into<String>) -> Self {
        self.payee = Some(payee.into());
        self
    }

    /// Add a tag, preserving order and skipping duplicates.
    pub fn push_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Add a link, preserving order and skipping duplicates.
    pub fn push_link(&mut self, link: impl Into<String>) {
        let link = link.into();
        if !self.links.contains(&link) {
            self.links.push(link);
        }
    }

    /// Check if this transaction is marked as cleared (`*`).
    #[must_use]
    pub const fn is_cleared(&self) -> bool {
        self.flag == '*'
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.date, self.flag)?;
        if let Some(payee) = &self.payee {
            write!(f, "\"{payee}\" ")?;
        }
        write!(f, "\"{}\"", self.narration)?;
        for tag in &self.tags {
            write!(f, " #{tag}")?;
        }
        for link in &self.links {
            write!(f, " ^{link}")?;
        }
        Ok(())
    }
}

/// A posting line inside a transaction.
///
/// `[!] Assets:Checking [-400.00 USD] [{...}] [@ 1.09 CAD | @@ 436.01 CAD]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Optional `!` flag on the posting itself
    pub flag: Option<char>,
    /// The account for this posting
    pub account: String,
    /// The posted amount, absent for auto-balanced postings
    pub amount: Option<Amount>,
    /// Cost specification from a `{...}` block
    pub cost: Option<CostSpec>,
    /// Price annotation (`@` or `@@`)
    pub price: Option<PriceAnnotation>,
}

impl Posting {
    /// Create a posting with the given account and amount.
    #[must_use]
    pub fn new(account: impl Into<String>, amount: Amount) -> Self {
        Self {
            flag: None,
            account: account.into(),
            amount: Some(amount),
            cost: None,
            price: None,
        }
    }

    /// Create a posting without an amount (to be auto-balanced downstream).
    #[must_use]
    pub fn auto(account: impl Into<String>) -> Self {
        Self {
            flag: None,
            account: account.into(),
            amount: None,
            cost: None,
            price: None,
        }
    }

    /// Add a flag.
    #[must_use]
    pub const fn with_flag(mut self, flag: char) -> Self {
        self.flag = Some(flag);
        self
    }

    /// Add a cost specification.
    #[must_use]
    pub fn with_cost(mut self, cost: CostSpec) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Add a price annotation.
    #[must_use]
    pub fn with_price(mut self, price: PriceAnnotation) -> Self {
        self.price = Some(price);
        self
    }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        if let Some(flag) = self.flag {
            write!(f, "{flag} ")?;
        }
        write!(f, "{}", self.account)?;
        if let Some(amount) = &self.amount {
            write!(f, "  {amount}")?;
        }
        if let Some(cost) = &self.cost {
            write!(f, " {cost}")?;
        }
        if let Some(price) = &self.price {
            write!(f, " {price}")?;
        }
        Ok(())
    }
}

/// An `option` control directive.
///
/// `option "title" "Example Ledger"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opt {
    /// Option key
    pub key: String,
    /// Option value
    pub value: String,
}

impl Opt {
    /// Create a new option directive.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Opt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "option \"{}\" \"{}\"", self.key, self.value)
    }
}

/// A `pushtag` control directive.
///
/// `pushtag #berlin-trip-2014`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushTag {
    /// Tag name, without the `#`
    pub tag: String,
}

impl PushTag {
    /// Create a new pushtag directive.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl fmt::Display for PushTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pushtag #{}", self.tag)
    }
}

/// A `poptag` control directive.
///
/// `poptag #berlin-trip-2014`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopTag {
    /// Tag name, without the `#`
    pub tag: String,
}

impl PopTag {
    /// Create a new poptag directive.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl fmt::Display for PopTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "poptag #{}", self.tag)
    }
}

/// An `include` control directive.
///
/// `include "path/to/file.beancount"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Include {
    /// Path to the included file
    pub path: String,
}

impl Include {
    /// Create a new include directive.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "include \"{}\"", self.path)
    }
}
