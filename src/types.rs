//! Core types and data structures for the match engine

use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// Monetary amount held as integer minor units (cents for most currencies).
///
/// All engine arithmetic happens on the integer value. Conversion from a
/// decimal happens once, at ingestion, through [`Money::from_decimal`] or
/// [`Money::parse`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero minor units
    pub const ZERO: Money = Money(0);

    /// Create an amount directly from minor units
    pub const fn from_minor(minor_units: i64) -> Self {
        Money(minor_units)
    }

    /// The amount in minor units
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Convert a decimal amount to minor units, rounding half-up to the
    /// nearest minor unit.
    pub fn from_decimal(amount: &BigDecimal, minor_unit_digits: u32) -> MatchResult<Self> {
        let factor = minor_unit_factor(minor_unit_digits)?;
        let rounded = amount.with_scale_round(i64::from(minor_unit_digits), RoundingMode::HalfUp);
        (rounded * BigDecimal::from(factor))
            .to_i64()
            .map(Money)
            .ok_or_else(|| {
                MatchError::InvalidAmount(format!("{} does not fit in minor units", amount))
            })
    }

    /// Parse a decimal string such as `"618.50"` into minor units
    pub fn parse(input: &str, minor_unit_digits: u32) -> MatchResult<Self> {
        let decimal = BigDecimal::from_str(input.trim())
            .map_err(|e| MatchError::InvalidAmount(format!("'{}': {}", input, e)))?;
        Self::from_decimal(&decimal, minor_unit_digits)
    }

    /// Convert back to a decimal value for display or export
    pub fn to_decimal(&self, minor_unit_digits: u32) -> MatchResult<BigDecimal> {
        let factor = minor_unit_factor(minor_unit_digits)?;
        Ok(BigDecimal::from(self.0) / BigDecimal::from(factor))
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }
}

fn minor_unit_factor(minor_unit_digits: u32) -> MatchResult<i64> {
    10i64.checked_pow(minor_unit_digits).ok_or_else(|| {
        MatchError::InvalidAmount(format!(
            "unsupported number of minor unit digits: {}",
            minor_unit_digits
        ))
    })
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

/// Raw minor units; currency presentation belongs to `CurrencyFormatter`
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Candidate accounting record (invoice or bill) offered for matching
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    id: String,
    counterparty: String,
    date: String,
    amount: Money,
    doc_type: String,
}

impl Record {
    /// Create a new record
    pub fn new(
        id: impl Into<String>,
        counterparty: impl Into<String>,
        date: impl Into<String>,
        amount: Money,
        doc_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            counterparty: counterparty.into(),
            date: date.into(),
            amount,
            doc_type: doc_type.into(),
        }
    }

    /// Unique identifier; the engine keys everything by it
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Who the record was paid to or received from
    pub fn counterparty(&self) -> &str {
        &self.counterparty
    }

    /// Transaction date as supplied by the data source
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    /// Document type, e.g. "Sales Invoice"
    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }
}

/// Sum the amounts of a set of records
pub fn total_of<'a, I>(records: I) -> Money
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().map(Record::amount).sum()
}

/// Errors that can occur while matching or selecting records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum MatchError {
    #[error("Invalid target: {0} (must be greater than zero)")]
    InvalidTarget(Money),
    #[error("Insufficient remaining total for record '{record_id}': remaining {remaining}, amount {amount}")]
    InsufficientBudget {
        record_id: String,
        remaining: Money,
        amount: Money,
    },
    #[error("No exact or subset match found for {target}")]
    NoMatchFound { target: Money },
    #[error("Search bound exceeded for {strategy}: {detail}")]
    SearchBoundExceeded { strategy: String, detail: String },
    #[error("Record not found among candidates: {0}")]
    UnknownRecord(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Record source error: {0}")]
    Source(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MatchError {
    /// Message suitable for showing to the person doing the reconciliation
    pub fn user_message(&self) -> String {
        match self {
            MatchError::InvalidTarget(_) => "Initial total cannot be negative or zero".to_string(),
            MatchError::InsufficientBudget { .. } => {
                "Insufficient remaining total.\nPlease unselect other items first.".to_string()
            }
            MatchError::NoMatchFound { .. } => "No matching item or subset found".to_string(),
            MatchError::SearchBoundExceeded { .. } => {
                "Too many items to search for a match.\nPlease select items manually.".to_string()
            }
            MatchError::Source(reason) => format!("Failed to load accounting records: {}", reason),
            other => other.to_string(),
        }
    }
}

/// Result type for match engine operations
pub type MatchResult<T> = Result<T, MatchError>;
