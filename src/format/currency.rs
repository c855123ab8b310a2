//! Display formatting for monetary amounts
//!
//! Pure presentation: nothing here feeds back into matching.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::config::CurrencySettings;
use crate::types::*;

/// Where the currency symbol goes relative to the number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolPosition {
    /// `$1,000.50`
    Prefix,
    /// `1.000,50 €`
    Suffix,
}

/// Currency formatter with per-currency display conventions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormatter {
    code: String,
    symbol: String,
    symbol_position: SymbolPosition,
    decimal_separator: char,
    grouping_separator: char,
    minor_unit_digits: u32,
}

impl CurrencyFormatter {
    /// Create a formatter for a three letter ISO 4217 code
    ///
    /// Unlike [`CurrencyFormatter::for_currency`] this rejects anything that
    /// is not three ASCII letters.
    pub fn new(code: &str) -> MatchResult<Self> {
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(MatchError::Config(format!(
                "currency code '{}' is not a three letter ISO code",
                code
            )));
        }
        Ok(Self::for_currency(trimmed))
    }

    /// Create a formatter using the conventions for an ISO 4217 code
    ///
    /// Unknown codes render with the code itself as a prefix and two decimals.
    pub fn for_currency(code: &str) -> Self {
        let code = code.trim().to_uppercase();
        let (symbol, position, decimal, grouping, digits) = match code.as_str() {
            "USD" => ("$", SymbolPosition::Prefix, '.', ',', 2),
            "AUD" => ("A$", SymbolPosition::Prefix, '.', ',', 2),
            "NZD" => ("NZ$", SymbolPosition::Prefix, '.', ',', 2),
            "GBP" => ("£", SymbolPosition::Prefix, '.', ',', 2),
            "INR" => ("₹", SymbolPosition::Prefix, '.', ',', 2),
            "EUR" => ("€", SymbolPosition::Suffix, ',', '.', 2),
            "JPY" => ("¥", SymbolPosition::Prefix, '.', ',', 0),
            _ => ("", SymbolPosition::Prefix, '.', ',', 2),
        };
        let symbol = if symbol.is_empty() {
            format!("{} ", code)
        } else {
            symbol.to_string()
        };

        Self {
            code,
            symbol,
            symbol_position: position,
            decimal_separator: decimal,
            grouping_separator: grouping,
            minor_unit_digits: digits,
        }
    }

    /// Create a formatter matching the engine's currency settings
    pub fn from_settings(settings: &CurrencySettings) -> Self {
        Self {
            minor_unit_digits: settings.minor_unit_digits,
            ..Self::for_currency(&settings.code)
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// The currency symbol, e.g. `$`
    pub fn symbol(&self) -> &str {
        self.symbol.trim_end()
    }

    pub fn minor_unit_digits(&self) -> u32 {
        self.minor_unit_digits
    }

    /// Format with the currency's own number of decimals
    pub fn format(&self, amount: Money) -> String {
        self.format_with_digits(amount, self.minor_unit_digits, self.minor_unit_digits)
    }

    /// Format showing between `min_fraction_digits` and `max_fraction_digits`
    /// decimals, rounding half-up when fewer decimals than the minor unit are
    /// requested
    pub fn format_with_digits(
        &self,
        amount: Money,
        min_fraction_digits: u32,
        max_fraction_digits: u32,
    ) -> String {
        let max_fraction_digits = max_fraction_digits.max(min_fraction_digits);
        let mut units = i128::from(amount.minor_units()).abs();
        let mut scale = self.minor_unit_digits;

        if max_fraction_digits < scale {
            let divisor = 10i128.pow(scale - max_fraction_digits);
            let (quotient, remainder) = (units / divisor, units % divisor);
            units = if remainder * 2 >= divisor {
                quotient + 1
            } else {
                quotient
            };
            scale = max_fraction_digits;
        }

        while scale > min_fraction_digits && units % 10 == 0 {
            units /= 10;
            scale -= 1;
        }

        let factor = 10i128.pow(scale);
        let mut fraction = if scale > 0 {
            format!("{:0width$}", units % factor, width = scale as usize)
        } else {
            String::new()
        };
        for _ in scale..min_fraction_digits {
            fraction.push('0');
        }

        let mut body = group_digits(&(units / factor).to_string(), self.grouping_separator);
        if !fraction.is_empty() {
            body.push(self.decimal_separator);
            body.push_str(&fraction);
        }

        let rendered = match self.symbol_position {
            SymbolPosition::Prefix => format!("{}{}", self.symbol, body),
            SymbolPosition::Suffix => format!("{} {}", body, self.symbol),
        };

        if amount.is_negative() && units != 0 {
            format!("-{}", rendered)
        } else {
            rendered
        }
    }

    /// Format an arbitrary decimal, e.g. a statement line amount before
    /// ingestion
    pub fn format_decimal(&self, amount: &BigDecimal) -> MatchResult<String> {
        Ok(self.format(Money::from_decimal(amount, self.minor_unit_digits)?))
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::for_currency("USD")
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}
