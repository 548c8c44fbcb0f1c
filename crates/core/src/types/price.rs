//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Prices cannot be negative.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// Currency code outside the supported set.
    #[error("unsupported currency code: {0}")]
    UnknownCurrency(String),
}

/// A non-negative amount in the currency's standard unit.
///
/// On the wire a price is a bare number (or numeric string), matching the
/// cart line format. Currency is a display concern handled by
/// [`CurrencyCode::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `count` units at this unit price, or `None` if the amount
    /// does not fit in a `Decimal`.
    #[must_use]
    pub fn line_total(&self, count: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(count)).map(Self)
    }

    /// `self + rhs`, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO 4217 currency codes the storefront can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    KRW,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Number of fractional digits shown for this currency.
    #[must_use]
    pub const fn minor_digits(self) -> u32 {
        match self {
            Self::KRW => 0,
            Self::USD | Self::EUR => 2,
        }
    }

    /// Format a price with grouped thousands.
    ///
    /// ```
    /// use tote_core::{CurrencyCode, Price};
    ///
    /// assert_eq!(CurrencyCode::KRW.format(Price::from_units(1_234_500)), "1,234,500 원");
    /// assert_eq!(CurrencyCode::USD.format(Price::from_units(19)), "$19.00");
    /// ```
    #[must_use]
    pub fn format(self, price: Price) -> String {
        let digits = self.minor_digits();
        let rounded = price.amount().round_dp(digits);
        let text = format!("{rounded:.prec$}", prec = digits as usize);
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
        let grouped = group_thousands(whole);
        let number = if fraction.is_empty() {
            grouped
        } else {
            format!("{grouped}.{fraction}")
        };

        match self {
            Self::KRW => format!("{number} 원"),
            Self::USD => format!("${number}"),
            Self::EUR => format!("€{number}"),
        }
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KRW" => Ok(Self::KRW),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            _ => Err(PriceError::UnknownCurrency(s.to_string())),
        }
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
