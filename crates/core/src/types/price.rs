//! Type-safe price representation using decimal arithmetic.
//!
//! The backend stores prices as GraphQL `Float`. They are converted to
//! [`Decimal`] once, at the edge, and rounded to the currency's minor unit so
//! that display and comparison never see binary floating point noise.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., yuan, not fen).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Convert a backend float into a price in the default currency.
    ///
    /// Returns `None` for NaN and infinities.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        Self::from_f64_in(value, CurrencyCode::default())
    }

    /// Convert a backend float into a price in the given currency.
    #[must_use]
    pub fn from_f64_in(value: f64, currency_code: CurrencyCode) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let amount = Decimal::try_from(value).ok()?.round_dp(2);
        Some(Self::new(amount, currency_code))
    }

    /// Format for display (e.g., "¥19.90").
    #[must_use]
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    CNY,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Currency symbol used when rendering prices.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::CNY => "¥",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::CNY => "CNY",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}
