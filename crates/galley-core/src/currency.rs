//! # Currency Module
//!
//! The three currencies the trolley accepts, the static exchange-rate table,
//! and display formatting.
//!
//! ## Exchange-Rate Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Multiply an amount in FROM by rate to get TO            │
//! │                                                                         │
//! │            to EUR     to USD     to GBP                                 │
//! │  EUR        1          1.08       0.86                                  │
//! │  USD        0.93       1          0.80                                  │
//! │  GBP        1.16       1.25       1                                     │
//! │                                                                         │
//! │  NOT reciprocal: 10 EUR → 10.80 USD → 10.044 EUR                        │
//! │  These are the fixture rates the fleet was configured with; they are   │
//! │  reproduced exactly, not "corrected".                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Currency
// =============================================================================

/// A currency the storefront can price and take payment in.
///
/// Being a closed enum, every `(from, to)` pair has a rate; there is no
/// "unknown currency" failure path to handle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    /// Catalog prices arrive in dollars, so this is the session default.
    #[default]
    Usd,
    Gbp,
}

impl Currency {
    /// Every supported currency, in dropdown order.
    pub const ALL: [Currency; 3] = [Currency::Eur, Currency::Usd, Currency::Gbp];

    /// ISO 4217 code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
        }
    }

    /// Symbol appended to formatted amounts.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
        }
    }

    /// Multiplier that turns an amount in `self` into an amount in `to`.
    pub fn rate_to(&self, to: Currency) -> Decimal {
        use Currency::*;

        match (*self, to) {
            (Eur, Eur) | (Usd, Usd) | (Gbp, Gbp) => Decimal::ONE,
            (Eur, Usd) => Decimal::new(108, 2),
            (Eur, Gbp) => Decimal::new(86, 2),
            (Usd, Eur) => Decimal::new(93, 2),
            (Usd, Gbp) => Decimal::new(80, 2),
            (Gbp, Eur) => Decimal::new(116, 2),
            (Gbp, Usd) => Decimal::new(125, 2),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            "GBP" => Ok(Currency::Gbp),
            _ => Err(ValidationError::NotAllowed {
                field: "currency".to_string(),
                allowed: Currency::ALL.iter().map(|c| c.code().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Conversion & Formatting
// =============================================================================

/// Converts `amount` from one currency to another using the static table.
///
/// Same-currency conversion returns the amount untouched. Otherwise the
/// result is exactly `amount × rate`, with no rounding.
///
/// ## Example
/// ```rust
/// use galley_core::{convert, Currency, Money};
///
/// let eur = Money::from_minor(553);
/// let usd = convert(eur, Currency::Eur, Currency::Usd);
/// assert_eq!(usd, Money::from_str_exact("5.9724").unwrap());
/// ```
pub fn convert(amount: Money, from: Currency, to: Currency) -> Money {
    if from == to {
        return amount;
    }
    amount.scale(from.rate_to(to))
}

/// Formats an amount for the customer: two decimals, a space, the symbol.
///
/// ## Example
/// ```rust
/// use galley_core::{format_currency, Currency, Money};
///
/// assert_eq!(format_currency(Money::from_minor(553), Currency::Eur), "5.53 €");
/// assert_eq!(format_currency(Money::from_minor(0), Currency::Gbp), "0.00 £");
/// ```
pub fn format_currency(amount: Money, currency: Currency) -> String {
    format!("{} {}", amount.to_fixed(), currency.symbol())
}

/// Converts and formats `amount` into every currency other than `base`.
///
/// Always returns exactly two entries. Callers that want "nothing to show"
/// for an empty cart check `amount > 0` themselves before calling.
///
/// ## User Workflow
/// ```text
/// Grid footer, USD selected, total 10.00 $
///      │
///      ▼
/// alternative_currencies(10.00, USD)
///      │
///      ▼
/// { EUR: "9.30 €", GBP: "8.00 £" }  → shown under the total
/// ```
pub fn alternative_currencies(amount: Money, base: Currency) -> BTreeMap<Currency, String> {
    Currency::ALL
        .into_iter()
        .filter(|currency| *currency != base)
        .map(|currency| {
            let converted = convert(amount, base, currency);
            (currency, format_currency(converted, currency))
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
