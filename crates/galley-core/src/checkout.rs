//! # Checkout Module
//!
//! Input rules for the payment ticket: the card form and the cash amount.
//!
//! ## Field Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field            Keeps                         Complete when           │
//! │  ─────────────    ───────────────────────────   ──────────────────────  │
//! │  card number      digits, first 16              16 digits               │
//! │  expiry (MMYY)    digits, first 4, month/year   4 digits                │
//! │  cvv              digits, first 3               3 digits                │
//! │  cardholder       letters, spaces, - ' .        not blank               │
//! │  cash amount      digits, one '.', 2 decimals   ≥ total and > 0         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sanitizers run on every keystroke, so they take the raw field value and
//! return what the field should now hold. None of them fail.
//!
//! The expiry year check needs "now". The core has no clock, so callers pass
//! the current two-digit year in.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Digits in a card number.
pub const CARD_NUMBER_LEN: usize = 16;

/// Digits in an expiry date (MMYY).
pub const EXPIRY_LEN: usize = 4;

/// Digits in a CVV.
pub const CVV_LEN: usize = 3;

/// Fraction digits accepted in a cash amount.
pub const CASH_DECIMALS: usize = 2;

// =============================================================================
// Sanitizers
// =============================================================================

fn digits(value: &str, max: usize) -> String {
    value.chars().filter(char::is_ascii_digit).take(max).collect()
}

pub fn sanitize_card_number(value: &str) -> String {
    digits(value, CARD_NUMBER_LEN)
}

pub fn sanitize_cvv(value: &str) -> String {
    digits(value, CVV_LEN)
}

/// Keeps ASCII letters, whitespace, `-`, `'` and `.`.
pub fn sanitize_cardholder_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace() || matches!(c, '-' | '\'' | '.'))
        .collect()
}

/// Sanitizes an MMYY expiry entry.
///
/// ## Rules
/// - Digits only, at most four
/// - Once two digits are in, the month must be 01..=12. A bad month in
///   10..=19 keeps the leading `1` (the user may be typing 10, 11, 12);
///   any other bad month clears the field
/// - With four digits, a year before `current_year` drops the last digit
///
/// ## Example
/// ```rust
/// use galley_core::checkout::sanitize_expiry;
///
/// assert_eq!(sanitize_expiry("12/30", 26), "1230");
/// assert_eq!(sanitize_expiry("13", 26), "1");
/// assert_eq!(sanitize_expiry("00", 26), "");
/// assert_eq!(sanitize_expiry("1225", 26), "122");
/// ```
pub fn sanitize_expiry(value: &str, current_year: u32) -> String {
    let limited = digits(value, EXPIRY_LEN);

    if limited.len() >= 2 {
        let month = two_digits(&limited[..2]);
        if !(1..=12).contains(&month) {
            if (10..=19).contains(&month) {
                return limited[..1].to_string();
            }
            return String::new();
        }
    }

    if limited.len() == EXPIRY_LEN && two_digits(&limited[2..]) < current_year {
        return limited[..3].to_string();
    }

    limited
}

fn two_digits(s: &str) -> u32 {
    s.parse().unwrap_or(0)
}

/// Sanitizes a cash amount entry: digits and a single decimal point with at
/// most two digits after it. Extra points are dropped, their digits kept.
///
/// ## Example
/// ```rust
/// use galley_core::checkout::sanitize_cash_amount;
///
/// assert_eq!(sanitize_cash_amount("$20.505"), "20.50");
/// assert_eq!(sanitize_cash_amount("1.2.3"), "1.23");
/// ```
pub fn sanitize_cash_amount(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match cleaned.split_once('.') {
        None => cleaned,
        Some((whole, rest)) => {
            let fraction: String = rest
                .chars()
                .filter(|c| *c != '.')
                .take(CASH_DECIMALS)
                .collect();
            format!("{whole}.{fraction}")
        }
    }
}

/// Reads a sanitized cash amount. Anything unreadable counts as zero.
pub fn parse_cash_amount(value: &str) -> Money {
    let value = value.trim().trim_end_matches('.');
    if value.is_empty() {
        return Money::zero();
    }

    let normalized = if value.starts_with('.') {
        format!("0{value}")
    } else {
        value.to_string()
    };

    Money::from_str_exact(&normalized).unwrap_or_default()
}

/// Renders MMYY as `MM/YY` once the month is in.
pub fn format_expiry(expiry: &str) -> String {
    match expiry.char_indices().nth(2) {
        Some((split, _)) => format!("{}/{}", &expiry[..split], &expiry[split..]),
        None if expiry.chars().count() == 2 => format!("{expiry}/"),
        None => expiry.to_string(),
    }
}

// =============================================================================
// Cash
// =============================================================================

/// Change owed to the passenger. Negative when they are short.
pub fn cash_change(tendered: Money, total: Money) -> Money {
    tendered - total
}

/// Whether the cash handed over settles the ticket.
pub fn can_process_cash(tendered: Money, total: Money) -> bool {
    tendered >= total && tendered.is_positive()
}

// =============================================================================
// Card Form
// =============================================================================

/// The card details as typed so far, always sanitized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CardForm {
    card_number: String,
    /// MMYY without the slash.
    expiry_date: String,
    cvv: String,
    cardholder_name: String,
}

impl CardForm {
    pub fn new() -> Self {
        CardForm::default()
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    pub fn expiry_date(&self) -> &str {
        &self.expiry_date
    }

    pub fn cvv(&self) -> &str {
        &self.cvv
    }

    pub fn cardholder_name(&self) -> &str {
        &self.cardholder_name
    }

    pub fn set_card_number(&mut self, value: &str) {
        self.card_number = sanitize_card_number(value);
    }

    pub fn set_expiry_date(&mut self, value: &str, current_year: u32) {
        self.expiry_date = sanitize_expiry(value, current_year);
    }

    pub fn set_cvv(&mut self, value: &str) {
        self.cvv = sanitize_cvv(value);
    }

    pub fn set_cardholder_name(&mut self, value: &str) {
        self.cardholder_name = sanitize_cardholder_name(value);
    }

    pub fn formatted_expiry_date(&self) -> String {
        format_expiry(&self.expiry_date)
    }

    /// All four fields complete.
    pub fn is_valid(&self) -> bool {
        self.card_number.len() == CARD_NUMBER_LEN
            && self.expiry_date.len() == EXPIRY_LEN
            && self.cvv.len() == CVV_LEN
            && !self.cardholder_name.trim().is_empty()
    }

    pub fn clear(&mut self) {
        *self = CardForm::default();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    #[test]
    fn test_card_number_sanitizer() {
        assert_eq!(sanitize_card_number("4111 1111-1111 1111"), "4111111111111111");
        assert_eq!(sanitize_card_number("41111111111111119999"), "4111111111111111");
        assert_eq!(sanitize_card_number("abc"), "");
    }

    #[test]
    fn test_cvv_sanitizer() {
        assert_eq!(sanitize_cvv("12a34"), "123");
    }

    #[test]
    fn test_cardholder_name_sanitizer() {
        assert_eq!(sanitize_cardholder_name("Mary-Jane O'Neil Jr."), "Mary-Jane O'Neil Jr.");
        assert_eq!(sanitize_cardholder_name("R2D2"), "RD");
        assert_eq!(sanitize_cardholder_name("José"), "Jos");
    }

    #[test]
    fn test_expiry_sanitizer() {
        // Partial input passes through
        assert_eq!(sanitize_expiry("0", 26), "0");
        assert_eq!(sanitize_expiry("1", 26), "1");
        assert_eq!(sanitize_expiry("09", 26), "09");
        assert_eq!(sanitize_expiry("092", 26), "092");

        // Bad months
        assert_eq!(sanitize_expiry("13", 26), "1");
        assert_eq!(sanitize_expiry("19", 26), "1");
        assert_eq!(sanitize_expiry("00", 26), "");
        assert_eq!(sanitize_expiry("20", 26), "");

        // Years
        assert_eq!(sanitize_expiry("0926", 26), "0926");
        assert_eq!(sanitize_expiry("0925", 26), "092");
        assert_eq!(sanitize_expiry("09/31", 26), "0931");
        assert_eq!(sanitize_expiry("093199", 26), "0931");
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry(""), "");
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12"), "12/");
        assert_eq!(format_expiry("1230"), "12/30");
    }

    #[test]
    fn test_cash_sanitizer() {
        assert_eq!(sanitize_cash_amount("20"), "20");
        assert_eq!(sanitize_cash_amount("20."), "20.");
        assert_eq!(sanitize_cash_amount("20.5"), "20.5");
        assert_eq!(sanitize_cash_amount("20.555"), "20.55");
        assert_eq!(sanitize_cash_amount("2..0"), "2.0");
        assert_eq!(sanitize_cash_amount("€ 1,50"), "150");
    }

    #[test]
    fn test_parse_cash_amount() {
        assert_eq!(parse_cash_amount("20.50"), money("20.5"));
        assert_eq!(parse_cash_amount("20."), money("20"));
        assert_eq!(parse_cash_amount(".5"), money("0.5"));
        assert!(parse_cash_amount("").is_zero());
        assert!(parse_cash_amount(".").is_zero());
    }

    #[test]
    fn test_cash_rules() {
        let total = money("8.9586");

        assert!(can_process_cash(money("10"), total));
        assert!(can_process_cash(money("8.9586"), total));
        assert!(!can_process_cash(money("8.95"), total));
        assert!(!can_process_cash(Money::zero(), Money::zero()));

        assert_eq!(cash_change(money("10"), total), money("1.0414"));
        assert!(cash_change(money("5"), total).is_negative());
    }

    #[test]
    fn test_card_form() {
        let mut form = CardForm::new();
        assert!(!form.is_valid());

        form.set_card_number("4111 1111 1111 1111");
        form.set_expiry_date("12/30", 26);
        form.set_cvv("123");
        form.set_cardholder_name("  ");
        assert!(!form.is_valid());

        form.set_cardholder_name("Ada Lovelace");
        assert!(form.is_valid());
        assert_eq!(form.formatted_expiry_date(), "12/30");

        form.clear();
        assert_eq!(form, CardForm::default());
    }
}
