//! # Validation Module
//!
//! Input validation utilities for Galley POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Boundaries                              │
//! │                                                                         │
//! │  Catalog fetch ──► Product::validate   (id, name, price)               │
//! │                                                                         │
//! │  Grid ──► Payment ──► CartSnapshot::validate                           │
//! │                       (quantities, ids, no duplicate lines)            │
//! │                                                                         │
//! │  Payment form ──► validate_seat_number                                 │
//! │                                                                         │
//! │  Once data is past a boundary, the pricing code trusts it.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use galley_core::validation::{validate_quantity, validate_seat_number};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_seat_number("C4").is_ok());
//! assert!(validate_seat_number("Z9").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{SEATS_PER_ROW, SEAT_ROWS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog product id.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: 64,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Example
/// ```rust
/// use galley_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Orange Juice 330ml").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a seat label: a row letter followed by a seat number.
///
/// ## Rules
/// - Row is one of [`SEAT_ROWS`] (case-insensitive)
/// - Seat is 1..=[`SEATS_PER_ROW`]
pub fn validate_seat_number(seat: &str) -> ValidationResult<()> {
    let seat = seat.trim();
    let mut chars = seat.chars();

    let row = chars.next().ok_or_else(|| ValidationError::Required {
        field: "seat".to_string(),
    })?;

    if !SEAT_ROWS.contains(&row.to_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "seat".to_string(),
            reason: format!("unknown row '{row}'"),
        });
    }

    let number: u32 = chars
        .as_str()
        .parse()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "seat".to_string(),
            reason: "expected a row letter followed by a seat number".to_string(),
        })?;

    if !(1..=SEATS_PER_ROW).contains(&number) {
        return Err(ValidationError::OutOfRange {
            field: "seat".to_string(),
            min: 1,
            max: SEATS_PER_ROW as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// Only zero is rejected; the upper bound is the product's inventory, which
/// the cart checks.
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (complimentary items)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
