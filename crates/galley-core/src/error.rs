//! # Error Types
//!
//! Domain-specific error types for galley-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  galley-core errors (this file)                                        │
//! │  ├── CoreError        - Cart and hand-off failures                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  galley-services errors (separate crate)                               │
//! │  └── ServiceError     - Catalog / payment collaborator failures        │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  └── AppError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Note on the Cart API
//! The everyday cart operations (`add_item`, `remove_item`, ...) report
//! failure as `false`, the way the product grid expects. The `try_*`
//! variants return these typed errors for callers that want to say *why*.
//!
//! Converting to an unknown currency has no error variant: `Currency` is a
//! closed enum, so the case cannot be expressed.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A cart mutation would exceed the product's inventory.
    ///
    /// ## User Workflow
    /// ```text
    /// Tap "+" on Water (inventory: 3, in cart: 3)
    ///      │
    ///      ▼
    /// InventoryExceeded { product_id: "7", available: 3, requested: 4 }
    ///      │
    ///      ▼
    /// UI shows: "Cannot add more items than available in inventory"
    /// ```
    #[error("Insufficient inventory for {product_id}: available {available}, requested {requested}")]
    InventoryExceeded {
        product_id: String,
        available: u32,
        requested: u32,
    },

    /// Removal or update referenced a product that is not in the cart.
    #[error("Product {0} not in cart")]
    UnknownCartEntry(String),

    /// Cart JSON could not be produced or read back.
    #[error("Cart serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when data crossing a boundary (catalog records,
/// cart snapshots, user input) doesn't meet requirements.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., a seat like "Z9").
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., the same product twice in a snapshot).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
