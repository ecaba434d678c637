//! # App Error Type
//!
//! Unified error type for storefront session actions.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Galley POS                             │
//! │                                                                         │
//! │  Session action                                                         │
//! │  Result<T, AppError>                                                    │
//! │         │                                                               │
//! │         ├── CoreError::InventoryExceeded ──► INSUFFICIENT_STOCK         │
//! │         ├── ValidationError ───────────────► VALIDATION_ERROR           │
//! │         ├── ServiceError::Timeout ─────────► TIMEOUT                    │
//! │         ├── ServiceError (other) ──────────► SERVICE_UNAVAILABLE        │
//! │         └── ConfigError ───────────────────► CONFIG_ERROR               │
//! │                                                                         │
//! │  The session also keeps a user-facing `error` string of its own          │
//! │  ("Failed to load products", ...). AppError carries the detail.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use galley_core::{CoreError, ValidationError};
use galley_services::ServiceError;
use serde::Serialize;
use std::fmt;
use ts_rs::TS;

use crate::config::ConfigError;

/// Result type for session actions.
pub type AppResult<T> = Result<T, AppError>;

/// Error returned from session actions.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient inventory for 2: available 10, requested 11"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for session actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Cart operation failed
    CartError,

    /// Insufficient inventory
    InsufficientStock,

    /// Catalog or gateway did not answer in time
    Timeout,

    /// Catalog or gateway failed
    ServiceUnavailable,

    /// Payment was refused
    PaymentError,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error
    Internal,
}

impl AppError {
    /// Creates a new app error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::CartError, message)
    }

    /// Creates a payment error.
    pub fn payment(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::PaymentError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

/// Converts core errors to app errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InventoryExceeded { .. } => {
                AppError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::UnknownCartEntry(id) => {
                AppError::new(ErrorCode::NotFound, format!("Product {id} not in cart"))
            }
            CoreError::Validation(e) => e.into(),
            CoreError::Serialization(e) => {
                tracing::error!("Cart serialization failed: {}", e);
                AppError::new(ErrorCode::Internal, "Cart data could not be read")
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// Converts collaborator errors to app errors.
impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Timeout { .. } => AppError::new(
                ErrorCode::Timeout,
                "Request timeout - please check your connection",
            ),
            ServiceError::Failed(message) => AppError::payment(message),
            other => {
                tracing::error!("Service call failed: {}", other);
                AppError::new(ErrorCode::ServiceUnavailable, other.to_string())
            }
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_error_maps_to_insufficient_stock() {
        let err: AppError = CoreError::InventoryExceeded {
            product_id: "2".into(),
            available: 10,
            requested: 11,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn test_timeout_is_its_own_code() {
        let err: AppError = ServiceError::Timeout {
            operation: "catalog fetch",
            secs: 15,
        }
        .into();
        assert_eq!(err.code, ErrorCode::Timeout);
        assert_eq!(err.message, "Request timeout - please check your connection");
    }

    #[test]
    fn test_serialized_shape() {
        let err = AppError::cart("No products in cart");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "CART_ERROR");
        assert_eq!(json["message"], "No products in cart");
    }
}
