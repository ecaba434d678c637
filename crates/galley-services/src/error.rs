//! # Service Error Types
//!
//! Failures of the catalog and payment collaborators.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Service Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │    Payload      │  │     Outcome             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Timeout        │  │  Decode         │  │  Failed                 │ │
//! │  │  Http           │  │                 │  │  (gateway said no)      │ │
//! │  │  Status         │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Timeout is its own variant so the UI can say "check your connection"  │
//! │  instead of a generic failure.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for collaborator calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The call did not finish within its client-side timeout.
    #[error("{operation} timed out after {secs} seconds")]
    Timeout { operation: &'static str, secs: u64 },

    /// Connection, TLS or client construction failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// The body could not be read as the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    // =========================================================================
    // Outcome Errors
    // =========================================================================
    /// The collaborator answered but refused the operation.
    #[error("{0}")]
    Failed(String),
}

impl ServiceError {
    /// Whether this failure was a client-side timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ServiceError::Timeout { .. })
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return ServiceError::Status {
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            return ServiceError::Decode(err.to_string());
        }
        ServiceError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_distinguishable() {
        let timeout = ServiceError::Timeout {
            operation: "catalog fetch",
            secs: 15,
        };
        assert!(timeout.is_timeout());
        assert_eq!(timeout.to_string(), "catalog fetch timed out after 15 seconds");

        assert!(!ServiceError::Http("refused".into()).is_timeout());
    }

    #[test]
    fn test_json_errors_are_decode_errors() {
        let err: ServiceError = serde_json::from_str::<Vec<u32>>("{").unwrap_err().into();
        assert!(matches!(err, ServiceError::Decode(_)));
    }

    #[test]
    fn test_status_message() {
        let err = ServiceError::Status { status: 503 };
        assert_eq!(err.to_string(), "HTTP error! status: 503");
    }
}
