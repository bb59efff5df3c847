//! # Store Error Types
//!
//! Error types for record store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the collection key as context         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller branches on CoreError variants for business failures and       │
//! │  treats Io/Corrupt as storage faults                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use medistore_core::CoreError;
use thiserror::Error;

/// Record store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a collection payload failed.
    ///
    /// ## When This Occurs
    /// - Data directory missing or unwritable
    /// - Disk full
    #[error("I/O failure on collection '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A stored collection payload could not be parsed.
    ///
    /// ## When This Occurs
    /// - Payload edited by hand
    /// - Incompatible schema from a different version
    #[error("Corrupt payload in collection '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A collection payload could not be serialized before writing.
    #[error("Failed to encode collection '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Business rule violation from the core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates an Io error tagged with the collection key.
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Io {
            key: key.into(),
            source,
        }
    }
}

impl From<medistore_core::ValidationError> for StoreError {
    fn from(err: medistore_core::ValidationError) -> Self {
        StoreError::Core(CoreError::Validation(err))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_carries_key() {
        let err = StoreError::io(
            "sales",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("'sales'"));
    }

    #[test]
    fn test_core_error_passes_through() {
        let err: StoreError = CoreError::EmptyCart.into();
        assert_eq!(err.to_string(), "Cart is empty");
        assert!(matches!(err, StoreError::Core(CoreError::EmptyCart)));
    }
}
