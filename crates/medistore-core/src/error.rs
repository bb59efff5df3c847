//! # Error Types
//!
//! Domain-specific error types for medistore-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medistore-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  medistore-store errors (separate crate)                               │
//! │  └── StoreError       - Persistence failures (wraps CoreError)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → caller               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Carry the computed bound in the variant (available quantity, amounts)
//!    so callers can re-prompt without parsing message strings
//! 3. Errors are enum variants, never String
//! 4. Each variant maps to a specific, actionable user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// The closed set of failures the pharmacy core can report. Callers branch
/// on the variant, not the message text.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Sale id does not exist in the sales collection.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Medicine id does not exist in the medicines collection.
    #[error("Medicine not found: {0}")]
    MedicineNotFound(String),

    /// The sale exists but has no line for the requested medicine.
    #[error("Item {medicine_id} not found in sale {sale_id}")]
    SaleLineMissing {
        sale_id: String,
        medicine_id: String,
    },

    /// Every unit of this line has already been refunded.
    ///
    /// ## When This Occurs
    /// Replaying the refund log shows the refunded quantity already equals
    /// the quantity originally sold.
    #[error("All items have already been refunded")]
    FullyRefunded {
        sale_id: String,
        medicine_id: String,
    },

    /// The requested refund quantity exceeds what is left to refund.
    ///
    /// `available` is reported so the caller can clamp its input bounds.
    #[error("Only {available} items available for refund (requested {requested})")]
    ExceedsAvailable { requested: i64, available: i64 },

    /// A sale was submitted with no cart lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cash received is less than the sale total.
    #[error("Insufficient cash: received {received_cents} of {total_cents}")]
    InsufficientCash {
        total_cents: i64,
        received_cents: i64,
    },

    /// A medicine with the same name and company already exists.
    /// Matching is case-insensitive, mirroring how stock is entered by hand.
    #[error("Medicine '{name}' by '{company}' already exists")]
    DuplicateMedicine { name: String, company: String },

    /// A user with this email already exists.
    #[error("User with email '{email}' already exists")]
    DuplicateUser { email: String },

    /// Refusing to delete the last remaining admin user.
    #[error("Cannot delete the last admin user")]
    LastAdmin,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level input validation errors.
///
/// These occur when caller input doesn't meet requirements, before any
/// business logic runs.
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

    /// Invalid format (e.g., malformed date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_bounds() {
        let err = CoreError::ExceedsAvailable {
            requested: 4,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "Only 3 items available for refund (requested 4)"
        );

        let err = CoreError::InsufficientCash {
            total_cents: 2100,
            received_cents: 2000,
        };
        assert_eq!(err.to_string(), "Insufficient cash: received 2000 of 2100");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 999,
        };
        assert_eq!(err.to_string(), "quantity must be between 1 and 999");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
