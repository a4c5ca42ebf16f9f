//! # Error Types
//!
//! Domain-specific error types for cleancart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cleancart-core errors (this file)                                     │
//! │  ├── CoreError        - Rejected cart operations                       │
//! │  └── ValidationError  - Malformed item descriptors                     │
//! │                                                                         │
//! │  cleancart-store errors (separate crate)                               │
//! │  └── StoreError       - Storage, config and serialization failures     │
//! │                                                                         │
//! │  The plain cart operations never fail. Only `Cart::try_add_item`       │
//! │  returns these errors, for callers that opt into validation.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the validating cart entry points.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The descriptor handed to the cart failed validation.
    #[error("Invalid item {id}: {source}")]
    InvalidItem {
        id: String,
        #[source]
        source: ValidationError,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for catalog descriptors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Bulk tiers are not in ascending order of minimum quantity.
    ///
    /// ## When This Occurs
    /// ```text
    /// tier1.min = 10, tier2.min = 5   ← tier2 would never apply
    /// ```
    #[error("{lower} minimum ({lower_min}) is above {upper} minimum ({upper_min})")]
    TierOrder {
        lower: String,
        lower_min: i64,
        upper: String,
        upper_min: i64,
    },
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
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "id".to_string(),
        };
        assert_eq!(err.to_string(), "id is required");

        let err = ValidationError::TierOrder {
            lower: "tier1".to_string(),
            lower_min: 10,
            upper: "tier2".to_string(),
            upper_min: 5,
        };
        assert_eq!(
            err.to_string(),
            "tier1 minimum (10) is above tier2 minimum (5)"
        );
    }

    #[test]
    fn test_invalid_item_message_includes_id() {
        let err = CoreError::InvalidItem {
            id: "combo-7".to_string(),
            source: ValidationError::Negative {
                field: "unit price".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Invalid item combo-7: unit price must not be negative"
        );
    }
}
