//! # Validation Module
//!
//! Opt-in checks for catalog descriptors.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Descriptors Are Checked                      │
//! │                                                                         │
//! │  Cart::add_item(descriptor)                                            │
//! │  └── NOT validated. Total function, never fails.                       │
//! │                                                                         │
//! │  Cart::try_add_item(descriptor)                                        │
//! │  └── validate_descriptor() ← THIS MODULE                               │
//! │      ├── Err → cart untouched, CoreError::InvalidItem                  │
//! │      └── Ok  → add_item(descriptor)                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cleancart_core::validation::validate_descriptor;
//! use cleancart_core::{ItemDescriptor, Money};
//!
//! let ok = ItemDescriptor::new("A", "Mop", Money::from_cents(2500));
//! assert!(validate_descriptor(&ok).is_ok());
//!
//! let free_negative = ItemDescriptor::new("A", "Mop", Money::from_cents(-1));
//! assert!(validate_descriptor(&free_negative).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{BulkPricing, BulkTier, ItemDescriptor};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a cart line id.
///
/// ## Rules
/// - Must not be empty or whitespace
pub fn validate_item_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }
    Ok(())
}

/// Validates a display name.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }
    Ok(())
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative
/// - Zero is allowed (free samples)
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a bulk schedule.
///
/// ## Rules
/// - Every tier minimum is positive
/// - Every tier price is non-negative
/// - `tier1.min <= tier2.min <= tier3.min`
pub fn validate_bulk_pricing(tiers: &BulkPricing) -> ValidationResult<()> {
    let named = [
        ("tier1", &tiers.tier1),
        ("tier2", &tiers.tier2),
        ("tier3", &tiers.tier3),
    ];

    for (name, tier) in named {
        validate_tier(name, tier)?;
    }

    for pair in named.windows(2) {
        let (lower, lower_tier) = pair[0];
        let (upper, upper_tier) = pair[1];
        if lower_tier.min_quantity > upper_tier.min_quantity {
            return Err(ValidationError::TierOrder {
                lower: lower.to_string(),
                lower_min: lower_tier.min_quantity,
                upper: upper.to_string(),
                upper_min: upper_tier.min_quantity,
            });
        }
    }

    Ok(())
}

fn validate_tier(name: &str, tier: &BulkTier) -> ValidationResult<()> {
    if tier.min_quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: format!("{name} minimum quantity"),
        });
    }
    validate_price(&format!("{name} unit price"), tier.unit_price)
}

/// Validates a whole descriptor.
pub fn validate_descriptor(descriptor: &ItemDescriptor) -> ValidationResult<()> {
    validate_item_id(&descriptor.id)?;
    validate_item_name(&descriptor.name)?;
    validate_price("unit price", descriptor.unit_price)?;

    if let Some(tiers) = &descriptor.bulk_pricing {
        validate_bulk_pricing(tiers)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers(mins: [i64; 3]) -> BulkPricing {
        BulkPricing::new(
            BulkTier::new(mins[0], Money::from_cents(100)),
            BulkTier::new(mins[1], Money::from_cents(90)),
            BulkTier::new(mins[2], Money::from_cents(80)),
        )
    }

    #[test]
    fn test_validate_item_id() {
        assert!(validate_item_id("combo-7").is_ok());
        assert!(validate_item_id("").is_err());
        assert!(validate_item_id("   ").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("unit price", Money::zero()).is_ok());
        assert!(validate_price("unit price", Money::from_cents(2499)).is_ok());
        assert!(validate_price("unit price", Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_bulk_pricing_order() {
        assert!(validate_bulk_pricing(&tiers([1, 10, 50])).is_ok());
        // Equal thresholds are allowed
        assert!(validate_bulk_pricing(&tiers([1, 10, 10])).is_ok());

        let err = validate_bulk_pricing(&tiers([1, 60, 50])).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TierOrder { lower_min: 60, upper_min: 50, .. }
        ));
    }

    #[test]
    fn test_validate_bulk_pricing_rejects_zero_minimum() {
        assert!(matches!(
            validate_bulk_pricing(&tiers([0, 10, 50])),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_validate_descriptor() {
        let good = ItemDescriptor::new("A", "Mop", Money::from_cents(2500))
            .with_bulk_pricing(tiers([1, 10, 50]));
        assert!(validate_descriptor(&good).is_ok());

        let nameless = ItemDescriptor::new("A", " ", Money::from_cents(2500));
        assert!(validate_descriptor(&nameless).is_err());

        let bad_tiers = good.clone().with_bulk_pricing(tiers([50, 10, 1]));
        assert!(validate_descriptor(&bad_tiers).is_err());
    }
}
