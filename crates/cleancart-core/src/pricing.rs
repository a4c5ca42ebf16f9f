//! # Bulk Pricing
//!
//! Resolves the per-unit price a line item is charged at its current
//! quantity, and what the next discount step would be.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  effective_price(item)                                                 │
//! │                                                                         │
//! │  no bulk_pricing? ───────────────────────────► unit_price              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  quantity >= tier3.min? ──── yes ────────────► tier3.unit_price        │
//! │        │ no                                                             │
//! │  quantity >= tier2.min? ──── yes ────────────► tier2.unit_price        │
//! │        │ no                                                             │
//! │  quantity >= tier1.min? ──── yes ────────────► tier1.unit_price        │
//! │        │ no                                                             │
//! │        └─────────────────────────────────────► unit_price              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::LineItem;

/// Per-unit price that applies to `item` at its current quantity.
///
/// Pure: depends only on the item's quantity, unit price and bulk schedule.
///
/// ## Example
/// ```rust
/// use cleancart_core::{effective_price, BulkPricing, BulkTier, ItemDescriptor, LineItem, Money};
///
/// let mut item = LineItem::from_descriptor(
///     ItemDescriptor::new("A", "Mop", Money::from_cents(10_000)).with_bulk_pricing(
///         BulkPricing::new(
///             BulkTier::new(1, Money::from_cents(10_000)),
///             BulkTier::new(10, Money::from_cents(9_000)),
///             BulkTier::new(50, Money::from_cents(8_000)),
///         ),
///     ),
/// );
/// item.quantity = 50;
/// assert_eq!(effective_price(&item), Money::from_cents(8_000));
/// ```
pub fn effective_price(item: &LineItem) -> Money {
    item.bulk_pricing
        .as_ref()
        .and_then(|tiers| tiers.price_for(item.quantity))
        .unwrap_or(item.unit_price)
}

/// Line total at the effective price.
#[inline]
pub fn line_total(item: &LineItem) -> Money {
    effective_price(item).multiply_quantity(item.quantity)
}

/// Returns true if a bulk tier currently changes the item's price.
pub fn is_bulk_price(item: &LineItem) -> bool {
    effective_price(item) != item.unit_price
}

/// What bulk pricing saves on this line compared to the catalog price.
pub fn bulk_savings(item: &LineItem) -> Money {
    item.catalog_total() - line_total(item)
}

/// The next cheaper tier a line could reach by adding units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TierHint {
    /// Units to add to reach the tier.
    pub units_needed: i64,
    /// Tier threshold.
    pub min_quantity: i64,
    /// Unit price once the tier applies.
    pub unit_price: Money,
}

/// Finds the lowest tier above the current quantity that is cheaper than
/// today's effective price.
///
/// Returns `None` without bulk pricing or when the line already sits in its
/// steepest reachable tier.
pub fn next_tier(item: &LineItem) -> Option<TierHint> {
    let tiers = item.bulk_pricing.as_ref()?;
    let current = effective_price(item);

    [&tiers.tier1, &tiers.tier2, &tiers.tier3]
        .into_iter()
        .filter(|tier| tier.min_quantity > item.quantity && tier.unit_price < current)
        .min_by_key(|tier| tier.min_quantity)
        .map(|tier| TierHint {
            units_needed: tier.min_quantity - item.quantity,
            min_quantity: tier.min_quantity,
            unit_price: tier.unit_price,
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BulkPricing, BulkTier, ItemDescriptor};

    fn tiered_item(quantity: i64) -> LineItem {
        let mut item = LineItem::from_descriptor(
            ItemDescriptor::new("A", "Glass Cleaner", Money::from_cents(10_000)).with_bulk_pricing(
                BulkPricing::new(
                    BulkTier::new(1, Money::from_cents(10_000)),
                    BulkTier::new(10, Money::from_cents(9_000)),
                    BulkTier::new(50, Money::from_cents(8_000)),
                ),
            ),
        );
        item.quantity = quantity;
        item
    }

    #[test]
    fn test_effective_price_tier_boundaries() {
        assert_eq!(effective_price(&tiered_item(5)), Money::from_cents(10_000));
        assert_eq!(effective_price(&tiered_item(10)), Money::from_cents(9_000));
        assert_eq!(effective_price(&tiered_item(49)), Money::from_cents(9_000));
        assert_eq!(effective_price(&tiered_item(50)), Money::from_cents(8_000));
    }

    #[test]
    fn test_effective_price_without_tiers_is_unit_price() {
        let mut item =
            LineItem::from_descriptor(ItemDescriptor::new("B", "Sponge", Money::from_cents(120)));
        item.quantity = 500;
        assert_eq!(effective_price(&item), Money::from_cents(120));
        assert!(!is_bulk_price(&item));
    }

    #[test]
    fn test_below_every_tier_falls_back_to_unit_price() {
        let mut item = tiered_item(2);
        item.bulk_pricing = Some(BulkPricing::new(
            BulkTier::new(5, Money::from_cents(9_500)),
            BulkTier::new(10, Money::from_cents(9_000)),
            BulkTier::new(50, Money::from_cents(8_000)),
        ));
        assert_eq!(effective_price(&item), Money::from_cents(10_000));
    }

    /// Misordered tiers are not rejected; the highest-threshold-first scan
    /// still decides.
    #[test]
    fn test_misordered_tiers_follow_scan_order() {
        let mut item = tiered_item(20);
        item.bulk_pricing = Some(BulkPricing::new(
            BulkTier::new(30, Money::from_cents(7_000)),
            BulkTier::new(10, Money::from_cents(9_000)),
            BulkTier::new(5, Money::from_cents(9_500)),
        ));
        // tier3 (min 5) is checked first and matches
        assert_eq!(effective_price(&item), Money::from_cents(9_500));
    }

    #[test]
    fn test_line_total_and_savings() {
        let item = tiered_item(10);
        assert_eq!(line_total(&item), Money::from_cents(90_000));
        assert_eq!(bulk_savings(&item), Money::from_cents(10_000));
        assert!(is_bulk_price(&item));
    }

    #[test]
    fn test_next_tier_hint() {
        let hint = next_tier(&tiered_item(7)).unwrap();
        assert_eq!(hint.units_needed, 3);
        assert_eq!(hint.min_quantity, 10);
        assert_eq!(hint.unit_price, Money::from_cents(9_000));

        let hint = next_tier(&tiered_item(10)).unwrap();
        assert_eq!(hint.units_needed, 40);

        assert!(next_tier(&tiered_item(50)).is_none());
    }
}
