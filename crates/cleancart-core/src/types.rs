//! # Domain Types
//!
//! Types shared between the cart, the catalog surfaces that feed it, and the
//! persisted cart blob.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │ CatalogProduct  │   │     Combo       │   (catalog documents)        │
//! │  └────────┬────────┘   └────────┬────────┘                             │
//! │           │ from_product        │ from_combo ("combo-" prefix)          │
//! │           ▼                     ▼                                       │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            ItemDescriptor               │   (no quantity)            │
//! │  │  id, name, unit_price, image, category  │                           │
//! │  │  bulk_pricing?                          │                           │
//! │  └────────────────────┬────────────────────┘                           │
//! │                       │ Cart::add_item                                  │
//! │                       ▼                                                 │
//! │  ┌─────────────────────────────────────────┐   ┌─────────────────┐     │
//! │  │               LineItem                  │──►│   BulkPricing   │     │
//! │  │  descriptor fields + quantity ≥ 1       │   │  tier1..tier3   │     │
//! │  └─────────────────────────────────────────┘   └─────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A line item freezes the catalog price it was added with. Later catalog
//! changes never reprice an item already in the cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::{COMBO_CATEGORY, COMBO_ID_PREFIX};

// =============================================================================
// Bulk Pricing
// =============================================================================

/// One bulk tier: a minimum quantity and the unit price it unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BulkTier {
    /// Smallest line quantity this tier applies to.
    pub min_quantity: i64,

    /// Per-unit price once the tier applies.
    pub unit_price: Money,
}

impl BulkTier {
    /// Creates a tier.
    #[inline]
    pub const fn new(min_quantity: i64, unit_price: Money) -> Self {
        BulkTier {
            min_quantity,
            unit_price,
        }
    }
}

/// Three-tier bulk price schedule.
///
/// ## Typical Schedule
/// ```text
/// tier1:  1+ units  ₹24.99   (usually the catalog price)
/// tier2: 10+ units  ₹22.49
/// tier3: 50+ units  ₹19.99
/// ```
///
/// Tiers are expected to be ordered by `min_quantity`. That is the catalog's
/// responsibility; see [`crate::validation::validate_bulk_pricing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BulkPricing {
    pub tier1: BulkTier,
    pub tier2: BulkTier,
    pub tier3: BulkTier,
}

impl BulkPricing {
    /// Creates a schedule from three tiers, lowest threshold first.
    pub const fn new(tier1: BulkTier, tier2: BulkTier, tier3: BulkTier) -> Self {
        BulkPricing {
            tier1,
            tier2,
            tier3,
        }
    }

    /// Tiers from the highest threshold to the lowest.
    ///
    /// This is the order prices are resolved in, so a quantity that clears
    /// several thresholds always gets the steepest discount.
    pub fn tiers_descending(&self) -> [&BulkTier; 3] {
        [&self.tier3, &self.tier2, &self.tier1]
    }

    /// Returns the tier price for `quantity`, or `None` when no tier applies.
    ///
    /// ## Example
    /// ```rust
    /// use cleancart_core::{BulkPricing, BulkTier, Money};
    ///
    /// let tiers = BulkPricing::new(
    ///     BulkTier::new(1, Money::from_cents(10_000)),
    ///     BulkTier::new(10, Money::from_cents(9_000)),
    ///     BulkTier::new(50, Money::from_cents(8_000)),
    /// );
    /// assert_eq!(tiers.price_for(49), Some(Money::from_cents(9_000)));
    /// assert_eq!(tiers.price_for(0), None);
    /// ```
    pub fn price_for(&self, quantity: i64) -> Option<Money> {
        self.tiers_descending()
            .into_iter()
            .find(|tier| quantity >= tier.min_quantity)
            .map(|tier| tier.unit_price)
    }

    /// Per-unit saving of tier 2 against `unit_price`.
    ///
    /// Drives the "Save ₹X on 10+ units" hint on product cards.
    pub fn tier2_savings(&self, unit_price: Money) -> Money {
        unit_price - self.tier2.unit_price
    }
}

// =============================================================================
// Item Descriptor
// =============================================================================

/// What a catalog surface hands to [`crate::Cart::add_item`].
///
/// Carries no quantity: adding always means "one more".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemDescriptor {
    /// Cart line id. Combos carry the `combo-` prefix.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Catalog (non-bulk) unit price.
    pub unit_price: Money,

    /// Image URL, may be empty.
    #[serde(default)]
    pub image: String,

    /// Category label or id.
    #[serde(default)]
    pub category: String,

    /// Optional bulk schedule.
    #[serde(default)]
    pub bulk_pricing: Option<BulkPricing>,
}

impl ItemDescriptor {
    /// Creates a descriptor with empty display metadata and no bulk pricing.
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: Money) -> Self {
        ItemDescriptor {
            id: id.into(),
            name: name.into(),
            unit_price,
            image: String::new(),
            category: String::new(),
            bulk_pricing: None,
        }
    }

    /// Sets the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Attaches a bulk schedule.
    pub fn with_bulk_pricing(mut self, bulk_pricing: BulkPricing) -> Self {
        self.bulk_pricing = Some(bulk_pricing);
        self
    }

    /// Builds the descriptor a product card adds to the cart.
    ///
    /// ## Mapping
    /// ```text
    /// id          ← product.id
    /// unit_price  ← product.sale_price, else product.price
    /// image       ← product.images[0], else ""
    /// category    ← product.category_id
    /// bulk        ← product.bulk_pricing
    /// ```
    pub fn from_product(product: &CatalogProduct) -> Self {
        ItemDescriptor {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.selling_price(),
            image: product.images.first().cloned().unwrap_or_default(),
            category: product.category_id.clone(),
            bulk_pricing: product.bulk_pricing,
        }
    }

    /// Builds the descriptor a combo card adds to the cart.
    ///
    /// The id is prefixed with `combo-` and the category is fixed to
    /// "Combo Pack". Combos never carry bulk pricing.
    pub fn from_combo(combo: &Combo) -> Self {
        ItemDescriptor {
            id: combo.cart_id(),
            name: combo.name.clone(),
            unit_price: combo.combo_price,
            image: combo.image_url.clone(),
            category: COMBO_CATEGORY.to_string(),
            bulk_pricing: None,
        }
    }

    /// Returns true if this descriptor was built from a combo.
    pub fn is_combo(&self) -> bool {
        self.id.starts_with(COMBO_ID_PREFIX)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One distinct catalog entry held in the cart.
///
/// ## Invariant
/// `quantity >= 1` while the item is in a [`crate::Cart`]. Dropping to zero
/// removes the line; it is never kept at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    /// Catalog price frozen at insertion time.
    pub unit_price: Money,
    pub quantity: i64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub bulk_pricing: Option<BulkPricing>,
}

impl LineItem {
    /// Creates a line with quantity 1 from a descriptor.
    pub fn from_descriptor(descriptor: ItemDescriptor) -> Self {
        LineItem {
            id: descriptor.id,
            name: descriptor.name,
            unit_price: descriptor.unit_price,
            quantity: 1,
            image: descriptor.image,
            category: descriptor.category,
            bulk_pricing: descriptor.bulk_pricing,
        }
    }

    /// Line total at the catalog price, ignoring bulk tiers.
    #[inline]
    pub fn catalog_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Catalog Documents
// =============================================================================

/// A product document as the catalog surfaces receive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    /// List price.
    pub price: Money,
    /// Promotional price; wins over `price` when present.
    #[serde(default)]
    pub sale_price: Option<Money>,
    #[serde(default)]
    pub images: Vec<String>,
    pub category_id: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub bulk_pricing: Option<BulkPricing>,
}

impl CatalogProduct {
    /// Price a customer pays per unit before bulk tiers.
    pub fn selling_price(&self) -> Money {
        self.sale_price.unwrap_or(self.price)
    }

    /// Amount saved by the promotional price, zero when there is none.
    pub fn sale_savings(&self) -> Money {
        self.sale_price
            .map(|sale| self.price - sale)
            .unwrap_or_default()
    }

    /// Returns true if the product can be added ("Add to Cart" vs "Notify Me").
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A combo deal document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Combo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    /// Price of the whole pack.
    pub combo_price: Money,
    /// Sum of the member products at list price.
    pub original_price: Money,
    /// `original_price - combo_price`, as published by the catalog.
    pub savings: Money,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// End of the offer; `None` means open-ended.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub valid_until: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Combo {
    /// Cart line id for this combo.
    pub fn cart_id(&self) -> String {
        format!("{}{}", COMBO_ID_PREFIX, self.id)
    }

    /// Returns true if the offer has not expired at `now`.
    ///
    /// The end instant itself is still valid.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.valid_until {
            Some(until) => now <= until,
            None => true,
        }
    }

    /// Discount badge value, e.g. 33 for "33% OFF".
    pub fn discount_percent(&self) -> i64 {
        self.savings.percentage_of(self.original_price)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn floor_cleaner_tiers() -> BulkPricing {
        BulkPricing::new(
            BulkTier::new(1, Money::from_cents(2499)),
            BulkTier::new(10, Money::from_cents(2249)),
            BulkTier::new(50, Money::from_cents(1999)),
        )
    }

    fn test_product() -> CatalogProduct {
        CatalogProduct {
            id: "p-42".to_string(),
            name: "Floor Cleaner 5L".to_string(),
            price: Money::from_cents(2999),
            sale_price: Some(Money::from_cents(2499)),
            images: vec!["front.jpg".to_string(), "back.jpg".to_string()],
            category_id: "floor-care".to_string(),
            stock: 12,
            bulk_pricing: Some(floor_cleaner_tiers()),
        }
    }

    fn test_combo() -> Combo {
        Combo {
            id: "7".to_string(),
            name: "Kitchen Starter Pack".to_string(),
            image_url: "combo.jpg".to_string(),
            combo_price: Money::from_cents(30_000),
            original_price: Money::from_cents(45_000),
            savings: Money::from_cents(15_000),
            is_active: true,
            valid_until: None,
        }
    }

    #[test]
    fn test_price_for_picks_highest_satisfied_tier() {
        let tiers = floor_cleaner_tiers();
        assert_eq!(tiers.price_for(1), Some(Money::from_cents(2499)));
        assert_eq!(tiers.price_for(10), Some(Money::from_cents(2249)));
        assert_eq!(tiers.price_for(500), Some(Money::from_cents(1999)));
        assert_eq!(tiers.price_for(0), None);
    }

    #[test]
    fn test_tier2_savings() {
        let tiers = floor_cleaner_tiers();
        assert_eq!(
            tiers.tier2_savings(Money::from_cents(2499)),
            Money::from_cents(250)
        );
    }

    #[test]
    fn test_descriptor_from_product_prefers_sale_price() {
        let descriptor = ItemDescriptor::from_product(&test_product());
        assert_eq!(descriptor.id, "p-42");
        assert_eq!(descriptor.unit_price, Money::from_cents(2499));
        assert_eq!(descriptor.image, "front.jpg");
        assert_eq!(descriptor.category, "floor-care");
        assert!(descriptor.bulk_pricing.is_some());
        assert!(!descriptor.is_combo());
    }

    #[test]
    fn test_descriptor_from_product_without_sale_or_images() {
        let mut product = test_product();
        product.sale_price = None;
        product.images.clear();

        let descriptor = ItemDescriptor::from_product(&product);
        assert_eq!(descriptor.unit_price, Money::from_cents(2999));
        assert_eq!(descriptor.image, "");
        assert!(product.sale_savings().is_zero());
    }

    #[test]
    fn test_descriptor_from_combo() {
        let descriptor = ItemDescriptor::from_combo(&test_combo());
        assert_eq!(descriptor.id, "combo-7");
        assert_eq!(descriptor.category, "Combo Pack");
        assert_eq!(descriptor.unit_price, Money::from_cents(30_000));
        assert!(descriptor.bulk_pricing.is_none());
        assert!(descriptor.is_combo());
    }

    #[test]
    fn test_combo_validity_window() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut combo = test_combo();
        assert!(combo.is_valid_at(now));

        combo.valid_until = Some(now);
        assert!(combo.is_valid_at(now));
        assert!(!combo.is_valid_at(now + Duration::seconds(1)));
    }

    #[test]
    fn test_combo_discount_percent() {
        assert_eq!(test_combo().discount_percent(), 33);
    }

    #[test]
    fn test_line_item_serializes_camel_case() {
        let line = LineItem::from_descriptor(ItemDescriptor::from_product(&test_product()));
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["unitPrice"], 2499);
        assert_eq!(json["quantity"], 1);
        assert_eq!(json["bulkPricing"]["tier2"]["minQuantity"], 10);
    }

    #[test]
    fn test_line_item_tolerates_missing_optional_fields() {
        let json = r#"{"id":"x","name":"Sponge","unitPrice":120,"quantity":3}"#;
        let line: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(line.quantity, 3);
        assert!(line.bulk_pricing.is_none());
        assert_eq!(line.catalog_total(), Money::from_cents(360));
    }
}
