//! # Cart
//!
//! The storefront's shopping cart: an ordered set of line items plus two
//! derived aggregates and a panel-visibility flag.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Action              Operation               State Change            │
//! │  ─────────              ─────────               ────────────            │
//! │                                                                         │
//! │  Add to Cart ─────────► add_item() ───────────► push or quantity + 1   │
//! │                                                                         │
//! │  − / + buttons ───────► set_quantity() ───────► items[i].qty = n       │
//! │                                                 (n <= 0 removes)        │
//! │                                                                         │
//! │  ✕ button ────────────► remove_item() ────────► items.retain(..)       │
//! │                                                                         │
//! │  Clear Cart ──────────► clear() ──────────────► items.clear()          │
//! │                                                                         │
//! │  Cart icon ───────────► toggle_visibility() ──► is_open = !is_open     │
//! │                                                                         │
//! │  Every item-changing operation ends in recompute():                    │
//! │    total_item_count = Σ quantity                                       │
//! │    total_price      = Σ effective_price × quantity                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every line has `quantity >= 1`
//! - Line ids are unique
//! - Both aggregates always equal a fresh derivation from `items`

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{self, TierHint};
use crate::types::{ItemDescriptor, LineItem};
use crate::validation::validate_descriptor;
use crate::BADGE_MAX_COUNT;

// =============================================================================
// Cart
// =============================================================================

/// The cart state machine.
///
/// Fields are private: the aggregates can only change through the
/// operations below, which always re-derive them.
///
/// ## Persisted Form
/// Serializes to the blob stored under [`crate::CART_STORAGE_KEY`]:
/// ```json
/// { "items": [...], "isOpen": false, "totalItemCount": 3, "totalPrice": 7497 }
/// ```
/// Deserializing normalizes the blob, so a tampered or stale blob can never
/// break the invariants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PersistedCart")]
pub struct Cart {
    items: Vec<LineItem>,
    is_open: bool,
    total_item_count: i64,
    total_price: Money,
}

impl Cart {
    /// Creates an empty, closed cart.
    pub fn new() -> Self {
        Cart::default()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `candidate`.
    ///
    /// ## Behavior
    /// - id already in cart: `set_quantity(id, existing + 1)`
    /// - otherwise: append a new line with quantity 1
    ///
    /// The frozen unit price of an existing line is kept; the candidate's
    /// price is ignored in that case.
    pub fn add_item(&mut self, candidate: ItemDescriptor) {
        if let Some(existing) = self.item(&candidate.id).map(|item| item.quantity) {
            self.set_quantity(&candidate.id, existing.saturating_add(1));
            return;
        }

        self.items.push(LineItem::from_descriptor(candidate));
        self.recompute();
    }

    /// Validates `candidate` before adding it.
    ///
    /// ## Returns
    /// - `Ok(())` after adding, exactly like [`Cart::add_item`]
    /// - `Err(CoreError::InvalidItem)` with the cart untouched
    pub fn try_add_item(&mut self, candidate: ItemDescriptor) -> CoreResult<()> {
        validate_descriptor(&candidate).map_err(|source| CoreError::InvalidItem {
            id: candidate.id.clone(),
            source,
        })?;

        self.add_item(candidate);
        Ok(())
    }

    /// Removes the line with `id`. Absent ids are a no-op.
    pub fn remove_item(&mut self, id: &str) {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);

        if self.items.len() != before {
            self.recompute();
        }
    }

    /// Replaces the quantity of the line with `id`.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: same as [`Cart::remove_item`]
    /// - id absent: no-op
    /// - otherwise: set and re-derive the whole cart, so the line's bulk tier
    ///   and the totals move together
    pub fn set_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity;
            self.recompute();
        }
    }

    /// Empties the cart. Leaves the panel open or closed as it was.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute();
    }

    /// Opens or closes the cart panel.
    pub fn toggle_visibility(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Re-derives both aggregates from `items`.
    fn recompute(&mut self) {
        self.total_item_count = self
            .items
            .iter()
            .fold(0_i64, |count, item| count.saturating_add(item.quantity));
        self.total_price = self.items.iter().map(pricing::line_total).sum();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Per-unit price for `item` at its current quantity.
    ///
    /// Pure; takes any line item, not only ones held by this cart.
    #[inline]
    pub fn effective_price(&self, item: &LineItem) -> Money {
        pricing::effective_price(item)
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Looks up a line by id.
    pub fn item(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns true while the cart panel is shown.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Σ quantity over all lines.
    pub fn total_item_count(&self) -> i64 {
        self.total_item_count
    }

    /// Σ effective price × quantity over all lines.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Header badge text: `None` when empty, "99+" past [`BADGE_MAX_COUNT`].
    pub fn badge_label(&self) -> Option<String> {
        match self.total_item_count {
            n if n <= 0 => None,
            n if n > BADGE_MAX_COUNT => Some(format!("{}+", BADGE_MAX_COUNT)),
            n => Some(n.to_string()),
        }
    }

    /// Compact totals for badges and change notifications.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    /// Full read model for the cart panel and checkout summary.
    pub fn summary(&self) -> CartSummary {
        CartSummary::from(self)
    }
}

// =============================================================================
// Persisted Form
// =============================================================================

/// Wire shape of the persisted blob before normalization.
///
/// Aggregates in the blob are ignored and rebuilt from the items.
/// Lines with `quantity < 1` are dropped and duplicate ids are merged into
/// the first occurrence.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedCart {
    #[serde(default)]
    items: Vec<LineItem>,
    #[serde(default)]
    is_open: bool,
}

impl From<PersistedCart> for Cart {
    fn from(persisted: PersistedCart) -> Self {
        let mut items: Vec<LineItem> = Vec::with_capacity(persisted.items.len());

        for item in persisted.items.into_iter().filter(|item| item.quantity >= 1) {
            match items.iter_mut().find(|kept| kept.id == item.id) {
                Some(kept) => kept.quantity = kept.quantity.saturating_add(item.quantity),
                None => items.push(item),
            }
        }

        let mut cart = Cart {
            items,
            is_open: persisted.is_open,
            total_item_count: 0,
            total_price: Money::zero(),
        };
        cart.recompute();
        cart
    }
}

// =============================================================================
// Read Models
// =============================================================================

/// Totals summary for the header badge and change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_item_count: i64,
    pub total_price: Money,
    pub is_open: bool,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_item_count: cart.total_item_count(),
            total_price: cart.total_price(),
            is_open: cart.is_open(),
        }
    }
}

/// One row of the cart panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub image: String,
    pub category: String,
    pub quantity: i64,
    /// Catalog price frozen at insertion.
    pub unit_price: Money,
    /// Price actually charged per unit right now.
    pub effective_price: Money,
    /// True when a bulk tier changes the price ("(Bulk Price)" label).
    pub is_bulk_price: bool,
    pub line_total: Money,
    pub bulk_savings: Money,
    /// Next cheaper tier, if one is reachable.
    pub next_tier: Option<TierHint>,
}

impl From<&LineItem> for CartLine {
    fn from(item: &LineItem) -> Self {
        CartLine {
            id: item.id.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            effective_price: pricing::effective_price(item),
            is_bulk_price: pricing::is_bulk_price(item),
            line_total: pricing::line_total(item),
            bulk_savings: pricing::bulk_savings(item),
            next_tier: pricing::next_tier(item),
        }
    }
}

/// Cart panel and checkout summary.
///
/// ## Layout
/// ```text
/// Items (12)            ₹2998.80   ← subtotal at catalog prices
/// Bulk savings           -₹300.00
/// Shipping                   Free
/// ─────────────────────────────────
/// Total                 ₹2698.80   ← Cart::total_price
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total_item_count: i64,
    pub subtotal: Money,
    pub bulk_savings: Money,
    /// Shipping is always free on this storefront.
    pub shipping: Money,
    pub total: Money,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        let lines: Vec<CartLine> = cart.items().iter().map(CartLine::from).collect();
        let subtotal = cart.items().iter().map(LineItem::catalog_total).sum();
        let bulk_savings = lines.iter().map(|line| line.bulk_savings).sum();
        let shipping = Money::zero();

        CartSummary {
            lines,
            total_item_count: cart.total_item_count(),
            subtotal,
            bulk_savings,
            shipping,
            total: cart.total_price() + shipping,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
