//! # cleancart-core: Pure Cart Logic for the Storefront
//!
//! This crate is the state machine behind the storefront's shopping cart.
//! It aggregates line items, tracks quantities and derives a tiered
//! bulk-pricing total. It performs no I/O: persistence lives in
//! `cleancart-store`, which wraps [`Cart`] without changing its semantics.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Cart Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront UI                                │   │
//! │  │   Product card ──► Header badge ──► Cart panel ──► Checkout     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              cleancart-store (PersistentCart)                   │   │
//! │  │        load once at startup, save after every mutation          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ cleancart-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │ LineItem  │  │   Money   │  │   Cart    │  │descriptor │  │   │
//! │  │   │ BulkTier  │  │           │  │  pricing  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line items, bulk tiers, catalog descriptors
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Effective (bulk-adjusted) price and tier hints
//! - [`cart`] - The cart state machine and its UI read models
//! - [`error`] - Domain error types
//! - [`validation`] - Opt-in descriptor validation
//!
//! ## Example Usage
//!
//! ```rust
//! use cleancart_core::{BulkPricing, BulkTier, Cart, ItemDescriptor, Money};
//!
//! let mut cart = Cart::new();
//! let mop = ItemDescriptor::new("A", "Floor Mop", Money::from_cents(2500))
//!     .with_bulk_pricing(BulkPricing::new(
//!         BulkTier::new(1, Money::from_cents(2500)),
//!         BulkTier::new(10, Money::from_cents(2250)),
//!         BulkTier::new(50, Money::from_cents(2000)),
//!     ));
//!
//! cart.add_item(mop);
//! cart.set_quantity("A", 10);
//!
//! assert_eq!(cart.total_item_count(), 10);
//! assert_eq!(cart.total_price().cents(), 22_500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CartSummary, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{effective_price, next_tier, TierHint};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key the persisted cart blob lives under.
///
/// Scoped to the storefront so that other apps sharing the same browser
/// storage (or the same SQLite file) never read it by accident.
pub const CART_STORAGE_KEY: &str = "smart-cleaners-cart";

/// Prefix that turns a combo id into a cart line id.
///
/// Combos and products come from different collections and may share a raw
/// id; the prefix keeps them apart inside the cart.
pub const COMBO_ID_PREFIX: &str = "combo-";

/// Category label shown for combo lines.
pub const COMBO_CATEGORY: &str = "Combo Pack";

/// Largest count the header badge prints before switching to "99+".
pub const BADGE_MAX_COUNT: i64 = 99;
