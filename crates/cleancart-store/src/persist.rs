//! # Persistent Cart
//!
//! Wraps a [`Cart`] so it survives restarts, without changing how it behaves.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    PersistentCart Lifecycle                             │
//! │                                                                         │
//! │  PersistentCart::open(storage, options).await                          │
//! │       │                                                                 │
//! │       ├── storage.load(key) ── blob ──► serde_json ──► normalized Cart │
//! │       │        │                                                        │
//! │       │        └── absent / error / corrupt ──► Cart::new() + warn!    │
//! │       │                                                                 │
//! │       └── spawn writer task ◄─── watch (latest snapshot) ───┐          │
//! │                                                              │          │
//! │  cart.add_item(..)                                           │          │
//! │       ├── Cart::add_item (synchronous)                       │          │
//! │       ├── watch::send(CartTotals) ──► header badge, checkout │          │
//! │       └── send_replace(Some(snapshot)) ──────────────────────┘          │
//! │                                                                         │
//! │  Writer task: wakes on every new snapshot, saves the newest one        │
//! │       └── Err ──► warn!, memory state kept, no retry                   │
//! │                                                                         │
//! │  cart.flush().await     waits until the newest snapshot was handled    │
//! │  cart.shutdown().await  flushes and stops the writer                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Single Writer
//! Every mutation takes `&mut self`, so the borrow checker guarantees one
//! writer without locks. Mutations finish synchronously; persistence
//! happens afterwards on the writer task.
//!
//! ## Latest Snapshot Wins
//! Each snapshot is the complete cart. The writer is handed snapshots through
//! a `watch` channel, so a burst of mutations collapses into saves of the
//! newest state and the last one is always written. Dropping the cart
//! without `shutdown()` still lets the writer save a snapshot it has not
//! seen yet before it exits.

use std::ops::Deref;
use std::sync::Arc;

use cleancart_core::{Cart, CartTotals, CoreResult, ItemDescriptor};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::CartStoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::storage::{open_storage, CartStorage, MemoryStorage};

/// Pending `flush()` calls the writer may hold at once.
const FLUSH_QUEUE_CAPACITY: usize = 8;

// =============================================================================
// Options
// =============================================================================

/// How a [`PersistentCart`] talks to its storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOptions {
    /// Key the cart blob lives under.
    pub key: String,
}

impl Default for PersistOptions {
    fn default() -> Self {
        PersistOptions {
            key: cleancart_core::CART_STORAGE_KEY.to_string(),
        }
    }
}

impl From<&CartStoreConfig> for PersistOptions {
    fn from(config: &CartStoreConfig) -> Self {
        PersistOptions {
            key: config.storage.key.clone(),
        }
    }
}

// =============================================================================
// Blob Encoding
// =============================================================================

fn encode_cart(cart: &Cart) -> StoreResult<String> {
    Ok(serde_json::to_string(cart)?)
}

fn decode_cart(blob: &str) -> StoreResult<Cart> {
    Ok(serde_json::from_str(blob)?)
}

// =============================================================================
// Writer Task
// =============================================================================

/// Saves the newest snapshot and marks it seen.
async fn save_latest(
    storage: &dyn CartStorage,
    key: &str,
    snapshots: &mut watch::Receiver<Option<String>>,
) {
    let Some(blob) = snapshots.borrow_and_update().clone() else {
        return;
    };

    match storage.save(key, &blob).await {
        Ok(()) => debug!(bytes = blob.len(), "Cart snapshot persisted"),
        Err(e) => warn!(key = %key, error = %e, "Failed to persist cart snapshot"),
    }
}

async fn run_writer(
    storage: Arc<dyn CartStorage>,
    key: String,
    mut snapshots: watch::Receiver<Option<String>>,
    mut flushes: mpsc::Receiver<oneshot::Sender<()>>,
) {
    debug!(backend = storage.name(), key = %key, "Cart writer started");

    loop {
        tokio::select! {
            // Ok while an unseen snapshot exists, even after the cart is dropped
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                save_latest(&*storage, &key, &mut snapshots).await;
            }

            Some(done) = flushes.recv() => {
                if snapshots.has_changed().unwrap_or(false) {
                    save_latest(&*storage, &key, &mut snapshots).await;
                }
                let _ = done.send(());
            }
        }
    }

    info!(key = %key, "Cart writer stopped");
}

/// Loads the persisted cart, falling back to an empty one.
async fn hydrate(storage: &dyn CartStorage, key: &str) -> Cart {
    let blob = match storage.load(key).await {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            info!(key, "No persisted cart, starting empty");
            return Cart::new();
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to load persisted cart, starting empty");
            return Cart::new();
        }
    };

    match decode_cart(&blob) {
        Ok(cart) => {
            info!(
                key,
                lines = cart.line_count(),
                items = cart.total_item_count(),
                total = %cart.total_price(),
                "Restored persisted cart"
            );
            cart
        }
        Err(e) => {
            warn!(key, error = %e, "Persisted cart is unreadable, starting empty");
            Cart::new()
        }
    }
}

// =============================================================================
// PersistentCart
// =============================================================================

/// A [`Cart`] that saves itself after every mutation.
///
/// Read access goes through `Deref<Target = Cart>`; mutations go through the
/// methods below, which mirror [`Cart`]'s.
///
/// ## Example
/// ```rust,ignore
/// let storage = Arc::new(MemoryStorage::new());
/// let mut cart = PersistentCart::open(storage, PersistOptions::default()).await;
///
/// cart.add_item(ItemDescriptor::new("A", "Floor Mop", Money::from_cents(2500)));
/// assert_eq!(cart.total_item_count(), 1);
///
/// cart.shutdown().await;
/// ```
pub struct PersistentCart {
    cart: Cart,
    key: String,
    snapshot_tx: watch::Sender<Option<String>>,
    flush_tx: mpsc::Sender<oneshot::Sender<()>>,
    totals_tx: watch::Sender<CartTotals>,
    writer: JoinHandle<()>,
}

impl PersistentCart {
    /// Hydrates from `storage` and starts the writer task.
    ///
    /// Never fails: a missing, unreadable or unreachable blob gives an
    /// empty cart. Must be called inside a tokio runtime.
    pub async fn open(storage: Arc<dyn CartStorage>, options: PersistOptions) -> Self {
        let cart = hydrate(&*storage, &options.key).await;

        let (snapshot_tx, snapshot_rx) = watch::channel(None);
        let (flush_tx, flush_rx) = mpsc::channel(FLUSH_QUEUE_CAPACITY);
        let writer = tokio::spawn(run_writer(
            storage,
            options.key.clone(),
            snapshot_rx,
            flush_rx,
        ));
        let (totals_tx, _) = watch::channel(cart.totals());

        PersistentCart {
            cart,
            key: options.key,
            snapshot_tx,
            flush_tx,
            totals_tx,
            writer,
        }
    }

    /// Opens the configured backend and hydrates from it.
    ///
    /// If the backend can't be opened the cart runs on in-memory storage
    /// for this session.
    pub async fn from_config(config: &CartStoreConfig) -> Self {
        let storage = match open_storage(config).await {
            Ok(storage) => storage,
            Err(e) => {
                warn!(
                    backend = %config.backend(),
                    error = %e,
                    "Cart storage unavailable, cart will not survive restart"
                );
                Arc::new(MemoryStorage::new())
            }
        };

        Self::open(storage, PersistOptions::from(config)).await
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// See [`Cart::add_item`].
    pub fn add_item(&mut self, candidate: ItemDescriptor) {
        debug!(item_id = %candidate.id, "Adding item to cart");
        self.cart.add_item(candidate);
        self.after_mutation();
    }

    /// See [`Cart::try_add_item`]. Nothing is saved when validation fails.
    pub fn try_add_item(&mut self, candidate: ItemDescriptor) -> CoreResult<()> {
        self.cart.try_add_item(candidate)?;
        self.after_mutation();
        Ok(())
    }

    /// See [`Cart::remove_item`].
    pub fn remove_item(&mut self, id: &str) {
        debug!(item_id = %id, "Removing item from cart");
        self.cart.remove_item(id);
        self.after_mutation();
    }

    /// See [`Cart::set_quantity`].
    pub fn set_quantity(&mut self, id: &str, quantity: i64) {
        debug!(item_id = %id, quantity, "Setting cart quantity");
        self.cart.set_quantity(id, quantity);
        self.after_mutation();
    }

    /// See [`Cart::clear`].
    pub fn clear(&mut self) {
        debug!("Clearing cart");
        self.cart.clear();
        self.after_mutation();
    }

    /// See [`Cart::toggle_visibility`].
    pub fn toggle_visibility(&mut self) {
        self.cart.toggle_visibility();
        self.after_mutation();
    }

    fn after_mutation(&mut self) {
        let totals = self.cart.totals();
        self.totals_tx.send_if_modified(|current| {
            if *current == totals {
                return false;
            }
            *current = totals;
            true
        });

        match encode_cart(&self.cart) {
            Ok(blob) => {
                self.snapshot_tx.send_replace(Some(blob));
                if self.snapshot_tx.is_closed() {
                    warn!(key = %self.key, "Cart writer stopped, snapshot not persisted");
                }
            }
            Err(e) => warn!(error = %e, "Failed to encode cart snapshot"),
        }
    }

    // =========================================================================
    // Writer Control
    // =========================================================================

    /// Returns a receiver that observes [`CartTotals`] after each mutation.
    pub fn subscribe(&self) -> watch::Receiver<CartTotals> {
        self.totals_tx.subscribe()
    }

    /// Waits until the newest snapshot has been handed to storage.
    ///
    /// Save failures are logged by the writer, not returned here.
    pub async fn flush(&self) -> StoreResult<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.flush_tx
            .send(done_tx)
            .await
            .map_err(|_| StoreError::WriterClosed)?;

        done_rx.await.map_err(|_| StoreError::WriterClosed)
    }

    /// Flushes, stops the writer and returns the final cart.
    pub async fn shutdown(self) -> Cart {
        if let Err(e) = self.flush().await {
            warn!(error = %e, "Cart writer gone before shutdown");
        }

        let PersistentCart {
            cart,
            snapshot_tx,
            flush_tx,
            writer,
            ..
        } = self;

        drop(snapshot_tx);
        drop(flush_tx);
        if let Err(e) = writer.await {
            warn!(error = %e, "Cart writer task failed");
        }

        cart
    }

    /// Storage key this cart is saved under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The wrapped cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }
}

impl Deref for PersistentCart {
    type Target = Cart;

    fn deref(&self) -> &Cart {
        &self.cart
    }
}

impl std::fmt::Debug for PersistentCart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentCart")
            .field("key", &self.key)
            .field("cart", &self.cart)
            .field("writer_running", &!self.writer.is_finished())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
