//! The cart store: single owner of the cart contents.

use std::collections::HashSet;

use needledrop_core::{CartItem, Price, ProductId};
use tracing::{debug, info, instrument, warn};

use super::storage::{CartStorage, StorageError};
use super::subscription::{Subscribers, Subscription};

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Owns the ordered, id-unique list of items in the cart.
///
/// Every effective mutation is written to storage before the method returns
/// and then announced to subscribers with the new contents. Mutations take
/// `&mut self`, so no reader can observe a half-applied change.
///
/// Persistence is best effort: a failed write is logged and kept in
/// [`CartStore::last_persist_error`], the in-memory list stays authoritative
/// and the next mutation retries the write.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    items: Vec<CartItem>,
    storage: S,
    subscribers: Subscribers,
    last_persist_error: Option<StorageError>,
}

impl<S: CartStorage> CartStore<S> {
    /// Load the persisted cart from `storage`.
    ///
    /// Absent, unreadable or malformed data yields an empty cart. Duplicate
    /// ids in the stored list are collapsed to their first occurrence.
    #[instrument(skip(storage))]
    pub fn hydrate(storage: S) -> Self {
        let items = match storage.load(CART_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => dedupe(items),
                Err(e) => {
                    warn!(error = %e, "Stored cart is malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Cart storage unavailable, starting empty");
                Vec::new()
            }
        };

        info!(count = items.len(), "Cart hydrated");

        Self {
            items,
            storage,
            subscribers: Subscribers::default(),
            last_persist_error: None,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append `item` unless an item with the same id is already in the cart.
    ///
    /// Returns `true` if the cart changed.
    #[instrument(skip(self, item), fields(id = %item.id()))]
    pub fn add_to_cart(&mut self, item: CartItem) -> bool {
        let changed = !self.contains(item.id());
        if changed {
            self.items.push(item);
            debug!(count = self.items.len(), "Item added to cart");
        } else {
            debug!("Item already in cart");
        }
        self.commit(changed);
        changed
    }

    /// Remove the item with `id` if present.
    ///
    /// Returns `true` if the cart changed.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        let changed = self.items.len() != before;
        if changed {
            debug!(count = self.items.len(), "Item removed from cart");
        }
        self.commit(changed);
        changed
    }

    /// Empty the cart and persist the empty list.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.items.clear();
        debug!("Cart cleared");
        self.commit(true);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current contents in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    /// Sum of item prices. Items without a price count as zero.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().filter_map(CartItem::price).sum()
    }

    /// The error from the most recent failed write, cleared by the next
    /// successful one.
    #[must_use]
    pub const fn last_persist_error(&self) -> Option<&StorageError> {
        self.last_persist_error.as_ref()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register `listener` to receive the cart contents after every change.
    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&[CartItem]) + 'static,
    {
        self.subscribers.add(Box::new(listener))
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Flush and notify after a mutation.
    ///
    /// Unchanged state is only re-written when the previous write failed.
    fn commit(&mut self, changed: bool) {
        if changed || self.last_persist_error.is_some() {
            self.persist();
        }
        if changed {
            self.subscribers.notify(&self.items);
        }
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.items)
            .map_err(StorageError::from)
            .and_then(|payload| self.storage.save(CART_STORAGE_KEY, &payload));

        match result {
            Ok(()) => {
                if self.last_persist_error.take().is_some() {
                    info!("Cart storage recovered");
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to persist cart");
                self.last_persist_error = Some(e);
            }
        }
    }
}

fn dedupe(items: Vec<CartItem>) -> Vec<CartItem> {
    let total = items.len();
    let mut seen = HashSet::with_capacity(total);
    let items: Vec<_> = items
        .into_iter()
        .filter(|item| seen.insert(item.id()))
        .collect();
    if items.len() != total {
        warn!(
            dropped = total - items.len(),
            "Stored cart contained duplicate items"
        );
    }
    items
}
