//! Local cart state.
//!
//! # Architecture
//!
//! - [`CartStore`] is the single owner of the cart contents; views read
//!   snapshots and subscribe for changes, they never mutate the list
//! - Contents are persisted as JSON under [`CART_STORAGE_KEY`] on every change
//!   and hydrated once at startup
//! - Storage is pluggable through [`CartStorage`]: [`FileStorage`] for real
//!   sessions, [`MemoryStorage`] for tests and throwaway sessions
//!
//! # Example
//!
//! ```rust,ignore
//! use needledrop_storefront::cart::{CartStore, FileStorage};
//!
//! let mut cart = CartStore::hydrate(FileStorage::new(".needledrop"));
//! let _badge = cart.subscribe(|items| tracing::info!(count = items.len(), "cart changed"));
//!
//! cart.add_to_cart(item);
//! assert!(cart.contains(item_id));
//! ```

mod storage;
mod store;
mod subscription;

pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{CART_STORAGE_KEY, CartStore};
pub use subscription::Subscription;
