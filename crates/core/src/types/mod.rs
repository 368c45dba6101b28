//! Core types for Needledrop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart_item;
pub mod contact;
pub mod id;
pub mod price;

pub use cart_item::{ArtistRef, CartItem, CartItemError, LabelRef};
pub use contact::{ContactError, OrderContact};
pub use id::*;
pub use price::{CurrencyCode, Price};
