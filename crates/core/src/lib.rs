//! Needledrop Core - Shared types library.
//!
//! This crate provides the domain types used across the Needledrop workspace:
//! - `storefront` - Catalog client, cart store, checkout flow and the CLI
//! - `integration-tests` - Cross-module scenarios
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, cart items and order contacts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
