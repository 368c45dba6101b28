//! Needledrop Storefront library.
//!
//! Catalog access, the local cart store and checkout, as a library so the
//! command-line front end and the integration tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
