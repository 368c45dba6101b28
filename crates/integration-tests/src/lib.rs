//! Integration tests for Needledrop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p needledrop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - cart surviving restarts on disk storage
//! - `checkout_flow` - browse, add and order against a mocked API
//!
//! The remote catalog and order service are replaced by `wiremock` servers,
//! and on-disk state lives in `tempfile` directories, so no network or
//! shared state is needed.

#![cfg_attr(not(test), forbid(unsafe_code))]
