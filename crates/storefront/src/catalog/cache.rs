//! Cache types for catalog API responses.

use needledrop_core::ProductId;

use super::query::RecordQuery;
use super::types::{Page, Product, Style};

/// Cache key for records, record listings and the style list.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Record(ProductId),
    Records(RecordQuery),
    Styles,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Record(Box<Product>),
    Records(Page<Product>),
    Styles(Vec<Style>),
}
