//! Records catalog REST client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`; one request per page, the caller
//!   decides when to ask for the next one
//! - The catalog service is source of truth - NO local sync
//! - In-memory caching via `moka` for listings, record details and the style
//!   list (TTL from configuration, 5 minutes by default)
//! - Categories come from the styles endpoint, with the featured
//!   [`CATEGORIES`] as fallback
//!
//! # Example
//!
//! ```rust,ignore
//! use needledrop_storefront::catalog::{CatalogClient, Category, RecordQuery};
//!
//! let client = CatalogClient::new(&config)?;
//!
//! let page = client.list_records(&RecordQuery::all()).await?;
//! let dub = client.records_in_category(Category::find("dub").unwrap(), 1).await?;
//! let record = client.get_record(page.results[0].id).await?;
//! ```

mod cache;
mod category;
mod query;
pub mod types;

pub use category::{CATEGORIES, Category};
pub use query::RecordQuery;
pub use types::{Artist, Label, Page, Product, Style, Tag, Track};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use needledrop_core::ProductId;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::StorefrontConfig;
use cache::{CacheKey, CacheValue};

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Catalog returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl CatalogError {
    /// Short message suitable for showing to a shopper.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Record not found",
            _ => "Failed to load records",
        }
    }
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the records catalog.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    records_url: Url,
    styles_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the records
    /// endpoint URL is invalid.
    pub fn new(config: &StorefrontConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("needledrop/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                records_url: config.records_url()?,
                styles_url: config.styles_url()?,
                cache,
            }),
        })
    }

    /// Fetch JSON from `url`, mapping error statuses.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.path().to_string()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Listing Methods
    // =========================================================================

    /// Fetch one page of the records listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body is malformed.
    #[instrument(skip(self), fields(page = query.page_number()))]
    pub async fn list_records(&self, query: &RecordQuery) -> Result<Page<Product>, CatalogError> {
        let cache_key = CacheKey::Records(query.clone());

        if let Some(CacheValue::Records(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for records page");
            return Ok(page);
        }

        let mut url = self.inner.records_url.clone();
        url.query_pairs_mut().extend_pairs(query.to_pairs());

        let page: Page<Product> = self.get_json(url).await?;
        debug!(
            results = page.results.len(),
            has_more = page.has_more(),
            "Fetched records page"
        );

        self.inner
            .cache
            .insert(cache_key, CacheValue::Records(page.clone()))
            .await;

        Ok(page)
    }

    /// Search records by free text.
    ///
    /// A blank term returns an empty page without calling the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn search(&self, term: &str, page: u32) -> Result<Page<Product>, CatalogError> {
        match RecordQuery::search(term) {
            Some(query) => self.list_records(&query.page(page)).await,
            None => Ok(Page::empty()),
        }
    }

    /// Records filed under a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn records_in_category(
        &self,
        category: &Category,
        page: u32,
    ) -> Result<Page<Product>, CatalogError> {
        self.list_records(&RecordQuery::style(category.style_name()).page(page))
            .await
    }

    // =========================================================================
    // Record Methods
    // =========================================================================

    /// Get a single record with its full detail.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the record does not exist, or
    /// another error if the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_record(&self, id: ProductId) -> Result<Product, CatalogError> {
        let cache_key = CacheKey::Record(id);

        if let Some(CacheValue::Record(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for record");
            return Ok(*product);
        }

        let url = self.inner.records_url.join(&format!("{id}/"))?;
        let product: Product = self.get_json(url).await.map_err(|e| match e {
            CatalogError::NotFound(_) => CatalogError::NotFound(format!("Record not found: {id}")),
            other => other,
        })?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Record(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// Fetch every style known to the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn list_styles(&self) -> Result<Vec<Style>, CatalogError> {
        if let Some(CacheValue::Styles(styles)) = self.inner.cache.get(&CacheKey::Styles).await {
            debug!("Cache hit for styles");
            return Ok(styles);
        }

        let styles: Vec<Style> = self.get_json(self.inner.styles_url.clone()).await?;
        debug!(count = styles.len(), "Fetched styles");

        self.inner
            .cache
            .insert(CacheKey::Styles, CacheValue::Styles(styles.clone()))
            .await;

        Ok(styles)
    }

    /// Categories for navigation, one per remote style.
    ///
    /// Falls back to the featured [`CATEGORIES`] if the styles cannot be
    /// loaded or the catalog has none.
    pub async fn categories(&self) -> Vec<Category> {
        match self.list_styles().await {
            Ok(styles) if !styles.is_empty() => styles
                .iter()
                .map(|style| Category::from_style_name(&style.name))
                .collect(),
            Ok(_) => CATEGORIES.to_vec(),
            Err(e) => {
                warn!(error = %e, "Failed to load styles, using featured categories");
                CATEGORIES.to_vec()
            }
        }
    }

    /// Resolve a category slug.
    ///
    /// Featured slugs resolve without a request. Other slugs are matched
    /// against the remote styles so the exact style name is used as the
    /// filter; anything else falls back to [`Category::from_slug`].
    pub async fn resolve_category(&self, slug: &str) -> Category {
        if let Some(category) = Category::find(slug) {
            return category.clone();
        }

        match self.list_styles().await {
            Ok(styles) => styles
                .iter()
                .map(|style| Category::from_style_name(&style.name))
                .find(|category| category.slug() == slug)
                .unwrap_or_else(|| Category::from_slug(slug)),
            Err(e) => {
                warn!(error = %e, slug, "Failed to load styles, deriving category from slug");
                Category::from_slug(slug)
            }
        }
    }

    /// Drop every cached response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }
}
