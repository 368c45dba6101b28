//! Unified error handling with Sentry integration.
//!
//! Provides a unified `StorefrontError` type for the command surface. Server
//! side failures are captured to Sentry before a short message is shown.

use needledrop_core::{CartItemError, ContactError};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog API operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// A catalog record cannot be put in the cart.
    #[error("Invalid record: {0}")]
    InvalidItem(#[from] CartItemError),

    /// Order contact details failed validation.
    #[error("Invalid contact details: {0}")]
    InvalidContact(#[from] ContactError),

    /// Unknown category slug.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

impl StorefrontError {
    /// Whether the error came from a remote service rather than the shopper's
    /// input.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Catalog(CatalogError::Http(_) | CatalogError::Status { .. } | CatalogError::Parse(_))
                | Self::Checkout(CheckoutError::Http(_) | CheckoutError::Rejected { .. })
        )
    }

    /// Short message suitable for showing to a shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Catalog(err) => err.user_message().to_string(),
            Self::Checkout(err) => err.user_message(),
            _ => self.to_string(),
        }
    }

    /// Log the error, reporting remote failures to Sentry.
    pub fn report(&self) {
        if self.is_remote() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command error"
            );
        } else {
            tracing::warn!(error = %self, "Command rejected");
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added record", Some(&[("record_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
