//! Order submission to the remote order service.

use std::future::Future;
use std::time::Duration;

use tracing::instrument;
use url::Url;

use super::CheckoutError;
use super::order::OrderRequest;
use crate::config::StorefrontConfig;

/// Anything that can accept an order.
///
/// `Ok(())` means the order service acknowledged the order.
pub trait OrderSubmitter {
    /// Submit `order`.
    fn submit(&self, order: &OrderRequest) -> impl Future<Output = Result<(), CheckoutError>>;
}

/// Posts orders as JSON to the orders endpoint.
#[derive(Debug, Clone)]
pub struct HttpOrderSubmitter {
    client: reqwest::Client,
    orders_url: Url,
}

impl HttpOrderSubmitter {
    /// Create a submitter for the configured API host.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the orders
    /// endpoint URL is invalid.
    pub fn new(config: &StorefrontConfig) -> Result<Self, CheckoutError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("needledrop/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            orders_url: config.orders_url()?,
        })
    }
}

impl OrderSubmitter for HttpOrderSubmitter {
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    async fn submit(&self, order: &OrderRequest) -> Result<(), CheckoutError> {
        let response = self
            .client
            .post(self.orders_url.clone())
            .json(order)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Order service rejected the order"
            );
            return Err(CheckoutError::Rejected {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
