//! Turning the cart into an order.
//!
//! The order service is an external collaborator reached through
//! [`OrderSubmitter`]. An order either goes through completely, after which
//! the cart is cleared, or fails and leaves the cart exactly as it was so the
//! shopper can retry. There is no retry policy and no partial state.

mod order;
mod submitter;

pub use order::{OrderLine, OrderReceipt, OrderRequest};
pub use submitter::{HttpOrderSubmitter, OrderSubmitter};

use needledrop_core::{ContactError, OrderContact};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::cart::{CartStorage, CartStore};

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// Contact details failed validation.
    #[error("Invalid contact details: {0}")]
    InvalidContact(#[from] ContactError),

    /// The order service answered with a non-success status.
    #[error("Order rejected with HTTP {status}")]
    Rejected {
        /// HTTP status code.
        status: u16,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The orders endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl CheckoutError {
    /// Short message suitable for showing to a shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => "Your cart is empty".to_string(),
            Self::InvalidContact(err) => format!("Please check your details: {err}"),
            Self::Rejected { .. } | Self::Http(_) | Self::InvalidUrl(_) => {
                "Order submission failed. Please try again.".to_string()
            }
        }
    }

    /// Whether the same order may succeed if submitted again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Http(_))
    }
}

/// Submit the cart contents as an order for `contact`.
///
/// The cart is cleared only after the submitter acknowledges the order. The
/// exclusive borrow of `cart` keeps it from changing while the request is in
/// flight, so the cleared contents are exactly the submitted ones.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` without contacting the order service if
/// the cart is empty, or the submitter's error if the order fails.
#[instrument(skip_all, fields(items = cart.item_count()))]
pub async fn checkout<S, O>(
    cart: &mut CartStore<S>,
    submitter: &O,
    contact: &OrderContact,
) -> Result<OrderReceipt, CheckoutError>
where
    S: CartStorage,
    O: OrderSubmitter,
{
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let order = OrderRequest::from_cart(contact, cart.items());
    let total = cart.total();

    if let Err(e) = submitter.submit(&order).await {
        warn!(error = %e, "Checkout failed, cart left intact");
        return Err(e);
    }

    cart.clear_cart();
    info!(items = order.items.len(), total = %total, "Order submitted");

    Ok(OrderReceipt {
        lines: order.items,
        total,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use needledrop_core::{CartItem, ProductId};
    use rust_decimal::Decimal;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::cart::{CART_STORAGE_KEY, MemoryStorage};
    use crate::config::StorefrontConfig;

    /// Records submitted orders and answers with a fixed outcome.
    struct FakeSubmitter {
        status: Option<u16>,
        received: RefCell<Vec<OrderRequest>>,
    }

    impl FakeSubmitter {
        fn accepting() -> Self {
            Self {
                status: None,
                received: RefCell::new(Vec::new()),
            }
        }

        fn rejecting(status: u16) -> Self {
            Self {
                status: Some(status),
                received: RefCell::new(Vec::new()),
            }
        }
    }

    impl OrderSubmitter for FakeSubmitter {
        async fn submit(&self, order: &OrderRequest) -> Result<(), CheckoutError> {
            self.received.borrow_mut().push(order.clone());
            match self.status {
                Some(status) => Err(CheckoutError::Rejected { status }),
                None => Ok(()),
            }
        }
    }

    fn contact() -> OrderContact {
        OrderContact::new("Ann", "+7 999 123 45 67", "Main St 1").unwrap()
    }

    fn cart_with(ids: &[i32]) -> CartStore<MemoryStorage> {
        let mut cart = CartStore::hydrate(MemoryStorage::new());
        for &id in ids {
            cart.add_to_cart(
                CartItem::new(ProductId::new(id), "Record", Some(Decimal::from(10))).unwrap(),
            );
        }
        cart
    }

    #[tokio::test]
    async fn test_success_clears_cart() {
        let mut cart = cart_with(&[1, 2]);
        let submitter = FakeSubmitter::accepting();

        let receipt = checkout(&mut cart, &submitter, &contact()).await.unwrap();

        assert_eq!(receipt.item_count(), 2);
        assert_eq!(receipt.total.amount, Decimal::from(20));
        assert!(cart.is_empty());
        assert_eq!(cart.storage().get(CART_STORAGE_KEY), Some("[]"));
    }

    #[tokio::test]
    async fn test_submitted_snapshot_matches_cart() {
        let mut cart = cart_with(&[5, 3]);
        let submitter = FakeSubmitter::accepting();

        checkout(&mut cart, &submitter, &contact()).await.unwrap();

        let received = submitter.received.borrow();
        assert_eq!(received.len(), 1);
        assert_eq!(
            received[0].items,
            vec![
                OrderLine {
                    id: ProductId::new(5),
                    quantity: 1
                },
                OrderLine {
                    id: ProductId::new(3),
                    quantity: 1
                },
            ]
        );
        assert_eq!(received[0].name, "Ann");
    }

    #[tokio::test]
    async fn test_failure_leaves_cart_intact() {
        let mut cart = cart_with(&[1, 2]);
        let before = cart.items().to_vec();
        let submitter = FakeSubmitter::rejecting(500);

        let err = checkout(&mut cart, &submitter, &contact()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Rejected { status: 500 }));
        assert_eq!(err.user_message(), "Order submission failed. Please try again.");
        assert!(err.is_retryable());
        assert_eq!(cart.items(), before.as_slice());
    }

    #[tokio::test]
    async fn test_empty_cart_is_not_submitted() {
        let mut cart = cart_with(&[]);
        let submitter = FakeSubmitter::accepting();

        let err = checkout(&mut cart, &submitter, &contact()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(!err.is_retryable());
        assert!(submitter.received.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_see_cleared_cart() {
        let mut cart = cart_with(&[1]);
        let seen = std::rc::Rc::new(RefCell::new(None));
        let sink = std::rc::Rc::clone(&seen);
        let _subscription = cart.subscribe(move |items| *sink.borrow_mut() = Some(items.len()));

        checkout(&mut cart, &FakeSubmitter::accepting(), &contact())
            .await
            .unwrap();

        assert_eq!(*seen.borrow(), Some(0));
    }

    #[tokio::test]
    async fn test_http_submitter_posts_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/orders/"))
            .and(body_json(serde_json::json!({
                "name": "Ann",
                "phone": "+7 999 123 45 67",
                "address": "Main St 1",
                "items": [{"id": 1, "quantity": 1}]
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let config = StorefrontConfig::for_api_host(&server.uri()).unwrap();
        let submitter = HttpOrderSubmitter::new(&config).unwrap();
        let mut cart = cart_with(&[1]);

        checkout(&mut cart, &submitter, &contact()).await.unwrap();

        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_http_submitter_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad phone"))
            .mount(&server)
            .await;

        let config = StorefrontConfig::for_api_host(&server.uri()).unwrap();
        let submitter = HttpOrderSubmitter::new(&config).unwrap();
        let mut cart = cart_with(&[1]);

        let err = checkout(&mut cart, &submitter, &contact()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Rejected { status: 400 }));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_invalid_contact_message() {
        let err = CheckoutError::from(ContactError::EmptyPhone);
        assert_eq!(
            err.user_message(),
            "Please check your details: phone cannot be empty"
        );
    }
}
