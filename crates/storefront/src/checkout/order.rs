//! Order submission payload.

use needledrop_core::{CartItem, OrderContact, Price, ProductId};
use serde::Serialize;

/// One ordered product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub id: ProductId,
    pub quantity: u32,
}

/// Body posted to the orders endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub items: Vec<OrderLine>,
}

impl OrderRequest {
    /// Build an order from a cart snapshot. Each distinct record is ordered
    /// once.
    #[must_use]
    pub fn from_cart(contact: &OrderContact, items: &[CartItem]) -> Self {
        Self {
            name: contact.name().to_owned(),
            phone: contact.phone().to_owned(),
            address: contact.address().to_owned(),
            items: items
                .iter()
                .map(|item| OrderLine {
                    id: item.id(),
                    quantity: 1,
                })
                .collect(),
        }
    }
}

/// What was ordered, returned after the order service accepted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub lines: Vec<OrderLine>,
    pub total: Price,
}

impl OrderReceipt {
    /// Confirmation text for the shopper.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        "Order placed! We will contact you shortly."
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }
}
