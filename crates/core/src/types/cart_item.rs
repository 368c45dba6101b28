//! Cart item type.
//!
//! A [`CartItem`] is the slice of a catalog record the cart keeps: enough to
//! render a cart row and to submit an order line. Identity is the product
//! id alone; every other field is display data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Errors that can occur when constructing a [`CartItem`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartItemError {
    /// The product id is zero or negative.
    #[error("product id must be positive (got {0})")]
    InvalidId(ProductId),
    /// The title is empty or whitespace.
    #[error("product title cannot be empty")]
    EmptyTitle,
    /// The price is below zero.
    #[error("product price cannot be negative (got {0})")]
    NegativePrice(Decimal),
}

/// Artist credited on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

/// Label that released a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRef {
    pub name: String,
}

/// A product held in the cart.
///
/// ## Constraints
///
/// - `id` is positive
/// - `title` is non-blank (stored trimmed)
/// - `price`, when present, is not negative
///
/// These are checked by [`CartItem::new`] and on deserialization, so a
/// persisted cart with a malformed entry is rejected as a whole.
///
/// ## Examples
///
/// ```
/// use needledrop_core::{CartItem, ProductId};
/// use rust_decimal::Decimal;
///
/// let item = CartItem::new(ProductId::new(1), "Dub Housing", Some(Decimal::from(25))).unwrap();
/// assert_eq!(item.title(), "Dub Housing");
///
/// assert!(CartItem::new(ProductId::new(0), "Nope", None).is_err());
/// assert!(CartItem::new(ProductId::new(2), "   ", None).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCartItem")]
pub struct CartItem {
    id: ProductId,
    title: String,
    // Written as a JSON number like the catalog does; reads accept both forms
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    price: Option<Decimal>,
    cover_image: Option<String>,
    artists: Vec<ArtistRef>,
    label: Option<LabelRef>,
}

/// Unvalidated wire shape, mirroring the catalog's product representation.
#[derive(Deserialize)]
struct RawCartItem {
    id: ProductId,
    title: String,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    cover_image: Option<String>,
    #[serde(default)]
    artists: Option<Vec<ArtistRef>>,
    #[serde(default)]
    label: Option<LabelRef>,
}

impl TryFrom<RawCartItem> for CartItem {
    type Error = CartItemError;

    fn try_from(raw: RawCartItem) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.id, &raw.title, raw.price)?
            .with_cover_image(raw.cover_image)
            .with_artists(raw.artists.unwrap_or_default())
            .with_label(raw.label))
    }
}

impl CartItem {
    /// Create a cart item from its identifying and pricing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not positive, the title is blank or the
    /// price is negative.
    pub fn new(id: ProductId, title: &str, price: Option<Decimal>) -> Result<Self, CartItemError> {
        if !id.is_valid() {
            return Err(CartItemError::InvalidId(id));
        }

        let title = title.trim();
        if title.is_empty() {
            return Err(CartItemError::EmptyTitle);
        }

        if let Some(amount) = price
            && amount < Decimal::ZERO
        {
            return Err(CartItemError::NegativePrice(amount));
        }

        Ok(Self {
            id,
            title: title.to_owned(),
            price,
            cover_image: None,
            artists: Vec::new(),
            label: None,
        })
    }

    /// Set the cover image URL. Blank URLs are dropped.
    #[must_use]
    pub fn with_cover_image(mut self, cover_image: Option<String>) -> Self {
        self.cover_image = cover_image.filter(|url| !url.trim().is_empty());
        self
    }

    /// Set the credited artists.
    #[must_use]
    pub fn with_artists(mut self, artists: Vec<ArtistRef>) -> Self {
        self.artists = artists;
        self
    }

    /// Set the releasing label.
    #[must_use]
    pub fn with_label(mut self, label: Option<LabelRef>) -> Self {
        self.label = label;
        self
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Raw decimal price, if the record has one.
    #[must_use]
    pub const fn amount(&self) -> Option<Decimal> {
        self.price
    }

    /// Price in the shop currency, if the record has one.
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        self.price.map(Price::usd)
    }

    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.cover_image.as_deref()
    }

    #[must_use]
    pub fn artists(&self) -> &[ArtistRef] {
        &self.artists
    }

    #[must_use]
    pub const fn label(&self) -> Option<&LabelRef> {
        self.label.as_ref()
    }

    /// Artist names joined for display ("A, B").
    #[must_use]
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
