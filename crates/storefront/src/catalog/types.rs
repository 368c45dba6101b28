//! Domain types for the records catalog API.
//!
//! These mirror the REST representation closely; missing optional fields
//! deserialize to `None` or empty lists.

use needledrop_core::{
    ArtistId, ArtistRef, CartItem, CartItemError, LabelId, LabelRef, Price, ProductId, StyleId,
    TrackId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Pagination
// =============================================================================

/// Paginated list envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching records across all pages.
    #[serde(default)]
    pub count: Option<u64>,
    /// URL of the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page, if any.
    #[serde(default)]
    pub previous: Option<String>,
    /// Records on this page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// A page with no results and nothing after it.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            count: Some(0),
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }

    /// Whether another page can be requested.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Number of the page after `current`, if there is one. Stops at
    /// `u32::MAX` rather than overflowing.
    #[must_use]
    pub const fn next_page_number(&self, current: u32) -> Option<u32> {
        if self.has_more() && current < u32::MAX {
            Some(current + 1)
        } else {
            None
        }
    }
}

// =============================================================================
// Reference Types
// =============================================================================

/// Artist as embedded in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    #[serde(default)]
    pub discogs_id: Option<i64>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Label as embedded in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    #[serde(default)]
    pub discogs_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A genre or style tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

/// A style as listed by the styles endpoint. Each one backs a category page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub id: StyleId,
    pub name: String,
}

/// One track on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<TrackId>,
    /// Side/position marker (e.g. "A1").
    #[serde(default)]
    pub position: String,
    pub title: String,
    /// Display duration (e.g. "6:12").
    #[serde(default)]
    pub duration: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A record as returned by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub label: Option<Label>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<Tag>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub styles: Vec<Tag>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub catalog_number: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Audio preview URL.
    #[serde(default)]
    pub preview: Option<String>,
}

impl Product {
    /// Artist names joined for display ("A, B").
    #[must_use]
    pub fn artist_names(&self) -> String {
        join_names(self.artists.iter().map(|artist| artist.name.as_str()))
    }

    #[must_use]
    pub fn label_name(&self) -> Option<&str> {
        self.label.as_ref().map(|label| label.name.as_str())
    }

    #[must_use]
    pub fn genre_names(&self) -> String {
        join_names(self.genres.iter().map(|tag| tag.name.as_str()))
    }

    #[must_use]
    pub fn style_names(&self) -> String {
        join_names(self.styles.iter().map(|tag| tag.name.as_str()))
    }

    /// Price in the shop currency, if the record has one.
    #[must_use]
    pub fn display_price(&self) -> Option<Price> {
        self.price.map(Price::usd)
    }

    /// Whether the record can be ordered. Unknown stock counts as available.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock.is_none_or(|stock| stock > 0)
    }
}

impl TryFrom<&Product> for CartItem {
    type Error = CartItemError;

    fn try_from(product: &Product) -> Result<Self, Self::Error> {
        Ok(Self::new(product.id, &product.title, product.price)?
            .with_cover_image(product.cover_image.clone())
            .with_artists(
                product
                    .artists
                    .iter()
                    .map(|artist| ArtistRef {
                        name: artist.name.clone(),
                    })
                    .collect(),
            )
            .with_label(product.label.as_ref().map(|label| LabelRef {
                name: label.name.clone(),
            })))
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DETAIL_JSON: &str = r#"{
        "id": 17,
        "title": "Tempest",
        "price": "24.00",
        "cover_image": "https://img.example/17.jpg",
        "artists": [
            {"id": 1, "name": "Photek", "discogs_id": 101, "bio": null},
            {"id": 2, "name": "Source Direct", "discogs_id": 102}
        ],
        "label": {"id": 3, "name": "Metalheadz", "discogs_id": 201},
        "genres": [{"name": "Electronic"}],
        "styles": [{"name": "Jungle"}, {"name": "Drum n Bass"}],
        "country": "UK",
        "catalog_number": "METH 001",
        "condition": "VG+",
        "stock": 2,
        "release_year": 1996,
        "tracks": [
            {"id": 9, "position": "A", "title": "Tempest", "duration": "7:01"},
            {"position": "B", "title": "Hidden Camera"}
        ],
        "preview": "https://audio.example/17.mp3"
    }"#;

    #[test]
    fn test_deserialize_detail() {
        let product: Product = serde_json::from_str(DETAIL_JSON).unwrap();
        assert_eq!(product.id, ProductId::new(17));
        assert_eq!(product.price, Some(Decimal::from(24)));
        assert_eq!(product.artist_names(), "Photek, Source Direct");
        assert_eq!(product.label_name(), Some("Metalheadz"));
        assert_eq!(product.style_names(), "Jungle, Drum n Bass");
        assert_eq!(product.genre_names(), "Electronic");
        assert_eq!(product.tracks.len(), 2);
        assert!(product.tracks[1].duration.is_none());
        assert_eq!(product.release_year, Some(1996));
        assert!(product.in_stock());
    }

    #[test]
    fn test_deserialize_sparse_listing() {
        let product: Product =
            serde_json::from_str(r#"{"id": 1, "title": "X", "artists": null}"#).unwrap();
        assert!(product.artists.is_empty());
        assert!(product.tracks.is_empty());
        assert_eq!(product.artist_names(), "");
        assert!(product.display_price().is_none());
    }

    #[test]
    fn test_deserialize_styles() {
        let styles: Vec<Style> =
            serde_json::from_str(r#"[{"id": 1, "name": "Drum n Bass"}, {"id": 4, "name": "Dub"}]"#)
                .unwrap();
        assert_eq!(styles.len(), 2);
        assert_eq!(styles[0].id, StyleId::new(1));
        assert_eq!(styles[1].name, "Dub");
    }

    #[test]
    fn test_out_of_stock() {
        let product: Product =
            serde_json::from_str(r#"{"id": 1, "title": "X", "stock": 0}"#).unwrap();
        assert!(!product.in_stock());
    }

    #[test]
    fn test_into_cart_item_keeps_display_fields() {
        let product: Product = serde_json::from_str(DETAIL_JSON).unwrap();
        let item = CartItem::try_from(&product).unwrap();

        assert_eq!(item.id(), ProductId::new(17));
        assert_eq!(item.title(), "Tempest");
        assert_eq!(item.amount(), Some(Decimal::from(24)));
        assert_eq!(item.cover_image(), Some("https://img.example/17.jpg"));
        assert_eq!(item.artist_names(), "Photek, Source Direct");
        assert_eq!(item.label().unwrap().name, "Metalheadz");
    }

    #[test]
    fn test_into_cart_item_rejects_blank_title() {
        let product: Product = serde_json::from_str(r#"{"id": 1, "title": " "}"#).unwrap();
        assert_eq!(
            CartItem::try_from(&product),
            Err(CartItemError::EmptyTitle)
        );
    }

    #[test]
    fn test_page_envelope() {
        let page: Page<Product> = serde_json::from_str(
            r#"{"count": 13, "next": "http://api/records/?page=2", "previous": null,
                "results": [{"id": 1, "title": "A"}]}"#,
        )
        .unwrap();
        assert_eq!(page.count, Some(13));
        assert!(page.has_more());
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.next_page_number(1), Some(2));
        assert_eq!(page.next_page_number(u32::MAX), None);
        assert_eq!(Page::<Product>::empty().next_page_number(1), None);
    }

    #[test]
    fn test_page_missing_results() {
        let page: Page<Product> = serde_json::from_str(r#"{"next": null}"#).unwrap();
        assert!(page.results.is_empty());
        assert!(!page.has_more());
    }
}
