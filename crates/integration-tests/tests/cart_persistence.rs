//! Integration tests for the cart on disk.
//!
//! Each test opens a store over a temp directory, mutates it, drops it and
//! hydrates a fresh store from the same directory as a restarted process
//! would.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use needledrop_core::{ArtistRef, CartItem, ProductId};
use needledrop_storefront::cart::{CART_STORAGE_KEY, CartStore, FileStorage};
use rust_decimal::Decimal;

fn record(id: i32, title: &str, price: i64) -> CartItem {
    CartItem::new(ProductId::new(id), title, Some(Decimal::from(price)))
        .unwrap()
        .with_artists(vec![ArtistRef {
            name: "Rhythm & Sound".to_string(),
        }])
}

fn open(dir: &tempfile::TempDir) -> CartStore<FileStorage> {
    CartStore::hydrate(FileStorage::new(dir.path()))
}

fn cart_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
    FileStorage::new(dir.path()).path_for(CART_STORAGE_KEY).unwrap()
}

// =============================================================================
// Restart Tests
// =============================================================================

#[test]
fn test_fresh_directory_gives_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    let cart = open(&dir);

    assert!(cart.is_empty());
    assert!(!cart_file(&dir).exists());
}

#[test]
fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut cart = open(&dir);
        assert!(cart.add_to_cart(record(3, "Carrier", 18)));
        assert!(cart.add_to_cart(record(1, "See Mi Yah", 22)));
    }

    let cart = open(&dir);
    let ids: Vec<_> = cart.items().iter().map(CartItem::id).collect();
    assert_eq!(ids, vec![ProductId::new(3), ProductId::new(1)]);
    assert_eq!(cart.items()[0].artist_names(), "Rhythm & Sound");
    assert_eq!(cart.total().amount, Decimal::from(40));
}

#[test]
fn test_remove_and_clear_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut cart = open(&dir);
        cart.add_to_cart(record(1, "A", 10));
        cart.add_to_cart(record(2, "B", 10));
        assert!(cart.remove_from_cart(ProductId::new(1)));
    }
    {
        let mut cart = open(&dir);
        assert_eq!(cart.item_count(), 1);
        assert!(cart.contains(ProductId::new(2)));
        cart.clear_cart();
    }

    let cart = open(&dir);
    assert!(cart.is_empty());
    assert_eq!(fs::read_to_string(cart_file(&dir)).unwrap(), "[]");
}

#[test]
fn test_adding_same_record_twice_persists_once() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut cart = open(&dir);
        assert!(cart.add_to_cart(record(7, "Mango Walk", 15)));
        assert!(!cart.add_to_cart(record(7, "Mango Walk", 15)));
    }

    let cart = open(&dir);
    assert_eq!(cart.item_count(), 1);
}

// =============================================================================
// Corrupt Storage Tests
// =============================================================================

#[test]
fn test_corrupt_file_gives_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(cart_file(&dir), "{not json").unwrap();

    let mut cart = open(&dir);
    assert!(cart.is_empty());

    // The next mutation overwrites the corrupt payload
    cart.add_to_cart(record(1, "A", 10));
    let reopened = open(&dir);
    assert_eq!(reopened.item_count(), 1);
}

#[test]
fn test_wrong_shape_gives_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(cart_file(&dir), r#"{"id": 1, "title": "Not a list"}"#).unwrap();

    assert!(open(&dir).is_empty());
}

#[test]
fn test_stored_duplicates_are_collapsed() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        cart_file(&dir),
        r#"[
            {"id": 4, "title": "First", "price": "10"},
            {"id": 4, "title": "Again", "price": "10"},
            {"id": 5, "title": "Second", "price": "12.50"}
        ]"#,
    )
    .unwrap();

    let cart = open(&dir);
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.items()[0].title(), "First");
    assert_eq!(cart.total().amount, Decimal::new(2250, 2));
}

// =============================================================================
// Subscriber Tests
// =============================================================================

#[test]
fn test_listener_sees_persisted_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut cart = open(&dir);
    let path = cart_file(&dir);

    let on_disk = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&on_disk);
    let _subscription = cart.subscribe(move |_| {
        sink.borrow_mut().push(fs::read_to_string(&path).unwrap());
    });

    cart.add_to_cart(record(1, "A", 10));
    cart.clear_cart();

    let snapshots = on_disk.borrow();
    assert_eq!(snapshots.len(), 2);
    assert!(snapshots[0].contains("\"id\":1"));
    assert_eq!(snapshots[1], "[]");
}
