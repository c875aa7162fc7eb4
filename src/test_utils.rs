//! Shared test utilities for foodcart.
//!
//! This module provides helpers for setting up test databases, creating test records
//! with sensible defaults, and a scripted geocoder.

use crate::{
    core::{
        order::{NewOrder, NewOrderItem},
        product::{self, ProductFields},
        restaurant,
    },
    entities,
    errors::{Error, Result},
    geocoder::Geocoder,
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Product fields with the given name and price and empty everything else.
pub fn product_fields(name: &str, price: f64) -> ProductFields {
    ProductFields {
        name: name.to_string(),
        category_id: None,
        price,
        image: format!("images/{}.png", name.to_lowercase()),
        special_status: false,
        description: String::new(),
    }
}

/// Creates a test product priced at 10.0.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    product::create_product(db, product_fields(name, 10.0)).await
}

/// Creates a test product with a custom price.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
) -> Result<entities::product::Model> {
    product::create_product(db, product_fields(name, price)).await
}

/// Creates a test restaurant at "`name` street 1".
pub async fn create_test_restaurant(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::restaurant::Model> {
    restaurant::create_restaurant(
        db,
        name.to_string(),
        format!("{name} street 1"),
        "+7 000 000 00 00".to_string(),
    )
    .await
}

/// Marks every product in `product_ids` as available at the restaurant.
pub async fn stock(db: &DatabaseConnection, restaurant_id: i64, product_ids: &[i64]) -> Result<()> {
    for &product_id in product_ids {
        restaurant::set_menu_item(db, restaurant_id, product_id, true).await?;
    }
    Ok(())
}

/// A storefront order for `(product_id, quantity)` pairs.
pub fn new_order(items: &[(i64, i32)]) -> NewOrder {
    NewOrder {
        firstname: "Test".to_string(),
        lastname: "Customer".to_string(),
        phonenumber: "+79990000000".to_string(),
        address: "Test street 1".to_string(),
        items: items
            .iter()
            .map(|&(product_id, quantity)| NewOrderItem {
                product_id,
                quantity,
            })
            .collect(),
    }
}

/// Geocoder answering from a fixed table and counting its calls.
#[derive(Debug, Default)]
pub struct StubGeocoder {
    known: HashMap<String, (f64, f64)>,
    failing: bool,
    calls: AtomicUsize,
}

impl StubGeocoder {
    /// A geocoder that knows no addresses.
    pub fn new() -> Self {
        Self::default()
    }

    /// A geocoder whose every call fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Teaches the geocoder one address.
    pub fn with(mut self, address: &str, coordinates: (f64, f64)) -> Self {
        self.known.insert(address.to_string(), coordinates);
        self
    }

    /// Number of lookups made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn fetch_coordinates(&self, address: &str) -> Result<Option<(f64, f64)>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(Error::Geocoder {
                message: "service unavailable".to_string(),
            });
        }
        Ok(self.known.get(address).copied())
    }
}
