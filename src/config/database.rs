//! Database configuration module for foodcart.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust structs
//! without hand-written SQL.

use crate::entities::{
    Location, Order, OrderItem, Product, ProductCategory, Restaurant, RestaurantMenuItem,
    restaurant_menu_item,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, sea_query::Index};

const MENU_ITEM_UNIQUE_INDEX: &str = "idx_restaurant_menu_items_restaurant_product";

const DEFAULT_DATABASE_URL: &str = "sqlite://data/foodcart.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if database_url == DEFAULT_DATABASE_URL {
        std::fs::create_dir_all("data")?;
    }
    tracing::debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions.
///
/// Tables are created in dependency order: referenced tables first. Existing tables are
/// left untouched. A unique index keeps one menu row per (restaurant, product).
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(ProductCategory),
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(Restaurant),
        schema.create_table_from_entity(RestaurantMenuItem),
        schema.create_table_from_entity(Order),
        schema.create_table_from_entity(OrderItem),
        schema.create_table_from_entity(Location),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    let menu_item_index = Index::create()
        .name(MENU_ITEM_UNIQUE_INDEX)
        .table(RestaurantMenuItem)
        .col(restaurant_menu_item::Column::RestaurantId)
        .col(restaurant_menu_item::Column::ProductId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&menu_item_index)).await?;

    Ok(())
}
