//! Product and category administration.

use crate::{
    core::product::{self as products, ProductFields},
    entities::{product, product_category},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing::info;

/// Admin service for products and product categories
pub struct ProductAdmin<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProductAdmin<'a> {
    /// Creates the service over a database.
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Product changelist: the category filter applies first, then the search term.
    pub async fn changelist(
        &self,
        category_id: Option<i64>,
        search: Option<&str>,
    ) -> Result<Vec<product::Model>> {
        let Some(term) = search.filter(|t| !t.trim().is_empty()) else {
            return products::get_products(self.db, category_id).await;
        };
        let mut found = products::search_products(self.db, term).await?;
        if let Some(category_id) = category_id {
            found.retain(|p| p.category_id == Some(category_id));
        }
        Ok(found)
    }

    /// Creates a product.
    pub async fn add_model(&self, fields: ProductFields) -> Result<product::Model> {
        let saved = products::create_product(self.db, fields).await?;
        info!(product_id = saved.id, "Product added");
        Ok(saved)
    }

    /// Saves the product change screen.
    pub async fn save_model(
        &self,
        product_id: i64,
        fields: ProductFields,
    ) -> Result<product::Model> {
        let saved = products::update_product(self.db, product_id, fields).await?;
        info!(product_id, "Product changed");
        Ok(saved)
    }

    /// Creates a product category.
    pub async fn add_category(&self, name: String) -> Result<product_category::Model> {
        products::create_category(self.db, name).await
    }

    /// Lists product categories.
    pub async fn categories(&self) -> Result<Vec<product_category::Model>> {
        products::get_all_categories(self.db).await
    }
}
