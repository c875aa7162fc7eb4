//! Product business logic - products, categories, and catalogue queries.
//!
//! Products carry the current list price. Orders copy that price into their items when
//! they are placed, so nothing here ever touches existing orders.

use crate::{
    entities::{
        Product, ProductCategory, RestaurantMenuItem, product, product_category,
        restaurant_menu_item,
    },
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, QuerySelect, Set, prelude::*};

/// Fields needed to create or fully update a product
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    /// Display name
    pub name: String,
    /// Optional category id
    pub category_id: Option<i64>,
    /// Price per unit
    pub price: f64,
    /// Image path
    pub image: String,
    /// Highlighted on the storefront
    pub special_status: bool,
    /// Free-form description
    pub description: String,
}

impl ProductFields {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "Product name cannot be empty"));
        }
        if self.price < 0.0 || !self.price.is_finite() {
            return Err(Error::InvalidAmount { amount: self.price });
        }
        Ok(())
    }
}

/// Creates a product category.
pub async fn create_category(
    db: &DatabaseConnection,
    name: String,
) -> Result<product_category::Model> {
    if name.trim().is_empty() {
        return Err(Error::validation("name", "Category name cannot be empty"));
    }

    product_category::ActiveModel {
        name: Set(name.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Retrieves all categories, ordered by name.
pub async fn get_all_categories(
    db: &DatabaseConnection,
) -> Result<Vec<product_category::Model>> {
    ProductCategory::find()
        .order_by_asc(product_category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists products ordered by name, optionally restricted to one category.
pub async fn get_products(
    db: &DatabaseConnection,
    category_id: Option<i64>,
) -> Result<Vec<product::Model>> {
    let mut query = Product::find().order_by_asc(product::Column::Name);
    if let Some(category_id) = category_id {
        query = query.filter(product::Column::CategoryId.eq(category_id));
    }
    query.all(db).await.map_err(Into::into)
}

/// Finds products whose name or category name contains `term`.
pub async fn search_products(db: &DatabaseConnection, term: &str) -> Result<Vec<product::Model>> {
    let term = term.trim();
    if term.is_empty() {
        return get_products(db, None).await;
    }

    Product::find()
        .left_join(ProductCategory)
        .filter(
            Condition::any()
                .add(product::Column::Name.contains(term))
                .add(product_category::Column::Name.contains(term)),
        )
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists products that at least one restaurant currently has available.
pub async fn get_available_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    let product_ids: Vec<i64> = RestaurantMenuItem::find()
        .select_only()
        .column(restaurant_menu_item::Column::ProductId)
        .filter(restaurant_menu_item::Column::Availability.eq(true))
        .distinct()
        .into_tuple()
        .all(db)
        .await?;

    Product::find()
        .filter(product::Column::Id.is_in(product_ids))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new product after validating its name and price.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The price is negative or not finite (NaN, infinity)
/// - The database insert operation fails
pub async fn create_product(
    db: &DatabaseConnection,
    fields: ProductFields,
) -> Result<product::Model> {
    fields.validate()?;

    product::ActiveModel {
        name: Set(fields.name.trim().to_string()),
        category_id: Set(fields.category_id),
        price: Set(fields.price),
        image: Set(fields.image),
        special_status: Set(fields.special_status),
        description: Set(fields.description),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Replaces every editable field of an existing product.
///
/// Prices already captured by orders are not affected.
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    fields: ProductFields,
) -> Result<product::Model> {
    fields.validate()?;

    let mut product: product::ActiveModel = get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    product.name = Set(fields.name.trim().to_string());
    product.category_id = Set(fields.category_id);
    product.price = Set(fields.price);
    product.image = Set(fields.image);
    product.special_status = Set(fields.special_status);
    product.description = Set(fields.description);

    product.update(db).await.map_err(Into::into)
}
