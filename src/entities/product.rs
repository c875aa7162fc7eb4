//! Product entity - Something a customer can order.
//!
//! The price stored here is the current list price. Orders copy it into
//! [`super::order_item`] at the moment they are placed, so later price changes never
//! rewrite order history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Cheeseburger")
    pub name: String,
    /// Optional category this product is listed under
    pub category_id: Option<i64>,
    /// Current price per unit
    pub price: f64,
    /// Path of the product image
    pub image: String,
    /// Highlighted on the storefront (e.g., a special offer)
    pub special_status: bool,
    /// Free-form description
    #[sea_orm(column_type = "Text")]
    pub description: String,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product optionally belongs to one category
    #[sea_orm(
        belongs_to = "super::product_category::Entity",
        from = "Column::CategoryId",
        to = "super::product_category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    /// One product appears in many restaurant menus
    #[sea_orm(has_many = "super::restaurant_menu_item::Entity")]
    MenuItems,
    /// One product appears in many order items
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::product_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::restaurant_menu_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuItems.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
