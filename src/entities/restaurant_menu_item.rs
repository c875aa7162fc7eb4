//! Restaurant menu item entity - Joins restaurants to the products they stock.
//!
//! A row with `availability = false` means the restaurant lists the product but cannot
//! cook it right now. At most one row exists per (restaurant, product) pair.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Restaurant menu item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurant_menu_items")]
pub struct Model {
    /// Unique identifier for the menu entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Restaurant owning this menu entry
    pub restaurant_id: i64,
    /// Product listed on the menu
    pub product_id: i64,
    /// Whether the restaurant can currently cook this product
    pub availability: bool,
}

/// Defines relationships between `RestaurantMenuItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each menu item belongs to one restaurant
    #[sea_orm(
        belongs_to = "super::restaurant::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurant::Column::Id",
        on_delete = "Cascade"
    )]
    Restaurant,
    /// Each menu item refers to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
