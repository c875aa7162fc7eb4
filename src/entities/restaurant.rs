//! Restaurant entity - A kitchen that can fulfill orders.
//!
//! Each restaurant owns a menu of [`super::restaurant_menu_item`] rows that say which
//! products it currently stocks.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Restaurant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    /// Unique identifier for the restaurant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Street address, geocoded into a [`super::location`] record
    pub address: String,
    /// Contact phone number
    pub contact_phone: String,
}

/// Defines relationships between Restaurant and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One restaurant has many menu items
    #[sea_orm(has_many = "super::restaurant_menu_item::Entity")]
    MenuItems,
    /// One restaurant processes many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::restaurant_menu_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuItems.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::restaurant_menu_item::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::restaurant_menu_item::Relation::Restaurant.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
