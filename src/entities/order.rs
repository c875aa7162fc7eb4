//! Order entity - A customer's delivery order and its lifecycle state.
//!
//! Status moves forward through [`OrderStatus`]. Any status other than
//! [`OrderStatus::Unprocessed`] requires a `processing_restaurant_id`; the admin layer
//! enforces that before anything reaches this table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle state of an order
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Just registered, nobody has looked at it yet
    #[sea_orm(string_value = "unprocessed")]
    Unprocessed,
    /// A manager is handling it
    #[sea_orm(string_value = "processing")]
    Processing,
    /// The assigned restaurant is cooking it
    #[sea_orm(string_value = "cooking")]
    Cooking,
    /// On its way to the customer
    #[sea_orm(string_value = "delivering")]
    Delivering,
    /// Handed over to the customer
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Cancelled
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// Position in the fulfillment pipeline, used to sort manager listings.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Unprocessed => 0,
            Self::Processing => 1,
            Self::Cooking => 2,
            Self::Delivering => 3,
            Self::Delivered => 4,
            Self::Cancelled => 5,
        }
    }

    /// Whether no further transitions are expected.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

/// How the customer intends to pay
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Not chosen yet
    #[sea_orm(string_value = "not_specified")]
    NotSpecified,
    /// Cash on delivery
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Card / electronic payment
    #[sea_orm(string_value = "card")]
    Card,
}

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer first name
    pub firstname: String,
    /// Customer last name
    pub lastname: String,
    /// Customer phone number
    pub phonenumber: String,
    /// Delivery address, geocoded into a [`super::location`] record
    pub address: String,
    /// Current lifecycle state
    pub status: OrderStatus,
    /// Payment method
    pub payment_type: PaymentType,
    /// Manager comment
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    /// When the order was registered
    pub created_at: DateTimeUtc,
    /// When a manager called the customer back
    pub called_at: Option<DateTimeUtc>,
    /// When the order was delivered
    pub delivered_at: Option<DateTimeUtc>,
    /// Restaurant assigned to cook the order
    pub processing_restaurant_id: Option<i64>,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order is optionally processed by one restaurant
    #[sea_orm(
        belongs_to = "super::restaurant::Entity",
        from = "Column::ProcessingRestaurantId",
        to = "super::restaurant::Column::Id",
        on_delete = "SetNull"
    )]
    ProcessingRestaurant,
    /// One order has many items
    #[sea_orm(has_many = "super::order_item::Entity")]
    Items,
}

impl Related<super::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProcessingRestaurant.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
