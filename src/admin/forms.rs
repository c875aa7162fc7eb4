//! Typed admin forms.
//!
//! A form carries the values an admin submitted for one record. `clean` performs the
//! field-level and cross-field validation that must pass before anything is persisted;
//! failures come back as [`Error::Validation`] so they can be shown inline.

use crate::{
    entities::{OrderStatus, PaymentType, order, restaurant},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "This field is required"));
    }
    Ok(())
}

/// Values submitted on the order change screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderForm {
    /// Customer first name
    pub firstname: String,
    /// Customer last name
    pub lastname: String,
    /// Customer phone number
    pub phonenumber: String,
    /// Delivery address
    pub address: String,
    /// When the customer was called back
    pub called_at: Option<DateTime<Utc>>,
    /// When the order was delivered
    pub delivered_at: Option<DateTime<Utc>>,
    /// Requested status
    pub status: OrderStatus,
    /// Payment method
    pub payment_type: PaymentType,
    /// Manager comment
    pub comment: String,
    /// Restaurant chosen to cook the order
    pub processing_restaurant: Option<i64>,
}

impl From<&order::Model> for OrderForm {
    fn from(order: &order::Model) -> Self {
        Self {
            firstname: order.firstname.clone(),
            lastname: order.lastname.clone(),
            phonenumber: order.phonenumber.clone(),
            address: order.address.clone(),
            called_at: order.called_at,
            delivered_at: order.delivered_at,
            status: order.status,
            payment_type: order.payment_type,
            comment: order.comment.clone(),
            processing_restaurant: order.processing_restaurant_id,
        }
    }
}

impl OrderForm {
    /// Validates the submitted values.
    ///
    /// Only an unprocessed order may be left without a restaurant.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] on the `restaurant` field when a restaurant is
    /// required but missing, or on any blank required field.
    pub fn clean(&self) -> Result<()> {
        if self.processing_restaurant.is_none() && self.status != OrderStatus::Unprocessed {
            return Err(Error::validation("restaurant", "You must choose a restaurant"));
        }
        require("firstname", &self.firstname)?;
        require("phonenumber", &self.phonenumber)?;
        require("address", &self.address)?;
        Ok(())
    }

    /// Status that will actually be stored.
    ///
    /// Assigning a restaurant to an order that has not reached the kitchen yet sends it
    /// straight to cooking.
    #[must_use]
    pub const fn status_to_save(&self) -> OrderStatus {
        match (self.processing_restaurant, self.status) {
            (Some(_), OrderStatus::Unprocessed | OrderStatus::Processing) => OrderStatus::Cooking,
            (_, status) => status,
        }
    }

    /// Names of the fields whose submitted value differs from `original`.
    #[must_use]
    pub fn changed_data(&self, original: &order::Model) -> Vec<&'static str> {
        let submitted = self;
        let original = Self::from(original);
        let mut changed = Vec::new();
        if submitted.firstname != original.firstname {
            changed.push("firstname");
        }
        if submitted.lastname != original.lastname {
            changed.push("lastname");
        }
        if submitted.phonenumber != original.phonenumber {
            changed.push("phonenumber");
        }
        if submitted.address.trim() != original.address {
            changed.push("address");
        }
        if submitted.called_at != original.called_at {
            changed.push("called_at");
        }
        if submitted.delivered_at != original.delivered_at {
            changed.push("delivered_at");
        }
        if submitted.status != original.status {
            changed.push("status");
        }
        if submitted.payment_type != original.payment_type {
            changed.push("payment_type");
        }
        if submitted.comment != original.comment {
            changed.push("comment");
        }
        if submitted.processing_restaurant != original.processing_restaurant {
            changed.push("processing_restaurant");
        }
        changed
    }
}

/// Values submitted on the restaurant add/change screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantForm {
    /// Display name
    pub name: String,
    /// Street address
    pub address: String,
    /// Contact phone number
    pub contact_phone: String,
}

impl From<&restaurant::Model> for RestaurantForm {
    fn from(restaurant: &restaurant::Model) -> Self {
        Self {
            name: restaurant.name.clone(),
            address: restaurant.address.clone(),
            contact_phone: restaurant.contact_phone.clone(),
        }
    }
}

impl RestaurantForm {
    /// Validates the submitted values.
    pub fn clean(&self) -> Result<()> {
        require("name", &self.name)?;
        require("address", &self.address)
    }

    /// Whether the submitted address differs from the stored one.
    #[must_use]
    pub fn address_changed(&self, original: &restaurant::Model) -> bool {
        self.address.trim() != original.address
    }
}
