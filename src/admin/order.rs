//! Order administration - the service behind the order add/change screens.
//!
//! Saving runs as explicit steps:
//! 1. `clean` the submitted [`OrderForm`]
//! 2. check the chosen restaurant can cook every item
//! 3. derive the status to store (assigning a restaurant starts cooking)
//! 4. geocode the address when the order is new or its address changed
//! 5. persist, in one transaction

use crate::{
    admin::{forms::OrderForm, redirect},
    config::Settings,
    core::{
        location,
        order::{self as orders, NewOrder, NewOrderItem},
        restaurant as restaurants,
    },
    entities::{order, restaurant},
    errors::{Error, Result},
    geocoder::Geocoder,
};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::info;

/// Admin service for orders
pub struct OrderAdmin<'a> {
    db: &'a DatabaseConnection,
    geocoder: &'a dyn Geocoder,
    settings: &'a Settings,
}

impl<'a> OrderAdmin<'a> {
    /// Creates the service over a database, a geocoder and the app settings.
    #[must_use]
    pub const fn new(
        db: &'a DatabaseConnection,
        geocoder: &'a dyn Geocoder,
        settings: &'a Settings,
    ) -> Self {
        Self {
            db,
            geocoder,
            settings,
        }
    }

    /// Restaurants offered in the "processing restaurant" choice list of an order:
    /// only those able to cook every item.
    pub async fn processing_restaurant_choices(
        &self,
        order_id: i64,
    ) -> Result<Vec<restaurant::Model>> {
        let product_ids = orders::get_order_product_ids(self.db, order_id).await?;
        restaurants::get_available_restaurants(self.db, &product_ids).await
    }

    /// "Restaurants" column of the order list.
    pub async fn available_restaurants(&self, order_id: i64) -> Result<Vec<restaurant::Model>> {
        self.processing_restaurant_choices(order_id).await
    }

    /// "Price" column of the order list.
    pub async fn price(&self, order_id: i64) -> Result<f64> {
        orders::order_price(self.db, order_id).await
    }

    async fn check_restaurant<C>(
        db: &C,
        form: &OrderForm,
        product_ids: &[i64],
    ) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let Some(restaurant_id) = form.processing_restaurant else {
            return Ok(());
        };
        let choices = restaurants::get_available_restaurants(db, product_ids).await?;
        if choices.iter().any(|r| r.id == restaurant_id) {
            Ok(())
        } else {
            Err(Error::validation(
                "processing_restaurant",
                "This restaurant cannot cook every product of the order",
            ))
        }
    }

    fn apply(order: order::Model, form: &OrderForm) -> order::ActiveModel {
        let mut active: order::ActiveModel = order.into();
        active.firstname = Set(form.firstname.trim().to_string());
        active.lastname = Set(form.lastname.trim().to_string());
        active.phonenumber = Set(form.phonenumber.trim().to_string());
        active.address = Set(form.address.trim().to_string());
        active.called_at = Set(form.called_at);
        active.delivered_at = Set(form.delivered_at);
        active.status = Set(form.status_to_save());
        active.payment_type = Set(form.payment_type);
        active.comment = Set(form.comment.clone());
        active.processing_restaurant_id = Set(form.processing_restaurant);
        active
    }

    /// Creates an order from the admin add screen together with its items.
    ///
    /// # Errors
    /// Returns a validation error if the form or items are invalid or the chosen
    /// restaurant cannot cook every item; the order is not stored in that case.
    pub async fn add_model(
        &self,
        form: OrderForm,
        items: Vec<NewOrderItem>,
    ) -> Result<order::Model> {
        form.clean()?;
        let new_order = NewOrder {
            firstname: form.firstname.clone(),
            lastname: form.lastname.clone(),
            phonenumber: form.phonenumber.clone(),
            address: form.address.clone(),
            items,
        };
        new_order.validate()?;

        let product_ids: Vec<i64> = new_order.items.iter().map(|i| i.product_id).collect();
        Self::check_restaurant(self.db, &form, &product_ids).await?;

        location::create_location_by_address(self.db, self.geocoder, &form.address).await?;

        let txn = self.db.begin().await?;
        let (created, _) = orders::insert_order(&txn, &new_order).await?;
        let saved = Self::apply(created, &form).update(&txn).await?;
        txn.commit().await?;

        info!(order_id = saved.id, status = ?saved.status, "Order added");
        Ok(saved)
    }

    /// Saves the order change screen.
    ///
    /// # Errors
    /// Returns `OrderNotFound` for an unknown order, or a validation error when the
    /// form is invalid or the chosen restaurant cannot cook every item.
    pub async fn save_model(&self, order_id: i64, form: OrderForm) -> Result<order::Model> {
        let original = orders::get_order_by_id(self.db, order_id)
            .await?
            .ok_or(Error::OrderNotFound { id: order_id })?;

        form.clean()?;
        let product_ids = orders::get_order_product_ids(self.db, order_id).await?;
        Self::check_restaurant(self.db, &form, &product_ids).await?;

        let changed = form.changed_data(&original);
        if changed.contains(&"address") {
            location::create_location_by_address(self.db, self.geocoder, &form.address).await?;
        }

        let txn = self.db.begin().await?;
        let saved = Self::apply(original, &form).update(&txn).await?;
        txn.commit().await?;

        info!(order_id, status = ?saved.status, changed = ?changed, "Order changed");
        Ok(saved)
    }

    /// Response after a successful change: redirect to a safe `next`, or the changelist.
    pub fn response_change(&self, next: Option<&str>) -> Result<http::Response<()>> {
        redirect::response_change(next, self.settings)
    }
}
