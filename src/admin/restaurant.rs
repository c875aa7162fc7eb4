//! Restaurant administration - add/change screens and the inline menu editor.

use crate::{
    admin::forms::RestaurantForm,
    core::{location, restaurant as restaurants},
    entities::{Restaurant, restaurant, restaurant_menu_item},
    errors::{Error, Result},
    geocoder::Geocoder,
};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::info;

/// Admin service for restaurants
pub struct RestaurantAdmin<'a> {
    db: &'a DatabaseConnection,
    geocoder: &'a dyn Geocoder,
}

impl<'a> RestaurantAdmin<'a> {
    /// Creates the service over a database and a geocoder.
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection, geocoder: &'a dyn Geocoder) -> Self {
        Self { db, geocoder }
    }

    /// Changelist search over name, address and phone.
    pub async fn search(&self, term: &str) -> Result<Vec<restaurant::Model>> {
        let term = term.trim();
        if term.is_empty() {
            return restaurants::get_all_restaurants(self.db).await;
        }
        Restaurant::find()
            .filter(
                Condition::any()
                    .add(restaurant::Column::Name.contains(term))
                    .add(restaurant::Column::Address.contains(term))
                    .add(restaurant::Column::ContactPhone.contains(term)),
            )
            .order_by_asc(restaurant::Column::Name)
            .all(self.db)
            .await
            .map_err(Into::into)
    }

    /// Creates a restaurant and caches its geocoded address.
    pub async fn add_model(&self, form: RestaurantForm) -> Result<restaurant::Model> {
        form.clean()?;
        location::create_location_by_address(self.db, self.geocoder, &form.address).await?;

        let saved =
            restaurants::create_restaurant(self.db, form.name, form.address, form.contact_phone)
                .await?;
        info!(restaurant_id = saved.id, "Restaurant added");
        Ok(saved)
    }

    /// Saves the restaurant change screen, geocoding the address only if it changed.
    pub async fn save_model(
        &self,
        restaurant_id: i64,
        form: RestaurantForm,
    ) -> Result<restaurant::Model> {
        let original = restaurants::get_restaurant_by_id(self.db, restaurant_id)
            .await?
            .ok_or(Error::RestaurantNotFound { id: restaurant_id })?;

        form.clean()?;
        if form.address_changed(&original) {
            location::create_location_by_address(self.db, self.geocoder, &form.address).await?;
        }

        let saved = restaurants::update_restaurant(
            self.db,
            restaurant_id,
            form.name,
            form.address,
            form.contact_phone,
        )
        .await?;
        info!(restaurant_id, "Restaurant changed");
        Ok(saved)
    }

    /// Inline menu editor: list, add or update, remove.
    pub async fn menu(&self, restaurant_id: i64) -> Result<Vec<restaurant_menu_item::Model>> {
        restaurants::get_menu(self.db, restaurant_id).await
    }

    /// Adds a product to the menu or changes its availability.
    pub async fn save_menu_item(
        &self,
        restaurant_id: i64,
        product_id: i64,
        availability: bool,
    ) -> Result<restaurant_menu_item::Model> {
        restaurants::set_menu_item(self.db, restaurant_id, product_id, availability).await
    }

    /// Removes a product from the menu.
    pub async fn delete_menu_item(&self, restaurant_id: i64, product_id: i64) -> Result<()> {
        restaurants::remove_menu_item(self.db, restaurant_id, product_id).await
    }
}
