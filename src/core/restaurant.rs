//! Restaurant business logic - restaurants, their menus, and the availability filter.
//!
//! The central rule of the system lives here: a restaurant can fulfill an order only if
//! its menu marks every product of that order as available. See
//! [`get_available_restaurants`].

use crate::{
    entities::{
        Order, OrderStatus, Restaurant, RestaurantMenuItem, order, restaurant,
        restaurant_menu_item,
    },
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::info;

/// Retrieves all restaurants, ordered alphabetically by name.
pub async fn get_all_restaurants(db: &DatabaseConnection) -> Result<Vec<restaurant::Model>> {
    Restaurant::find()
        .order_by_asc(restaurant::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific restaurant by its unique ID.
pub async fn get_restaurant_by_id<C>(db: &C, restaurant_id: i64) -> Result<Option<restaurant::Model>>
where
    C: ConnectionTrait,
{
    Restaurant::find_by_id(restaurant_id)
        .one(db)
        .await
        .map_err(Into::into)
}

fn validate_restaurant(name: &str, address: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("name", "Restaurant name cannot be empty"));
    }
    if address.trim().is_empty() {
        return Err(Error::validation("address", "Restaurant address cannot be empty"));
    }
    Ok(())
}

/// Creates a new restaurant after validating its name and address.
///
/// # Errors
/// Returns a validation error if the name or address is blank, or a database error.
pub async fn create_restaurant(
    db: &DatabaseConnection,
    name: String,
    address: String,
    contact_phone: String,
) -> Result<restaurant::Model> {
    validate_restaurant(&name, &address)?;

    let restaurant = restaurant::ActiveModel {
        name: Set(name.trim().to_string()),
        address: Set(address.trim().to_string()),
        contact_phone: Set(contact_phone.trim().to_string()),
        ..Default::default()
    };
    restaurant.insert(db).await.map_err(Into::into)
}

/// Updates the name, address and phone of an existing restaurant.
///
/// # Errors
/// Returns an error if validation fails, the restaurant does not exist, or the update fails.
pub async fn update_restaurant(
    db: &DatabaseConnection,
    restaurant_id: i64,
    name: String,
    address: String,
    contact_phone: String,
) -> Result<restaurant::Model> {
    validate_restaurant(&name, &address)?;

    let mut restaurant: restaurant::ActiveModel = get_restaurant_by_id(db, restaurant_id)
        .await?
        .ok_or(Error::RestaurantNotFound { id: restaurant_id })?
        .into();

    restaurant.name = Set(name.trim().to_string());
    restaurant.address = Set(address.trim().to_string());
    restaurant.contact_phone = Set(contact_phone.trim().to_string());

    restaurant.update(db).await.map_err(Into::into)
}

/// Deletes a restaurant together with its menu, in one transaction.
///
/// Open orders assigned to it go back to [`OrderStatus::Unprocessed`] without a
/// restaurant so staff can reassign them. A restaurant that delivered or cancelled
/// orders still point to cannot be deleted.
///
/// # Errors
/// Returns `RestaurantNotFound`, a validation error when finished orders reference the
/// restaurant, or a database error. Nothing is written on error.
pub async fn delete_restaurant(db: &DatabaseConnection, restaurant_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let restaurant = get_restaurant_by_id(&txn, restaurant_id)
        .await?
        .ok_or(Error::RestaurantNotFound { id: restaurant_id })?;

    let finished = Order::find()
        .filter(order::Column::ProcessingRestaurantId.eq(restaurant_id))
        .filter(order::Column::Status.is_in([OrderStatus::Delivered, OrderStatus::Cancelled]))
        .count(&txn)
        .await?;
    if finished > 0 {
        return Err(Error::validation(
            "restaurant",
            format!("{finished} finished orders reference this restaurant"),
        ));
    }

    let reopened = Order::update_many()
        .set(order::ActiveModel {
            status: Set(OrderStatus::Unprocessed),
            processing_restaurant_id: Set(None),
            ..Default::default()
        })
        .filter(order::Column::ProcessingRestaurantId.eq(restaurant_id))
        .exec(&txn)
        .await?;

    RestaurantMenuItem::delete_many()
        .filter(restaurant_menu_item::Column::RestaurantId.eq(restaurant_id))
        .exec(&txn)
        .await?;
    restaurant.delete(&txn).await?;

    txn.commit().await?;

    info!(
        restaurant_id,
        reopened_orders = reopened.rows_affected,
        "Restaurant deleted"
    );
    Ok(())
}

/// Lists the menu of a restaurant, available or not.
pub async fn get_menu(
    db: &DatabaseConnection,
    restaurant_id: i64,
) -> Result<Vec<restaurant_menu_item::Model>> {
    RestaurantMenuItem::find()
        .filter(restaurant_menu_item::Column::RestaurantId.eq(restaurant_id))
        .order_by_asc(restaurant_menu_item::Column::ProductId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds a product to a restaurant's menu, or updates its availability if already listed.
///
/// Keeps at most one menu row per (restaurant, product).
pub async fn set_menu_item(
    db: &DatabaseConnection,
    restaurant_id: i64,
    product_id: i64,
    availability: bool,
) -> Result<restaurant_menu_item::Model> {
    get_restaurant_by_id(db, restaurant_id)
        .await?
        .ok_or(Error::RestaurantNotFound { id: restaurant_id })?;
    crate::core::product::get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let existing = RestaurantMenuItem::find()
        .filter(restaurant_menu_item::Column::RestaurantId.eq(restaurant_id))
        .filter(restaurant_menu_item::Column::ProductId.eq(product_id))
        .one(db)
        .await?;

    if let Some(item) = existing {
        let mut item: restaurant_menu_item::ActiveModel = item.into();
        item.availability = Set(availability);
        return item.update(db).await.map_err(Into::into);
    }

    restaurant_menu_item::ActiveModel {
        restaurant_id: Set(restaurant_id),
        product_id: Set(product_id),
        availability: Set(availability),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Removes a product from a restaurant's menu. Missing rows are ignored.
pub async fn remove_menu_item(
    db: &DatabaseConnection,
    restaurant_id: i64,
    product_id: i64,
) -> Result<()> {
    RestaurantMenuItem::delete_many()
        .filter(restaurant_menu_item::Column::RestaurantId.eq(restaurant_id))
        .filter(restaurant_menu_item::Column::ProductId.eq(product_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Returns the restaurants that can cook every one of `product_ids`.
///
/// A restaurant qualifies only if, for each distinct product id, its menu has an entry
/// with `availability = true`. Duplicate ids count once. With no product ids at all,
/// every restaurant qualifies. Results are ordered by restaurant name.
pub async fn get_available_restaurants<C>(
    db: &C,
    product_ids: &[i64],
) -> Result<Vec<restaurant::Model>>
where
    C: ConnectionTrait,
{
    let wanted: BTreeSet<i64> = product_ids.iter().copied().collect();
    if wanted.is_empty() {
        return Restaurant::find()
            .order_by_asc(restaurant::Column::Name)
            .all(db)
            .await
            .map_err(Into::into);
    }

    let menu_items = RestaurantMenuItem::find()
        .filter(restaurant_menu_item::Column::ProductId.is_in(wanted.iter().copied()))
        .filter(restaurant_menu_item::Column::Availability.eq(true))
        .all(db)
        .await?;

    let mut stocked: HashMap<i64, HashSet<i64>> = HashMap::new();
    for item in menu_items {
        stocked
            .entry(item.restaurant_id)
            .or_default()
            .insert(item.product_id);
    }

    let qualifying: Vec<i64> = stocked
        .into_iter()
        .filter(|(_, products)| products.len() == wanted.len())
        .map(|(restaurant_id, _)| restaurant_id)
        .collect();

    if qualifying.is_empty() {
        return Ok(Vec::new());
    }

    Restaurant::find()
        .filter(restaurant::Column::Id.is_in(qualifying))
        .order_by_asc(restaurant::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn names(restaurants: &[restaurant::Model]) -> Vec<&str> {
        restaurants.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_restaurant_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_restaurant(
            &db,
            "  ".to_string(),
            "Main st. 1".to_string(),
            String::new(),
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { ref field, .. }) if field == "name"));

        let result =
            create_restaurant(&db, "Star Burger".to_string(), String::new(), String::new()).await;
        assert!(matches!(result, Err(Error::Validation { ref field, .. }) if field == "address"));

        Ok(())
    }

    #[tokio::test]
    async fn test_available_restaurants_intersection() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_product(&db, "A").await?;
        let b = create_test_product(&db, "B").await?;
        let c = create_test_product(&db, "C").await?;

        let x = create_test_restaurant(&db, "X").await?;
        let y = create_test_restaurant(&db, "Y").await?;
        stock(&db, x.id, &[a.id, b.id, c.id]).await?;
        stock(&db, y.id, &[a.id]).await?;

        let available = get_available_restaurants(&db, &[a.id, b.id]).await?;
        assert_eq!(names(&available), ["X"]);

        let available = get_available_restaurants(&db, &[a.id]).await?;
        assert_eq!(names(&available), ["X", "Y"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_unavailable_menu_item_does_not_count() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_product(&db, "A").await?;
        let b = create_test_product(&db, "B").await?;
        let x = create_test_restaurant(&db, "X").await?;

        set_menu_item(&db, x.id, a.id, true).await?;
        set_menu_item(&db, x.id, b.id, false).await?;

        assert!(get_available_restaurants(&db, &[a.id, b.id]).await?.is_empty());

        // Making it available again flips the existing row rather than adding one
        set_menu_item(&db, x.id, b.id, true).await?;
        assert_eq!(get_menu(&db, x.id).await?.len(), 2);
        assert_eq!(
            names(&get_available_restaurants(&db, &[a.id, b.id]).await?),
            ["X"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_product_ids_count_once() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_product(&db, "A").await?;
        let x = create_test_restaurant(&db, "X").await?;
        stock(&db, x.id, &[a.id]).await?;

        let available = get_available_restaurants(&db, &[a.id, a.id, a.id]).await?;
        assert_eq!(names(&available), ["X"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_no_products_means_every_restaurant() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_restaurant(&db, "X").await?;
        create_test_restaurant(&db, "Y").await?;

        assert_eq!(get_available_restaurants(&db, &[]).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_product_matches_nobody() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_product(&db, "A").await?;
        let x = create_test_restaurant(&db, "X").await?;
        stock(&db, x.id, &[a.id]).await?;

        assert!(get_available_restaurants(&db, &[a.id, 999]).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_restaurant() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_product(&db, "A").await?;
        let x = create_test_restaurant(&db, "X").await?;
        stock(&db, x.id, &[a.id]).await?;

        let updated = update_restaurant(
            &db,
            x.id,
            "X2".to_string(),
            "New st. 5".to_string(),
            "+7 999 000 00 00".to_string(),
        )
        .await?;
        assert_eq!(updated.name, "X2");
        assert_eq!(updated.address, "New st. 5");

        delete_restaurant(&db, x.id).await?;
        assert!(get_restaurant_by_id(&db, x.id).await?.is_none());
        assert!(get_menu(&db, x.id).await?.is_empty());

        let result = delete_restaurant(&db, x.id).await;
        assert!(matches!(result, Err(Error::RestaurantNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_restaurant_reopens_assigned_orders() -> Result<()> {
        let db = setup_test_db().await?;
        let geocoder = StubGeocoder::new();
        let settings = crate::config::Settings::default();
        let admin = crate::admin::OrderAdmin::new(&db, &geocoder, &settings);

        let burger = create_test_product(&db, "Burger").await?;
        let x = create_test_restaurant(&db, "X").await?;
        stock(&db, x.id, &[burger.id]).await?;
        let (placed, _) =
            crate::core::order::create_order(&db, new_order(&[(burger.id, 1)])).await?;

        let mut form = crate::admin::OrderForm::from(&placed);
        form.processing_restaurant = Some(x.id);
        let assigned = admin.save_model(placed.id, form).await?;
        assert_eq!(assigned.status, OrderStatus::Cooking);

        delete_restaurant(&db, x.id).await?;

        let reopened = crate::core::order::get_order_by_id(&db, placed.id)
            .await?
            .unwrap();
        assert_eq!(reopened.status, OrderStatus::Unprocessed);
        assert!(reopened.processing_restaurant_id.is_none());
        assert!(crate::admin::OrderForm::from(&reopened).clean().is_ok());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_restaurant_with_finished_orders_is_refused() -> Result<()> {
        let db = setup_test_db().await?;
        let geocoder = StubGeocoder::new();
        let settings = crate::config::Settings::default();
        let admin = crate::admin::OrderAdmin::new(&db, &geocoder, &settings);

        let burger = create_test_product(&db, "Burger").await?;
        let x = create_test_restaurant(&db, "X").await?;
        stock(&db, x.id, &[burger.id]).await?;
        let (placed, _) =
            crate::core::order::create_order(&db, new_order(&[(burger.id, 1)])).await?;

        let mut form = crate::admin::OrderForm::from(&placed);
        form.status = OrderStatus::Delivered;
        form.processing_restaurant = Some(x.id);
        admin.save_model(placed.id, form).await?;

        let result = delete_restaurant(&db, x.id).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        // The transaction rolled back: restaurant and menu are intact
        assert!(get_restaurant_by_id(&db, x.id).await?.is_some());
        assert_eq!(get_menu(&db, x.id).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_set_menu_item_unknown_product() -> Result<()> {
        let db = setup_test_db().await?;
        let x = create_test_restaurant(&db, "X").await?;

        let result = set_menu_item(&db, x.id, 42, true).await;
        assert!(matches!(result, Err(Error::ProductNotFound { id: 42 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_menu_item() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_product(&db, "A").await?;
        let x = create_test_restaurant(&db, "X").await?;
        stock(&db, x.id, &[a.id]).await?;

        remove_menu_item(&db, x.id, a.id).await?;
        assert!(get_available_restaurants(&db, &[a.id]).await?.is_empty());

        Ok(())
    }
}
