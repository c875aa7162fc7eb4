//! Order business logic - registering orders, reading them back, and pricing them.
//!
//! Registration captures each product's current price into the order items inside one
//! database transaction, so an order is either stored with all its items or not at all.
//! Status changes made by staff go through [`crate::admin::OrderAdmin`] instead.

use crate::{
    core::location,
    entities::{Order, OrderItem, OrderStatus, PaymentType, order, order_item},
    errors::{Error, Result},
    geocoder::Geocoder,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::info;

/// One requested product line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
    /// Product to order
    pub product_id: i64,
    /// Number of units, at least one
    pub quantity: i32,
}

/// A customer's order as submitted from the storefront
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Customer first name
    pub firstname: String,
    /// Customer last name
    pub lastname: String,
    /// Customer phone number
    pub phonenumber: String,
    /// Delivery address
    pub address: String,
    /// Requested products
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    pub(crate) fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("firstname", &self.firstname),
            ("phonenumber", &self.phonenumber),
            ("address", &self.address),
        ] {
            if value.trim().is_empty() {
                return Err(Error::validation(field, "This field cannot be empty"));
            }
        }
        if self.items.is_empty() {
            return Err(Error::validation("products", "An order needs at least one product"));
        }
        if let Some(item) = self.items.iter().find(|item| item.quantity < 1) {
            return Err(Error::InvalidQuantity {
                quantity: item.quantity,
            });
        }
        Ok(())
    }
}

/// An order together with its computed price
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    /// The order row
    pub order: order::Model,
    /// Sum of item subtotals
    pub price: f64,
}

/// Stores an order and its items in one transaction, capturing current product prices.
///
/// The order starts [`OrderStatus::Unprocessed`] with no restaurant. No geocoding happens
/// here; see [`register_order`].
///
/// # Errors
/// Returns a validation error for missing customer fields or an empty product list,
/// `InvalidQuantity` for non-positive quantities, `ProductNotFound` for unknown products,
/// or a database error.
pub async fn create_order(
    db: &DatabaseConnection,
    new_order: NewOrder,
) -> Result<(order::Model, Vec<order_item::Model>)> {
    new_order.validate()?;

    let txn = db.begin().await?;
    let created = insert_order(&txn, &new_order).await?;
    txn.commit().await?;

    Ok(created)
}

/// Inserts an already validated order and its items on `db`.
///
/// Callers own the surrounding transaction.
pub(crate) async fn insert_order<C>(
    db: &C,
    new_order: &NewOrder,
) -> Result<(order::Model, Vec<order_item::Model>)>
where
    C: ConnectionTrait,
{
    let order = order::ActiveModel {
        firstname: Set(new_order.firstname.trim().to_string()),
        lastname: Set(new_order.lastname.trim().to_string()),
        phonenumber: Set(new_order.phonenumber.trim().to_string()),
        address: Set(new_order.address.trim().to_string()),
        status: Set(OrderStatus::Unprocessed),
        payment_type: Set(PaymentType::NotSpecified),
        comment: Set(String::new()),
        created_at: Set(chrono::Utc::now()),
        called_at: Set(None),
        delivered_at: Set(None),
        processing_restaurant_id: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let mut items = Vec::with_capacity(new_order.items.len());
    for requested in &new_order.items {
        let product = crate::core::product::get_product_by_id(db, requested.product_id)
            .await?
            .ok_or(Error::ProductNotFound {
                id: requested.product_id,
            })?;

        let item = order_item::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(product.id),
            quantity: Set(requested.quantity),
            product_price: Set(product.price),
            ..Default::default()
        }
        .insert(db)
        .await?;
        items.push(item);
    }

    Ok((order, items))
}

/// Registers a storefront order and caches the geocoded delivery address.
pub async fn register_order(
    db: &DatabaseConnection,
    geocoder: &dyn Geocoder,
    new_order: NewOrder,
) -> Result<(order::Model, Vec<order_item::Model>)> {
    let (order, items) = create_order(db, new_order).await?;
    location::create_location_by_address(db, geocoder, &order.address).await?;
    info!(order_id = order.id, items = items.len(), "Registered order");
    Ok((order, items))
}

/// Retrieves a specific order by its unique ID.
pub async fn get_order_by_id<C>(db: &C, order_id: i64) -> Result<Option<order::Model>>
where
    C: ConnectionTrait,
{
    Order::find_by_id(order_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the items of an order, in insertion order.
pub async fn get_order_items<C>(db: &C, order_id: i64) -> Result<Vec<order_item::Model>>
where
    C: ConnectionTrait,
{
    OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .order_by_asc(order_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Product ids of an order's items.
pub async fn get_order_product_ids<C>(db: &C, order_id: i64) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    Ok(get_order_items(db, order_id)
        .await?
        .iter()
        .map(|item| item.product_id)
        .collect())
}

/// Price of an order: the sum of quantity × captured price over its items.
pub async fn order_price<C>(db: &C, order_id: i64) -> Result<f64>
where
    C: ConnectionTrait,
{
    Ok(get_order_items(db, order_id)
        .await?
        .iter()
        .map(order_item::Model::subtotal)
        .sum())
}

/// Lists orders (newest first), each with its price.
///
/// Prices are computed from one query over all items rather than per order.
pub async fn list_orders_with_price(
    db: &DatabaseConnection,
    statuses: Option<&[OrderStatus]>,
) -> Result<Vec<PricedOrder>> {
    let mut query = Order::find().order_by_desc(order::Column::Id);
    if let Some(statuses) = statuses {
        query = query.filter(order::Column::Status.is_in(statuses.iter().copied()));
    }
    let orders = query.all(db).await?;

    let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let items = OrderItem::find()
        .filter(order_item::Column::OrderId.is_in(order_ids))
        .all(db)
        .await?;

    let mut prices: HashMap<i64, f64> = HashMap::new();
    for item in &items {
        *prices.entry(item.order_id).or_default() += item.subtotal();
    }

    Ok(orders
        .into_iter()
        .map(|order| PricedOrder {
            price: prices.get(&order.id).copied().unwrap_or_default(),
            order,
        })
        .collect())
}

/// Deletes an order and its items.
pub async fn delete_order(db: &DatabaseConnection, order_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let order = get_order_by_id(&txn, order_id)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    OrderItem::delete_many()
        .filter(order_item::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?;
    order.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_order_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut empty = new_order(&[]);
        let result = create_order(&db, empty.clone()).await;
        assert!(matches!(result, Err(Error::Validation { ref field, .. }) if field == "products"));

        empty.items = vec![NewOrderItem {
            product_id: 1,
            quantity: 0,
        }];
        let result = create_order(&db, empty).await;
        assert!(matches!(result, Err(Error::InvalidQuantity { quantity: 0 })));

        let mut no_address = new_order(&[(1, 1)]);
        no_address.address = "   ".to_string();
        let result = create_order(&db, no_address).await;
        assert!(matches!(result, Err(Error::Validation { ref field, .. }) if field == "address"));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_captures_prices() -> Result<()> {
        let db = setup_test_db().await?;
        let burger = create_custom_product(&db, "Burger", 250.0).await?;
        let cola = create_custom_product(&db, "Cola", 90.0).await?;

        let (order, items) = create_order(&db, new_order(&[(burger.id, 2), (cola.id, 1)])).await?;
        assert_eq!(order.status, OrderStatus::Unprocessed);
        assert!(order.processing_restaurant_id.is_none());
        assert_eq!(items.len(), 2);
        assert_eq!(order_price(&db, order.id).await?, 590.0);

        // Later price changes leave the order untouched
        crate::core::product::update_product(&db, burger.id, product_fields("Burger", 999.0))
            .await?;
        assert_eq!(order_price(&db, order.id).await?, 590.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_unknown_product_rolls_back() -> Result<()> {
        let db = setup_test_db().await?;
        let burger = create_custom_product(&db, "Burger", 250.0).await?;

        let result = create_order(&db, new_order(&[(burger.id, 1), (404, 1)])).await;
        assert!(matches!(result, Err(Error::ProductNotFound { id: 404 })));

        assert!(list_orders_with_price(&db, None).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_register_order_geocodes_address() -> Result<()> {
        let db = setup_test_db().await?;
        let geocoder = StubGeocoder::new().with("Red Square 1", (55.75, 37.62));
        let burger = create_custom_product(&db, "Burger", 250.0).await?;

        let mut submitted = new_order(&[(burger.id, 1)]);
        submitted.address = "Red Square 1".to_string();
        register_order(&db, &geocoder, submitted).await?;

        let cached = location::get_location(&db, "Red Square 1").await?.unwrap();
        assert_eq!(cached.coordinates(), Some((55.75, 37.62)));
        assert_eq!(geocoder.calls(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_orders_with_price() -> Result<()> {
        let db = setup_test_db().await?;
        let burger = create_custom_product(&db, "Burger", 100.0).await?;

        let (first, _) = create_order(&db, new_order(&[(burger.id, 1)])).await?;
        let (second, _) = create_order(&db, new_order(&[(burger.id, 3)])).await?;

        let priced = list_orders_with_price(&db, None).await?;
        assert_eq!(priced.len(), 2);
        assert_eq!(priced[0].order.id, second.id);
        assert_eq!(priced[0].price, 300.0);
        assert_eq!(priced[1].order.id, first.id);
        assert_eq!(priced[1].price, 100.0);

        let none = list_orders_with_price(&db, Some(&[OrderStatus::Cooking][..])).await?;
        assert!(none.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_order() -> Result<()> {
        let db = setup_test_db().await?;
        let burger = create_custom_product(&db, "Burger", 100.0).await?;
        let (order, _) = create_order(&db, new_order(&[(burger.id, 1)])).await?;

        delete_order(&db, order.id).await?;
        assert!(get_order_by_id(&db, order.id).await?.is_none());
        assert!(get_order_items(&db, order.id).await?.is_empty());

        let result = delete_order(&db, order.id).await;
        assert!(matches!(result, Err(Error::OrderNotFound { .. })));

        Ok(())
    }
}
