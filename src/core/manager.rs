//! Manager dashboard data - open orders with the restaurants that could cook them.
//!
//! Reads only from the location cache; nothing here calls the geocoder.

use crate::{
    core::{location, order, restaurant},
    entities::{OrderStatus, order as order_entity, restaurant as restaurant_entity},
    errors::Result,
};
use sea_orm::{DatabaseConnection, Iterable};
use std::cmp::Ordering;

/// A restaurant able to cook an order, with its distance to the delivery address
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantOption {
    /// The candidate restaurant
    pub restaurant: restaurant_entity::Model,
    /// Kilometres to the delivery address, if both addresses are geocoded
    pub distance_km: Option<f64>,
}

/// One row of the manager dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCard {
    /// The open order
    pub order: order_entity::Model,
    /// Sum of item subtotals
    pub price: f64,
    /// Restaurants able to cook it, nearest first; unknown distances last
    pub restaurants: Vec<RestaurantOption>,
}

fn by_distance(a: &RestaurantOption, b: &RestaurantOption) -> Ordering {
    match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.restaurant.name.cmp(&b.restaurant.name),
    }
}

/// Lists orders that are neither delivered nor cancelled, ordered by status then id,
/// each with its candidate restaurants.
pub async fn unfinished_orders_with_restaurants(
    db: &DatabaseConnection,
) -> Result<Vec<OrderCard>> {
    let open_statuses: Vec<OrderStatus> =
        OrderStatus::iter().filter(|s| !s.is_terminal()).collect();

    let mut orders = order::list_orders_with_price(db, Some(open_statuses.as_slice())).await?;
    orders.sort_by_key(|priced| (priced.order.status.rank(), priced.order.id));

    let mut addresses: Vec<String> = orders.iter().map(|p| p.order.address.clone()).collect();
    addresses.extend(
        restaurant::get_all_restaurants(db)
            .await?
            .into_iter()
            .map(|r| r.address),
    );
    let locations = location::get_locations(db, &addresses).await?;
    let coordinates_of = |address: &str| {
        locations
            .get(address)
            .and_then(crate::entities::location::Model::coordinates)
    };

    let mut cards = Vec::with_capacity(orders.len());
    for priced in orders {
        let product_ids = order::get_order_product_ids(db, priced.order.id).await?;
        let order_point = coordinates_of(&priced.order.address);

        let mut restaurants: Vec<RestaurantOption> =
            restaurant::get_available_restaurants(db, &product_ids)
                .await?
                .into_iter()
                .map(|restaurant| {
                    let distance_km = order_point
                        .zip(coordinates_of(&restaurant.address))
                        .map(|(to, from)| location::distance_km(from, to));
                    RestaurantOption {
                        restaurant,
                        distance_km,
                    }
                })
                .collect();
        restaurants.sort_by(by_distance);

        cards.push(OrderCard {
            order: priced.order,
            price: priced.price,
            restaurants,
        });
    }

    Ok(cards)
}
