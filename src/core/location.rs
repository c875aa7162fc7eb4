//! Location cache - geocoder answers stored per address.
//!
//! Every address that a restaurant or an order is saved with gets a [`location`] row.
//! Writes go through to the geocoder; there is no eviction. Stale rows are refreshed
//! lazily by [`get_or_fetch_location`].

use crate::{
    entities::{Location, location},
    errors::{Error, Result},
    geocoder::Geocoder,
};
use sea_orm::{Set, prelude::*};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Mean Earth radius in kilometres
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Looks up the cached location for `address`.
pub async fn get_location<C>(db: &C, address: &str) -> Result<Option<location::Model>>
where
    C: ConnectionTrait,
{
    Location::find()
        .filter(location::Column::Address.eq(address.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads cached locations for many addresses at once, keyed by address.
pub async fn get_locations<C>(
    db: &C,
    addresses: &[String],
) -> Result<HashMap<String, location::Model>>
where
    C: ConnectionTrait,
{
    let locations = Location::find()
        .filter(location::Column::Address.is_in(addresses.iter().map(|a| a.trim().to_string())))
        .all(db)
        .await?;

    Ok(locations
        .into_iter()
        .map(|location| (location.address.clone(), location))
        .collect())
}

/// Geocodes `address` and writes the answer into the cache.
///
/// Creates the row on first sight, otherwise overwrites its coordinates with the
/// geocoder's answer. The request timestamp is refreshed either way. A failing geocoder
/// is logged and never fails the caller: a new row is stored without coordinates and an
/// existing row keeps the ones it had.
///
/// # Errors
/// Returns a validation error for a blank address, or a database error.
pub async fn create_location_by_address(
    db: &DatabaseConnection,
    geocoder: &dyn Geocoder,
    address: &str,
) -> Result<location::Model> {
    let address = address.trim();
    if address.is_empty() {
        return Err(Error::validation("address", "Address cannot be empty"));
    }

    // None when the geocoder failed, Some(None) when it found nothing
    let answer = match geocoder.fetch_coordinates(address).await {
        Ok(coordinates) => Some(coordinates),
        Err(e) => {
            warn!("Geocoding {:?} failed: {}", address, e);
            None
        }
    };
    let now = chrono::Utc::now();

    if let Some(existing) = get_location(db, address).await? {
        debug!("Refreshing cached location for {:?}", address);
        let mut location: location::ActiveModel = existing.into();
        if let Some(coordinates) = answer {
            let (lat, lon) = coordinates.unzip();
            location.lat = Set(lat);
            location.lon = Set(lon);
        }
        location.last_request_to_geocoder = Set(now);
        return location.update(db).await.map_err(Into::into);
    }

    let (lat, lon) = answer.flatten().unzip();

    debug!("Caching new location for {:?}", address);
    location::ActiveModel {
        address: Set(address.to_string()),
        lat: Set(lat),
        lon: Set(lon),
        last_request_to_geocoder: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Returns the cached location, asking the geocoder again only when the row is
/// missing or older than `max_age`.
pub async fn get_or_fetch_location(
    db: &DatabaseConnection,
    geocoder: &dyn Geocoder,
    address: &str,
    max_age: chrono::Duration,
) -> Result<location::Model> {
    if let Some(cached) = get_location(db, address).await? {
        if chrono::Utc::now() - cached.last_request_to_geocoder < max_age {
            return Ok(cached);
        }
    }
    create_location_by_address(db, geocoder, address).await
}

/// Geocodes every address that has no cached location yet. Returns how many were added.
pub async fn ensure_locations(
    db: &DatabaseConnection,
    geocoder: &dyn Geocoder,
    addresses: &[String],
) -> Result<usize> {
    let cached = get_locations(db, addresses).await?;
    let mut added = 0;
    for address in addresses {
        let address = address.trim();
        if address.is_empty() || cached.contains_key(address) {
            continue;
        }
        // The same address may appear twice in `addresses`
        if get_location(db, address).await?.is_none() {
            create_location_by_address(db, geocoder, address).await?;
            added += 1;
        }
    }
    Ok(added)
}

/// Great-circle distance between two `(lat, lon)` points in kilometres.
#[must_use]
pub fn distance_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
