//! Location entity - Cached geocoder answer for one address.
//!
//! Coordinates are `None` when the geocoder could not resolve the address.
//! `last_request_to_geocoder` is set on every lookup and drives staleness checks.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Location database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    /// Unique identifier for the location
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Address exactly as it was geocoded
    #[sea_orm(unique)]
    pub address: String,
    /// Latitude in degrees
    pub lat: Option<f64>,
    /// Longitude in degrees
    pub lon: Option<f64>,
    /// When the geocoder was last asked about this address
    pub last_request_to_geocoder: DateTimeUtc,
}

impl Model {
    /// Resolved `(lat, lon)` pair, if the geocoder found the address.
    #[must_use]
    pub const fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Location has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
