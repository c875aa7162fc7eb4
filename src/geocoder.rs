//! Geocoding client - resolves street addresses to coordinates.
//!
//! The rest of the crate only sees the [`Geocoder`] trait. [`YandexGeocoder`] is the
//! production implementation backed by the Yandex geocoder HTTP API.

use crate::{
    config::GeocoderSettings,
    errors::{Error, Result},
};
use async_trait::async_trait;

/// Anything that can turn an address into `(lat, lon)`.
///
/// `Ok(None)` means the service answered but knows no such address.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Looks up the coordinates of `address`.
    async fn fetch_coordinates(&self, address: &str) -> Result<Option<(f64, f64)>>;
}

/// Yandex geocoder HTTP client
#[derive(Debug, Clone)]
pub struct YandexGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YandexGeocoder {
    /// Creates a client for `base_url` authenticated with `api_key`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Creates a client from settings, reading the API key from the environment.
    pub fn from_settings(settings: &GeocoderSettings) -> Result<Self> {
        let api_key = settings.api_key().map_err(|e| Error::Config {
            message: format!("{} is not set: {e}", settings.api_key_env),
        })?;
        Ok(Self::new(settings.base_url.clone(), api_key))
    }
}

#[async_trait]
impl Geocoder for YandexGeocoder {
    async fn fetch_coordinates(&self, address: &str) -> Result<Option<(f64, f64)>> {
        let resp: serde_json::Value = self
            .client
            .get(&self.base_url)
            .query(&[
                ("geocode", address),
                ("apikey", self.api_key.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_coordinates(&resp)
    }
}

/// Extracts `(lat, lon)` of the best match from a Yandex geocoder JSON answer.
///
/// Yandex reports positions as `"lon lat"`.
fn parse_coordinates(resp: &serde_json::Value) -> Result<Option<(f64, f64)>> {
    let members = resp["response"]["GeoObjectCollection"]["featureMember"]
        .as_array()
        .ok_or_else(|| Error::Geocoder {
            message: format!("unexpected response: {resp}"),
        })?;

    let Some(most_relevant) = members.first() else {
        return Ok(None);
    };

    let pos = most_relevant["GeoObject"]["Point"]["pos"]
        .as_str()
        .ok_or_else(|| Error::Geocoder {
            message: "match has no position".to_string(),
        })?;

    let mut parts = pos.split_whitespace().map(str::parse::<f64>);
    match (parts.next(), parts.next()) {
        (Some(Ok(lon)), Some(Ok(lat))) => Ok(Some((lat, lon))),
        _ => Err(Error::Geocoder {
            message: format!("malformed position: {pos}"),
        }),
    }
}
