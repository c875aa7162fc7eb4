//! Application settings loaded from config.toml
//!
//! Every field has a default, so a partial (or empty) config.toml still loads. Secrets
//! such as the geocoder API key are never stored in the file; the file only names the
//! environment variable that holds them.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Hosts an admin redirect (`next=`) may point to
    pub allowed_hosts: Vec<String>,
    /// Default post-save destination of the order change screen
    pub changelist_url: String,
    /// Cached locations older than this are geocoded again on lookup
    pub location_max_age_days: i64,
    /// Geocoder client settings
    pub geocoder: GeocoderSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            allowed_hosts: vec!["localhost".to_string(), "127.0.0.1".to_string()],
            changelist_url: "/admin/foodcartapp/order/".to_string(),
            location_max_age_days: 30,
            geocoder: GeocoderSettings::default(),
        }
    }
}

/// Settings for the HTTP geocoder
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderSettings {
    /// Geocoder endpoint
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://geocode-maps.yandex.ru/1.x".to_string(),
            api_key_env: "YANDEX_GEOCODER_API_KEY".to_string(),
        }
    }
}

impl GeocoderSettings {
    /// Reads the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env).map_err(Into::into)
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load settings from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config file {}: {e}", path_ref.display()),
    })
}

/// Loads settings from ./config.toml, falling back to defaults when the file is absent.
pub fn load_default_settings() -> Result<Settings> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_settings(path)
    } else {
        tracing::info!("config.toml not found, using default settings");
        Ok(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_settings() {
        let toml_str = r#"
            allowed_hosts = ["starburger.example", "localhost:8000"]
            changelist_url = "/manager/orders/"
            location_max_age_days = 7

            [geocoder]
            api_key_env = "GEOCODER_KEY"
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.allowed_hosts, ["starburger.example", "localhost:8000"]);
        assert_eq!(settings.changelist_url, "/manager/orders/");
        assert_eq!(settings.location_max_age_days, 7);
        assert_eq!(settings.geocoder.api_key_env, "GEOCODER_KEY");
        // Unset keys inside a table keep their defaults
        assert_eq!(
            settings.geocoder.base_url,
            "https://geocode-maps.yandex.ru/1.x"
        );
    }

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.changelist_url, "/admin/foodcartapp/order/");
        assert!(settings.allowed_hosts.contains(&"localhost".to_string()));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let result = load_settings("definitely/not/here/config.toml");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}
