//! Unified error type for the order management backend.
//!
//! Validation failures are ordinary values of [`Error::Validation`] so the admin layer can
//! show them next to the offending field instead of treating them as system failures.

use thiserror::Error;

/// Every error the crate can produce
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or was invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A form-level validation error, meant to be displayed inline
    #[error("{field}: {message}")]
    Validation {
        /// Form field the error is attached to
        field: String,
        /// Human-readable message
        message: String,
    },

    /// Restaurant lookup failed
    #[error("Restaurant not found: {id}")]
    RestaurantNotFound {
        /// Requested restaurant id
        id: i64,
    },

    /// Product lookup failed
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// Requested product id
        id: i64,
    },

    /// Order lookup failed
    #[error("Order not found: {id}")]
    OrderNotFound {
        /// Requested order id
        id: i64,
    },

    /// A price was negative or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// An order item quantity was not positive
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i32,
    },

    /// The geocoding service answered with something we could not use
    #[error("Geocoder error: {message}")]
    Geocoder {
        /// What went wrong
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Failed to build an HTTP response
    #[error("HTTP error: {0}")]
    Http(#[from] http::Error),
}

impl Error {
    /// Shorthand for a validation error on `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
