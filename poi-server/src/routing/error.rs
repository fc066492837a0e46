//! Routing client error types.

use crate::domain::LonLat;

/// Errors from resolving a route.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with an error status and an unreadable body
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Provider reported no usable route between the two points
    #[error("no route found (provider code {code})")]
    NoRouteFound { code: String },

    /// Route geometry could not be converted to a line
    #[error("invalid route geometry: {0}")]
    InvalidGeometry(String),

    /// Endpoint is not a valid longitude/latitude
    #[error("invalid coordinate: {0:?}")]
    InvalidCoordinate(LonLat),
}
