//! OSRM route service HTTP client.
//!
//! Issues a single `/route/v1/{profile}` request with alternatives enabled
//! and reduces the answer to the shortest candidate. There are no retries:
//! a failed request is reported to the caller as-is.

use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::LonLat;

use super::convert::{RouteResult, best_route};
use super::error::RouteError;
use super::types::RouteResponse;

/// Default base URL: the public OSRM demo server.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Default routing profile.
const DEFAULT_PROFILE: &str = "foot";

/// Default snapping radius for both endpoints, in metres.
const DEFAULT_SNAP_RADIUS_M: u32 = 150;

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of the OSRM server
    pub base_url: String,
    /// Routing profile segment of the URL
    pub profile: String,
    /// Maximum distance an endpoint may be snapped to the network
    pub snap_radius_m: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OsrmConfig {
    /// Create a config pointing at the public demo server.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            snap_radius_m: DEFAULT_SNAP_RADIUS_M,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (self-hosted OSRM, or tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the routing profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the endpoint snapping radius.
    pub fn with_snap_radius(mut self, metres: u32) -> Self {
        self.snap_radius_m = metres;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// OSRM route service client.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    config: OsrmConfig,
}

impl OsrmClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OsrmConfig) -> Result<Self, RouteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    /// Build the request URL for a route between two points.
    ///
    /// The query is assembled by hand so the `;` separating the two radii
    /// reaches the server unescaped.
    pub fn route_url(&self, origin: LonLat, destination: LonLat) -> String {
        let radius = self.config.snap_radius_m;
        format!(
            "{}/route/v1/{}/{};{}?overview=full&geometries=geojson&alternatives=true&steps=false&radiuses={radius};{radius}",
            self.config.base_url, self.config.profile, origin, destination,
        )
    }

    /// Fetch the provider's candidate routes between two points.
    ///
    /// A body that decodes as a route response is returned even when the
    /// HTTP status is an error, because OSRM reports "no route" as a 400
    /// with a JSON body.
    pub async fn fetch(
        &self,
        origin: LonLat,
        destination: LonLat,
    ) -> Result<RouteResponse, RouteError> {
        for point in [origin, destination] {
            if !point.is_valid() {
                return Err(RouteError::InvalidCoordinate(point));
            }
        }

        let url = self.route_url(origin, destination);
        debug!(%url, "requesting route");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<RouteResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(RouteError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            }),
            Err(e) => Err(RouteError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            }),
        }
    }

    /// Resolve the shortest route between two points.
    pub async fn resolve(
        &self,
        origin: LonLat,
        destination: LonLat,
    ) -> Result<RouteResult, RouteError> {
        let response = self.fetch(origin, destination).await?;
        let candidates = response.routes.len();

        let route = best_route(response).inspect_err(|e| warn!(%e, "route resolution failed"))?;

        debug!(
            candidates,
            distance_m = route.distance_meters,
            duration_s = route.duration_seconds,
            "resolved route"
        );
        Ok(route)
    }
}
