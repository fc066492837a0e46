//! OSRM route service response types.
//!
//! Only the fields the resolver reads are modelled; everything else in the
//! response (waypoints, legs, weights) is ignored.

use serde::Deserialize;

/// Provider code for a successful query.
pub const CODE_OK: &str = "Ok";

/// Top-level `/route/v1` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    /// `"Ok"` on success, otherwise an error code such as `"NoRoute"`.
    pub code: String,

    /// Human-readable error detail, only present on failure.
    #[serde(default)]
    pub message: Option<String>,

    /// Candidate routes; the first is the provider's preferred one.
    #[serde(default)]
    pub routes: Vec<RouteCandidate>,
}

impl RouteResponse {
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

/// One candidate route, with `geometries=geojson`.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteCandidate {
    /// Length in metres.
    pub distance: f64,

    /// Travel time in seconds.
    pub duration: f64,

    /// Path as a GeoJSON LineString in lon/lat.
    pub geometry: geojson::Geometry,
}
