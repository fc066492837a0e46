//! Application state for the web layer.

use std::sync::Arc;

use geojson::FeatureCollection;
use tokio::sync::Mutex;

use crate::cache::CachedRouteResolver;
use crate::domain::{LonLat, PoiCollection};
use crate::routing::RouteSlot;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Loaded POI layer; `None` when loading failed at startup
    pub pois: Option<Arc<PoiCollection>>,

    /// City boundary overlay; `None` when unset or not loaded
    pub boundary: Option<Arc<FeatureCollection>>,

    /// Road network overlay; `None` when unset or not loaded
    pub roads: Option<Arc<FeatureCollection>>,

    /// Cached routing client
    pub resolver: Arc<CachedRouteResolver>,

    /// The single route currently shown
    pub route_slot: Arc<Mutex<RouteSlot>>,

    /// Start point of every route
    pub origin: LonLat,
}

impl AppState {
    /// Create a new app state without overlays.
    pub fn new(pois: Option<PoiCollection>, resolver: CachedRouteResolver, origin: LonLat) -> Self {
        Self {
            pois: pois.map(Arc::new),
            boundary: None,
            roads: None,
            resolver: Arc::new(resolver),
            route_slot: Arc::new(Mutex::new(RouteSlot::new())),
            origin,
        }
    }

    /// Attach the boundary overlay.
    pub fn with_boundary(mut self, boundary: Option<FeatureCollection>) -> Self {
        self.boundary = boundary.map(Arc::new);
        self
    }

    /// Attach the road overlay.
    pub fn with_roads(mut self, roads: Option<FeatureCollection>) -> Self {
        self.roads = roads.map(Arc::new);
        self
    }
}
