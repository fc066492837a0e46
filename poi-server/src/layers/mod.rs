//! POI layer input and GeoJSON output.
//!
//! Layers are read once at startup from a GeoJSON file or a WFS endpoint.
//! The POI layer is kept in the working projection; the boundary and road
//! overlays are kept as delivered. The export side turns the collection
//! back into lon/lat GeoJSON for the map client.

mod error;
mod export;
mod loader;

pub use error::LayerError;
pub use export::{pois_to_geojson, route_to_feature};
pub use loader::{LayerSource, load_overlay, load_pois, parse_pois};
