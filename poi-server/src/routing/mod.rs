//! Foot routing via an OSRM route service.
//!
//! Clicking a POI asks the provider for walking routes from a fixed origin,
//! with alternatives enabled. The provider's own preference is ignored: the
//! candidate with the smallest distance is shown.
//!
//! Key characteristics of the provider:
//! - Coordinates go over the wire as `lon,lat` pairs (WGS84)
//! - Failure is signalled by a `code` other than `"Ok"`, often with HTTP 400
//! - Route geometry is requested as GeoJSON and reprojected for display

mod client;
mod convert;
mod error;
mod slot;
mod types;

pub use client::{OsrmClient, OsrmConfig};
pub use convert::{RouteResult, best_route, normalize, shortest};
pub use error::RouteError;
pub use slot::{Generation, RouteSlot};
pub use types::{CODE_OK, RouteCandidate, RouteResponse};
