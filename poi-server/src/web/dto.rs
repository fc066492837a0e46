//! Data transfer objects for web requests and responses.

use chrono::NaiveDateTime;
use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::domain::{LonLat, PoiId, PoiRecord};
use crate::region::{Region, RegionError};

/// A drawn region as sent by the map client, in the working projection.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegionDto {
    Polygon { coordinates: Vec<[f64; 2]> },
    Box { corners: [[f64; 2]; 2] },
    Circle { center: [f64; 2], radius: f64 },
}

impl TryFrom<RegionDto> for Region {
    type Error = RegionError;

    fn try_from(dto: RegionDto) -> Result<Self, Self::Error> {
        match dto {
            RegionDto::Polygon { coordinates } => {
                Region::polygon(coordinates.into_iter().map(coord).collect())
            }
            RegionDto::Box { corners: [a, b] } => Region::from_corners(coord(a), coord(b)),
            RegionDto::Circle { center, radius } => Region::circle(coord(center), radius),
        }
    }
}

fn coord([x, y]: [f64; 2]) -> Coord<f64> {
    Coord { x, y }
}

/// Request to summarise a drawn region.
#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub region: RegionDto,

    /// Local wall-clock instant for opening hours (defaults to now)
    #[serde(default)]
    pub at: Option<NaiveDateTime>,
}

/// Request to route from the origin to a POI.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub poi_id: usize,
}

/// The route slot as returned to the client.
#[derive(Debug, Serialize)]
pub struct RouteView {
    /// Request generation that produced this route
    pub generation: u64,

    /// Whether this route is what the slot now holds. `false` when a newer
    /// request superseded it while it was in flight.
    pub current: bool,

    /// Route path in the working projection, metrics as properties
    pub feature: geojson::Feature,
}

/// Details of a single POI.
#[derive(Debug, Serialize)]
pub struct PoiDetails {
    pub id: PoiId,
    pub name: Option<String>,
    pub category: Option<String>,
    pub open_hours: Option<String>,
    pub rating: Option<String>,
    pub price_range: Option<String>,
    pub location: LonLat,
}

impl PoiDetails {
    /// Create from a domain record.
    pub fn from_record(id: PoiId, poi: &PoiRecord) -> Self {
        Self {
            id,
            name: poi.name.clone(),
            category: poi.category.clone(),
            open_hours: poi.open_hours_raw.clone(),
            rating: poi.rating_raw.clone(),
            price_range: poi.price_range_raw.clone(),
            location: LonLat::from_mercator(poi.coordinate),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
