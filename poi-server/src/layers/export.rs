//! GeoJSON output for the map client.

use geo::Point;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::domain::{LonLat, PoiCollection, keys};
use crate::routing::RouteResult;

use super::error::LayerError;

/// The POI layer as a FeatureCollection in WGS84, with each feature's
/// `id` property set to its POI id.
pub fn pois_to_geojson(pois: &PoiCollection) -> Result<FeatureCollection, LayerError> {
    let features = pois
        .iter()
        .map(|(id, poi)| {
            let lon_lat = LonLat::from_mercator(poi.coordinate);
            let geometry = Geometry::new(GeoJsonValue::from(&Point::new(
                lon_lat.lon,
                lon_lat.lat,
            )));

            let value = json!({
                "type": "Feature",
                "geometry": geometry,
                "properties": {
                    "id": id,
                    (keys::NAME): poi.name,
                    (keys::CATEGORY): poi.category,
                    (keys::RATING): poi.rating_raw,
                    (keys::PRICE_RANGE): poi.price_range_raw,
                    (keys::OPEN_HOURS): poi.open_hours_raw,
                }
            });

            Feature::from_json_value(value).map_err(|e| LayerError::GeoJson {
                message: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

/// A route as a GeoJSON Feature in the working projection, carrying the
/// display metrics as properties.
pub fn route_to_feature(route: &RouteResult) -> Result<Feature, LayerError> {
    let geometry = Geometry::new(GeoJsonValue::from(&route.path));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "distance_km": route.distance_km,
            "duration_min": route.duration_min,
            "distance_m": route.distance_meters,
            "duration_s": route.duration_seconds,
        }
    });

    Feature::from_json_value(value).map_err(|e| LayerError::GeoJson {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PoiRecord;
    use geo::LineString;

    #[test]
    fn pois_export_in_lon_lat() {
        let pois = PoiCollection::new(vec![
            PoiRecord::at(LonLat::new(13.1932, 55.7058).to_mercator())
                .with_name("Saluhallen")
                .with_price_range("80-200"),
        ]);

        let collection = pois_to_geojson(&pois).unwrap();
        let json = serde_json::to_value(&collection).unwrap();
        let feature = &json["features"][0];

        let coords = feature["geometry"]["coordinates"].as_array().unwrap();
        assert!((coords[0].as_f64().unwrap() - 13.1932).abs() < 1e-9);
        assert!((coords[1].as_f64().unwrap() - 55.7058).abs() < 1e-9);
        assert_eq!(feature["properties"]["id"], 0);
        assert_eq!(feature["properties"]["name"], "Saluhallen");
        assert_eq!(feature["properties"]["price_rang"], "80-200");
        assert!(feature["properties"]["rating"].is_null());
    }

    #[test]
    fn route_feature_properties() {
        let route = RouteResult {
            path: LineString::from(vec![(0.0, 0.0), (100.0, 100.0)]),
            distance_meters: 1520.0,
            duration_seconds: 1100.0,
            distance_km: 1.52,
            duration_min: 18,
        };

        let json = serde_json::to_value(route_to_feature(&route).unwrap()).unwrap();
        assert_eq!(json["geometry"]["type"], "LineString");
        assert_eq!(json["properties"]["distance_km"], 1.52);
        assert_eq!(json["properties"]["duration_min"], 18);
    }
}
