//! Loading POI layers from GeoJSON.
//!
//! Layers come either from a local `.geojson` file or from a WFS
//! `GetFeature` request with `outputFormat=application/json`. Either way the
//! payload is a FeatureCollection in WGS84 whose features are reprojected
//! into the working projection as they are read.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use geo::Coord;
use geojson::{Feature, FeatureCollection};
use serde_json::Map;
use tracing::{info, warn};

use crate::domain::{LonLat, PoiCollection, PoiRecord};

use super::error::LayerError;

/// Where a layer is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSource {
    File(PathBuf),
    Url(String),
}

impl LayerSource {
    /// Interpret `s` as a URL when it has an http(s) scheme, else as a path.
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            LayerSource::Url(s.to_string())
        } else {
            LayerSource::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for LayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerSource::File(path) => write!(f, "{}", path.display()),
            LayerSource::Url(url) => f.write_str(url),
        }
    }
}

/// Load a POI layer from `source`.
pub async fn load_pois(
    source: &LayerSource,
    timeout: Duration,
) -> Result<PoiCollection, LayerError> {
    let body = read_source(source, timeout).await?;
    let pois = parse_pois(&body)?;
    info!(%source, count = pois.len(), "loaded POI layer");
    Ok(pois)
}

/// Load a display-only overlay (boundary, roads) from `source`.
///
/// Features are kept exactly as delivered, in lon/lat and with any geometry
/// type, since the server only hands them back to the map client.
pub async fn load_overlay(
    source: &LayerSource,
    timeout: Duration,
) -> Result<FeatureCollection, LayerError> {
    let body = read_source(source, timeout).await?;
    let overlay = parse_collection(&body)?;
    info!(%source, count = overlay.features.len(), "loaded overlay layer");
    Ok(overlay)
}

async fn read_source(source: &LayerSource, timeout: Duration) -> Result<String, LayerError> {
    match source {
        LayerSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LayerError::Io {
                    path: path.display().to_string(),
                    source,
                })
        }
        LayerSource::Url(url) => fetch_layer(url, timeout).await,
    }
}

fn parse_collection(body: &str) -> Result<FeatureCollection, LayerError> {
    serde_json::from_str(body).map_err(|e| LayerError::GeoJson {
        message: e.to_string(),
    })
}

async fn fetch_layer(url: &str, timeout: Duration) -> Result<String, LayerError> {
    let http = reqwest::Client::builder().timeout(timeout).build()?;
    let response = http.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LayerError::Api {
            status: status.as_u16(),
            message: body.chars().take(500).collect(),
        });
    }

    Ok(response.text().await?)
}

/// Parse a FeatureCollection body into POI records.
///
/// Features without a point geometry are skipped with a warning; their
/// attributes cannot be placed on the map.
pub fn parse_pois(body: &str) -> Result<PoiCollection, LayerError> {
    let collection = parse_collection(body)?;

    let total = collection.features.len();
    let pois: PoiCollection = collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(index, feature)| {
            let record = feature_to_poi(feature);
            if record.is_none() {
                warn!(index, "skipping feature without a point geometry");
            }
            record
        })
        .collect();

    if pois.len() < total {
        warn!(kept = pois.len(), total, "some features were skipped");
    }

    Ok(pois)
}

fn feature_to_poi(feature: Feature) -> Option<PoiRecord> {
    let geometry = geo::Geometry::<f64>::try_from(feature.geometry?).ok()?;

    let lon_lat = match geometry {
        geo::Geometry::Point(p) => p.0,
        // WFS exports of point layers are often MultiPoint with one member
        geo::Geometry::MultiPoint(mp) => mp.0.first()?.0,
        _ => return None,
    };

    if !lon_lat.x.is_finite() || !lon_lat.y.is_finite() {
        return None;
    }

    let coordinate: Coord<f64> = LonLat::from(lon_lat).to_mercator();
    let props = feature.properties.unwrap_or_else(Map::new);
    Some(PoiRecord::from_properties(coordinate, &props))
}
