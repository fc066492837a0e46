//! Geographic and display projections.
//!
//! Layers and the routing provider speak WGS84 longitude/latitude
//! (EPSG:4326). Selection and display work in spherical Web Mercator
//! (EPSG:3857) metres, so every coordinate is reprojected once on the way in.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;

use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

/// Sphere radius used by Web Mercator, in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude beyond which Web Mercator is undefined in practice.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// A WGS84 position in longitude/latitude order.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Project into Web Mercator. Latitudes are clamped to [`MAX_LATITUDE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use poi_server::domain::LonLat;
    ///
    /// let origin = LonLat::new(0.0, 0.0).to_mercator();
    /// assert!(origin.x.abs() < 1e-9 && origin.y.abs() < 1e-9);
    /// ```
    pub fn to_mercator(self) -> Coord<f64> {
        let lat = self.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        Coord {
            x: EARTH_RADIUS_M * self.lon.to_radians(),
            y: EARTH_RADIUS_M * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln(),
        }
    }

    /// Inverse of [`LonLat::to_mercator`].
    pub fn from_mercator(coord: Coord<f64>) -> Self {
        Self {
            lon: (coord.x / EARTH_RADIUS_M).to_degrees(),
            lat: (2.0 * (coord.y / EARTH_RADIUS_M).exp().atan() - FRAC_PI_2).to_degrees(),
        }
    }

    /// Whether both components are finite and inside the valid WGS84 range.
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl From<Coord<f64>> for LonLat {
    /// Interpret a raw `(x, y)` pair as `(lon, lat)` without projecting.
    fn from(c: Coord<f64>) -> Self {
        Self { lon: c.x, lat: c.y }
    }
}

impl fmt::Debug for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LonLat({:.6}, {:.6})", self.lon, self.lat)
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

/// Reproject a lon/lat line into Web Mercator.
pub fn line_to_mercator(line: &LineString<f64>) -> LineString<f64> {
    line.coords()
        .map(|c| LonLat::from(*c).to_mercator())
        .collect()
}
