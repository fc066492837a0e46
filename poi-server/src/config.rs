//! Server configuration from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::LonLat;
use crate::layers::LayerSource;

/// Default POI layer location.
const DEFAULT_POI_SOURCE: &str = "data/pois.geojson";

/// Default routing origin: GIS Centre, Lund.
const DEFAULT_ORIGIN: LonLat = LonLat {
    lon: 13.20072,
    lat: 55.70886,
};

const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";

/// Error reading the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub poi_source: LayerSource,
    /// City boundary overlay, served as-is when set.
    pub boundary_source: Option<LayerSource>,
    /// Road network overlay, served as-is when set.
    pub roads_source: Option<LayerSource>,
    /// Fixed start point of every route.
    pub origin: LonLat,
    pub osrm_base_url: String,
    pub osrm_timeout: Duration,
    pub route_cache_ttl: Duration,
    pub static_dir: String,
}

impl ServerConfig {
    pub fn new() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            poi_source: LayerSource::parse(DEFAULT_POI_SOURCE),
            boundary_source: None,
            roads_source: None,
            origin: DEFAULT_ORIGIN,
            osrm_base_url: DEFAULT_OSRM_BASE_URL.to_string(),
            osrm_timeout: Duration::from_secs(30),
            route_cache_ttl: Duration::from_secs(10 * 60),
            static_dir: "static".to_string(),
        }
    }

    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults
    /// for unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Some(addr) = lookup("POI_BIND_ADDR") {
            config.bind_addr = parse_var("POI_BIND_ADDR", &addr)?;
        }
        if let Some(source) = lookup("POI_SOURCE") {
            config.poi_source = LayerSource::parse(source.trim());
        }
        config.boundary_source = optional_source(lookup("BOUNDARY_SOURCE"));
        config.roads_source = optional_source(lookup("ROADS_SOURCE"));

        let lon = lookup("POI_ORIGIN_LON")
            .map(|v| parse_var::<f64>("POI_ORIGIN_LON", &v))
            .transpose()?;
        let lat = lookup("POI_ORIGIN_LAT")
            .map(|v| parse_var::<f64>("POI_ORIGIN_LAT", &v))
            .transpose()?;
        let origin = LonLat::new(
            lon.unwrap_or(config.origin.lon),
            lat.unwrap_or(config.origin.lat),
        );
        if !origin.is_valid() {
            return Err(ConfigError::Invalid {
                var: "POI_ORIGIN_LON/POI_ORIGIN_LAT",
                value: origin.to_string(),
            });
        }
        config.origin = origin;

        if let Some(url) = lookup("OSRM_BASE_URL") {
            config = config.with_osrm_base_url(url);
        }
        if let Some(secs) = lookup("OSRM_TIMEOUT_SECS") {
            let timeout: u64 = parse_var("OSRM_TIMEOUT_SECS", &secs)?;
            // A zero timeout fails every request
            if timeout == 0 {
                return Err(ConfigError::Invalid {
                    var: "OSRM_TIMEOUT_SECS",
                    value: secs,
                });
            }
            config.osrm_timeout = Duration::from_secs(timeout);
        }
        if let Some(secs) = lookup("ROUTE_CACHE_TTL_SECS") {
            config.route_cache_ttl =
                Duration::from_secs(parse_var("ROUTE_CACHE_TTL_SECS", &secs)?);
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            config.static_dir = dir;
        }

        Ok(config)
    }

    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_poi_source(mut self, source: LayerSource) -> Self {
        self.poi_source = source;
        self
    }

    pub fn with_boundary_source(mut self, source: LayerSource) -> Self {
        self.boundary_source = Some(source);
        self
    }

    pub fn with_roads_source(mut self, source: LayerSource) -> Self {
        self.roads_source = Some(source);
        self
    }

    pub fn with_origin(mut self, origin: LonLat) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_osrm_base_url(mut self, url: impl Into<String>) -> Self {
        self.osrm_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_osrm_timeout(mut self, timeout: Duration) -> Self {
        self.osrm_timeout = timeout;
        self
    }

    pub fn with_route_cache_ttl(mut self, ttl: Duration) -> Self {
        self.route_cache_ttl = ttl;
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<String>) -> Self {
        self.static_dir = dir.into();
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Blank values count as unset.
fn optional_source(value: Option<String>) -> Option<LayerSource> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(LayerSource::parse)
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(
            config.poi_source,
            LayerSource::File(PathBuf::from(DEFAULT_POI_SOURCE))
        );
        assert_eq!(config.origin, LonLat::new(13.20072, 55.70886));
        assert_eq!(config.osrm_base_url, "https://router.project-osrm.org");
        assert_eq!(config.osrm_timeout, Duration::from_secs(30));
        assert_eq!(config.route_cache_ttl, Duration::from_secs(600));
        assert_eq!(config.static_dir, "static");
        assert!(config.boundary_source.is_none());
        assert!(config.roads_source.is_none());
    }

    #[test]
    fn overlay_sources() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("BOUNDARY_SOURCE", "data/boundary.geojson"),
            ("ROADS_SOURCE", "https://gis.example.org/wfs?typeName=roads"),
        ]))
        .unwrap();
        assert_eq!(
            config.boundary_source,
            Some(LayerSource::File(PathBuf::from("data/boundary.geojson")))
        );
        assert!(matches!(config.roads_source, Some(LayerSource::Url(_))));

        let config = ServerConfig::from_lookup(lookup_from(&[("ROADS_SOURCE", "  ")])).unwrap();
        assert!(config.roads_source.is_none());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err =
            ServerConfig::from_lookup(lookup_from(&[("OSRM_TIMEOUT_SECS", "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "OSRM_TIMEOUT_SECS",
                value: "0".into()
            }
        );
    }

    #[test]
    fn reads_every_variable() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("POI_BIND_ADDR", "0.0.0.0:8080"),
            ("POI_SOURCE", "https://gis.example.org/wfs?request=GetFeature"),
            ("POI_ORIGIN_LON", "13.19"),
            ("POI_ORIGIN_LAT", " 55.70 "),
            ("OSRM_BASE_URL", "http://localhost:5000/"),
            ("OSRM_TIMEOUT_SECS", "5"),
            ("ROUTE_CACHE_TTL_SECS", "60"),
            ("STATIC_DIR", "/srv/static"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert!(matches!(config.poi_source, LayerSource::Url(_)));
        assert_eq!(config.origin, LonLat::new(13.19, 55.70));
        assert_eq!(config.osrm_base_url, "http://localhost:5000");
        assert_eq!(config.osrm_timeout, Duration::from_secs(5));
        assert_eq!(config.route_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.static_dir, "/srv/static");
    }

    #[test]
    fn partial_origin_keeps_other_default() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("POI_ORIGIN_LAT", "55.6")])).unwrap();
        assert_eq!(config.origin, LonLat::new(13.20072, 55.6));
    }

    #[test]
    fn rejects_bad_values() {
        let err = ServerConfig::from_lookup(lookup_from(&[("OSRM_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "OSRM_TIMEOUT_SECS",
                value: "soon".into()
            }
        );

        assert!(ServerConfig::from_lookup(lookup_from(&[("POI_BIND_ADDR", "nope")])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[("POI_ORIGIN_LAT", "95")])).is_err());
    }

    #[test]
    fn builder() {
        let config = ServerConfig::new()
            .with_origin(LonLat::new(1.0, 2.0))
            .with_osrm_base_url("http://osrm/")
            .with_static_dir("assets")
            .with_route_cache_ttl(Duration::from_secs(1));

        assert_eq!(config.origin, LonLat::new(1.0, 2.0));
        assert_eq!(config.osrm_base_url, "http://osrm");
        assert_eq!(config.static_dir, "assets");
        assert_eq!(config.route_cache_ttl, Duration::from_secs(1));
    }
}
