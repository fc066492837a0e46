//! Caching layer for resolved routes.
//!
//! The routing origin is fixed, so repeated clicks on the same POI ask the
//! provider the same question. Resolved routes are cached by their endpoint
//! pair, quantized so that floating-point noise from reprojection does not
//! defeat the cache. Failures are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::LonLat;
use crate::routing::{OsrmClient, RouteError, RouteResult};

/// Cache key: origin and destination, each as quantized (lon, lat).
type RouteKey = (i64, i64, i64, i64);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,

    /// Quantization step in degrees. 1e-5 degrees is roughly a metre.
    pub step_degrees: f64,
}

impl CacheConfig {
    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 1000,
            step_degrees: 1e-5,
        }
    }
}

/// Cache of resolved routes.
pub struct RouteCache {
    routes: MokaCache<RouteKey, Arc<RouteResult>>,
    step_degrees: f64,
}

impl RouteCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            routes,
            step_degrees: config.step_degrees,
        }
    }

    /// Quantize an endpoint pair into a cache key.
    fn key(&self, origin: LonLat, destination: LonLat) -> RouteKey {
        let q = |v: f64| (v / self.step_degrees).round() as i64;
        (
            q(origin.lon),
            q(origin.lat),
            q(destination.lon),
            q(destination.lat),
        )
    }

    pub async fn get(&self, origin: LonLat, destination: LonLat) -> Option<Arc<RouteResult>> {
        self.routes.get(&self.key(origin, destination)).await
    }

    pub async fn insert(&self, origin: LonLat, destination: LonLat, route: Arc<RouteResult>) {
        self.routes
            .insert(self.key(origin, destination), route)
            .await;
    }

    /// Number of live entries, after applying pending inserts and expiries.
    pub async fn entry_count(&self) -> u64 {
        self.routes.run_pending_tasks().await;
        self.routes.entry_count()
    }
}

/// OSRM client with caching.
///
/// Wraps an `OsrmClient` and caches successful resolutions.
pub struct CachedRouteResolver {
    client: OsrmClient,
    cache: RouteCache,
}

impl CachedRouteResolver {
    /// Create a new cached resolver.
    pub fn new(client: OsrmClient, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: RouteCache::new(cache_config),
        }
    }

    /// Resolve the shortest route, using the cache if available.
    pub async fn resolve(
        &self,
        origin: LonLat,
        destination: LonLat,
    ) -> Result<Arc<RouteResult>, RouteError> {
        if let Some(cached) = self.cache.get(origin, destination).await {
            debug!(%origin, %destination, "route cache hit");
            return Ok(cached);
        }

        let route = Arc::new(self.client.resolve(origin, destination).await?);
        self.cache
            .insert(origin, destination, route.clone())
            .await;

        Ok(route)
    }

    /// Number of cached routes.
    pub async fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count().await
    }
}
