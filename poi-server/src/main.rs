use std::process::ExitCode;
use std::time::Duration;

use geojson::FeatureCollection;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use poi_server::cache::{CacheConfig, CachedRouteResolver};
use poi_server::config::ServerConfig;
use poi_server::layers::{LayerSource, load_overlay, load_pois};
use poi_server::routing::{OsrmClient, OsrmConfig};
use poi_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("poi_server=info,tower_http=info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(%e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // A failed load disables selection and routing but keeps the server up
    let pois = match load_pois(&config.poi_source, config.osrm_timeout).await {
        Ok(pois) => {
            if pois.is_empty() {
                warn!(source = %config.poi_source, "POI layer is empty");
            }
            Some(pois)
        }
        Err(e) => {
            error!(source = %config.poi_source, %e, "failed to load POI layer");
            None
        }
    };

    let boundary = load_optional_overlay(
        "boundary",
        config.boundary_source.as_ref(),
        config.osrm_timeout,
    )
    .await;
    let roads =
        load_optional_overlay("roads", config.roads_source.as_ref(), config.osrm_timeout).await;

    let osrm_config = OsrmConfig::new()
        .with_base_url(&config.osrm_base_url)
        .with_timeout(config.osrm_timeout.as_secs());
    let client = match OsrmClient::new(osrm_config) {
        Ok(client) => client,
        Err(e) => {
            error!(%e, "failed to create routing client");
            return ExitCode::FAILURE;
        }
    };
    let cache_config = CacheConfig::default().with_ttl(config.route_cache_ttl);
    let resolver = CachedRouteResolver::new(client, &cache_config);

    let state = AppState::new(pois, resolver, config.origin)
        .with_boundary(boundary)
        .with_roads(roads);
    let app = create_router(state, &config.static_dir);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(addr = %config.bind_addr, origin = %config.origin, "POI explorer listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(%e, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Load an overlay if configured; a failure only disables its endpoint.
async fn load_optional_overlay(
    name: &str,
    source: Option<&LayerSource>,
    timeout: Duration,
) -> Option<FeatureCollection> {
    let source = source?;
    match load_overlay(source, timeout).await {
        Ok(overlay) => Some(overlay),
        Err(e) => {
            error!(layer = name, %source, %e, "failed to load overlay");
            None
        }
    }
}
