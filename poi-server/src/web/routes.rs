//! HTTP route handlers.

use std::sync::Arc;

use askama::Template;
use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use serde::de::DeserializeOwned;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::domain::{LonLat, PoiCollection, PoiId};
use crate::layers::{LayerError, pois_to_geojson, route_to_feature};
use crate::region::Region;
use crate::routing::{Generation, RouteError, RouteResult};
use crate::selection::aggregate;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/pois", get(list_pois))
        .route("/api/pois/:id", get(poi_details))
        .route("/api/layers/:name", get(overlay_layer))
        .route("/api/selection", post(select).delete(clear_selection))
        .route("/api/route", get(current_route).post(request_route))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page.
async fn index_page(State(state): State<AppState>) -> IndexTemplate {
    IndexTemplate::new(state.pois.as_ref().map(|p| p.len()), state.origin)
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// The POI layer, or 503 when it failed to load.
fn loaded_pois(state: &AppState) -> Result<&Arc<PoiCollection>, AppError> {
    state.pois.as_ref().ok_or_else(|| AppError::Unavailable {
        message: "POI layer is not loaded".to_string(),
    })
}

/// Parse a JSON body, logging it when it does not decode.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "invalid JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

fn render<T: Template>(template: &T) -> Result<Response, AppError> {
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {e}"),
    })?;
    Ok(Html(html).into_response())
}

/// The POI layer as GeoJSON in lon/lat.
async fn list_pois(State(state): State<AppState>) -> Result<Response, AppError> {
    let pois = loaded_pois(&state)?;
    let collection = pois_to_geojson(pois)?;
    Ok(Json(collection).into_response())
}

/// A display overlay (`boundary` or `roads`) as lon/lat GeoJSON.
async fn overlay_layer(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let overlay = match name.as_str() {
        "boundary" => &state.boundary,
        "roads" => &state.roads,
        _ => {
            return Err(AppError::NotFound {
                message: format!("Unknown layer: {name}"),
            });
        }
    };

    let overlay = overlay.as_ref().ok_or_else(|| AppError::Unavailable {
        message: format!("{name} layer is not loaded"),
    })?;
    Ok(Json(&**overlay).into_response())
}

/// Details of one POI, as a popup fragment or JSON.
async fn poi_details(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<usize>,
) -> Result<Response, AppError> {
    let pois = loaded_pois(&state)?;
    let id = PoiId(id);
    let poi = pois.get(id).ok_or_else(|| AppError::NotFound {
        message: format!("POI {id} not found"),
    })?;

    if accepts_html(&headers) {
        render(&PoiTemplate {
            poi: PoiView::from_record(poi),
        })
    } else {
        Ok(Json(PoiDetails::from_record(id, poi)).into_response())
    }
}

/// Summarise the POIs inside a drawn region.
async fn select(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: SelectionRequest = parse_body(&body)?;
    let pois = loaded_pois(&state)?;

    let region = Region::try_from(req.region).map_err(|e| AppError::BadRequest {
        message: format!("Invalid region: {e}"),
    })?;
    let at = req.at.unwrap_or_else(|| Local::now().naive_local());

    let summary = aggregate(&region, pois, at);
    info!(selected = summary.selected_count(), %at, "selection summarised");

    if accepts_html(&headers) {
        render(&SelectionTemplate {
            selection: SelectionView::from_summary(&summary, at),
        })
    } else {
        Ok(Json(summary).into_response())
    }
}

/// Clear the selection. The shown route goes with it.
async fn clear_selection(State(state): State<AppState>) -> StatusCode {
    state.route_slot.lock().await.clear();
    debug!("selection cleared");
    StatusCode::NO_CONTENT
}

/// Route from the configured origin to a POI and show it.
async fn request_route(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RouteView>, AppError> {
    let req: RouteRequest = parse_body(&body)?;
    let pois = loaded_pois(&state)?;

    let id = PoiId(req.poi_id);
    let poi = pois.get(id).ok_or_else(|| AppError::NotFound {
        message: format!("POI {id} not found"),
    })?;
    let destination = LonLat::from_mercator(poi.coordinate);

    // The lock is not held while the provider is queried
    let generation = state.route_slot.lock().await.begin();
    let route = state.resolver.resolve(state.origin, destination).await?;

    let current = state
        .route_slot
        .lock()
        .await
        .complete(generation, route.clone());
    if !current {
        debug!(generation = generation.get(), "discarding superseded route");
    }
    let cached_routes = state.resolver.cache_entry_count().await;
    debug!(cached_routes, "route resolved");

    Ok(Json(route_view(generation, current, &route)?))
}

/// The route currently shown.
async fn current_route(State(state): State<AppState>) -> Result<Json<RouteView>, AppError> {
    let slot = state.route_slot.lock().await;
    let (generation, route) = slot.current().ok_or_else(|| AppError::NotFound {
        message: "No route selected".to_string(),
    })?;

    Ok(Json(route_view(generation, true, route)?))
}

fn route_view(
    generation: Generation,
    current: bool,
    route: &RouteResult,
) -> Result<RouteView, AppError> {
    Ok(RouteView {
        generation: generation.get(),
        current,
        feature: route_to_feature(route)?,
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        match e {
            RouteError::NoRouteFound { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            RouteError::InvalidCoordinate(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl From<LayerError> for AppError {
    fn from(e: LayerError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
