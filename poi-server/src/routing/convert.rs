//! Reduction of provider responses to a single display route.

use geo::LineString;

use crate::domain::line_to_mercator;

use super::error::RouteError;
use super::types::{RouteCandidate, RouteResponse};

/// A route ready for display, in the working projection.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Path in Web Mercator.
    pub path: LineString<f64>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// Distance in kilometres, rounded to 2 decimals.
    pub distance_km: f64,
    /// Duration in whole minutes.
    pub duration_min: i64,
}

/// The candidate with the smallest distance. The earliest wins ties.
pub fn shortest(candidates: &[RouteCandidate]) -> Option<&RouteCandidate> {
    let mut best: Option<&RouteCandidate> = None;
    for candidate in candidates {
        if best.is_none_or(|b| candidate.distance < b.distance) {
            best = Some(candidate);
        }
    }
    best
}

/// Pick the shortest candidate of a response and normalise it.
pub fn best_route(response: RouteResponse) -> Result<RouteResult, RouteError> {
    if !response.is_ok() {
        return Err(RouteError::NoRouteFound {
            code: response.code,
        });
    }

    let best = shortest(&response.routes).ok_or_else(|| RouteError::NoRouteFound {
        code: response.code.clone(),
    })?;

    normalize(best)
}

/// Reproject a candidate's path and derive display metrics.
pub fn normalize(candidate: &RouteCandidate) -> Result<RouteResult, RouteError> {
    let geometry = geo::Geometry::<f64>::try_from(candidate.geometry.clone())
        .map_err(|e| RouteError::InvalidGeometry(e.to_string()))?;

    let line = match geometry {
        geo::Geometry::LineString(line) => line,
        _ => {
            return Err(RouteError::InvalidGeometry(
                "expected a LineString path".to_string(),
            ));
        }
    };

    Ok(RouteResult {
        path: line_to_mercator(&line),
        distance_meters: candidate.distance,
        duration_seconds: candidate.duration,
        distance_km: round_to(candidate.distance / 1000.0, 2),
        duration_min: (candidate.duration / 60.0).round() as i64,
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(distance: f64, duration: f64) -> RouteCandidate {
        serde_json::from_value(json!({
            "distance": distance,
            "duration": duration,
            "geometry": {
                "type": "LineString",
                "coordinates": [[13.20072, 55.70886], [13.1932, 55.7058]]
            }
        }))
        .unwrap()
    }

    fn response(code: &str, routes: Vec<RouteCandidate>) -> RouteResponse {
        RouteResponse {
            code: code.to_string(),
            message: None,
            routes,
        }
    }

    #[test]
    fn shortest_is_order_independent() {
        let orders = [
            [500.0, 300.0, 800.0],
            [300.0, 800.0, 500.0],
            [800.0, 500.0, 300.0],
        ];
        for distances in orders {
            let candidates: Vec<_> = distances.iter().map(|d| candidate(*d, 60.0)).collect();
            assert_eq!(shortest(&candidates).unwrap().distance, 300.0);
        }
    }

    #[test]
    fn shortest_ties_keep_first() {
        let candidates = vec![candidate(400.0, 100.0), candidate(400.0, 50.0)];
        assert_eq!(shortest(&candidates).unwrap().duration, 100.0);
    }

    #[test]
    fn shortest_of_nothing() {
        assert!(shortest(&[]).is_none());
    }

    #[test]
    fn best_route_metrics() {
        let route = best_route(response(
            "Ok",
            vec![candidate(1234.5, 929.0), candidate(987.654, 750.0)],
        ))
        .unwrap();

        assert_eq!(route.distance_meters, 987.654);
        assert_eq!(route.distance_km, 0.99);
        assert_eq!(route.duration_seconds, 750.0);
        // 12.5 minutes rounds up
        assert_eq!(route.duration_min, 13);
        assert_eq!(route.path.0.len(), 2);
    }

    #[test]
    fn path_is_reprojected() {
        let route = best_route(response("Ok", vec![candidate(10.0, 10.0)])).unwrap();
        let first = route.path.0[0];
        // Web Mercator metres, not degrees
        assert!(first.x > 1_000_000.0);
        assert!(first.y > 7_000_000.0);
    }

    #[test]
    fn failure_code_is_no_route() {
        let err = best_route(response("NoRoute", vec![candidate(10.0, 10.0)])).unwrap_err();
        assert!(matches!(err, RouteError::NoRouteFound { code } if code == "NoRoute"));
    }

    #[test]
    fn empty_routes_is_no_route() {
        let err = best_route(response("Ok", vec![])).unwrap_err();
        assert!(matches!(err, RouteError::NoRouteFound { .. }));
    }

    #[test]
    fn non_line_geometry_rejected() {
        let point: RouteCandidate = serde_json::from_value(json!({
            "distance": 1.0,
            "duration": 1.0,
            "geometry": { "type": "Point", "coordinates": [13.2, 55.7] }
        }))
        .unwrap();

        let err = normalize(&point).unwrap_err();
        assert!(matches!(err, RouteError::InvalidGeometry(msg) if msg.contains("LineString")));
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(1.005_1, 2), 1.01);
        assert_eq!(round_to(2.344, 2), 2.34);
    }
}
