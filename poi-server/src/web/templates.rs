//! Askama templates for the web frontend.

use askama::Template;
use chrono::NaiveDateTime;

use crate::domain::{LonLat, PoiRecord};
use crate::selection::{PriceExtreme, RatingExtreme, SelectionSummary};

/// Placeholder for a value that is missing or could not be computed.
const NOT_AVAILABLE: &str = "N/A";

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with the map and layer status.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// Number of loaded POIs, `None` when the layer failed to load
    pub poi_count: Option<usize>,
    pub origin: String,
}

impl IndexTemplate {
    pub fn new(poi_count: Option<usize>, origin: LonLat) -> Self {
        Self {
            poi_count,
            origin: format!("{:.5}, {:.5}", origin.lat, origin.lon),
        }
    }
}

// ============================================================================
// Fragment Templates (popup contents, no base.html)
// ============================================================================

/// Selection results popup.
#[derive(Template)]
#[template(path = "selection_popup.html")]
pub struct SelectionTemplate {
    pub selection: SelectionView,
}

/// Single POI popup.
#[derive(Template)]
#[template(path = "poi_popup.html")]
pub struct PoiTemplate {
    pub poi: PoiView,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Selection summary formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionView {
    pub time: String,
    pub is_empty: bool,
    pub selected_count: usize,
    pub open_count: usize,
    /// Open POI names joined with commas, empty when none are open
    pub open_names: String,
    pub categories: Vec<CategoryView>,
    pub average_price: String,
    pub cheapest: String,
    pub priciest: String,
    pub lowest_rating: String,
    pub highest_rating: String,
}

/// One category line of the selection popup.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryView {
    pub category: String,
    pub names: String,
}

impl SelectionView {
    /// Create from a summary evaluated at `at`.
    pub fn from_summary(summary: &SelectionSummary, at: NaiveDateTime) -> Self {
        let time = at.format("%Y-%m-%d %H:%M").to_string();

        let Some(report) = summary.report() else {
            return Self {
                time,
                is_empty: true,
                selected_count: 0,
                open_count: 0,
                open_names: String::new(),
                categories: Vec::new(),
                average_price: NOT_AVAILABLE.to_string(),
                cheapest: NOT_AVAILABLE.to_string(),
                priciest: NOT_AVAILABLE.to_string(),
                lowest_rating: NOT_AVAILABLE.to_string(),
                highest_rating: NOT_AVAILABLE.to_string(),
            };
        };

        Self {
            time,
            is_empty: false,
            selected_count: report.selected_count,
            open_count: report.open_count,
            open_names: report.open_names.join(", "),
            categories: report
                .categories
                .iter()
                .map(|g| CategoryView {
                    category: g.category.clone(),
                    names: g.names.join(", "),
                })
                .collect(),
            average_price: report
                .price
                .average
                .map_or_else(|| NOT_AVAILABLE.to_string(), |avg| format!("{avg:.2}")),
            cheapest: price_line(report.price.cheapest.as_ref()),
            priciest: price_line(report.price.priciest.as_ref()),
            lowest_rating: rating_line(report.rating.lowest.as_ref()),
            highest_rating: rating_line(report.rating.highest.as_ref()),
        }
    }
}

fn price_line(extreme: Option<&PriceExtreme>) -> String {
    extreme.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |e| format!("{} ({})", e.name, e.range),
    )
}

fn rating_line(extreme: Option<&RatingExtreme>) -> String {
    extreme.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |e| format!("{} ({})", e.name, e.value),
    )
}

/// POI attributes formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiView {
    pub name: String,
    pub category: String,
    pub open_hours: String,
    pub rating: String,
    pub price_range: String,
}

impl PoiView {
    /// Create from a domain record. Missing attributes show as "N/A".
    pub fn from_record(poi: &PoiRecord) -> Self {
        let show = |value: &Option<String>| {
            value
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };
        Self {
            name: show(&poi.name),
            category: show(&poi.category),
            open_hours: show(&poi.open_hours_raw),
            rating: show(&poi.rating_raw),
            price_range: show(&poi.price_range_raw),
        }
    }
}
