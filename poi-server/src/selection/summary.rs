//! Selection summary types.

use geo::Coord;
use serde::Serialize;

use crate::domain::PoiId;

/// Result of aggregating one drawn region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionSummary {
    /// Nothing fell inside the region.
    Empty {
        #[serde(with = "coord_pair")]
        anchor: Coord<f64>,
    },

    /// At least one POI was selected.
    Selected(Box<SelectionReport>),
}

impl SelectionSummary {
    /// Number of POIs inside the region.
    pub fn selected_count(&self) -> usize {
        match self {
            SelectionSummary::Empty { .. } => 0,
            SelectionSummary::Selected(report) => report.selected_count,
        }
    }

    /// Where to place the popup for this summary.
    pub fn anchor(&self) -> Coord<f64> {
        match self {
            SelectionSummary::Empty { anchor } => *anchor,
            SelectionSummary::Selected(report) => report.anchor,
        }
    }

    /// The full report, unless the selection was empty.
    pub fn report(&self) -> Option<&SelectionReport> {
        match self {
            SelectionSummary::Empty { .. } => None,
            SelectionSummary::Selected(report) => Some(report),
        }
    }
}

/// Statistics over a non-empty selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionReport {
    #[serde(with = "coord_pair")]
    pub anchor: Coord<f64>,

    pub selected_count: usize,

    /// Selected POIs, in collection order.
    pub selected: Vec<PoiId>,

    pub open_count: usize,

    /// Display names of POIs open at the evaluation instant.
    pub open_names: Vec<String>,

    /// Display names grouped by category, in first-seen category order.
    pub categories: Vec<CategoryGroup>,

    pub price: PriceStats,

    pub rating: RatingStats,
}

/// Names of the selected POIs sharing one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub names: Vec<String>,
}

/// Price statistics over POIs with a well-formed price range.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PriceStats {
    /// Mean of the range averages; `None` when no POI had a usable range.
    pub average: Option<f64>,

    /// Number of POIs that contributed.
    pub valid_count: usize,

    /// POI holding the lowest range minimum.
    pub cheapest: Option<PriceExtreme>,

    /// POI holding the highest range maximum.
    pub priciest: Option<PriceExtreme>,
}

/// A POI at one end of the price scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceExtreme {
    pub id: PoiId,
    pub name: String,
    /// The bound that made it extreme (`min` or `max` of its range).
    pub value: f64,
    /// The range text as it appears in the source data.
    pub range: String,
}

/// Rating statistics over POIs with a numeric rating.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RatingStats {
    pub lowest: Option<RatingExtreme>,
    pub highest: Option<RatingExtreme>,
}

/// A POI at one end of the rating scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingExtreme {
    pub id: PoiId,
    pub name: String,
    pub value: f64,
}

/// Serialize a coordinate as `[x, y]`.
mod coord_pair {
    use geo::Coord;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(c: &Coord<f64>, s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq([c.x, c.y])
    }
}
