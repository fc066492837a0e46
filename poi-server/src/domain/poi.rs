//! Point-of-interest records.

use std::fmt;

use geo::Coord;
use serde::Serialize;
use serde_json::{Map, Value};

use super::price::{PriceRange, parse_price_range};
use super::rating::parse_rating;
use super::schedule::is_open;

/// Display name used when a POI has no name.
pub const UNNAMED: &str = "NA";

/// Category label used when a POI has no category.
pub const UNCATEGORISED: &str = "Other";

/// Attribute keys in the source layer.
pub mod keys {
    pub const NAME: &str = "name";
    pub const CATEGORY: &str = "type";
    pub const RATING: &str = "rating";
    pub const PRICE_RANGE: &str = "price_rang";
    pub const OPEN_HOURS: &str = "open_hours";
}

/// Stable identifier of a POI: its position in load order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PoiId(pub usize);

impl fmt::Debug for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PoiId({})", self.0)
    }
}

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One POI with its raw attributes and projected location.
///
/// Attribute values are kept exactly as loaded; parsing happens on demand
/// so a malformed field never prevents the record from existing.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiRecord {
    pub name: Option<String>,
    pub category: Option<String>,
    pub rating_raw: Option<String>,
    pub price_range_raw: Option<String>,
    pub open_hours_raw: Option<String>,
    /// Location in the working (Web Mercator) projection.
    pub coordinate: Coord<f64>,
}

impl PoiRecord {
    /// A record with no attributes at `coordinate`.
    pub fn at(coordinate: Coord<f64>) -> Self {
        Self {
            name: None,
            category: None,
            rating_raw: None,
            price_range_raw: None,
            open_hours_raw: None,
            coordinate,
        }
    }

    /// Build a record from a layer feature's properties.
    ///
    /// Strings are taken as-is, numbers are kept in their JSON text form, and
    /// empty strings, nulls and other value types count as absent.
    pub fn from_properties(coordinate: Coord<f64>, props: &Map<String, Value>) -> Self {
        let attr = |key: &str| props.get(key).and_then(attribute_text);
        Self {
            name: attr(keys::NAME),
            category: attr(keys::CATEGORY),
            rating_raw: attr(keys::RATING),
            price_range_raw: attr(keys::PRICE_RANGE),
            open_hours_raw: attr(keys::OPEN_HOURS),
            coordinate,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating_raw = Some(rating.into());
        self
    }

    pub fn with_price_range(mut self, range: impl Into<String>) -> Self {
        self.price_range_raw = Some(range.into());
        self
    }

    pub fn with_open_hours(mut self, hours: impl Into<String>) -> Self {
        self.open_hours_raw = Some(hours.into());
        self
    }

    /// Name for display, falling back to [`UNNAMED`].
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED)
    }

    /// Category for grouping, falling back to [`UNCATEGORISED`].
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORISED)
    }

    /// Parsed price range, if the raw attribute is well formed.
    pub fn price_range(&self) -> Option<PriceRange> {
        parse_price_range(self.price_range_raw.as_deref())
    }

    /// Parsed rating, if the raw attribute has a numeric prefix.
    pub fn rating(&self) -> Option<f64> {
        self.rating_raw
            .as_deref()
            .and_then(|r| parse_rating(r).ok())
    }

    /// Whether the POI's schedule says it is open at `at`.
    pub fn is_open_at(&self, at: chrono::NaiveDateTime) -> bool {
        is_open(self.open_hours_raw.as_deref(), at)
    }
}

fn attribute_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The in-memory POI layer, fixed after loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoiCollection {
    records: Vec<PoiRecord>,
}

impl PoiCollection {
    pub fn new(records: Vec<PoiRecord>) -> Self {
        Self { records }
    }

    pub fn get(&self, id: PoiId) -> Option<&PoiRecord> {
        self.records.get(id.0)
    }

    /// Iterate records with their ids, in load order.
    pub fn iter(&self) -> impl Iterator<Item = (PoiId, &PoiRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (PoiId(i), r))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<PoiRecord> for PoiCollection {
    fn from_iter<I: IntoIterator<Item = PoiRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
