//! Domain types for the POI explorer.
//!
//! This module holds the POI record and the parsers for its loosely typed
//! attributes (opening hours, price range, rating), plus the projection
//! between WGS84 and the working planar coordinates. Parsers return typed
//! errors; callers that aggregate many records decide to treat an error as
//! "unknown".

mod poi;
mod price;
mod projection;
mod rating;
mod schedule;

pub use poi::{PoiCollection, PoiId, PoiRecord, UNCATEGORISED, UNNAMED, keys};
pub use price::{PriceParseError, PriceRange, parse_price_range};
pub use projection::{EARTH_RADIUS_M, LonLat, MAX_LATITUDE, line_to_mercator};
pub use rating::{RatingParseError, parse_rating};
pub use schedule::{
    DayRange, MINUTES_PER_DAY, Schedule, ScheduleError, TimeInterval, WeeklyRule, is_open,
};
