//! Spatial selection and aggregation.
//!
//! Given a drawn region, the loaded POI layer and an evaluation instant,
//! produces the summary shown in the selection popup: how many POIs were
//! caught, which are open, how they split by category, and price and rating
//! extremes.
//!
//! Selection is a linear scan over the layer; there is no spatial index.

mod aggregate;
mod summary;

pub use aggregate::aggregate;
pub use summary::{
    CategoryGroup, PriceExtreme, PriceStats, RatingExtreme, RatingStats, SelectionReport,
    SelectionSummary,
};
