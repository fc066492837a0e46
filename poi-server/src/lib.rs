//! POI explorer server.
//!
//! Draw a region over a layer of points of interest and get back what is
//! inside it: how many, which are open, how they group by category, and
//! where they sit on price and rating. Clicking a POI routes to it on foot
//! from a fixed origin.

pub mod cache;
pub mod config;
pub mod domain;
pub mod layers;
pub mod region;
pub mod routing;
pub mod selection;
pub mod web;
