//! Web layer for the POI explorer.
//!
//! JSON endpoints for the map client, plus HTML fragments for the popups.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
