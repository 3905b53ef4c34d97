//! Search orchestration module
//!
//! Coordinates provider queries for a request, aggregates and ranks the
//! places found, and widens the radius when too few are found.

mod adaptive;
mod executor;
mod models;

pub use adaptive::{AdaptiveSearch, RadiusExpansion, RADIUS_GROWTH};
pub use executor::{Search, DEFAULT_RESULTS_PER_TYPE};
pub use models::*;
