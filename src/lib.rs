//! Placefinder: discovers places near a location and ranks them best-first
//!
//! Queries an upstream places capability once per category type code,
//! merges and deduplicates the results, filters by rating, and orders them
//! by distance from the search origin.

pub mod cache;
pub mod categories;
pub mod config;
pub mod error;
pub mod geo;
pub mod metrics;
pub mod network;
pub mod providers;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use error::SearchError;
pub use geo::Coordinate;
pub use providers::PlaceProvider;
pub use results::{PlaceRecord, SearchOutcome};
pub use search::{AdaptiveSearch, Search, SearchOrigin, SearchRequest};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for provider requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;
