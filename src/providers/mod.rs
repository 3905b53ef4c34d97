//! Places provider module
//!
//! Defines the PlaceProvider trait and the upstream implementations.

mod traits;

pub mod google;

#[cfg(test)]
pub(crate) mod mock;

pub use google::GooglePlaces;
pub use traits::*;
