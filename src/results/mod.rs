//! Place records and the container that merges and ranks them

mod container;
mod types;

pub use container::{rank_places, PlaceContainer};
pub use types::*;
