//! Category catalog and provider query expansion
//!
//! Maps this system's human categories to the provider type codes the
//! upstream search capability understands.

mod descriptor;
mod registry;

pub use descriptor::{expand, CategoryDescriptor, QueryDescriptor};
pub use registry::CategoryRegistry;
