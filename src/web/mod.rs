//! Web server module
//!
//! JSON HTTP surface over the search engine.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
