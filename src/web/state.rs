//! Application state shared across handlers

use crate::cache::DetailsCache;
use crate::categories::CategoryRegistry;
use crate::config::Settings;
use crate::metrics::Metrics;
use crate::providers::PlaceProvider;
use crate::search::{AdaptiveSearch, Search};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Category catalog
    pub categories: Arc<CategoryRegistry>,
    /// Search executor
    pub search: Arc<Search>,
    /// Radius-widening search over the same executor
    pub adaptive: Arc<AdaptiveSearch>,
    /// Place details cache
    pub details: DetailsCache,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, provider: Arc<dyn PlaceProvider>) -> Self {
        let categories = Arc::new(CategoryRegistry::from_configs(&settings.categories));
        let search = Arc::new(
            Search::new(provider)
                .with_metrics(Arc::new(Metrics::new()))
                .with_results_per_type(settings.places.results_per_type)
                .with_timeout(Duration::from_secs_f64(settings.outgoing.request_timeout))
                .with_concurrency(settings.search.concurrent_fetch),
        );
        let adaptive = Arc::new(AdaptiveSearch::new(search.clone()));
        let details = DetailsCache::from_settings(&settings.cache);

        Self {
            settings: Arc::new(settings),
            categories,
            search,
            adaptive,
            details,
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
