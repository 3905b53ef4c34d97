//! Caching module for placefinder
//!
//! Memoizes place detail lookups, which are best-effort enrichment.

use crate::config::CacheSettings;
use crate::error::SearchError;
use crate::providers::PlaceProvider;
use crate::results::PlaceRecord;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

/// Cache for place detail records
#[derive(Clone)]
pub struct DetailsCache {
    cache: Cache<String, PlaceRecord>,
}

impl DetailsCache {
    /// Create a new details cache with specified TTL
    pub fn new(ttl_seconds: u64, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        Self { cache }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.details_ttl_secs, settings.details_capacity)
    }

    /// Get a cached record
    pub async fn get(&self, place_id: &str) -> Option<PlaceRecord> {
        self.cache.get(place_id).await
    }

    /// Store a record
    pub async fn set(&self, place: PlaceRecord) {
        self.cache.insert(place.id.clone(), place).await;
    }

    /// Cached record, or a provider lookup. Absent lookups are not cached.
    pub async fn get_or_fetch(
        &self,
        provider: &dyn PlaceProvider,
        place_id: &str,
    ) -> Result<Option<PlaceRecord>, SearchError> {
        if let Some(place) = self.get(place_id).await {
            debug!("Details cache hit for {}", place_id);
            return Ok(Some(place));
        }

        let place = provider.fetch_details(place_id).await?;
        if let Some(ref place) = place {
            self.set(place.clone()).await;
        }
        Ok(place)
    }
}

impl Default for DetailsCache {
    fn default() -> Self {
        Self::from_settings(&CacheSettings::default())
    }
}
