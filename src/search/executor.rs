//! Search execution across provider queries

use super::models::SearchRequest;
use crate::categories::{expand, QueryDescriptor};
use crate::error::SearchError;
use crate::metrics::Metrics;
use crate::providers::{NearbyParams, PlaceProvider};
use crate::results::{PlaceContainer, PlaceRecord, SearchOutcome};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Default raw rows considered per provider type code
pub const DEFAULT_RESULTS_PER_TYPE: usize = 20;

/// Search executor that merges one provider query per category descriptor
pub struct Search {
    /// Upstream places capability
    provider: Arc<dyn PlaceProvider>,
    /// Shared metrics
    metrics: Arc<Metrics>,
    /// Raw rows considered per provider type code
    results_per_type: usize,
    /// Upper bound for a single provider call
    query_timeout: Duration,
    /// Issue provider queries concurrently
    concurrent: bool,
}

impl Search {
    /// Create a new search executor
    pub fn new(provider: Arc<dyn PlaceProvider>) -> Self {
        Self {
            provider,
            metrics: Arc::new(Metrics::new()),
            results_per_type: DEFAULT_RESULTS_PER_TYPE,
            query_timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT),
            concurrent: true,
        }
    }

    /// Share a metrics collector
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Set raw rows considered per provider type code
    pub fn with_results_per_type(mut self, limit: usize) -> Self {
        self.results_per_type = limit.max(1);
        self
    }

    /// Set the per-query timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Fetch provider queries concurrently or one at a time
    pub fn with_concurrency(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn provider(&self) -> &Arc<dyn PlaceProvider> {
        &self.provider
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Execute a search: query, merge in declared order, dedup, filter, rank, cap.
    ///
    /// Any provider failure fails the whole search; partial results are
    /// never returned.
    pub async fn execute(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        request.validate()?;

        let span = info_span!("search", id = %Uuid::new_v4(), radius = request.radius_miles);
        async {
            self.metrics.inc_search();
            let result = self.run(request).await;
            if let Err(ref e) = result {
                self.metrics.inc_failed_search();
                warn!("Search failed: {}", e);
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        let queries = expand(&request.categories);

        info!(
            "Executing search at {:?} on {} provider queries",
            request.origin.coordinate,
            queries.len()
        );

        let batches = if self.concurrent {
            let futures = queries.iter().map(|q| self.fetch(request, q));
            // join_all yields results in input order, whatever the completion order
            join_all(futures).await.into_iter().collect::<Result<Vec<_>, _>>()?
        } else {
            let mut batches = Vec::with_capacity(queries.len());
            for query in &queries {
                batches.push(self.fetch(request, query).await?);
            }
            batches
        };

        let mut container = PlaceContainer::new();
        for batch in batches {
            container.extend_places(batch);
        }

        debug!(
            "Merged {} unique places ({} duplicates)",
            container.place_count(),
            container.duplicate_count()
        );

        let outcome = container.into_outcome(request.clone());
        info!(
            "Search returned {} of {} places",
            outcome.ranked_places.len(),
            outcome.total_unique_found
        );
        Ok(outcome)
    }

    /// Run one provider query under the per-query timeout
    async fn fetch(
        &self,
        request: &SearchRequest,
        query: &QueryDescriptor,
    ) -> Result<Vec<PlaceRecord>, SearchError> {
        let params = NearbyParams::new(
            request.origin.coordinate,
            request.radius_miles,
            query.provider_type_code.clone(),
            self.results_per_type,
        );
        let start = Instant::now();

        let result = match timeout(self.query_timeout, self.provider.fetch_by_type(&params)).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::timeout(format!(
                "{} query for {} timed out after {:?}",
                self.provider.name(),
                query.provider_type_code,
                self.query_timeout
            ))),
        };

        let elapsed = start.elapsed();
        self.metrics.record_query(
            &query.provider_type_code,
            elapsed.as_millis() as u64,
            result.is_ok(),
        );

        match result {
            Ok(ref places) => debug!(
                "Provider {} returned {} {} places in {:?}",
                self.provider.name(),
                places.len(),
                query.provider_type_code,
                elapsed
            ),
            Err(ref e) => warn!("Query for {} failed: {}", query.provider_type_code, e),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::CategoryDescriptor;
    use crate::geo::{distance_miles, Coordinate};
    use crate::providers::mock::MockProvider;
    use crate::search::SearchOrigin;
    use async_trait::async_trait;

    const SF: Coordinate = Coordinate {
        latitude: 37.7749,
        longitude: -122.4194,
    };

    fn place(id: &str, lat: f64, lng: f64, rating: Option<f64>) -> PlaceRecord {
        let mut place = PlaceRecord::new(id, format!("Place {id}"), Coordinate::new(lat, lng));
        place.rating = rating;
        place
    }

    fn grocery_request() -> SearchRequest {
        SearchRequest::new(
            SearchOrigin::labeled(SF, "home"),
            2.0,
            vec![
                CategoryDescriptor::new("grocery_or_supermarket"),
                CategoryDescriptor::new("supermarket"),
            ],
        )
        .with_max_results(5)
    }

    fn grocery_provider() -> MockProvider {
        MockProvider::new()
            .with_places(
                "grocery_or_supermarket",
                vec![
                    place("g1", 37.7849, -122.4094, Some(4.1)),
                    place("shared", 37.7760, -122.4180, Some(4.5)),
                    place("g3", 37.7600, -122.4300, None),
                ],
            )
            .with_places(
                "supermarket",
                vec![
                    place("shared", 37.7760, -122.4180, Some(4.5)),
                    place("s2", 37.7900, -122.4000, Some(3.9)),
                ],
            )
    }

    #[tokio::test]
    async fn test_grocery_scenario() {
        for concurrent in [true, false] {
            let provider = Arc::new(grocery_provider());
            let search = Search::new(provider.clone()).with_concurrency(concurrent);

            let outcome = search.execute(&grocery_request()).await.unwrap();

            assert_eq!(outcome.ranked_places.len(), 4);
            assert_eq!(outcome.total_unique_found, 4);

            let distances: Vec<f64> = outcome
                .ranked_places
                .iter()
                .map(|p| p.distance_miles.unwrap())
                .collect();
            assert!(distances.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(outcome.ranked_places[0].id, "shared");
            assert_eq!(
                distances[0],
                distance_miles(&SF, &Coordinate::new(37.7760, -122.4180))
            );

            assert_eq!(provider.calls().len(), 2);
            assert_eq!(provider.calls()[0].provider_type_code, "grocery_or_supermarket");
            assert_eq!(provider.calls()[1].provider_type_code, "supermarket");
        }
    }

    #[tokio::test]
    async fn test_repeated_type_code_is_deduplicated() {
        let provider = Arc::new(grocery_provider());
        let search = Search::new(provider.clone());
        let mut request = grocery_request().with_max_results(10);
        request.add_category(CategoryDescriptor::new("supermarket").with_synonyms(["market"]));

        let outcome = search.execute(&request).await.unwrap();

        let mut ids: Vec<_> = outcome.ranked_places.iter().map(|p| p.id.clone()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(outcome.total_unique_found, 4);
        assert_eq!(provider.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_min_rating_filter() {
        let provider = Arc::new(MockProvider::new().with_places(
            "restaurant",
            vec![
                place("none", 37.776, -122.419, None),
                place("low", 37.777, -122.419, Some(3.5)),
                place("mid", 37.778, -122.419, Some(4.2)),
                place("high", 37.779, -122.419, Some(4.8)),
            ],
        ));
        let search = Search::new(provider);
        let request = SearchRequest::new(
            SearchOrigin::new(SF),
            2.0,
            vec![CategoryDescriptor::new("restaurant")],
        )
        .with_min_rating(4.0);

        let outcome = search.execute(&request).await.unwrap();
        let ids: Vec<_> = outcome.ranked_places.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["none", "mid", "high"]);
        assert_eq!(outcome.ranked_places[0].rating, None);
    }

    #[tokio::test]
    async fn test_provider_error_fails_whole_search() {
        for concurrent in [true, false] {
            let provider = Arc::new(
                MockProvider::new()
                    .with_places("pharmacy", vec![place("p1", 37.775, -122.419, Some(4.0))])
                    .with_status("bank", "OVER_QUERY_LIMIT"),
            );
            let search = Search::new(provider.clone()).with_concurrency(concurrent);
            let request = SearchRequest::new(
                SearchOrigin::new(SF),
                2.0,
                vec![CategoryDescriptor::new("pharmacy"), CategoryDescriptor::new("bank")],
            );

            let err = search.execute(&request).await.unwrap_err();
            match err {
                SearchError::ProviderStatus { status, .. } => assert_eq!(status, "OVER_QUERY_LIMIT"),
                other => panic!("unexpected error: {other:?}"),
            }
            assert_eq!(search.metrics().snapshot().failed_searches, 1);
        }
    }

    #[tokio::test]
    async fn test_invalid_request_makes_no_calls() {
        let provider = Arc::new(grocery_provider());
        let search = Search::new(provider.clone());

        let err = search
            .execute(&grocery_request().with_radius(0.0))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::InvalidRequest(_)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_results_per_type_limit_is_passed() {
        let provider = Arc::new(grocery_provider());
        let search = Search::new(provider.clone()).with_results_per_type(1);

        let outcome = search.execute(&grocery_request()).await.unwrap();

        assert!(provider.calls().iter().all(|c| c.limit == 1));
        let ids: Vec<_> = outcome.ranked_places.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["shared", "g1"]);
    }

    /// Delays each type code's response so completion order differs from declared order
    struct StaggeredProvider {
        inner: MockProvider,
        delays: Vec<(&'static str, u64)>,
    }

    #[async_trait]
    impl PlaceProvider for StaggeredProvider {
        fn name(&self) -> &str {
            "staggered"
        }

        async fn fetch_by_type(&self, params: &NearbyParams) -> Result<Vec<PlaceRecord>, SearchError> {
            let delay = self
                .delays
                .iter()
                .find(|(code, _)| *code == params.provider_type_code)
                .map_or(0, |(_, ms)| *ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.inner.fetch_by_type(params).await
        }

        async fn fetch_details(&self, id: &str) -> Result<Option<PlaceRecord>, SearchError> {
            self.inner.fetch_details(id).await
        }
    }

    #[tokio::test]
    async fn test_merge_order_ignores_completion_order() {
        let tied = Coordinate::new(37.7760, -122.4180);
        let inner = || {
            MockProvider::new()
                .with_places(
                    "grocery_or_supermarket",
                    vec![
                        place("shared", 37.7760, -122.4180, Some(4.5)).with_tag("grocery_or_supermarket"),
                        PlaceRecord::new("first_tie", "First", tied).with_rating(4.0),
                    ],
                )
                .with_places(
                    "supermarket",
                    vec![
                        place("shared", 37.7760, -122.4180, Some(4.5)).with_tag("supermarket"),
                        PlaceRecord::new("second_tie", "Second", tied).with_rating(4.0),
                    ],
                )
        };

        let mut orders = Vec::new();
        for concurrent in [true, false] {
            let provider = StaggeredProvider {
                inner: inner(),
                delays: vec![("grocery_or_supermarket", 80), ("supermarket", 0)],
            };
            let search = Search::new(Arc::new(provider)).with_concurrency(concurrent);

            let outcome = search.execute(&grocery_request()).await.unwrap();

            let shared = outcome
                .ranked_places
                .iter()
                .find(|p| p.id == "shared")
                .unwrap();
            assert!(shared.category_tags.contains("grocery_or_supermarket"));
            assert!(!shared.category_tags.contains("supermarket"));
            assert_eq!(outcome.total_unique_found, 3);

            let ids: Vec<_> = outcome.ranked_places.iter().map(|p| p.id.clone()).collect();
            assert_eq!(ids, vec!["shared", "first_tie", "second_tie"]);
            orders.push(ids);
        }
        assert_eq!(orders[0], orders[1]);
    }

    struct SlowProvider;

    #[async_trait]
    impl PlaceProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        async fn fetch_by_type(&self, _: &NearbyParams) -> Result<Vec<PlaceRecord>, SearchError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }

        async fn fetch_details(&self, _: &str) -> Result<Option<PlaceRecord>, SearchError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let search = Search::new(Arc::new(SlowProvider)).with_timeout(Duration::from_millis(20));

        let err = search.execute(&grocery_request()).await.unwrap_err();
        assert!(err.is_timeout());
    }
}
