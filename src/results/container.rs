//! Result container for merging, filtering and ranking places

use super::types::{PlaceRecord, SearchOutcome};
use crate::geo::distance_miles;
use crate::search::SearchRequest;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Accumulates places from several provider queries in arrival order.
///
/// Deduplication keeps the first record seen for an id, so the outcome
/// depends only on the order places are added.
#[derive(Debug, Clone, Default)]
pub struct PlaceContainer {
    places: Vec<PlaceRecord>,
    seen: HashSet<String>,
    duplicates: usize,
}

impl PlaceContainer {
    /// Create a new empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a place unless one with the same id is already held.
    /// Returns whether the place was kept.
    pub fn add_place(&mut self, place: PlaceRecord) -> bool {
        if self.seen.insert(place.id.clone()) {
            self.places.push(place);
            true
        } else {
            self.duplicates += 1;
            false
        }
    }

    /// Add multiple places
    pub fn extend_places(&mut self, places: impl IntoIterator<Item = PlaceRecord>) {
        for place in places {
            self.add_place(place);
        }
    }

    /// Number of unique places held
    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    /// Number of discarded duplicates
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    /// Unique places in arrival order
    pub fn places(&self) -> &[PlaceRecord] {
        &self.places
    }

    /// Filter by rating, annotate distance, rank and cap
    pub fn into_outcome(self, request: SearchRequest) -> SearchOutcome {
        let origin = request.origin.coordinate;

        let mut ranked: Vec<PlaceRecord> = self
            .places
            .into_iter()
            .filter(|p| p.meets_rating(request.min_rating))
            .map(|p| {
                let distance = distance_miles(&origin, &p.location);
                p.with_distance(distance)
            })
            .collect();

        rank_places(&mut ranked);

        let total_unique_found = ranked.len();
        ranked.truncate(request.max_results);

        SearchOutcome {
            ranked_places: ranked,
            total_unique_found,
            request,
        }
    }
}

/// Sort best-first: nearest first, ties broken by higher rating.
///
/// The sort is stable, so re-ranking a ranked list leaves it unchanged.
pub fn rank_places(places: &mut [PlaceRecord]) {
    places.sort_by(compare_places);
}

fn compare_places(a: &PlaceRecord, b: &PlaceRecord) -> Ordering {
    let da = a.distance_miles.unwrap_or(f64::INFINITY);
    let db = b.distance_miles.unwrap_or(f64::INFINITY);

    da.total_cmp(&db)
        .then_with(|| b.rank_rating().total_cmp(&a.rank_rating()))
}
