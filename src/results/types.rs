//! Place record and outcome definitions

use crate::geo::Coordinate;
use crate::search::SearchRequest;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A canonical real-world place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Provider-assigned id; the deduplication key
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: Coordinate,
    /// Average rating in [0, 5], absent when the provider gave none
    pub rating: Option<f64>,
    /// Price level 0-4
    pub price_level: Option<u8>,
    /// Provider type codes this place carries
    #[serde(default)]
    pub category_tags: BTreeSet<String>,
    /// Distance from the search origin, set only by ranking
    pub distance_miles: Option<f64>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<OpeningHours>,
}

impl PlaceRecord {
    /// Create a record with only the required fields
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: String::new(),
            location,
            rating: None,
            price_level: None,
            category_tags: BTreeSet::new(),
            distance_miles: None,
            phone: None,
            website: None,
            opening_hours: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.category_tags.insert(tag.into());
        self
    }

    /// A copy of this record carrying a computed distance
    pub fn with_distance(self, distance_miles: f64) -> Self {
        Self {
            distance_miles: Some(distance_miles),
            ..self
        }
    }

    /// Rating used for ordering; absent counts as 0
    pub fn rank_rating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    /// Whether the place meets a minimum rating; an absent rating always passes
    pub fn meets_rating(&self, min_rating: f64) -> bool {
        self.rating.map_or(true, |r| r >= min_rating)
    }
}

/// Weekly opening hours
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    /// Open at the time of the upstream response
    pub open_now: Option<bool>,
    /// Human-readable lines, one per weekday
    #[serde(default)]
    pub weekday_text: Vec<String>,
    #[serde(default)]
    pub periods: Vec<OpeningPeriod>,
}

/// One open interval; `close` is absent for places open around the clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningPeriod {
    pub open: DayTime,
    pub close: Option<DayTime>,
}

/// Day of week (0 = Sunday) and local time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayTime {
    pub day: u8,
    pub time: NaiveTime,
}

/// Ranked, capped result of one search
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Best-first places, at most `request.max_results`
    pub ranked_places: Vec<PlaceRecord>,
    /// Unique places after rating filter, before the cap
    pub total_unique_found: usize,
    /// The request as executed, with the radius actually used
    pub request: SearchRequest,
}

impl SearchOutcome {
    pub fn len(&self) -> usize {
        self.ranked_places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked_places.is_empty()
    }

    pub fn radius_miles(&self) -> f64 {
        self.request.radius_miles
    }
}
