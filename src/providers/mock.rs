//! Recording provider used by unit tests

use super::traits::{NearbyParams, PlaceProvider};
use crate::error::SearchError;
use crate::geo::distance_miles;
use crate::results::PlaceRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

enum Canned {
    Places(Vec<PlaceRecord>),
    Status(String),
}

#[derive(Default)]
pub struct MockProvider {
    canned: HashMap<String, Canned>,
    details: HashMap<String, PlaceRecord>,
    filter_by_radius: bool,
    calls: Mutex<Vec<NearbyParams>>,
    detail_calls: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_places(mut self, type_code: &str, places: Vec<PlaceRecord>) -> Self {
        self.canned.insert(type_code.to_string(), Canned::Places(places));
        self
    }

    pub fn with_status(mut self, type_code: &str, status: &str) -> Self {
        self.canned
            .insert(type_code.to_string(), Canned::Status(status.to_string()));
        self
    }

    pub fn with_details(mut self, place: PlaceRecord) -> Self {
        self.details.insert(place.id.clone(), place);
        self
    }

    /// Only return places inside the queried radius
    pub fn within_radius(mut self) -> Self {
        self.filter_by_radius = true;
        self
    }

    pub fn calls(&self) -> Vec<NearbyParams> {
        self.calls.lock().unwrap().clone()
    }

    pub fn radii(&self) -> Vec<f64> {
        self.calls().iter().map(|c| c.radius_miles).collect()
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PlaceProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_by_type(&self, params: &NearbyParams) -> Result<Vec<PlaceRecord>, SearchError> {
        self.calls.lock().unwrap().push(params.clone());

        match self.canned.get(&params.provider_type_code) {
            None => Ok(Vec::new()),
            Some(Canned::Status(status)) => Err(SearchError::status(
                status.clone(),
                Some(format!("{} failed", params.provider_type_code)),
            )),
            Some(Canned::Places(places)) => Ok(places
                .iter()
                .take(params.limit)
                .filter(|p| {
                    !self.filter_by_radius
                        || distance_miles(&params.origin, &p.location) <= params.radius_miles
                })
                .cloned()
                .collect()),
        }
    }

    async fn fetch_details(&self, place_id: &str) -> Result<Option<PlaceRecord>, SearchError> {
        self.detail_calls.lock().unwrap().push(place_id.to_string());
        Ok(self.details.get(place_id).cloned())
    }
}
