//! Provider traits and types

use crate::error::SearchError;
use crate::geo::{miles_to_meters, Coordinate};
use crate::results::PlaceRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Parameters for one nearby query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyParams {
    /// Center of the query
    pub origin: Coordinate,
    /// Radius in miles
    pub radius_miles: f64,
    /// Upstream category vocabulary term
    pub provider_type_code: String,
    /// Raw rows considered; extra rows are dropped before normalization
    pub limit: usize,
}

impl NearbyParams {
    pub fn new(
        origin: Coordinate,
        radius_miles: f64,
        provider_type_code: impl Into<String>,
        limit: usize,
    ) -> Self {
        Self {
            origin,
            radius_miles,
            provider_type_code: provider_type_code.into(),
            limit,
        }
    }

    /// Radius rounded to the nearest whole meter, at least 1
    pub fn radius_meters(&self) -> u32 {
        miles_to_meters(self.radius_miles)
    }
}

/// An upstream places search capability
#[async_trait]
pub trait PlaceProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Fetch places of one type around a point.
    ///
    /// A zero-results status is an empty success; any other non-success
    /// status fails with `ProviderStatus`.
    async fn fetch_by_type(&self, params: &NearbyParams) -> Result<Vec<PlaceRecord>, SearchError>;

    /// Fetch one place's full record.
    ///
    /// A non-success status yields `Ok(None)`; transport failures are errors.
    async fn fetch_details(&self, place_id: &str) -> Result<Option<PlaceRecord>, SearchError>;
}
