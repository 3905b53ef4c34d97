//! Search request and related data models

use crate::categories::CategoryDescriptor;
use crate::error::SearchError;
use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};

/// Default number of ranked places returned
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Highest rating a provider can assign
pub const MAX_RATING: f64 = 5.0;

/// Where a search is centered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOrigin {
    pub coordinate: Coordinate,
    /// Human label such as "home"
    pub label: Option<String>,
}

impl SearchOrigin {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            label: None,
        }
    }

    pub fn labeled(coordinate: Coordinate, label: impl Into<String>) -> Self {
        Self {
            coordinate,
            label: Some(label.into()),
        }
    }
}

/// Complete search request with all parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub origin: SearchOrigin,
    /// Radius in miles; converted to meters only at the provider call
    pub radius_miles: f64,
    /// Categories in caller order; the order fixes dedup and tie-breaking
    pub categories: Vec<CategoryDescriptor>,
    pub max_results: usize,
    pub min_rating: f64,
}

impl SearchRequest {
    /// Create a request with default result cap and rating floor
    pub fn new(origin: SearchOrigin, radius_miles: f64, categories: Vec<CategoryDescriptor>) -> Self {
        Self {
            origin,
            radius_miles,
            categories,
            max_results: DEFAULT_MAX_RESULTS,
            min_rating: 0.0,
        }
    }

    /// Set the result cap
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the rating floor
    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    /// Same request at a different radius
    pub fn with_radius(&self, radius_miles: f64) -> Self {
        Self {
            radius_miles,
            ..self.clone()
        }
    }

    /// Add a category
    pub fn add_category(&mut self, descriptor: CategoryDescriptor) {
        self.categories.push(descriptor);
    }

    /// Check the request before any network call
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.origin.coordinate.is_finite() {
            return Err(SearchError::invalid("origin coordinates must be finite"));
        }
        if !(self.radius_miles.is_finite() && self.radius_miles > 0.0) {
            return Err(SearchError::invalid(format!(
                "radius must be positive, got {}",
                self.radius_miles
            )));
        }
        if self.categories.is_empty() {
            return Err(SearchError::invalid("at least one category is required"));
        }
        if self.max_results < 1 {
            return Err(SearchError::invalid("max_results must be at least 1"));
        }
        if !(0.0..=MAX_RATING).contains(&self.min_rating) {
            return Err(SearchError::invalid(format!(
                "min_rating must be within [0, {}], got {}",
                MAX_RATING, self.min_rating
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SearchRequest {
        SearchRequest::new(
            SearchOrigin::labeled(Coordinate::new(37.7749, -122.4194), "home"),
            2.0,
            vec![CategoryDescriptor::new("pharmacy")],
        )
    }

    #[test]
    fn test_defaults() {
        let request = request();
        assert_eq!(request.max_results, 10);
        assert_eq!(request.min_rating, 0.0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let request = request().with_max_results(3).with_min_rating(4.5);
        assert_eq!(request.max_results, 3);
        assert_eq!(request.min_rating, 4.5);

        let wider = request.with_radius(3.0);
        assert_eq!(wider.radius_miles, 3.0);
        assert_eq!(wider.max_results, 3);
        assert_eq!(request.radius_miles, 2.0);
    }

    #[test]
    fn test_invalid_requests() {
        let invalid = [
            request().with_radius(0.0),
            request().with_radius(-1.0),
            request().with_radius(f64::NAN),
            request().with_max_results(0),
            request().with_min_rating(-0.5),
            request().with_min_rating(5.5),
            SearchRequest::new(
                SearchOrigin::new(Coordinate::new(37.0, -122.0)),
                1.0,
                vec![],
            ),
            SearchRequest::new(
                SearchOrigin::new(Coordinate::new(f64::INFINITY, 0.0)),
                1.0,
                vec![CategoryDescriptor::new("bank")],
            ),
        ];

        for request in invalid {
            assert!(
                matches!(request.validate(), Err(SearchError::InvalidRequest(_))),
                "expected invalid: {request:?}"
            );
        }
    }

    #[test]
    fn test_rating_bounds_are_inclusive() {
        assert!(request().with_min_rating(0.0).validate().is_ok());
        assert!(request().with_min_rating(5.0).validate().is_ok());
    }
}
