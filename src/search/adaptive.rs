//! Radius-widening search
//!
//! Repeats a search with a growing radius until enough places are found or
//! the radius bound is reached. Each attempt replaces the previous outcome;
//! results are never merged across radii.

use super::executor::Search;
use super::models::SearchRequest;
use crate::error::SearchError;
use crate::results::SearchOutcome;
use std::sync::Arc;
use tracing::{debug, info};

/// Factor applied to the radius after each short attempt
pub const RADIUS_GROWTH: f64 = 1.5;

/// Relative distance from the bound at which a widened radius snaps to it
const SNAP_TOLERANCE: f64 = 1e-9;

/// Radius state carried between attempts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusExpansion {
    radius: f64,
    max_radius: f64,
    iterations: u32,
}

impl RadiusExpansion {
    pub fn new(initial_radius: f64, max_radius: f64) -> Self {
        Self {
            radius: initial_radius,
            max_radius,
            iterations: 0,
        }
    }

    /// Radius for the next attempt
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Attempts recorded so far
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Record one attempt at the current radius
    pub fn record_attempt(&mut self) {
        self.iterations += 1;
    }

    /// Whether the radius has reached its bound
    pub fn exhausted(&self) -> bool {
        self.radius >= self.max_radius
    }

    /// Widen the radius, capped at the bound. Returns false once exhausted.
    pub fn advance(&mut self) -> bool {
        if self.exhausted() {
            return false;
        }
        let next = self.radius * RADIUS_GROWTH;
        // 1.2 * 1.5 lands a few ulps short of 1.8
        self.radius = if next >= self.max_radius * (1.0 - SNAP_TOLERANCE) {
            self.max_radius
        } else {
            next
        };
        true
    }

    /// Most attempts a search starting at `initial` can make before reaching
    /// `max`: `ceil(log_1.5(max / initial)) + 1`
    pub fn iteration_bound(initial_radius: f64, max_radius: f64) -> u32 {
        if initial_radius >= max_radius {
            return 1;
        }
        let steps = (max_radius / initial_radius).ln() / RADIUS_GROWTH.ln();
        let nearest = steps.round();
        let steps = if (steps - nearest).abs() < SNAP_TOLERANCE {
            nearest
        } else {
            steps.ceil()
        };
        steps as u32 + 1
    }
}

/// Search that widens its radius when too few places are found
pub struct AdaptiveSearch {
    search: Arc<Search>,
}

impl AdaptiveSearch {
    pub fn new(search: Arc<Search>) -> Self {
        Self { search }
    }

    /// Search at the request's radius, widening by 1.5x until `min_results`
    /// ranked places are found or `max_radius_miles` has been searched.
    ///
    /// At least one search is always made, even when the initial radius
    /// already exceeds the bound. A provider error ends the loop at once.
    pub async fn search_with_expanding_radius(
        &self,
        initial: &SearchRequest,
        min_results: usize,
        max_radius_miles: f64,
    ) -> Result<SearchOutcome, SearchError> {
        if !(max_radius_miles.is_finite() && max_radius_miles > 0.0) {
            return Err(SearchError::invalid(format!(
                "max radius must be positive, got {}",
                max_radius_miles
            )));
        }
        initial.validate()?;

        let mut state = RadiusExpansion::new(initial.radius_miles, max_radius_miles);

        loop {
            let request = initial.with_radius(state.radius());
            let outcome = self.search.execute(&request).await?;
            state.record_attempt();

            if outcome.ranked_places.len() >= min_results {
                info!(
                    "Found {} places at {} miles after {} attempts",
                    outcome.ranked_places.len(),
                    state.radius(),
                    state.iterations()
                );
                return Ok(outcome);
            }

            if !state.advance() {
                info!(
                    "Radius bound {} miles reached with {} places",
                    max_radius_miles,
                    outcome.ranked_places.len()
                );
                return Ok(outcome);
            }

            self.search.metrics().inc_radius_expansion();
            debug!(
                "Only {} of {} places, widening radius to {} miles",
                outcome.ranked_places.len(),
                min_results,
                state.radius()
            );
        }
    }
}
