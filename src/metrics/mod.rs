//! Metrics collection module
//!
//! Tracks provider query volume, latency, error rates and search outcomes.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Response times kept per provider type code
const RESPONSE_WINDOW: usize = 100;

#[derive(Debug, Default)]
struct QueryCounters {
    requests: u64,
    successes: u64,
    errors: u64,
    response_times: VecDeque<u64>,
}

impl QueryCounters {
    fn avg_response_time(&self) -> Option<u64> {
        if self.response_times.is_empty() {
            return None;
        }
        Some(self.response_times.iter().sum::<u64>() / self.response_times.len() as u64)
    }

    /// Success percentage; 100 before any request
    fn reliability(&self) -> f64 {
        if self.requests == 0 {
            return 100.0;
        }
        (self.successes as f64 / self.requests as f64) * 100.0
    }

    fn stats(&self) -> QueryStats {
        QueryStats {
            requests: self.requests,
            errors: self.errors,
            avg_response_time: self.avg_response_time(),
            reliability: self.reliability(),
        }
    }
}

/// Process-wide search metrics
pub struct Metrics {
    /// Total search count
    total_searches: AtomicU64,
    /// Searches that failed
    failed_searches: AtomicU64,
    /// Radius widenings performed by adaptive searches
    radius_expansions: AtomicU64,
    /// Per provider type code counters
    queries: RwLock<HashMap<String, QueryCounters>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            failed_searches: AtomicU64::new(0),
            radius_expansions: AtomicU64::new(0),
            queries: RwLock::new(HashMap::new()),
        }
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment failed search count
    pub fn inc_failed_search(&self) {
        self.failed_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment radius widening count
    pub fn inc_radius_expansion(&self) {
        self.radius_expansions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of one provider query
    pub fn record_query(&self, type_code: &str, time_ms: u64, success: bool) {
        let mut queries = self.queries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = queries.entry(type_code.to_string()).or_default();

        entry.requests += 1;
        if success {
            entry.successes += 1;
        } else {
            entry.errors += 1;
        }

        if entry.response_times.len() >= RESPONSE_WINDOW {
            entry.response_times.pop_front();
        }
        entry.response_times.push_back(time_ms);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let queries = self.queries.read().unwrap_or_else(PoisonError::into_inner);
        let per_type = queries
            .iter()
            .map(|(code, counters)| (code.clone(), counters.stats()))
            .collect();

        MetricsSnapshot {
            total_searches: self.total_searches.load(Ordering::Relaxed),
            failed_searches: self.failed_searches.load(Ordering::Relaxed),
            radius_expansions: self.radius_expansions.load(Ordering::Relaxed),
            queries: per_type,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single provider type code
#[derive(Debug, Clone, Serialize)]
pub struct QueryStats {
    pub requests: u64,
    pub errors: u64,
    pub avg_response_time: Option<u64>,
    /// Success percentage
    pub reliability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_searches: u64,
    pub failed_searches: u64,
    pub radius_expansions: u64,
    pub queries: BTreeMap<String, QueryStats>,
}
