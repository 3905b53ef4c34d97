//! Category descriptors and query expansion

use serde::{Deserialize, Serialize};

/// One provider type code targeted by a category, plus informational synonyms
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    /// Upstream category vocabulary term (e.g. "pharmacy")
    pub provider_type_code: String,
    /// Natural-language aliases; never consulted by discovery or ranking
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl CategoryDescriptor {
    pub fn new(provider_type_code: impl Into<String>) -> Self {
        Self {
            provider_type_code: provider_type_code.into(),
            synonyms: Vec::new(),
        }
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }
}

/// A single provider query, issued once per search
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub provider_type_code: String,
}

/// Flatten categories into provider queries, preserving order.
///
/// Repeated type codes are kept: identity deduplication happens later on
/// place ids, not on queries.
pub fn expand(categories: &[CategoryDescriptor]) -> Vec<QueryDescriptor> {
    categories
        .iter()
        .map(|c| QueryDescriptor {
            provider_type_code: c.provider_type_code.clone(),
        })
        .collect()
}
