//! Registry of configured categories

use super::descriptor::CategoryDescriptor;
use crate::config::CategoryConfig;
use crate::error::SearchError;
use std::collections::HashMap;

/// Catalog of human categories, keyed by normalized name
pub struct CategoryRegistry {
    /// Categories in configuration order
    categories: Vec<CategoryConfig>,
    /// Normalized name -> position in `categories`
    index: HashMap<String, usize>,
}

impl CategoryRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a registry from configuration, skipping disabled entries
    pub fn from_configs(configs: &[CategoryConfig]) -> Self {
        let mut registry = Self::new();
        for config in configs.iter().filter(|c| !c.disabled) {
            registry.register(config.clone());
        }
        registry
    }

    /// Register a category, replacing one with the same name
    pub fn register(&mut self, config: CategoryConfig) {
        let key = Self::normalize(&config.name);
        match self.index.get(&key) {
            Some(&pos) => self.categories[pos] = config,
            None => {
                self.index.insert(key, self.categories.len());
                self.categories.push(config);
            }
        }
    }

    /// Get a category by name (case and separator insensitive)
    pub fn get(&self, name: &str) -> Option<&CategoryConfig> {
        self.index
            .get(&Self::normalize(name))
            .map(|&pos| &self.categories[pos])
    }

    /// Get the descriptors of a category
    pub fn descriptors(&self, name: &str) -> Option<&[CategoryDescriptor]> {
        self.get(name).map(|c| c.descriptors.as_slice())
    }

    /// Resolve category names to descriptors, in caller order
    pub fn resolve<I, S>(&self, names: I) -> Result<Vec<CategoryDescriptor>, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut descriptors = Vec::new();
        for name in names {
            let name = name.as_ref();
            let found = self.descriptors(name).ok_or_else(|| {
                SearchError::invalid(format!(
                    "unknown category '{}', expected one of: {}",
                    name,
                    self.names().join(", ")
                ))
            })?;
            descriptors.extend_from_slice(found);
        }
        Ok(descriptors)
    }

    /// Resolve a comma-separated list such as "grocery, pharmacy"
    pub fn parse_list(&self, list: &str) -> Result<Vec<CategoryDescriptor>, SearchError> {
        self.resolve(list.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }

    /// Find the first category whose name or synonym appears in free text
    pub fn match_synonym(&self, text: &str) -> Option<&str> {
        let text = text.to_lowercase();
        self.categories
            .iter()
            .find(|category| {
                text.contains(&category.name.replace('_', " "))
                    || category
                        .descriptors
                        .iter()
                        .flat_map(|d| d.synonyms.iter())
                        .any(|s| text.contains(&s.to_lowercase()))
            })
            .map(|c| c.name.as_str())
    }

    /// Iterate categories in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &CategoryConfig> {
        self.categories.iter()
    }

    /// Get all category names
    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn normalize(name: &str) -> String {
        name.trim().to_lowercase().replace(['-', ' '], "_")
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::from_configs(&crate::config::default_categories())
    }
}
