//! Settings structures for placefinder configuration

use crate::categories::CategoryDescriptor;
use crate::search::MAX_RATING;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub places: PlacesSettings,
    pub search: SearchSettings,
    pub cache: CacheSettings,
    pub categories: Vec<CategoryConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            outgoing: OutgoingSettings::default(),
            places: PlacesSettings::default(),
            search: SearchSettings::default(),
            cache: CacheSettings::default(),
            categories: default_categories(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (PLACEFINDER_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("PLACEFINDER_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("PLACEFINDER_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("PLACEFINDER_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("PLACEFINDER_PLACES_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_PLACES_API_KEY"))
        {
            self.places.api_key = Some(val);
        }
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.places.provider == "google" && self.places.api_key.is_none() {
            bail!("places.api_key is required for the google provider");
        }
        if self.places.results_per_type == 0 {
            bail!("places.results_per_type must be at least 1");
        }
        if !is_positive(self.search.default_radius_miles) {
            bail!("search.default_radius_miles must be positive");
        }
        if !is_positive(self.search.max_radius_miles) {
            bail!("search.max_radius_miles must be positive");
        }
        if self.search.default_max_results == 0 {
            bail!("search.default_max_results must be at least 1");
        }
        if !(0.0..=MAX_RATING).contains(&self.search.default_min_rating) {
            bail!("search.default_min_rating must be within [0, {}]", MAX_RATING);
        }
        if !is_positive(self.outgoing.request_timeout) {
            bail!("outgoing.request_timeout must be a positive number of seconds");
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by the API
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "placefinder".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8890,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// User agent sent upstream
    pub useragent: String,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::DEFAULT_TIMEOUT as f64,
            pool_maxsize: 20,
            verify_ssl: true,
            useragent: format!("placefinder/{}", crate::VERSION),
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Upstream places provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesSettings {
    /// Provider implementation to use
    pub provider: String,
    /// API key for the provider
    pub api_key: Option<String>,
    /// Base URL of the places API
    pub base_url: String,
    /// Raw rows considered per provider type code
    pub results_per_type: usize,
    /// Outbound request budget per second
    pub rate_limit_qps: u32,
    /// Fields requested from the details endpoint
    pub detail_fields: Vec<String>,
}

impl Default for PlacesSettings {
    fn default() -> Self {
        Self {
            provider: "google".to_string(),
            api_key: None,
            base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            results_per_type: 20,
            rate_limit_qps: 10,
            detail_fields: [
                "place_id",
                "name",
                "formatted_address",
                "geometry",
                "rating",
                "price_level",
                "types",
                "formatted_phone_number",
                "international_phone_number",
                "website",
                "opening_hours",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Radius used when a request does not give one
    pub default_radius_miles: f64,
    /// Result cap used when a request does not give one
    pub default_max_results: usize,
    /// Minimum rating used when a request does not give one
    pub default_min_rating: f64,
    /// Results wanted before the radius stops widening
    pub min_results: usize,
    /// Upper bound for radius widening
    pub max_radius_miles: f64,
    /// Issue per-type queries concurrently (merged in declared order)
    pub concurrent_fetch: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_radius_miles: 2.0,
            default_max_results: 10,
            default_min_rating: 0.0,
            min_results: 3,
            max_radius_miles: 25.0,
            concurrent_fetch: true,
        }
    }
}

/// Details cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub details_ttl_secs: u64,
    pub details_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            details_ttl_secs: 3600,
            details_capacity: 10_000,
        }
    }
}

/// A human category and the provider type codes it targets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Category key (e.g. "grocery")
    pub name: String,
    /// Display name
    pub display_name: Option<String>,
    /// Whether the category is disabled
    pub disabled: bool,
    /// Provider queries, in the order they are issued
    pub descriptors: Vec<CategoryDescriptor>,
}

fn category(name: &str, display: &str, descriptors: Vec<CategoryDescriptor>) -> CategoryConfig {
    CategoryConfig {
        name: name.to_string(),
        display_name: Some(display.to_string()),
        descriptors,
        ..Default::default()
    }
}

/// Default category catalog
pub fn default_categories() -> Vec<CategoryConfig> {
    vec![
        category(
            "grocery",
            "Grocery",
            vec![
                CategoryDescriptor::new("grocery_or_supermarket")
                    .with_synonyms(["groceries", "grocery store", "food shopping"]),
                CategoryDescriptor::new("supermarket").with_synonyms(["supermarket", "market"]),
            ],
        ),
        category(
            "pharmacy",
            "Pharmacy",
            vec![
                CategoryDescriptor::new("pharmacy").with_synonyms(["prescription", "medicine"]),
                CategoryDescriptor::new("drugstore").with_synonyms(["drugstore", "drug store"]),
            ],
        ),
        category(
            "gas_station",
            "Gas Station",
            vec![CategoryDescriptor::new("gas_station").with_synonyms(["gas", "fuel", "petrol"])],
        ),
        category(
            "restaurant",
            "Restaurant",
            vec![
                CategoryDescriptor::new("restaurant").with_synonyms(["dinner", "lunch", "eat out"]),
                CategoryDescriptor::new("meal_takeaway").with_synonyms(["takeout", "take away"]),
            ],
        ),
        category(
            "bank",
            "Bank",
            vec![
                CategoryDescriptor::new("bank").with_synonyms(["deposit", "withdraw"]),
                CategoryDescriptor::new("atm").with_synonyms(["cash machine"]),
            ],
        ),
        category(
            "shopping",
            "Shopping",
            vec![
                CategoryDescriptor::new("shopping_mall").with_synonyms(["mall"]),
                CategoryDescriptor::new("department_store").with_synonyms(["department store"]),
                CategoryDescriptor::new("clothing_store").with_synonyms(["clothes", "clothing"]),
            ],
        ),
        category(
            "medical",
            "Medical",
            vec![
                CategoryDescriptor::new("hospital").with_synonyms(["hospital", "clinic"]),
                CategoryDescriptor::new("doctor").with_synonyms(["doctor", "checkup"]),
            ],
        ),
        category(
            "fitness",
            "Fitness",
            vec![CategoryDescriptor::new("gym").with_synonyms(["gym", "workout", "exercise"])],
        ),
    ]
}
