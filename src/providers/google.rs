//! Google Places provider implementation

use super::traits::{NearbyParams, PlaceProvider};
use crate::config::PlacesSettings;
use crate::error::SearchError;
use crate::geo::Coordinate;
use crate::network::{ApiRequest, ApiResponse, HttpClient};
use crate::results::{DayTime, OpeningHours, OpeningPeriod, PlaceRecord};
use async_trait::async_trait;
use chrono::NaiveTime;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    result: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPlace {
    place_id: Option<String>,
    name: Option<String>,
    formatted_address: Option<String>,
    vicinity: Option<String>,
    geometry: Option<RawGeometry>,
    rating: Option<f64>,
    price_level: Option<u8>,
    types: Vec<String>,
    formatted_phone_number: Option<String>,
    international_phone_number: Option<String>,
    website: Option<String>,
    opening_hours: Option<RawOpeningHours>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: Option<RawLatLng>,
}

#[derive(Debug, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOpeningHours {
    open_now: Option<bool>,
    weekday_text: Vec<String>,
    periods: Vec<RawPeriod>,
}

#[derive(Debug, Deserialize)]
struct RawPeriod {
    open: Option<RawDayTime>,
    close: Option<RawDayTime>,
}

#[derive(Debug, Deserialize)]
struct RawDayTime {
    day: u8,
    time: String,
}

/// Google Places nearby-search and details client
pub struct GooglePlaces {
    client: HttpClient,
    api_key: String,
    base_url: String,
    detail_fields: Vec<String>,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl GooglePlaces {
    pub fn new(client: HttpClient, api_key: impl Into<String>) -> Self {
        let defaults = PlacesSettings::default();
        Self {
            client,
            api_key: api_key.into(),
            base_url: defaults.base_url,
            detail_fields: defaults.detail_fields,
            limiter: None,
        }
    }

    /// Build from the `places` settings section
    pub fn from_settings(client: HttpClient, settings: &PlacesSettings) -> anyhow::Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("places.api_key is not set"))?;

        let mut provider = Self::new(client, api_key)
            .with_base_url(&settings.base_url)?
            .with_rate_limit(settings.rate_limit_qps);
        provider.detail_fields = settings.detail_fields.clone();
        Ok(provider)
    }

    /// Point at a different API root
    pub fn with_base_url(mut self, base_url: &str) -> anyhow::Result<Self> {
        let parsed = Url::parse(base_url)?;
        self.base_url = parsed.as_str().trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Pace outbound requests; 0 disables pacing
    pub fn with_rate_limit(mut self, qps: u32) -> Self {
        self.limiter =
            NonZeroU32::new(qps).map(|qps| Arc::new(RateLimiter::direct(Quota::per_second(qps))));
        self
    }

    fn nearby_request(&self, params: &NearbyParams) -> ApiRequest {
        ApiRequest::get(format!("{}/nearbysearch/json", self.base_url))
            .param(
                "location",
                format!("{},{}", params.origin.latitude, params.origin.longitude),
            )
            .param("radius", params.radius_meters().to_string())
            .param("type", params.provider_type_code.clone())
            .param("key", self.api_key.clone())
    }

    fn details_request(&self, place_id: &str) -> ApiRequest {
        ApiRequest::get(format!("{}/details/json", self.base_url))
            .param("place_id", place_id)
            .param("fields", self.detail_fields.join(","))
            .param("key", self.api_key.clone())
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, SearchError> {
        if let Some(ref limiter) = self.limiter {
            limiter.until_ready().await;
        }
        self.client.execute(request).await
    }
}

#[async_trait]
impl PlaceProvider for GooglePlaces {
    fn name(&self) -> &str {
        "google"
    }

    async fn fetch_by_type(&self, params: &NearbyParams) -> Result<Vec<PlaceRecord>, SearchError> {
        let response = self.send(self.nearby_request(params)).await?;

        if !response.is_success() {
            return Err(http_status_error(&response));
        }

        let body: NearbyResponse =
            response
                .json()
                .map_err(|source| SearchError::MalformedResponse {
                    context: format!("nearby search for {}", params.provider_type_code),
                    source,
                })?;

        match body.status.as_str() {
            STATUS_OK => {}
            STATUS_ZERO_RESULTS => {
                debug!("No {} places within {}m", params.provider_type_code, params.radius_meters());
                return Ok(Vec::new());
            }
            _ => return Err(SearchError::status(body.status, body.error_message)),
        }

        Ok(normalize_rows(body.results, params.limit))
    }

    async fn fetch_details(&self, place_id: &str) -> Result<Option<PlaceRecord>, SearchError> {
        let response = self.send(self.details_request(place_id)).await?;

        if !response.is_success() {
            warn!("Details lookup for {} failed with HTTP {}", place_id, response.status);
            return Ok(None);
        }

        let body: DetailsResponse =
            response
                .json()
                .map_err(|source| SearchError::MalformedResponse {
                    context: format!("details for {}", place_id),
                    source,
                })?;

        if body.status != STATUS_OK {
            warn!(
                "Details lookup for {} returned {}: {}",
                place_id,
                body.status,
                body.error_message.as_deref().unwrap_or("no message")
            );
            return Ok(None);
        }

        let place = body.result.and_then(normalize_row);
        if place.is_none() {
            warn!("Details lookup for {} returned an incomplete record", place_id);
        }
        Ok(place)
    }
}

fn http_status_error(response: &ApiResponse) -> SearchError {
    if response.is_rate_limited() {
        warn!("Places API is throttling requests (HTTP {})", response.status);
    }
    let message = if response.text.is_empty() {
        None
    } else {
        Some(response.text.chars().take(200).collect())
    };
    SearchError::status(format!("HTTP {}", response.status), message)
}

/// Truncate to `limit` raw rows, then normalize each.
fn normalize_rows(rows: Vec<serde_json::Value>, limit: usize) -> Vec<PlaceRecord> {
    rows.into_iter().take(limit).filter_map(normalize_row).collect()
}

/// Map a raw row to a typed record; rows without id, name or location are dropped.
fn normalize_row(row: serde_json::Value) -> Option<PlaceRecord> {
    let raw: RawPlace = match serde_json::from_value(row) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Dropping unparseable place row: {}", e);
            return None;
        }
    };

    let location = raw.geometry.and_then(|g| g.location);
    let (id, name, location) = match (raw.place_id, raw.name, location) {
        (Some(id), Some(name), Some(loc)) => (id, name, Coordinate::new(loc.lat, loc.lng)),
        (id, _, _) => {
            warn!("Dropping place row missing id, name or location: {:?}", id);
            return None;
        }
    };

    Some(PlaceRecord {
        id,
        name,
        address: raw.formatted_address.or(raw.vicinity).unwrap_or_default(),
        location,
        rating: raw.rating,
        price_level: raw.price_level,
        category_tags: raw.types.into_iter().collect(),
        distance_miles: None,
        phone: raw.formatted_phone_number.or(raw.international_phone_number),
        website: raw.website,
        opening_hours: raw.opening_hours.map(normalize_hours),
    })
}

fn normalize_hours(raw: RawOpeningHours) -> OpeningHours {
    OpeningHours {
        open_now: raw.open_now,
        weekday_text: raw.weekday_text,
        periods: raw
            .periods
            .into_iter()
            .filter_map(|p| {
                let open = p.open.and_then(parse_day_time)?;
                Some(OpeningPeriod {
                    open,
                    close: p.close.and_then(parse_day_time),
                })
            })
            .collect(),
    }
}

fn parse_day_time(raw: RawDayTime) -> Option<DayTime> {
    let time = NaiveTime::parse_from_str(&raw.time, "%H%M").ok()?;
    Some(DayTime { day: raw.day, time })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_full_row() {
        let row = json!({
            "place_id": "abc",
            "name": "Corner Market",
            "vicinity": "1 Main St",
            "geometry": { "location": { "lat": 37.78, "lng": -122.41 } },
            "rating": 4.3,
            "price_level": 2,
            "types": ["supermarket", "food", "store"],
            "opening_hours": {
                "open_now": true,
                "periods": [{ "open": { "day": 1, "time": "0800" }, "close": { "day": 1, "time": "2130" } }]
            }
        });

        let place = normalize_row(row).unwrap();
        assert_eq!(place.id, "abc");
        assert_eq!(place.address, "1 Main St");
        assert_eq!(place.rating, Some(4.3));
        assert_eq!(place.price_level, Some(2));
        assert!(place.category_tags.contains("supermarket"));
        assert_eq!(place.distance_miles, None);

        let hours = place.opening_hours.unwrap();
        assert_eq!(hours.open_now, Some(true));
        assert_eq!(hours.periods[0].open.time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(
            hours.periods[0].close.unwrap().time,
            NaiveTime::from_hms_opt(21, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_optionals_are_absent() {
        let row = json!({
            "place_id": "abc",
            "name": "Corner Market",
            "geometry": { "location": { "lat": 37.78, "lng": -122.41 } },
            "rating": null
        });

        let place = normalize_row(row).unwrap();
        assert_eq!(place.rating, None);
        assert_eq!(place.price_level, None);
        assert_eq!(place.phone, None);
        assert_eq!(place.website, None);
        assert_eq!(place.opening_hours, None);
        assert_eq!(place.address, "");
        assert!(place.category_tags.is_empty());
    }

    #[test]
    fn test_formatted_address_preferred_over_vicinity() {
        let row = json!({
            "place_id": "abc",
            "name": "Bank",
            "formatted_address": "1 Main St, San Francisco, CA",
            "vicinity": "1 Main St",
            "geometry": { "location": { "lat": 1.0, "lng": 2.0 } },
            "international_phone_number": "+1 415-555-0100"
        });

        let place = normalize_row(row).unwrap();
        assert_eq!(place.address, "1 Main St, San Francisco, CA");
        assert_eq!(place.phone.as_deref(), Some("+1 415-555-0100"));
    }

    #[test]
    fn test_incomplete_rows_are_dropped() {
        let rows = vec![
            json!({ "name": "No id", "geometry": { "location": { "lat": 1.0, "lng": 2.0 } } }),
            json!({ "place_id": "x", "name": "No geometry" }),
            json!({ "place_id": "y", "name": "Bad rating", "rating": "high",
                    "geometry": { "location": { "lat": 1.0, "lng": 2.0 } } }),
            json!({ "place_id": "z", "name": "Fine", "geometry": { "location": { "lat": 1.0, "lng": 2.0 } } }),
        ];

        let places = normalize_rows(rows, 10);
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].id, "z");
    }

    #[test]
    fn test_truncation_happens_before_normalization() {
        let rows: Vec<_> = (0..5)
            .map(|i| json!({ "place_id": format!("p{i}"), "name": "P",
                             "geometry": { "location": { "lat": 1.0, "lng": 2.0 } } }))
            .collect();

        let ids: Vec<_> = normalize_rows(rows, 3).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p0", "p1", "p2"]);
    }

    #[test]
    fn test_nearby_request_params() {
        let provider = GooglePlaces::new(HttpClient::new().unwrap(), "secret");
        let params = NearbyParams::new(Coordinate::new(37.7749, -122.4194), 2.0, "pharmacy", 20);
        let request = provider.nearby_request(&params);

        assert!(request.url.ends_with("/nearbysearch/json"));
        assert_eq!(request.get_param("location"), Some("37.7749,-122.4194"));
        assert_eq!(request.get_param("radius"), Some("3219"));
        assert_eq!(request.get_param("type"), Some("pharmacy"));
        assert_eq!(request.get_param("key"), Some("secret"));
    }

    #[test]
    fn test_from_settings_requires_key() {
        let settings = PlacesSettings::default();
        assert!(GooglePlaces::from_settings(HttpClient::new().unwrap(), &settings).is_err());
    }
}
