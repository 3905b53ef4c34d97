//! HTTP request handlers

use super::state::AppState;
use crate::error::SearchError;
use crate::geo::Coordinate;
use crate::search::{SearchOrigin, SearchRequest};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Origin latitude
    pub lat: f64,
    /// Origin longitude
    pub lng: f64,
    /// Origin label
    pub label: Option<String>,
    /// Radius in miles
    pub radius: Option<f64>,
    /// Categories (comma-separated)
    pub categories: String,
    /// Result cap
    pub max_results: Option<usize>,
    /// Minimum rating
    pub min_rating: Option<f64>,
    /// Widen the radius when too few places are found
    #[serde(default)]
    pub expand: bool,
    /// Places wanted before widening stops
    pub min_results: Option<usize>,
    /// Radius bound for widening
    pub max_radius: Option<f64>,
}

/// Category listing entry
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub name: String,
    pub display_name: Option<String>,
    pub provider_type_codes: Vec<String>,
}

/// Search error rendered as JSON
pub struct ApiError(SearchError);

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            SearchError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            SearchError::ProviderTransport {
                timed_out: true, ..
            } => (StatusCode::GATEWAY_TIMEOUT, "provider_timeout"),
            SearchError::ProviderTransport { .. } => (StatusCode::BAD_GATEWAY, "provider_transport"),
            SearchError::ProviderStatus { .. } => (StatusCode::BAD_GATEWAY, "provider_status"),
            SearchError::MalformedResponse { .. } => (StatusCode::BAD_GATEWAY, "malformed_response"),
        };

        if status.is_server_error() {
            tracing::error!("Search error: {}", self.0);
        }

        (
            status,
            Json(serde_json::json!({
                "error": kind,
                "message": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

/// Search handler
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let defaults = &state.settings.search;

    let categories = state.categories.parse_list(&params.categories)?;
    let coordinate = Coordinate::new(params.lat, params.lng);
    let origin = match params.label {
        Some(label) => SearchOrigin::labeled(coordinate, label),
        None => SearchOrigin::new(coordinate),
    };

    let request = SearchRequest::new(
        origin,
        params.radius.unwrap_or(defaults.default_radius_miles),
        categories,
    )
    .with_max_results(params.max_results.unwrap_or(defaults.default_max_results))
    .with_min_rating(params.min_rating.unwrap_or(defaults.default_min_rating));

    let outcome = if params.expand {
        state
            .adaptive
            .search_with_expanding_radius(
                &request,
                params.min_results.unwrap_or(defaults.min_results),
                params.max_radius.unwrap_or(defaults.max_radius_miles),
            )
            .await?
    } else {
        state.search.execute(&request).await?
    };

    Ok(Json(outcome).into_response())
}

/// Place details handler
pub async fn place_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let place = state
        .details
        .get_or_fetch(state.search.provider().as_ref(), &id)
        .await?;

    Ok(match place {
        Some(place) => Json(place).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "not_found", "id": id })),
        )
            .into_response(),
    })
}

/// Category catalog handler
pub async fn categories(State(state): State<AppState>) -> impl IntoResponse {
    let categories: Vec<CategoryResponse> = state
        .categories
        .iter()
        .map(|c| CategoryResponse {
            name: c.name.clone(),
            display_name: c.display_name.clone(),
            provider_type_codes: c
                .descriptors
                .iter()
                .map(|d| d.provider_type_code.clone())
                .collect(),
        })
        .collect();
    Json(categories)
}

/// Stats handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.search.metrics().snapshot())
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "instance": state.instance_name(),
        "version": crate::VERSION
    }))
}
