//! API handlers.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::classifier::ClassificationResult;
use crate::directory::{CountryEntry, DirectoryError, OperatorEntry};
use crate::telemetry::render_metrics;

use super::render::{render_text, ERROR_LINE};
use super::server::{DirectoryChange, ReloadResult};
use super::ApiState;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Lookup request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupRequest {
    /// Raw MSISDN as typed by the caller
    pub number: String,
}

/// JSON lookup response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupResponse {
    Found {
        mno: String,
        country_code: String,
        subscriber_number: String,
        country_identifier: String,
    },
    Error {
        error: String,
    },
}

impl From<ClassificationResult> for LookupResponse {
    fn from(result: ClassificationResult) -> Self {
        Self::Found {
            mno: result.mno,
            country_code: result.country_code,
            subscriber_number: result.subscriber_number,
            country_identifier: result.country_identifier,
        }
    }
}

/// Text lookup handler.
///
/// POST /lookup - four `label: value` lines, or a single `Error` line
pub async fn lookup_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<LookupRequest>,
) -> impl IntoResponse {
    let outcome = state.lookup(&request.number).await;
    let status = if outcome.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], render_text(&outcome))
}

/// JSON lookup handler.
///
/// POST /api/lookup
pub async fn api_lookup_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<LookupRequest>,
) -> impl IntoResponse {
    match state.lookup(&request.number).await {
        Ok(result) => (StatusCode::OK, Json(LookupResponse::from(result))),
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(LookupResponse::Error {
                error: ERROR_LINE.to_string(),
            }),
        ),
    }
}

/// Country listing handler.
pub async fn countries_handler(State(state): State<Arc<ApiState>>) -> Json<Vec<CountryEntry>> {
    let classifier = state.classifier().await;
    let countries = classifier
        .directory()
        .countries()
        .into_iter()
        .cloned()
        .collect();
    Json(countries)
}

/// Operator listing handler.
pub async fn operators_handler(State(state): State<Arc<ApiState>>) -> Json<Vec<OperatorEntry>> {
    let classifier = state.classifier().await;
    let operators = classifier
        .directory()
        .operators()
        .into_iter()
        .cloned()
        .collect();
    Json(operators)
}

/// Add country handler.
///
/// POST /countries - body is a country entry
pub async fn add_country_handler(
    State(state): State<Arc<ApiState>>,
    Json(entry): Json<CountryEntry>,
) -> impl IntoResponse {
    let outcome = state.add_country(entry).await;
    change_response(&state, StatusCode::CREATED, outcome).await
}

/// Remove country handler.
///
/// DELETE /countries/:country_code - also removes the country's operators
pub async fn remove_country_handler(
    State(state): State<Arc<ApiState>>,
    Path(country_code): Path<String>,
) -> impl IntoResponse {
    let outcome = state.remove_country(&country_code).await;
    change_response(&state, StatusCode::OK, outcome).await
}

/// Add operator handler.
///
/// POST /operators - body is an operator entry
pub async fn add_operator_handler(
    State(state): State<Arc<ApiState>>,
    Json(entry): Json<OperatorEntry>,
) -> impl IntoResponse {
    let outcome = state.add_operator(entry).await;
    change_response(&state, StatusCode::CREATED, outcome).await
}

/// Remove operator handler.
///
/// DELETE /operators/:country_code/:prefix
pub async fn remove_operator_handler(
    State(state): State<Arc<ApiState>>,
    Path((country_code, prefix)): Path<(String, String)>,
) -> impl IntoResponse {
    let outcome = state.remove_operator(&country_code, &prefix).await;
    change_response(&state, StatusCode::OK, outcome).await
}

async fn change_response(
    state: &ApiState,
    success: StatusCode,
    outcome: Result<DirectoryChange, DirectoryError>,
) -> (StatusCode, Json<DirectoryChange>) {
    match outcome {
        Ok(change) => (success, Json(change)),
        Err(error) => {
            let status = match error {
                DirectoryError::CountryNotFound(_) | DirectoryError::OperatorNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                DirectoryError::DuplicateCountry(_) | DirectoryError::DuplicateOperator { .. } => {
                    StatusCode::CONFLICT
                }
                _ => StatusCode::BAD_REQUEST,
            };

            let classifier = state.classifier().await;
            let change = DirectoryChange {
                success: false,
                message: error.to_string(),
                countries: classifier.directory().country_count(),
                operators: classifier.directory().operator_count(),
            };
            (status, Json(change))
        }
    }
}

/// Directory reload handler.
///
/// POST /directory/reload - Rebuild the prefix directory from the config file
pub async fn reload_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    match state.reload_directory().await {
        Ok(result) => (StatusCode::OK, Json(result)),
        Err(error) => {
            let classifier = state.classifier().await;
            let result = ReloadResult {
                success: false,
                message: error,
                reload_count: state.reload_count(),
                countries: classifier.directory().country_count(),
                operators: classifier.directory().operator_count(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(result))
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check handler.
pub async fn health_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: if state.is_healthy() { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if state.is_healthy() {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Live handler (for Kubernetes).
pub async fn live_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub countries: usize,
    pub operators: usize,
}

/// Ready handler (for Kubernetes).
///
/// Ready once a non-empty directory is active.
pub async fn ready_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let classifier = state.classifier().await;
    let directory = classifier.directory();
    let ready = state.is_ready() && !directory.is_empty();

    let response = ReadinessResponse {
        ready,
        countries: directory.country_count(),
        operators: directory.operator_count(),
    };

    if ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Stats response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub uptime_seconds: u64,
    pub lookups: LookupStats,
    pub directory: DirectoryStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupStats {
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub rate_per_second: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryStats {
    pub countries: usize,
    pub operators: usize,
    pub reload_count: u64,
}

/// Stats handler.
pub async fn stats_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let classifier = state.classifier().await;
    let elapsed = state.uptime().as_secs_f64();
    let total = state.lookups_total();

    let response = StatsResponse {
        uptime_seconds: state.uptime().as_secs(),
        lookups: LookupStats {
            total,
            succeeded: state.lookups_succeeded(),
            failed: state.lookups_failed(),
            rate_per_second: if elapsed > 0.0 { total as f64 / elapsed } else { 0.0 },
        },
        directory: DirectoryStats {
            countries: classifier.directory().country_count(),
            operators: classifier.directory().operator_count(),
            reload_count: state.reload_count(),
        },
    };

    Json(response)
}

/// Metrics handler (Prometheus format).
pub async fn metrics_handler() -> impl IntoResponse {
    match render_metrics() {
        Ok(output) => (StatusCode::OK, [(header::CONTENT_TYPE, TEXT_PLAIN)], output),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, TEXT_PLAIN)],
            format!("Error encoding metrics: {}", e),
        ),
    }
}
