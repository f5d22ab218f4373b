use crate::storage::{CovidStore, DistrictRow, NewDistrict, StateRow, StateStats, StorageError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: CovidStore,
}

/// A single-row lookup. An unknown id serializes as `{}`.
#[derive(Debug, Serialize)]
pub struct Lookup<T> {
    #[serde(flatten)]
    pub row: Option<T>,
}

impl<T> Lookup<T> {
    pub fn from_row<R: Into<T>>(row: Option<R>) -> Self {
        Self {
            row: row.map(Into::into),
        }
    }
}

/// A state as returned by `/states/` and `/states/{stateId}`.
///
/// NULL columns serialize as `null`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    pub state_id: i64,
    pub state_name: Option<String>,
    pub population: Option<i64>,
}

impl From<StateRow> for StateResponse {
    fn from(row: StateRow) -> Self {
        Self {
            state_id: row.state_id,
            state_name: row.state_name,
            population: row.population,
        }
    }
}

/// Body of `POST /districts` and `PUT /districts/{districtId}`
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictRequest {
    pub district_name: String,
    pub state_id: i64,
    pub cases: i64,
    pub cured: i64,
    pub active: i64,
    pub deaths: i64,
}

impl From<DistrictRequest> for NewDistrict {
    fn from(request: DistrictRequest) -> Self {
        Self {
            district_name: request.district_name,
            state_id: request.state_id,
            cases: request.cases,
            cured: request.cured,
            active: request.active,
            deaths: request.deaths,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictResponse {
    pub district_id: i64,
    pub district_name: Option<String>,
    pub state_id: Option<i64>,
    pub cases: Option<i64>,
    pub cured: Option<i64>,
    pub active: Option<i64>,
    pub deaths: Option<i64>,
}

impl From<DistrictRow> for DistrictResponse {
    fn from(row: DistrictRow) -> Self {
        Self {
            district_id: row.district_id,
            district_name: row.district_name,
            state_id: row.state_id,
            cases: row.cases,
            cured: row.cured,
            active: row.active,
            deaths: row.deaths,
        }
    }
}

/// Aggregated counters for one state. Totals are `null` when no district matches.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_cases: Option<i64>,
    pub total_cured: Option<i64>,
    pub total_active: Option<i64>,
    pub total_deaths: Option<i64>,
}

impl From<StateStats> for StatsResponse {
    fn from(stats: StateStats) -> Self {
        Self {
            total_cases: stats.total_cases,
            total_cured: stats.total_cured,
            total_active: stats.total_active,
            total_deaths: stats.total_deaths,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictDetailsResponse {
    pub state_name: Option<String>,
}

impl From<Option<String>> for DistrictDetailsResponse {
    fn from(state_name: Option<String>) -> Self {
        Self { state_name }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub total_states: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Internal(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Internal(detail) => {
                error!("Internal error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(ErrorResponse {
            error: status.to_string(),
            message: message.to_string(),
        }))
        .into_response()
    }
}
