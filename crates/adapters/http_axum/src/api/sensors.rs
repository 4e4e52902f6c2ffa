//! JSON handlers for sensor readings.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use smarthouse_app::ports::{ActuatorStateStore, MeasurementStore};
use smarthouse_domain::id::DeviceId;
use smarthouse_domain::measurement::Measurement;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// Request body for recording a reading.
#[derive(Deserialize)]
pub struct RecordRequest {
    pub value: f64,
}

/// Query parameters for the history endpoint.
#[derive(Deserialize)]
pub struct ValuesQuery {
    /// Maximum number of readings; all of them when absent.
    pub limit: Option<i64>,
}

/// Possible responses from the current reading endpoint.
pub enum CurrentResponse {
    /// The latest reading, or `null` when none was recorded yet.
    Ok(Json<Option<Measurement>>),
}

impl IntoResponse for CurrentResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the record endpoint.
pub enum RecordResponse {
    Created(Json<Measurement>),
}

impl IntoResponse for RecordResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the history endpoint.
pub enum ValuesResponse {
    Ok(Json<Vec<Measurement>>),
}

impl IntoResponse for ValuesResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete-oldest endpoint.
pub enum DeleteOldestResponse {
    /// The reading that was removed.
    Ok(Json<Measurement>),
}

impl IntoResponse for DeleteOldestResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /smarthouse/sensor/{id}/current`
pub async fn current<M, A>(
    State(state): State<AppState<M, A>>,
    ApiPath(id): ApiPath<DeviceId>,
) -> Result<CurrentResponse, ApiError>
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    let latest = state.service.latest_reading(&id).await?;
    Ok(CurrentResponse::Ok(Json(latest)))
}

/// `POST /smarthouse/sensor/{id}/current`
pub async fn record<M, A>(
    State(state): State<AppState<M, A>>,
    ApiPath(id): ApiPath<DeviceId>,
    ApiJson(req): ApiJson<RecordRequest>,
) -> Result<RecordResponse, ApiError>
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    let stored = state.service.record_reading(&id, req.value).await?;
    Ok(RecordResponse::Created(Json(stored)))
}

/// `GET /smarthouse/sensor/{id}/values?limit=`
pub async fn values<M, A>(
    State(state): State<AppState<M, A>>,
    ApiPath(id): ApiPath<DeviceId>,
    ApiQuery(params): ApiQuery<ValuesQuery>,
) -> Result<ValuesResponse, ApiError>
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    let rows = state.service.history(&id, params.limit).await?;
    Ok(ValuesResponse::Ok(Json(rows)))
}

/// `DELETE /smarthouse/sensor/{id}/oldest`
pub async fn delete_oldest<M, A>(
    State(state): State<AppState<M, A>>,
    ApiPath(id): ApiPath<DeviceId>,
) -> Result<DeleteOldestResponse, ApiError>
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    let removed = state.service.delete_oldest(&id).await?;
    Ok(DeleteOldestResponse::Ok(Json(removed)))
}
