//! JSON handlers for actuator state.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use smarthouse_app::ports::{ActuatorStateStore, MeasurementStore};
use smarthouse_domain::actuator::{ActuatorState, StateChange};
use smarthouse_domain::id::DeviceId;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

/// Current state of an actuator; `state` is `null` until first set.
#[derive(Debug, Serialize)]
pub struct StateView {
    pub id: DeviceId,
    pub state: Option<ActuatorState>,
}

/// Possible responses from the current state endpoint.
pub enum CurrentResponse {
    Ok(Json<StateView>),
}

impl IntoResponse for CurrentResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the update endpoint.
pub enum UpdateResponse {
    Ok(Json<StateView>),
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /smarthouse/actuator/{id}/current`
pub async fn current<M, A>(
    State(state): State<AppState<M, A>>,
    ApiPath(id): ApiPath<DeviceId>,
) -> Result<CurrentResponse, ApiError>
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    let current = state.service.actuator_state(&id).await?;
    Ok(CurrentResponse::Ok(Json(StateView { id, state: current })))
}

/// `PUT /smarthouse/actuator/{id}/current` and `PUT /smarthouse/device/{id}`
///
/// Body is `{"action": "toggle"}` or `{"action": "set", "state": ...}`.
pub async fn update<M, A>(
    State(state): State<AppState<M, A>>,
    ApiPath(id): ApiPath<DeviceId>,
    ApiJson(change): ApiJson<StateChange>,
) -> Result<UpdateResponse, ApiError>
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    let stored = state.service.set_actuator_state(&id, change).await?;
    Ok(UpdateResponse::Ok(Json(StateView {
        id,
        state: Some(stored),
    })))
}
