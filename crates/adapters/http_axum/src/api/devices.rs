//! JSON handlers for the device listing.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use smarthouse_app::ports::{ActuatorStateStore, MeasurementStore};
use smarthouse_app::services::house_service::Located;
use smarthouse_domain::device::Device;
use smarthouse_domain::id::DeviceId;

use crate::error::ApiError;
use crate::extract::ApiPath;
use crate::state::AppState;

/// One entry of the device listing.
#[derive(Debug, Serialize)]
pub struct DeviceEntry {
    pub id: DeviceId,
    pub room: String,
}

impl From<Located<'_>> for DeviceEntry {
    fn from(located: Located<'_>) -> Self {
        Self {
            id: located.device.id.clone(),
            room: located.room.name.clone(),
        }
    }
}

/// Full device description with the name of its room.
#[derive(Debug, Serialize)]
pub struct DeviceView {
    pub device: Device,
    pub room_name: String,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<DeviceEntry>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<DeviceView>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /smarthouse/device`
pub async fn list<M, A>(State(state): State<AppState<M, A>>) -> ListResponse
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    let devices = state.service.devices().map(DeviceEntry::from).collect();
    ListResponse::Ok(Json(devices))
}

/// `GET /smarthouse/device/{id}`
pub async fn get<M, A>(
    State(state): State<AppState<M, A>>,
    ApiPath(id): ApiPath<DeviceId>,
) -> Result<GetResponse, ApiError>
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    let located = state.service.device(&id)?;
    Ok(GetResponse::Ok(Json(DeviceView {
        device: located.device.clone(),
        room_name: located.room.name.clone(),
    })))
}
