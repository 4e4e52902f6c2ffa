//! JSON handlers for the house structure: summary, floors and rooms.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use smarthouse_app::ports::{ActuatorStateStore, MeasurementStore};
use smarthouse_domain::house::{Floor, HouseSummary, Room};

use crate::error::ApiError;
use crate::extract::ApiPath;
use crate::state::AppState;

/// A floor and how many rooms it holds.
#[derive(Debug, Serialize)]
pub struct FloorView {
    pub floor_no: usize,
    pub no_rooms: usize,
}

impl From<&Floor> for FloorView {
    fn from(floor: &Floor) -> Self {
        Self {
            floor_no: floor.number,
            no_rooms: floor.rooms.len(),
        }
    }
}

/// A room addressed by its 1-based position on a floor.
#[derive(Debug, Serialize)]
pub struct RoomView {
    pub room_no: usize,
    pub room_name: String,
    pub area: f64,
}

impl RoomView {
    fn new(room_no: usize, room: &Room) -> Self {
        Self {
            room_no,
            room_name: room.name.clone(),
            area: room.size,
        }
    }
}

/// Possible responses from the summary endpoint.
pub enum SummaryResponse {
    Ok(Json<HouseSummary>),
}

impl IntoResponse for SummaryResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the floor list endpoint.
pub enum ListFloorsResponse {
    Ok(Json<Vec<FloorView>>),
}

impl IntoResponse for ListFloorsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the single floor endpoint.
pub enum GetFloorResponse {
    Ok(Json<FloorView>),
}

impl IntoResponse for GetFloorResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the room list endpoint.
pub enum ListRoomsResponse {
    Ok(Json<Vec<RoomView>>),
}

impl IntoResponse for ListRoomsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the single room endpoint.
pub enum GetRoomResponse {
    Ok(Json<RoomView>),
}

impl IntoResponse for GetRoomResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /smarthouse`
pub async fn summary<M, A>(State(state): State<AppState<M, A>>) -> SummaryResponse
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    SummaryResponse::Ok(Json(state.service.summary()))
}

/// `GET /smarthouse/floor`
pub async fn list_floors<M, A>(State(state): State<AppState<M, A>>) -> ListFloorsResponse
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    let floors = state.service.floors().iter().map(FloorView::from).collect();
    ListFloorsResponse::Ok(Json(floors))
}

/// `GET /smarthouse/floor/{fid}`
pub async fn get_floor<M, A>(
    State(state): State<AppState<M, A>>,
    ApiPath(fid): ApiPath<usize>,
) -> Result<GetFloorResponse, ApiError>
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    let floor = state.service.floor(fid)?;
    Ok(GetFloorResponse::Ok(Json(FloorView::from(floor))))
}

/// `GET /smarthouse/floor/{fid}/room`
pub async fn list_rooms<M, A>(
    State(state): State<AppState<M, A>>,
    ApiPath(fid): ApiPath<usize>,
) -> Result<ListRoomsResponse, ApiError>
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    let rooms = (1..)
        .zip(state.service.rooms(fid)?)
        .map(|(room_no, room)| RoomView::new(room_no, room))
        .collect();
    Ok(ListRoomsResponse::Ok(Json(rooms)))
}

/// `GET /smarthouse/floor/{fid}/room/{rid}`
pub async fn get_room<M, A>(
    State(state): State<AppState<M, A>>,
    ApiPath((fid, rid)): ApiPath<(usize, usize)>,
) -> Result<GetRoomResponse, ApiError>
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    let room = state.service.room(fid, rid)?;
    Ok(GetRoomResponse::Ok(Json(RoomView::new(rid, room))))
}
