//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod actuators;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod house;
#[allow(clippy::missing_errors_doc)]
pub mod sensors;

use axum::Router;
use axum::routing::{delete, get};

use smarthouse_app::ports::{ActuatorStateStore, MeasurementStore};

use crate::state::AppState;

/// Build the `/smarthouse` routes.
pub fn routes<M, A>() -> Router<AppState<M, A>>
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    Router::new()
        // Structure
        .route("/smarthouse", get(house::summary::<M, A>))
        .route("/smarthouse/floor", get(house::list_floors::<M, A>))
        .route("/smarthouse/floor/{fid}", get(house::get_floor::<M, A>))
        .route("/smarthouse/floor/{fid}/room", get(house::list_rooms::<M, A>))
        .route("/smarthouse/floor/{fid}/room/{rid}", get(house::get_room::<M, A>))
        // Devices
        .route("/smarthouse/device", get(devices::list::<M, A>))
        .route(
            "/smarthouse/device/{id}",
            get(devices::get::<M, A>).put(actuators::update::<M, A>),
        )
        // Sensors
        .route(
            "/smarthouse/sensor/{id}/current",
            get(sensors::current::<M, A>).post(sensors::record::<M, A>),
        )
        .route("/smarthouse/sensor/{id}/values", get(sensors::values::<M, A>))
        .route("/smarthouse/sensor/{id}/oldest", delete(sensors::delete_oldest::<M, A>))
        // Actuators
        .route(
            "/smarthouse/actuator/{id}/current",
            get(actuators::current::<M, A>).put(actuators::update::<M, A>),
        )
}
