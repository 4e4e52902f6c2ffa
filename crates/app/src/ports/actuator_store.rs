//! Actuator state store port: one current state per actuator.

use std::future::Future;

use smarthouse_domain::actuator::ActuatorState;
use smarthouse_domain::error::SmartHouseError;
use smarthouse_domain::id::DeviceId;

/// Repository for the current [`ActuatorState`] of each actuator.
pub trait ActuatorStateStore {
    /// Current state, or `None` if the actuator was never set.
    fn get_state(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Option<ActuatorState>, SmartHouseError>> + Send;

    /// Insert or overwrite the state of an actuator, returning what was stored.
    fn set_state(
        &self,
        device_id: &DeviceId,
        state: ActuatorState,
    ) -> impl Future<Output = Result<ActuatorState, SmartHouseError>> + Send;
}
