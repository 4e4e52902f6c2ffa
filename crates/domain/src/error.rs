//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SmartHouseError`] via `#[from]` or an explicit `From` impl.

use crate::id::DeviceId;

/// Top-level error returned by every fallible domain and application operation.
#[derive(Debug, thiserror::Error)]
pub enum SmartHouseError {
    /// A caller-supplied value or a loaded structure violates an invariant.
    #[error(transparent)]
    InvalidArgument(#[from] ValidationError),

    /// The addressed device (or sensor/actuator) does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A 1-based floor or room position lies outside the configured span.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),

    /// Deletion was requested on a device without any stored measurement.
    #[error("no measurements stored for device {0}")]
    NoMeasurements(DeviceId),

    /// The underlying persistence failed.
    #[error("storage error")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("device identifier must not be empty")]
    EmptyDeviceId,

    #[error("device identifier {0} is registered more than once")]
    DuplicateDeviceId(DeviceId),

    #[error("sensor {0} must declare a unit")]
    EmptyUnit(DeviceId),

    #[error("room {name} must have a positive size, got {size}")]
    NonPositiveRoomSize { name: String, size: f64 },

    #[error("floor at position {position} is numbered {number}")]
    FloorNumbering { position: usize, number: usize },

    #[error("limit must be a positive integer, got {0}")]
    NonPositiveLimit(i64),
}

/// Lookup of a device (or a device of a given kind) that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// What was looked up (`"Device"`, `"Sensor"`, `"Actuator"`).
    pub entity: &'static str,
    /// The identifier that missed.
    pub id: String,
}

/// A 1-based structural position outside `1..=max`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{what} {index} is out of range (1..={max})")]
pub struct OutOfRangeError {
    /// `"floor"` or `"room"`.
    pub what: &'static str,
    pub index: usize,
    pub max: usize,
}

impl NotFoundError {
    /// Shorthand for a device-shaped miss.
    #[must_use]
    pub fn device(entity: &'static str, id: &DeviceId) -> Self {
        Self {
            entity,
            id: id.to_string(),
        }
    }
}
