//! Measurement: a single timestamped sensor reading.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{SmartHouseError, ValidationError};
use crate::id::DeviceId;
use crate::time::Timestamp;

/// One reading taken by a sensor.
///
/// The unit is copied from the sensor when the reading is recorded, so a
/// later change of the device configuration does not rewrite history.
/// Values are stored as given; no physical range check is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub device_id: DeviceId,
    pub recorded_at: Timestamp,
    pub value: f64,
    pub unit: String,
}

impl Measurement {
    /// Create a builder for constructing a [`Measurement`].
    #[must_use]
    pub fn builder() -> MeasurementBuilder {
        MeasurementBuilder::default()
    }
}

/// Step-by-step builder for [`Measurement`].
#[derive(Debug, Default)]
pub struct MeasurementBuilder {
    device_id: Option<DeviceId>,
    recorded_at: Option<Timestamp>,
    value: f64,
    unit: String,
}

impl MeasurementBuilder {
    #[must_use]
    pub fn device_id(mut self, device_id: impl Into<DeviceId>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    #[must_use]
    pub fn recorded_at(mut self, recorded_at: Timestamp) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }

    #[must_use]
    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Consume the builder and return a [`Measurement`].
    ///
    /// Missing timestamps default to now.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::InvalidArgument`] if no device is set.
    pub fn build(self) -> Result<Measurement, SmartHouseError> {
        let device_id = self
            .device_id
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::EmptyDeviceId)?;
        Ok(Measurement {
            device_id,
            recorded_at: self.recorded_at.unwrap_or_else(crate::time::now),
            value: self.value,
            unit: self.unit,
        })
    }
}

/// Upper bound on the number of rows returned by a history query.
///
/// Only positive bounds exist; "no bound" is expressed as `Option::None`
/// by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimit(NonZeroUsize);

impl HistoryLimit {
    /// Validate a caller-supplied limit.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveLimit`] for zero or negative
    /// values.
    pub fn new(limit: i64) -> Result<Self, SmartHouseError> {
        usize::try_from(limit)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self)
            .ok_or_else(|| ValidationError::NonPositiveLimit(limit).into())
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0.get()
    }
}
