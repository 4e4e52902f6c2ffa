//! Device: a sensor or actuator installed in a room.

use serde::{Deserialize, Serialize};

use crate::error::{SmartHouseError, ValidationError};
use crate::id::DeviceId;

/// What a device does, and the unit it reports in when it is a sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DeviceKind {
    /// Produces measurements in `unit` (e.g. `°C`, `%`, `kWh`).
    Sensor { unit: String },
    /// Holds a controllable state.
    Actuator,
}

/// Non-owning back-reference from a device to the room that contains it.
///
/// Both positions are 1-based, matching the external addressing scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomRef {
    pub floor: usize,
    pub room: usize,
}

/// A physical device registered in the house.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    #[serde(flatten)]
    pub kind: DeviceKind,
    /// Free-form category such as `"Temperature Sensor"` or `"Smart Plug"`.
    pub category: String,
    pub model: Option<String>,
    pub supplier: Option<String>,
    /// Assigned by the [`House`](crate::house::House) when it is built.
    #[serde(default)]
    pub room: RoomRef,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    #[must_use]
    pub fn is_sensor(&self) -> bool {
        matches!(self.kind, DeviceKind::Sensor { .. })
    }

    #[must_use]
    pub fn is_actuator(&self) -> bool {
        matches!(self.kind, DeviceKind::Actuator)
    }

    /// Unit of measure, for sensors.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        match &self.kind {
            DeviceKind::Sensor { unit } => Some(unit),
            DeviceKind::Actuator => None,
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::InvalidArgument`] when the identifier is
    /// empty or a sensor has no unit.
    pub fn validate(&self) -> Result<(), SmartHouseError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyDeviceId.into());
        }
        if self.unit().is_some_and(str::is_empty) {
            return Err(ValidationError::EmptyUnit(self.id.clone()).into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    kind: Option<DeviceKind>,
    category: Option<String>,
    model: Option<String>,
    supplier: Option<String>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Mark the device as a sensor reporting in `unit`.
    #[must_use]
    pub fn sensor(mut self, unit: impl Into<String>) -> Self {
        self.kind = Some(DeviceKind::Sensor { unit: unit.into() });
        self
    }

    #[must_use]
    pub fn actuator(mut self) -> Self {
        self.kind = Some(DeviceKind::Actuator);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: DeviceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// A missing identifier is generated; a missing kind defaults to actuator.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::InvalidArgument`] if the identifier is empty
    /// or a sensor unit is empty.
    pub fn build(self) -> Result<Device, SmartHouseError> {
        let device = Device {
            id: self.id.unwrap_or_else(DeviceId::generate),
            kind: self.kind.unwrap_or(DeviceKind::Actuator),
            category: self.category.unwrap_or_default(),
            model: self.model,
            supplier: self.supplier,
            room: RoomRef::default(),
        };
        device.validate()?;
        Ok(device)
    }
}
