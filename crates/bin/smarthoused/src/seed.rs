//! House description files used to seed an empty database.
//!
//! ```toml
//! name = "Demo House"
//!
//! [[floors]]
//! [[floors.rooms]]
//! name = "Living Room"
//! size = 39.75
//!
//! [[floors.rooms.devices]]
//! id = "4d8b1d62-7921-4917-9b70-bbd31f6e2e8e"
//! kind = "sensor"
//! unit = "°C"
//! category = "Temperature Sensor"
//! ```

use std::path::Path;

use serde::Deserialize;

use smarthouse_domain::device::Device;
use smarthouse_domain::error::SmartHouseError;
use smarthouse_domain::house::{House, Room};

#[derive(Debug, Deserialize)]
struct HouseSeed {
    name: String,
    #[serde(default)]
    floors: Vec<FloorSeed>,
}

#[derive(Debug, Deserialize)]
struct FloorSeed {
    #[serde(default)]
    rooms: Vec<RoomSeed>,
}

#[derive(Debug, Deserialize)]
struct RoomSeed {
    name: String,
    size: f64,
    #[serde(default)]
    devices: Vec<DeviceSeed>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindSeed {
    Sensor,
    Actuator,
}

#[derive(Debug, Deserialize)]
struct DeviceSeed {
    id: String,
    kind: KindSeed,
    unit: Option<String>,
    #[serde(default)]
    category: String,
    model: Option<String>,
    supplier: Option<String>,
}

impl DeviceSeed {
    fn build(self) -> Result<Device, SmartHouseError> {
        let mut builder = Device::builder().id(self.id).category(self.category);
        builder = match self.kind {
            // A missing unit is rejected by device validation.
            KindSeed::Sensor => builder.sensor(self.unit.unwrap_or_default()),
            KindSeed::Actuator => builder.actuator(),
        };
        if let Some(model) = self.model {
            builder = builder.model(model);
        }
        if let Some(supplier) = self.supplier {
            builder = builder.supplier(supplier);
        }
        builder.build()
    }
}

impl RoomSeed {
    fn build(self) -> Result<Room, SmartHouseError> {
        let mut builder = Room::builder().name(self.name).size(self.size);
        for device in self.devices {
            builder = builder.device(device.build()?);
        }
        builder.build()
    }
}

impl HouseSeed {
    fn build(self) -> Result<House, SmartHouseError> {
        let mut builder = House::builder().name(self.name);
        for floor in self.floors {
            let rooms = floor
                .rooms
                .into_iter()
                .map(RoomSeed::build)
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.floor(rooms);
        }
        builder.build()
    }
}

/// Seed file errors.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// File I/O failure.
    #[error("failed to read house file")]
    Io(#[from] std::io::Error),
    /// TOML parse failure.
    #[error("failed to parse house file")]
    Parse(#[from] toml::de::Error),
    /// The described house violates a domain invariant.
    #[error("invalid house description: {0}")]
    Invalid(#[from] SmartHouseError),
}

/// Parse a house description.
///
/// # Errors
///
/// Returns [`SeedError::Parse`] for malformed TOML and
/// [`SeedError::Invalid`] when the described house is not valid.
pub fn parse(content: &str) -> Result<House, SeedError> {
    let seed: HouseSeed = toml::from_str(content)?;
    Ok(seed.build()?)
}

/// Read and parse a house description file.
///
/// # Errors
///
/// Returns [`SeedError::Io`] if the file cannot be read, or any error from
/// [`parse`].
pub fn load(path: &Path) -> Result<House, SeedError> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}
