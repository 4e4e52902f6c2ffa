//! Device registry: identifier index over every device in the house.

use std::collections::HashMap;

use crate::error::{SmartHouseError, ValidationError};
use crate::house::Floor;
use crate::id::DeviceId;

/// Where a device lives inside the hierarchy (0-based positions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    pub floor: usize,
    pub room: usize,
    pub device: usize,
}

/// Identifier → position index, built once when the house is assembled.
///
/// Lookup is an exact, case-sensitive match with O(1) average cost.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    slots: HashMap<DeviceId, Slot>,
}

impl DeviceRegistry {
    /// Index every device of `floors`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateDeviceId`] when two devices share an
    /// identifier anywhere in the house.
    pub(crate) fn index(floors: &[Floor]) -> Result<Self, SmartHouseError> {
        let mut slots = HashMap::new();
        for (floor_idx, floor) in floors.iter().enumerate() {
            for (room_idx, room) in floor.rooms.iter().enumerate() {
                for (device_idx, device) in room.devices.iter().enumerate() {
                    let slot = Slot {
                        floor: floor_idx,
                        room: room_idx,
                        device: device_idx,
                    };
                    if slots.insert(device.id.clone(), slot).is_some() {
                        return Err(ValidationError::DuplicateDeviceId(device.id.clone()).into());
                    }
                }
            }
        }
        Ok(Self { slots })
    }

    pub(crate) fn slot(&self, id: &DeviceId) -> Option<Slot> {
        self.slots.get(id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: &DeviceId) -> bool {
        self.slots.contains_key(id)
    }

    /// Every registered identifier, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &DeviceId> {
        self.slots.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
