//! Spatial hierarchy: house → floors → rooms → devices.
//!
//! The [`House`] is the root aggregate. It is assembled once (from storage or
//! a seed file) through [`HouseBuilder`], which enforces the structural
//! invariants, numbers the floors, wires every device's [`RoomRef`] and builds
//! the [`DeviceRegistry`]. After that it is read-only.

use serde::{Deserialize, Serialize};

use crate::device::{Device, RoomRef};
use crate::error::{OutOfRangeError, SmartHouseError, ValidationError};
use crate::id::DeviceId;
use crate::registry::DeviceRegistry;

/// Resolve a 1-based position inside a slice.
fn at<'a, T>(items: &'a [T], what: &'static str, index: usize) -> Result<&'a T, OutOfRangeError> {
    index
        .checked_sub(1)
        .and_then(|idx| items.get(idx))
        .ok_or(OutOfRangeError {
            what,
            index,
            max: items.len(),
        })
}

/// A room with a name, a floor area and the devices installed in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    /// Floor area in square metres.
    pub size: f64,
    pub devices: Vec<Device>,
}

impl Room {
    /// Create a builder for constructing a [`Room`].
    #[must_use]
    pub fn builder() -> RoomBuilder {
        RoomBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::InvalidArgument`] when the name is empty or
    /// the size is not a positive finite number.
    pub fn validate(&self) -> Result<(), SmartHouseError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(ValidationError::NonPositiveRoomSize {
                name: self.name.clone(),
                size: self.size,
            }
            .into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Room`].
#[derive(Debug, Default)]
pub struct RoomBuilder {
    name: Option<String>,
    size: Option<f64>,
    devices: Vec<Device>,
}

impl RoomBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn device(mut self, device: Device) -> Self {
        self.devices.push(device);
        self
    }

    /// Consume the builder, validate, and return a [`Room`].
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::InvalidArgument`] if the name is missing or
    /// the size is missing or not positive.
    pub fn build(self) -> Result<Room, SmartHouseError> {
        let room = Room {
            name: self.name.unwrap_or_default(),
            size: self.size.unwrap_or_default(),
            devices: self.devices,
        };
        room.validate()?;
        Ok(room)
    }
}

/// One storey of the house.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    /// 1-based, equal to the floor's position in [`House::floors`].
    pub number: usize,
    pub rooms: Vec<Room>,
}

impl Floor {
    #[must_use]
    pub fn new(number: usize, rooms: Vec<Room>) -> Self {
        Self { number, rooms }
    }

    /// Room at 1-based position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::OutOfRange`] when `index` is 0 or greater
    /// than the number of rooms on this floor.
    pub fn room(&self, index: usize) -> Result<&Room, SmartHouseError> {
        Ok(at(&self.rooms, "room", index)?)
    }

    /// Sum of the room sizes on this floor.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.rooms.iter().map(|room| room.size).sum()
    }
}

/// Aggregate facts about a house.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseSummary {
    pub no_rooms: usize,
    pub no_floors: usize,
    pub registered_devices: usize,
    pub area: f64,
}

/// Root aggregate of the spatial hierarchy.
#[derive(Debug, Clone, Serialize)]
pub struct House {
    name: String,
    floors: Vec<Floor>,
    #[serde(skip)]
    registry: DeviceRegistry,
}

impl House {
    /// Create a builder for constructing a [`House`].
    #[must_use]
    pub fn builder() -> HouseBuilder {
        HouseBuilder::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Floors, ground floor first.
    #[must_use]
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    /// All rooms, in floor order then room order within the floor.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.floors.iter().flat_map(|floor| floor.rooms.iter())
    }

    /// All devices, in room traversal order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.rooms().flat_map(|room| room.devices.iter())
    }

    /// Total floor area (sum of every room size). `0.0` for an empty house.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.floors.iter().map(Floor::area).sum()
    }

    /// Floor at 1-based position `number`.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::OutOfRange`] when `number` is 0 or beyond
    /// the top floor.
    pub fn floor(&self, number: usize) -> Result<&Floor, SmartHouseError> {
        Ok(at(&self.floors, "floor", number)?)
    }

    /// Room `room` (1-based) on floor `floor` (1-based).
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::OutOfRange`] when either position is outside
    /// its valid span.
    pub fn room(&self, floor: usize, room: usize) -> Result<&Room, SmartHouseError> {
        self.floor(floor)?.room(room)
    }

    /// Exact, case-sensitive lookup by identifier.
    #[must_use]
    pub fn find_device(&self, id: &DeviceId) -> Option<&Device> {
        let slot = self.registry.slot(id)?;
        self.floors
            .get(slot.floor)?
            .rooms
            .get(slot.room)?
            .devices
            .get(slot.device)
    }

    /// Follow a device's back-reference to its owning room.
    #[must_use]
    pub fn room_of(&self, device: &Device) -> Option<&Room> {
        self.room(device.room.floor, device.room.room).ok()
    }

    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    #[must_use]
    pub fn summary(&self) -> HouseSummary {
        HouseSummary {
            no_rooms: self.rooms().count(),
            no_floors: self.floors.len(),
            registered_devices: self.registry.len(),
            area: self.area(),
        }
    }
}

/// Step-by-step builder for [`House`].
#[derive(Debug, Default)]
pub struct HouseBuilder {
    name: Option<String>,
    floors: Vec<(Option<usize>, Vec<Room>)>,
}

impl HouseBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a floor; it is numbered after the floors added before it.
    #[must_use]
    pub fn floor(mut self, rooms: Vec<Room>) -> Self {
        self.floors.push((None, rooms));
        self
    }

    /// Append a floor carrying an explicit number (e.g. read back from
    /// storage). The number must match its position.
    #[must_use]
    pub fn numbered_floor(mut self, number: usize, rooms: Vec<Room>) -> Self {
        self.floors.push((Some(number), rooms));
        self
    }

    /// Consume the builder, validate the whole graph and index its devices.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::InvalidArgument`] if the house has no name,
    /// a floor number does not match its position, a room or device violates
    /// its invariants, or a device identifier is used twice.
    pub fn build(self) -> Result<House, SmartHouseError> {
        let name = self.name.unwrap_or_default();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let mut floors = Vec::with_capacity(self.floors.len());
        for (position, (number, mut rooms)) in (1..).zip(self.floors) {
            if let Some(number) = number.filter(|number| *number != position) {
                return Err(ValidationError::FloorNumbering { position, number }.into());
            }
            for (room_no, room) in (1..).zip(rooms.iter_mut()) {
                room.validate()?;
                for device in &mut room.devices {
                    device.validate()?;
                    device.room = RoomRef {
                        floor: position,
                        room: room_no,
                    };
                }
            }
            floors.push(Floor::new(position, rooms));
        }

        let registry = DeviceRegistry::index(&floors)?;
        Ok(House {
            name,
            floors,
            registry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor(id: &str) -> Device {
        Device::builder().id(id).sensor("°C").build().unwrap()
    }

    fn actuator(id: &str) -> Device {
        Device::builder().id(id).actuator().build().unwrap()
    }

    fn room(name: &str, size: f64, devices: Vec<Device>) -> Room {
        devices
            .into_iter()
            .fold(Room::builder().name(name).size(size), RoomBuilder::device)
            .build()
            .unwrap()
    }

    fn demo_house() -> House {
        House::builder()
            .name("Demo")
            .floor(vec![
                room("Entrance", 13.5, vec![actuator("lock")]),
                room("Living Room", 39.75, vec![sensor("temp"), actuator("plug")]),
                room("Bathroom", 6.3, vec![]),
            ])
            .floor(vec![
                room("Office", 11.75, vec![sensor("co2")]),
                room("Bedroom", 17.0, vec![actuator("heat")]),
            ])
            .build()
            .unwrap()
    }

    #[test]
    fn should_number_floors_by_position() {
        let house = demo_house();
        let numbers: Vec<usize> = house.floors().iter().map(|f| f.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn should_flatten_rooms_in_floor_then_room_order() {
        let house = demo_house();
        let names: Vec<&str> = house.rooms().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Entrance", "Living Room", "Bathroom", "Office", "Bedroom"]
        );
    }

    #[test]
    fn should_flatten_devices_in_room_traversal_order() {
        let house = demo_house();
        let ids: Vec<&str> = house.devices().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["lock", "temp", "plug", "co2", "heat"]);
    }

    #[test]
    fn should_agree_between_indexed_and_flattened_room_access() {
        let house = demo_house();
        let mut flattened = house.rooms();
        for floor in house.floors() {
            for r in 1..=floor.rooms.len() {
                let indexed = house.room(floor.number, r).unwrap();
                assert!(std::ptr::eq(indexed, flattened.next().unwrap()));
            }
        }
        assert!(flattened.next().is_none());
    }

    #[test]
    fn should_sum_room_sizes_for_area() {
        let house = demo_house();
        let expected: f64 = house.rooms().map(|r| r.size).sum();
        assert!((house.area() - expected).abs() < 1e-9);
        assert!((house.area() - 88.3).abs() < 1e-9);
    }

    #[test]
    fn should_report_zero_area_for_empty_house() {
        let house = House::builder().name("Empty").build().unwrap();
        assert!(house.area().abs() < f64::EPSILON);
        assert_eq!(house.rooms().count(), 0);
        assert_eq!(house.devices().count(), 0);
    }

    #[test]
    fn should_report_room_size_for_single_room_house() {
        let house = House::builder()
            .name("Cabin")
            .floor(vec![room("Cabin", 20.5, vec![])])
            .build()
            .unwrap();
        assert!((house.area() - 20.5).abs() < f64::EPSILON);
    }

    #[test]
    fn should_return_out_of_range_for_floor_zero_and_beyond_top() {
        let house = demo_house();
        assert!(matches!(
            house.floor(0),
            Err(SmartHouseError::OutOfRange(OutOfRangeError { index: 0, max: 2, .. }))
        ));
        assert!(matches!(
            house.floor(3),
            Err(SmartHouseError::OutOfRange(OutOfRangeError { index: 3, .. }))
        ));
    }

    #[test]
    fn should_return_out_of_range_for_room_zero_and_beyond_last() {
        let house = demo_house();
        assert!(matches!(
            house.room(1, 0),
            Err(SmartHouseError::OutOfRange(OutOfRangeError { what: "room", .. }))
        ));
        assert!(matches!(
            house.room(2, 3),
            Err(SmartHouseError::OutOfRange(OutOfRangeError { what: "room", max: 2, .. }))
        ));
        assert!(matches!(
            house.room(9, 1),
            Err(SmartHouseError::OutOfRange(OutOfRangeError { what: "floor", .. }))
        ));
    }

    #[test]
    fn should_find_device_and_resolve_its_room() {
        let house = demo_house();
        let device = house.find_device(&DeviceId::from("plug")).unwrap();
        assert_eq!(device.room, RoomRef { floor: 1, room: 2 });
        assert_eq!(house.room_of(device).unwrap().name, "Living Room");
    }

    #[test]
    fn should_miss_device_with_different_case() {
        let house = demo_house();
        assert!(house.find_device(&DeviceId::from("PLUG")).is_none());
    }

    #[test]
    fn should_summarize_counts_and_area() {
        let summary = demo_house().summary();
        assert_eq!(summary.no_floors, 2);
        assert_eq!(summary.no_rooms, 5);
        assert_eq!(summary.registered_devices, 5);
    }

    #[test]
    fn should_reject_floor_number_not_matching_position() {
        let result = House::builder()
            .name("Demo")
            .numbered_floor(1, vec![])
            .numbered_floor(3, vec![])
            .build();
        assert!(matches!(
            result,
            Err(SmartHouseError::InvalidArgument(ValidationError::FloorNumbering {
                position: 2,
                number: 3
            }))
        ));
    }

    #[test]
    fn should_reject_non_positive_room_size() {
        let result = Room::builder().name("Closet").size(0.0).build();
        assert!(matches!(
            result,
            Err(SmartHouseError::InvalidArgument(ValidationError::NonPositiveRoomSize { .. }))
        ));
    }

    #[test]
    fn should_reject_duplicate_device_ids() {
        let result = House::builder()
            .name("Demo")
            .floor(vec![room("A", 1.0, vec![sensor("x")])])
            .floor(vec![room("B", 1.0, vec![actuator("x")])])
            .build();
        assert!(matches!(
            result,
            Err(SmartHouseError::InvalidArgument(ValidationError::DuplicateDeviceId(_)))
        ));
    }

    #[test]
    fn should_reject_missing_name() {
        let result = House::builder().build();
        assert!(matches!(
            result,
            Err(SmartHouseError::InvalidArgument(ValidationError::EmptyName))
        ));
    }
}
