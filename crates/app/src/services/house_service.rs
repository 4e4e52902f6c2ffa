//! Smart house service: the query facade consumed by dispatchers.
//!
//! Joins the immutable house snapshot with the measurement and actuator
//! stores. Any request addressing an unknown device identifier (or a device of
//! the wrong kind) is answered with [`SmartHouseError::NotFound`] before a
//! store is touched, so dispatchers only ever see one "absent" shape.

use std::sync::Arc;

use smarthouse_domain::actuator::{ActuatorState, StateChange};
use smarthouse_domain::device::Device;
use smarthouse_domain::error::{NotFoundError, SmartHouseError};
use smarthouse_domain::house::{Floor, House, HouseSummary, Room};
use smarthouse_domain::id::DeviceId;
use smarthouse_domain::measurement::{HistoryLimit, Measurement};
use smarthouse_domain::time::MonotonicClock;

use crate::ports::{ActuatorStateStore, MeasurementStore};
use crate::services::device_locks::DeviceLocks;

/// A device together with the room that owns it.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub device: &'a Device,
    pub room: &'a Room,
}

/// Application service answering structural, sensor and actuator queries.
pub struct SmartHouseService<M, A> {
    house: Arc<House>,
    measurements: M,
    actuators: A,
    clock: MonotonicClock,
    locks: DeviceLocks,
}

impl<M, A> SmartHouseService<M, A>
where
    M: MeasurementStore + Sync,
    A: ActuatorStateStore + Sync,
{
    /// Create a new service over a loaded house and its stores.
    pub fn new(house: impl Into<Arc<House>>, measurements: M, actuators: A) -> Self {
        let house = house.into();
        let locks = DeviceLocks::for_registry(house.registry());
        Self {
            house,
            measurements,
            actuators,
            clock: MonotonicClock::new(),
            locks,
        }
    }

    /// Counts of rooms, floors and devices plus the total area.
    #[must_use]
    pub fn summary(&self) -> HouseSummary {
        self.house.summary()
    }

    #[must_use]
    pub fn floors(&self) -> &[Floor] {
        self.house.floors()
    }

    /// Floor by 1-based number.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::OutOfRange`] for 0 or a number above the top floor.
    pub fn floor(&self, number: usize) -> Result<&Floor, SmartHouseError> {
        self.house.floor(number)
    }

    /// Rooms of a floor, in order.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::OutOfRange`] for an invalid floor number.
    pub fn rooms(&self, floor: usize) -> Result<&[Room], SmartHouseError> {
        Ok(&self.house.floor(floor)?.rooms)
    }

    /// Room by 1-based floor and room positions.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::OutOfRange`] when either position is invalid.
    pub fn room(&self, floor: usize, room: usize) -> Result<&Room, SmartHouseError> {
        self.house.room(floor, room)
    }

    /// Every device with its owning room, in traversal order.
    pub fn devices(&self) -> impl Iterator<Item = Located<'_>> {
        self.house.floors().iter().flat_map(|floor| {
            floor.rooms.iter().flat_map(|room| {
                room.devices
                    .iter()
                    .map(move |device| Located { device, room })
            })
        })
    }

    /// Look up a device by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when no such device exists.
    pub fn device(&self, id: &DeviceId) -> Result<Located<'_>, SmartHouseError> {
        let device = self.lookup("Device", id, |_| true)?;
        let room = self
            .house
            .room_of(device)
            .ok_or_else(|| NotFoundError::device("Device", id))?;
        Ok(Located { device, room })
    }

    /// Most recent reading of a sensor, if any was recorded.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when `id` is not a sensor, or a
    /// storage error from the measurement store.
    #[tracing::instrument(skip(self))]
    pub async fn latest_reading(
        &self,
        id: &DeviceId,
    ) -> Result<Option<Measurement>, SmartHouseError> {
        self.sensor(id)?;
        self.measurements.latest(id).await
    }

    /// Record a reading for a sensor.
    ///
    /// The timestamp comes from the service clock and the unit is copied from
    /// the sensor configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when `id` is not a sensor, or a
    /// storage error from the measurement store.
    #[tracing::instrument(skip(self))]
    pub async fn record_reading(
        &self,
        id: &DeviceId,
        value: f64,
    ) -> Result<Measurement, SmartHouseError> {
        let unit = self.sensor(id)?;
        let _guard = self.locks.acquire(id).await;
        let measurement = Measurement::builder()
            .device_id(id.clone())
            .recorded_at(self.clock.now())
            .value(value)
            .unit(unit)
            .build()?;
        let stored = self.measurements.record(measurement).await?;
        tracing::debug!(recorded_at = %stored.recorded_at, "reading recorded");
        Ok(stored)
    }

    /// Readings of a sensor, newest-first, bounded by `limit` when given.
    ///
    /// `limit` is the caller-supplied count. It is only checked once the
    /// sensor is known, so an unknown identifier is always NotFound.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when `id` is not a sensor,
    /// [`SmartHouseError::InvalidArgument`] for a zero or negative `limit`,
    /// or a storage error from the measurement store.
    #[tracing::instrument(skip(self))]
    pub async fn history(
        &self,
        id: &DeviceId,
        limit: Option<i64>,
    ) -> Result<Vec<Measurement>, SmartHouseError> {
        self.sensor(id)?;
        let limit = limit.map(HistoryLimit::new).transpose()?;
        self.measurements.list(id, limit).await
    }

    /// Remove the oldest reading of a sensor and return it.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when `id` is not a sensor,
    /// [`SmartHouseError::NoMeasurements`] when nothing is stored for it, or a
    /// storage error from the measurement store.
    #[tracing::instrument(skip(self))]
    pub async fn delete_oldest(&self, id: &DeviceId) -> Result<Measurement, SmartHouseError> {
        self.sensor(id)?;
        let _guard = self.locks.acquire(id).await;
        let removed = self.measurements.delete_oldest(id).await?;
        tracing::info!(recorded_at = %removed.recorded_at, "oldest reading deleted");
        Ok(removed)
    }

    /// Current state of an actuator, `None` if it was never set.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when `id` is not an actuator, or a
    /// storage error from the state store.
    #[tracing::instrument(skip(self))]
    pub async fn actuator_state(
        &self,
        id: &DeviceId,
    ) -> Result<Option<ActuatorState>, SmartHouseError> {
        self.actuator(id)?;
        self.actuators.get_state(id).await
    }

    /// Apply a state change to an actuator and return the stored state.
    ///
    /// Read, resolve and write happen under the device lock, so concurrent
    /// toggles of the same actuator are never lost.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when `id` is not an actuator, or a
    /// storage error from the state store.
    #[tracing::instrument(skip(self))]
    pub async fn set_actuator_state(
        &self,
        id: &DeviceId,
        change: StateChange,
    ) -> Result<ActuatorState, SmartHouseError> {
        self.actuator(id)?;
        let _guard = self.locks.acquire(id).await;
        let current = match change {
            StateChange::Toggle => self.actuators.get_state(id).await?,
            StateChange::Set { .. } => None,
        };
        let next = change.apply(current);
        let stored = self.actuators.set_state(id, next).await?;
        tracing::info!(state = %stored, "actuator state changed");
        Ok(stored)
    }

    fn lookup(
        &self,
        entity: &'static str,
        id: &DeviceId,
        accept: impl Fn(&Device) -> bool,
    ) -> Result<&Device, SmartHouseError> {
        self.house
            .find_device(id)
            .filter(|device| accept(*device))
            .ok_or_else(|| NotFoundError::device(entity, id).into())
    }

    /// Resolve a sensor and return its unit.
    fn sensor(&self, id: &DeviceId) -> Result<&str, SmartHouseError> {
        self.lookup("Sensor", id, Device::is_sensor)?
            .unit()
            .ok_or_else(|| NotFoundError::device("Sensor", id).into())
    }

    fn actuator(&self, id: &DeviceId) -> Result<&Device, SmartHouseError> {
        self.lookup("Actuator", id, Device::is_actuator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smarthouse_domain::error::{OutOfRangeError, ValidationError};
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryMeasurementStore {
        rows: Mutex<HashMap<DeviceId, Vec<Measurement>>>,
    }

    impl InMemoryMeasurementStore {
        /// Oldest-first, ties in insertion order.
        fn sorted(&self, id: &DeviceId) -> Vec<Measurement> {
            let mut rows = self
                .rows
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .unwrap_or_default();
            rows.sort_by_key(|m| m.recorded_at);
            rows
        }
    }

    impl MeasurementStore for InMemoryMeasurementStore {
        fn record(
            &self,
            measurement: Measurement,
        ) -> impl Future<Output = Result<Measurement, SmartHouseError>> + Send {
            self.rows
                .lock()
                .unwrap()
                .entry(measurement.device_id.clone())
                .or_default()
                .push(measurement.clone());
            async { Ok(measurement) }
        }

        fn list(
            &self,
            device_id: &DeviceId,
            limit: Option<HistoryLimit>,
        ) -> impl Future<Output = Result<Vec<Measurement>, SmartHouseError>> + Send {
            let mut rows = self.sorted(device_id);
            rows.reverse();
            if let Some(limit) = limit {
                rows.truncate(limit.get());
            }
            async { Ok(rows) }
        }

        fn latest(
            &self,
            device_id: &DeviceId,
        ) -> impl Future<Output = Result<Option<Measurement>, SmartHouseError>> + Send {
            let latest = self.sorted(device_id).pop();
            async { Ok(latest) }
        }

        fn delete_oldest(
            &self,
            device_id: &DeviceId,
        ) -> impl Future<Output = Result<Measurement, SmartHouseError>> + Send {
            let mut store = self.rows.lock().unwrap();
            let rows = store.entry(device_id.clone()).or_default();
            let oldest = rows
                .iter()
                .enumerate()
                .min_by_key(|(idx, m)| (m.recorded_at, *idx))
                .map(|(idx, _)| idx);
            let result = match oldest {
                Some(idx) => Ok(rows.remove(idx)),
                None => Err(SmartHouseError::NoMeasurements(device_id.clone())),
            };
            async { result }
        }
    }

    #[derive(Default)]
    struct InMemoryActuatorStore {
        states: Mutex<HashMap<DeviceId, ActuatorState>>,
        writes: Mutex<usize>,
    }

    impl ActuatorStateStore for InMemoryActuatorStore {
        async fn get_state(
            &self,
            device_id: &DeviceId,
        ) -> Result<Option<ActuatorState>, SmartHouseError> {
            let state = self.states.lock().unwrap().get(device_id).copied();
            // Give concurrent callers a chance to interleave.
            tokio::task::yield_now().await;
            Ok(state)
        }

        async fn set_state(
            &self,
            device_id: &DeviceId,
            state: ActuatorState,
        ) -> Result<ActuatorState, SmartHouseError> {
            self.states.lock().unwrap().insert(device_id.clone(), state);
            *self.writes.lock().unwrap() += 1;
            Ok(state)
        }
    }

    type Service = SmartHouseService<InMemoryMeasurementStore, InMemoryActuatorStore>;

    fn house() -> House {
        House::builder()
            .name("Test House")
            .floor(vec![
                Room::builder()
                    .name("Living Room")
                    .size(39.75)
                    .device(
                        Device::builder()
                            .id("temp")
                            .sensor("°C")
                            .category("Temperature Sensor")
                            .build()
                            .unwrap(),
                    )
                    .device(
                        Device::builder()
                            .id("plug")
                            .actuator()
                            .category("Smart Plug")
                            .build()
                            .unwrap(),
                    )
                    .build()
                    .unwrap(),
            ])
            .floor(vec![
                Room::builder()
                    .name("Office")
                    .size(11.75)
                    .device(Device::builder().id("co2").sensor("ppm").build().unwrap())
                    .build()
                    .unwrap(),
                Room::builder().name("Bathroom").size(6.3).build().unwrap(),
            ])
            .build()
            .unwrap()
    }

    fn make_service() -> Service {
        SmartHouseService::new(
            house(),
            InMemoryMeasurementStore::default(),
            InMemoryActuatorStore::default(),
        )
    }

    fn id(value: &str) -> DeviceId {
        DeviceId::from(value)
    }

    #[test]
    fn should_summarize_house() {
        let svc = make_service();
        let summary = svc.summary();
        assert_eq!(summary.no_floors, 2);
        assert_eq!(summary.no_rooms, 3);
        assert_eq!(summary.registered_devices, 3);
        assert!((summary.area - 57.8).abs() < 1e-9);
    }

    #[test]
    fn should_list_devices_with_owning_room() {
        let svc = make_service();
        let pairs: Vec<(&str, &str)> = svc
            .devices()
            .map(|l| (l.device.id.as_str(), l.room.name.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("temp", "Living Room"),
                ("plug", "Living Room"),
                ("co2", "Office")
            ]
        );
    }

    #[test]
    fn should_return_out_of_range_for_invalid_positions() {
        let svc = make_service();
        assert!(matches!(
            svc.floor(0),
            Err(SmartHouseError::OutOfRange(OutOfRangeError { what: "floor", .. }))
        ));
        assert!(matches!(
            svc.rooms(3),
            Err(SmartHouseError::OutOfRange(_))
        ));
        assert!(matches!(
            svc.room(2, 3),
            Err(SmartHouseError::OutOfRange(OutOfRangeError { what: "room", .. }))
        ));
        assert_eq!(svc.room(2, 2).unwrap().name, "Bathroom");
    }

    #[tokio::test]
    async fn should_return_recorded_reading_as_latest_and_limited_history() {
        let svc = make_service();
        let recorded = svc.record_reading(&id("temp"), 21.5).await.unwrap();
        assert_eq!(recorded.unit, "°C");

        let history = svc
            .history(&id("temp"), Some(1))
            .await
            .unwrap();
        assert_eq!(history, vec![recorded.clone()]);

        let latest = svc.latest_reading(&id("temp")).await.unwrap();
        assert_eq!(latest, Some(recorded));
    }

    #[tokio::test]
    async fn should_return_none_when_sensor_has_no_reading() {
        let svc = make_service();
        assert!(svc.latest_reading(&id("co2")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_return_two_most_recent_readings_newest_first() {
        let svc = make_service();
        for value in 1..=5 {
            svc.record_reading(&id("temp"), f64::from(value))
                .await
                .unwrap();
        }

        let history = svc
            .history(&id("temp"), Some(2))
            .await
            .unwrap();
        let values: Vec<f64> = history.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![5.0, 4.0]);
        assert!(history[0].recorded_at >= history[1].recorded_at);

        let all = svc.history(&id("temp"), None).await.unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn should_delete_oldest_until_empty_then_report_no_measurements() {
        let svc = make_service();
        for value in [1.0, 2.0, 3.0] {
            svc.record_reading(&id("temp"), value).await.unwrap();
        }

        let first = svc.delete_oldest(&id("temp")).await.unwrap();
        assert!((first.value - 1.0).abs() < f64::EPSILON);
        let remaining: Vec<f64> = svc
            .history(&id("temp"), None)
            .await
            .unwrap()
            .iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(remaining, vec![3.0, 2.0]);

        svc.delete_oldest(&id("temp")).await.unwrap();
        svc.delete_oldest(&id("temp")).await.unwrap();
        assert!(svc.history(&id("temp"), None).await.unwrap().is_empty());

        let result = svc.delete_oldest(&id("temp")).await;
        assert!(matches!(result, Err(SmartHouseError::NoMeasurements(d)) if d == id("temp")));
    }

    #[tokio::test]
    async fn should_set_then_get_actuator_state() {
        let svc = make_service();
        assert!(svc.actuator_state(&id("plug")).await.unwrap().is_none());

        let stored = svc
            .set_actuator_state(&id("plug"), ActuatorState::Level(19.5).into())
            .await
            .unwrap();
        assert_eq!(stored, ActuatorState::Level(19.5));
        assert_eq!(
            svc.actuator_state(&id("plug")).await.unwrap(),
            Some(ActuatorState::Level(19.5))
        );
    }

    #[tokio::test]
    async fn should_keep_single_row_when_setting_state_repeatedly() {
        let svc = make_service();
        for _ in 0..3 {
            svc.set_actuator_state(&id("plug"), ActuatorState::On.into())
                .await
                .unwrap();
        }
        assert_eq!(svc.actuators.states.lock().unwrap().len(), 1);
        assert_eq!(*svc.actuators.writes.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn should_toggle_actuator() {
        let svc = make_service();
        let first = svc
            .set_actuator_state(&id("plug"), StateChange::Toggle)
            .await
            .unwrap();
        let second = svc
            .set_actuator_state(&id("plug"), StateChange::Toggle)
            .await
            .unwrap();
        assert_eq!(first, ActuatorState::On);
        assert_eq!(second, ActuatorState::Off);
    }

    #[tokio::test]
    async fn should_not_lose_concurrent_toggles() {
        let svc = Arc::new(make_service());
        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..10 {
            let svc = Arc::clone(&svc);
            tasks.spawn(async move {
                svc.set_actuator_state(&DeviceId::from("plug"), StateChange::Toggle)
                    .await
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        assert_eq!(
            svc.actuator_state(&id("plug")).await.unwrap(),
            Some(ActuatorState::Off)
        );
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_device_on_every_operation() {
        let svc = make_service();
        let missing = id("does-not-exist");

        assert!(matches!(svc.device(&missing), Err(SmartHouseError::NotFound(_))));
        assert!(matches!(
            svc.latest_reading(&missing).await,
            Err(SmartHouseError::NotFound(_))
        ));
        assert!(matches!(
            svc.record_reading(&missing, 1.0).await,
            Err(SmartHouseError::NotFound(_))
        ));
        assert!(matches!(
            svc.history(&missing, None).await,
            Err(SmartHouseError::NotFound(_))
        ));
        assert!(matches!(
            svc.delete_oldest(&missing).await,
            Err(SmartHouseError::NotFound(_))
        ));
        assert!(matches!(
            svc.actuator_state(&missing).await,
            Err(SmartHouseError::NotFound(_))
        ));
        assert!(matches!(
            svc.set_actuator_state(&missing, StateChange::Toggle).await,
            Err(SmartHouseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_when_device_kind_does_not_match() {
        let svc = make_service();
        assert!(matches!(
            svc.history(&id("plug"), None).await,
            Err(SmartHouseError::NotFound(NotFoundError { entity: "Sensor", .. }))
        ));
        assert!(matches!(
            svc.set_actuator_state(&id("temp"), StateChange::Toggle).await,
            Err(SmartHouseError::NotFound(NotFoundError { entity: "Actuator", .. }))
        ));
    }

    #[tokio::test]
    async fn should_resolve_device_with_room() {
        let svc = make_service();
        let located = svc.device(&id("co2")).unwrap();
        assert_eq!(located.room.name, "Office");
        assert_eq!(located.device.unit(), Some("ppm"));
    }

    #[tokio::test]
    async fn should_reject_non_positive_limit_for_known_sensor() {
        let svc = make_service();
        for limit in [0, -4] {
            assert!(matches!(
                svc.history(&id("temp"), Some(limit)).await,
                Err(SmartHouseError::InvalidArgument(ValidationError::NonPositiveLimit(l))) if l == limit
            ));
        }
    }

    #[tokio::test]
    async fn should_report_unknown_sensor_before_invalid_limit() {
        let svc = make_service();
        assert!(matches!(
            svc.history(&id("ghost"), Some(0)).await,
            Err(SmartHouseError::NotFound(_))
        ));
        assert!(matches!(
            svc.history(&id("plug"), Some(0)).await,
            Err(SmartHouseError::NotFound(NotFoundError { entity: "Sensor", .. }))
        ));
    }
}
