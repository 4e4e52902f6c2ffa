//! Measurement store port: append-only time series of sensor readings.

use std::future::Future;

use smarthouse_domain::error::SmartHouseError;
use smarthouse_domain::id::DeviceId;
use smarthouse_domain::measurement::{HistoryLimit, Measurement};

/// Repository for recording and querying [`Measurement`]s.
///
/// Rows are ordered by timestamp; equal timestamps are ordered by insertion.
pub trait MeasurementStore {
    /// Append one reading.
    fn record(
        &self,
        measurement: Measurement,
    ) -> impl Future<Output = Result<Measurement, SmartHouseError>> + Send;

    /// Readings for a device, newest-first, at most `limit` rows when given.
    fn list(
        &self,
        device_id: &DeviceId,
        limit: Option<HistoryLimit>,
    ) -> impl Future<Output = Result<Vec<Measurement>, SmartHouseError>> + Send;

    /// Most recent reading for a device.
    fn latest(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Measurement>, SmartHouseError>> + Send;

    /// Remove the single oldest reading of a device and return it.
    ///
    /// Fails with [`SmartHouseError::NoMeasurements`] when the device has no
    /// stored readings.
    fn delete_oldest(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Measurement, SmartHouseError>> + Send;
}
