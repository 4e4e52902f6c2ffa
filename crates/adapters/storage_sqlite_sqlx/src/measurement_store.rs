//! `SQLite` implementation of [`MeasurementStore`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthouse_app::ports::MeasurementStore;
use smarthouse_domain::error::SmartHouseError;
use smarthouse_domain::id::DeviceId;
use smarthouse_domain::measurement::{HistoryLimit, Measurement};

use crate::error::StorageError;
use crate::timestamp;

/// Wrapper to implement `FromRow` for [`Measurement`].
struct Wrapper(Measurement);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let device: String = row.try_get("device")?;
        let ts: String = row.try_get("ts")?;

        Ok(Self(Measurement {
            device_id: device.into(),
            recorded_at: timestamp::decode(&ts)?,
            value: row.try_get("value")?,
            unit: row.try_get("unit")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO measurements (device, ts, value, unit) VALUES (?, ?, ?, ?)";

// A negative LIMIT means "no limit" in SQLite.
const LIST: &str = r"
    SELECT device, ts, value, unit
    FROM measurements
    WHERE device = ?
    ORDER BY ts DESC, id DESC
    LIMIT ?
";

const DELETE_OLDEST: &str = r"
    DELETE FROM measurements
    WHERE id = (
        SELECT id FROM measurements
        WHERE device = ?
        ORDER BY ts ASC, id ASC
        LIMIT 1
    )
    RETURNING device, ts, value, unit
";

/// `SQLite`-backed measurement store.
pub struct SqliteMeasurementStore {
    pool: SqlitePool,
}

impl SqliteMeasurementStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn select(
        &self,
        device_id: &DeviceId,
        limit: i64,
    ) -> Result<Vec<Measurement>, SmartHouseError> {
        let rows: Vec<Wrapper> = sqlx::query_as(LIST)
            .bind(device_id.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|Wrapper(m)| m).collect())
    }
}

impl MeasurementStore for SqliteMeasurementStore {
    async fn record(&self, measurement: Measurement) -> Result<Measurement, SmartHouseError> {
        sqlx::query(INSERT)
            .bind(measurement.device_id.as_str())
            .bind(timestamp::encode(measurement.recorded_at))
            .bind(measurement.value)
            .bind(&measurement.unit)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(measurement)
    }

    async fn list(
        &self,
        device_id: &DeviceId,
        limit: Option<HistoryLimit>,
    ) -> Result<Vec<Measurement>, SmartHouseError> {
        let limit = limit.map_or(-1, |limit| i64::try_from(limit.get()).unwrap_or(i64::MAX));
        self.select(device_id, limit).await
    }

    async fn latest(&self, device_id: &DeviceId) -> Result<Option<Measurement>, SmartHouseError> {
        Ok(self.select(device_id, 1).await?.into_iter().next())
    }

    async fn delete_oldest(&self, device_id: &DeviceId) -> Result<Measurement, SmartHouseError> {
        let row: Option<Wrapper> = sqlx::query_as(DELETE_OLDEST)
            .bind(device_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        row.map(|Wrapper(m)| m)
            .ok_or_else(|| SmartHouseError::NoMeasurements(device_id.clone()))
    }
}
