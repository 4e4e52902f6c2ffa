//! `SQLite` implementation of [`ActuatorStateStore`].

use sqlx::SqlitePool;

use smarthouse_app::ports::ActuatorStateStore;
use smarthouse_domain::actuator::ActuatorState;
use smarthouse_domain::error::SmartHouseError;
use smarthouse_domain::id::DeviceId;

use crate::error::StorageError;

const SELECT_STATE: &str = "SELECT state FROM actuator_state WHERE device_id = ?";

const UPSERT_STATE: &str = r"
    INSERT INTO actuator_state (device_id, state) VALUES (?, ?)
    ON CONFLICT(device_id) DO UPDATE SET state = excluded.state
";

/// `SQLite`-backed actuator state store.
///
/// States are stored in their textual form (`on`, `off`, `level:<value>`).
pub struct SqliteActuatorStateStore {
    pool: SqlitePool,
}

impl SqliteActuatorStateStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ActuatorStateStore for SqliteActuatorStateStore {
    async fn get_state(
        &self,
        device_id: &DeviceId,
    ) -> Result<Option<ActuatorState>, SmartHouseError> {
        let state: Option<String> = sqlx::query_scalar(SELECT_STATE)
            .bind(device_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        state
            .map(|raw| raw.parse::<ActuatorState>().map_err(|err| sqlx::Error::Decode(Box::new(err))))
            .transpose()
            .map_err(StorageError::from)
            .map_err(SmartHouseError::from)
    }

    async fn set_state(
        &self,
        device_id: &DeviceId,
        state: ActuatorState,
    ) -> Result<ActuatorState, SmartHouseError> {
        sqlx::query(UPSERT_STATE)
            .bind(device_id.as_str())
            .bind(state.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(state)
    }
}
