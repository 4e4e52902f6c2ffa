//! `SQLite` implementation of [`HouseRepository`].

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use smarthouse_app::ports::HouseRepository;
use smarthouse_domain::device::{Device, DeviceKind, RoomRef};
use smarthouse_domain::error::SmartHouseError;
use smarthouse_domain::house::{House, Room};

use crate::error::StorageError;

fn position(value: i64) -> Result<usize, sqlx::Error> {
    usize::try_from(value).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// A room row, keyed by its surrogate id.
struct RoomRow {
    id: i64,
    floor: usize,
    room: Room,
}

impl<'r> FromRow<'r, SqliteRow> for RoomRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            floor: position(row.try_get("floor")?)?,
            room: Room {
                name: row.try_get("name")?,
                size: row.try_get("size")?,
                devices: Vec::new(),
            },
        })
    }
}

/// A device row together with the id of its room.
struct DeviceRow {
    room: i64,
    device: Device,
}

impl<'r> FromRow<'r, SqliteRow> for DeviceRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let kind: String = row.try_get("kind")?;
        let unit: Option<String> = row.try_get("unit")?;

        let kind = match (kind.as_str(), unit) {
            ("sensor", Some(unit)) => DeviceKind::Sensor { unit },
            ("actuator", _) => DeviceKind::Actuator,
            (other, _) => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "kind".to_string(),
                    source: format!("unsupported device kind {other:?} for {id}").into(),
                });
            }
        };

        Ok(Self {
            room: row.try_get("room")?,
            device: Device {
                id: id.into(),
                kind,
                category: row.try_get("category")?,
                model: row.try_get("model")?,
                supplier: row.try_get("supplier")?,
                room: RoomRef::default(),
            },
        })
    }
}

const SELECT_HOUSE: &str = "SELECT name FROM house WHERE id = 1";
const SELECT_FLOORS: &str = "SELECT number FROM floors ORDER BY number";
const SELECT_ROOMS: &str = "SELECT id, floor, name, size FROM rooms ORDER BY floor, position";
const SELECT_DEVICES: &str = r"
    SELECT id, room, kind, unit, category, model, supplier
    FROM devices
    ORDER BY room, position
";

const INSERT_HOUSE: &str = "INSERT INTO house (id, name) VALUES (1, ?)";
const INSERT_FLOOR: &str = "INSERT INTO floors (number) VALUES (?)";
const INSERT_ROOM: &str =
    "INSERT INTO rooms (floor, position, name, size) VALUES (?, ?, ?, ?) RETURNING id";
const INSERT_DEVICE: &str = r"
    INSERT INTO devices (id, room, position, kind, unit, category, model, supplier)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";

/// `SQLite`-backed house structure repository.
pub struct SqliteHouseRepository {
    pool: SqlitePool,
}

impl SqliteHouseRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl HouseRepository for SqliteHouseRepository {
    async fn load(&self) -> Result<Option<House>, SmartHouseError> {
        let name: Option<String> = sqlx::query_scalar(SELECT_HOUSE)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let Some(name) = name else {
            return Ok(None);
        };

        let floors: Vec<i64> = sqlx::query_scalar(SELECT_FLOORS)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let rooms: Vec<RoomRow> = sqlx::query_as(SELECT_ROOMS)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let devices: Vec<DeviceRow> = sqlx::query_as(SELECT_DEVICES)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let mut by_room: HashMap<i64, Vec<Device>> = HashMap::new();
        for row in devices {
            by_room.entry(row.room).or_default().push(row.device);
        }

        let mut by_floor: HashMap<usize, Vec<Room>> = HashMap::new();
        for mut row in rooms {
            row.room.devices = by_room.remove(&row.id).unwrap_or_default();
            by_floor.entry(row.floor).or_default().push(row.room);
        }

        let mut builder = House::builder().name(name);
        for number in floors {
            let number = position(number).map_err(StorageError::from)?;
            let rooms = by_floor.remove(&number).unwrap_or_default();
            builder = builder.numbered_floor(number, rooms);
        }
        builder.build().map(Some)
    }

    async fn save(&self, house: &House) -> Result<(), SmartHouseError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        sqlx::query(INSERT_HOUSE)
            .bind(house.name())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

        for floor in house.floors() {
            sqlx::query(INSERT_FLOOR)
                .bind(to_i64(floor.number))
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            for (room_no, room) in (1..).zip(&floor.rooms) {
                let room_id: i64 = sqlx::query_scalar(INSERT_ROOM)
                    .bind(to_i64(floor.number))
                    .bind(to_i64(room_no))
                    .bind(&room.name)
                    .bind(room.size)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(StorageError::from)?;

                for (device_no, device) in (1..).zip(&room.devices) {
                    let kind = if device.is_sensor() { "sensor" } else { "actuator" };
                    sqlx::query(INSERT_DEVICE)
                        .bind(device.id.as_str())
                        .bind(room_id)
                        .bind(to_i64(device_no))
                        .bind(kind)
                        .bind(device.unit())
                        .bind(&device.category)
                        .bind(&device.model)
                        .bind(&device.supplier)
                        .execute(&mut *tx)
                        .await
                        .map_err(StorageError::from)?;
                }
            }
        }

        tx.commit().await.map_err(StorageError::from)?;
        Ok(())
    }
}
