//! # smarthouse-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the port traits defined in `smarthouse-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! Every statement is parameterized; no caller-supplied value is ever
//! formatted into SQL text.
//!
//! ## Dependency rule
//! Depends on `smarthouse-app` (for port traits) and `smarthouse-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod actuator_store;
pub mod error;
pub mod house_repo;
pub mod measurement_store;
pub mod pool;
mod timestamp;

pub use actuator_store::SqliteActuatorStateStore;
pub use house_repo::SqliteHouseRepository;
pub use measurement_store::SqliteMeasurementStore;
pub use pool::{Config, Database};
