//! # smarthouse-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `HouseRepository`: load and persist the house structure
//!   - `MeasurementStore`: append, query and prune sensor readings
//!   - `ActuatorStateStore`: read and upsert actuator states
//! - Define the **driving/inbound port** as a use-case struct:
//!   - `SmartHouseService`: the query facade used by dispatchers
//! - Serialize concurrent mutations per device
//!
//! ## Dependency rule
//! Depends on `smarthouse-domain` only (plus `tokio::sync` for locks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
