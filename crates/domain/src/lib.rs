//! # smarthouse-domain
//!
//! Pure domain model for the smarthouse monitoring system.
//!
//! ## Responsibilities
//! - Foundational types: device identifiers, error conventions, timestamps
//! - Define the **spatial hierarchy** (house → floors → rooms → devices)
//! - Define **Devices** (sensors and actuators) and the registry used to find them
//! - Define **Measurements** (timestamped sensor readings) and history limits
//! - Define **Actuator states** and the state-change policy
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod actuator;
pub mod device;
pub mod house;
pub mod measurement;
pub mod registry;
