//! # smarthouse-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON API under `/smarthouse` (structure, sensors, actuators)
//! - Map HTTP requests into [`SmartHouseService`] calls (driving adapter)
//! - Map results and [`SmartHouseError`]s into HTTP responses
//!
//! ## Dependency rule
//! Depends on `smarthouse-app` (for port traits and services) and
//! `smarthouse-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.
//!
//! [`SmartHouseService`]: smarthouse_app::services::house_service::SmartHouseService
//! [`SmartHouseError`]: smarthouse_domain::error::SmartHouseError

pub mod api;
pub mod error;
pub mod extract;
pub mod router;
pub mod state;
