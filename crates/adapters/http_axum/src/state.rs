//! Shared application state for axum handlers.

use std::sync::Arc;

use smarthouse_app::ports::{ActuatorStateStore, MeasurementStore};
use smarthouse_app::services::house_service::SmartHouseService;

/// Application state shared across all axum handlers.
///
/// Generic over the store types to avoid dynamic dispatch. `Clone` is
/// implemented manually so the stores themselves do not need to be `Clone`.
pub struct AppState<M, A> {
    /// Query facade over the house and its stores.
    pub service: Arc<SmartHouseService<M, A>>,
}

impl<M, A> Clone for AppState<M, A> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<M, A> AppState<M, A>
where
    M: MeasurementStore + Send + Sync + 'static,
    A: ActuatorStateStore + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(service: SmartHouseService<M, A>) -> Self {
        Self::from_arc(Arc::new(service))
    }

    /// Create a new application state from a service that is already shared.
    pub fn from_arc(service: Arc<SmartHouseService<M, A>>) -> Self {
        Self { service }
    }
}
