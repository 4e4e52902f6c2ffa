//! Per-device mutual exclusion for read-modify-write operations.

use std::collections::HashMap;

use tokio::sync::{Mutex, MutexGuard};

use smarthouse_domain::id::DeviceId;
use smarthouse_domain::registry::DeviceRegistry;

/// One async mutex per registered device.
///
/// The table is filled once from the registry and never changes afterwards,
/// so looking up a lock needs no synchronization of its own. Operations on
/// different devices never contend.
#[derive(Debug, Default)]
pub struct DeviceLocks {
    locks: HashMap<DeviceId, Mutex<()>>,
}

impl DeviceLocks {
    /// Create a lock for every device in `registry`.
    #[must_use]
    pub fn for_registry(registry: &DeviceRegistry) -> Self {
        Self {
            locks: registry
                .ids()
                .map(|id| (id.clone(), Mutex::new(())))
                .collect(),
        }
    }

    /// Wait for exclusive access to `id`, or `None` if the device is unknown.
    pub async fn acquire(&self, id: &DeviceId) -> Option<MutexGuard<'_, ()>> {
        match self.locks.get(id) {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
