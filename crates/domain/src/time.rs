//! Time and timestamp helpers.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, SubsecRound, Utc};

/// UTC timestamp used for measurement times.
pub type Timestamp = DateTime<Utc>;

/// Precision kept for persisted timestamps (microseconds).
pub const TIMESTAMP_DIGITS: u16 = 6;

/// Return the current UTC time, truncated to microseconds.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(TIMESTAMP_DIGITS)
}

/// Wall clock that never goes backwards.
///
/// If the system clock steps back, the previously issued timestamp is reused;
/// equal timestamps are ordered by insertion in the measurement store.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Mutex<Option<Timestamp>>,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next timestamp, never earlier than the previous one.
    pub fn now(&self) -> Timestamp {
        self.next_after(now())
    }

    fn next_after(&self, current: Timestamp) -> Timestamp {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let issued = match *last {
            Some(previous) if previous > current => previous,
            _ => current,
        };
        *last = Some(issued);
        issued
    }
}
