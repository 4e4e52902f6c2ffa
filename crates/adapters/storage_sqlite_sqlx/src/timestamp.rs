//! Text encoding of timestamps.
//!
//! Timestamps are stored as fixed-width RFC 3339 (`…T…:…:….ffffffZ`) so that
//! ordering the text column orders the instants.

use chrono::SecondsFormat;

use smarthouse_domain::time::Timestamp;

pub(crate) fn encode(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_utc())
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}
