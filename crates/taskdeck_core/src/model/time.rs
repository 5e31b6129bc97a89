//! Timestamp representation shared by all records.
//!
//! Storage keeps epoch milliseconds; the domain and JSON use UTC datetimes.

use chrono::{DateTime, Utc};

pub type Timestamp = DateTime<Utc>;

/// Current time truncated to millisecond precision, matching storage.
pub fn now() -> Timestamp {
    let millis = Utc::now().timestamp_millis();
    from_millis(millis).unwrap_or_else(Utc::now)
}

pub fn to_millis(value: &Timestamp) -> i64 {
    value.timestamp_millis()
}

/// Returns `None` when `millis` is outside chrono's representable range.
pub fn from_millis(millis: i64) -> Option<Timestamp> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}
