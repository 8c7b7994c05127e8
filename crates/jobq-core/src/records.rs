use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Payload;

/// What a worker is doing right now, stored under its heartbeat key.
///
/// At most one record exists per worker identity at any instant: starting a
/// new job overwrites it, finishing deletes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkRecord {
    pub queue: String,
    pub run_at: DateTime<Utc>,
    pub payload: Payload,
}

/// A failed job, as appended to the shared failure list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    pub failed_at: DateTime<Utc>,
    pub payload: Payload,
    pub exception: String,
    pub error: String,
    pub backtrace: Vec<String>,
    pub worker: String,
    pub queue: String,
}
