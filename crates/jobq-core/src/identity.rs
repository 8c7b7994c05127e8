use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("worker identity must be a non-empty string")]
pub struct InvalidIdentity;

/// Opaque identity of one worker instance.
///
/// Used verbatim as a store-key suffix and in log messages, so it is fixed
/// for the worker's lifetime and must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(String);

impl WorkerId {
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidIdentity> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(InvalidIdentity);
        }
        Ok(WorkerId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
