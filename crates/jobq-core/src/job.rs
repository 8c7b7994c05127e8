use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One unit of work pulled off a queue.
///
/// Immutable once constructed; owned by whichever component currently holds
/// it (intake channel, then worker, then executor), never shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub queue: String,
    pub payload: Payload,
}

/// Wire payload of a job: the handler class to invoke and its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub class: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl Job {
    pub fn new(queue: impl Into<String>, class: impl Into<String>, args: Vec<Value>) -> Self {
        Job {
            queue: queue.into(),
            payload: Payload {
                class: class.into(),
                args,
            },
        }
    }
}
