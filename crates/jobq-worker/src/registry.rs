use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use jobq_core::BoxedError;

/// Result type for job handlers.
pub type WorkResult = Result<(), BoxedError>;

/// Work logic invoked for one registered job class.
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// Perform the job, given the queue it came from and its arguments.
    async fn perform(&self, queue: &str, args: &[Value]) -> WorkResult;
}

/// Plain functions with the right shape act as handlers directly.
#[async_trait]
impl<F> JobHandler for F
where
    F: Fn(&str, &[Value]) -> WorkResult + Send + Sync,
{
    async fn perform(&self, queue: &str, args: &[Value]) -> WorkResult {
        (self)(queue, args)
    }
}

/// Registry of job handlers keyed by job class.
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn JobHandler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        HandlerRegistry {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a handler for a job class.
    pub fn register<H: JobHandler + 'static>(&self, class: impl Into<String>, handler: H) {
        let mut handlers = self.handlers.write();
        handlers.insert(class.into(), Arc::new(handler));
    }

    /// Get the handler for a job class.
    pub fn get(&self, class: &str) -> Option<Arc<dyn JobHandler>> {
        let handlers = self.handlers.read();
        handlers.get(class).cloned()
    }

    /// Check whether a handler is registered for a job class.
    pub fn has_handler(&self, class: &str) -> bool {
        let handlers = self.handlers.read();
        handlers.contains_key(class)
    }

    /// All registered job classes.
    pub fn classes(&self) -> Vec<String> {
        let handlers = self.handlers.read();
        handlers.keys().cloned().collect()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
