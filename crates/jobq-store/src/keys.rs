/// Prefix applied to every store key.
///
/// Injected into the reporter and worker at construction so that
/// differently-namespaced instances can share one store without seeing each
/// other's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Namespace(prefix.into())
    }

    /// Heartbeat key holding the in-progress work record for one worker.
    pub fn worker(&self, id: &str) -> String {
        format!("{}worker:{}", self.0, id)
    }

    /// Timestamp key recording when a worker came up.
    pub fn worker_started(&self, id: &str) -> String {
        format!("{}worker:{}:started", self.0, id)
    }

    /// Set of currently-alive worker identities.
    pub fn workers(&self) -> String {
        format!("{}workers", self.0)
    }

    /// Shared list of failure records.
    pub fn failed(&self) -> String {
        format!("{}failed", self.0)
    }

    pub fn stat_processed(&self) -> String {
        format!("{}stat:processed", self.0)
    }

    pub fn stat_processed_for(&self, id: &str) -> String {
        format!("{}stat:processed:{}", self.0, id)
    }

    pub fn stat_failed(&self) -> String {
        format!("{}stat:failed", self.0)
    }

    pub fn stat_failed_for(&self, id: &str) -> String {
        format!("{}stat:failed:{}", self.0, id)
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Namespace("resque:".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_formats() {
        let ns = Namespace::new("resque:");
        assert_eq!(ns.worker("w1"), "resque:worker:w1");
        assert_eq!(ns.worker_started("w1"), "resque:worker:w1:started");
        assert_eq!(ns.workers(), "resque:workers");
        assert_eq!(ns.failed(), "resque:failed");
        assert_eq!(ns.stat_processed(), "resque:stat:processed");
        assert_eq!(ns.stat_processed_for("w1"), "resque:stat:processed:w1");
        assert_eq!(ns.stat_failed(), "resque:stat:failed");
        assert_eq!(ns.stat_failed_for("w1"), "resque:stat:failed:w1");
    }

    #[test]
    fn distinct_prefixes_build_distinct_keys() {
        let a = Namespace::new("a:");
        let b = Namespace::new("b:");
        assert_ne!(a.failed(), b.failed());
    }

    #[test]
    fn default_prefix() {
        assert_eq!(Namespace::default().failed(), "resque:failed");
    }
}
