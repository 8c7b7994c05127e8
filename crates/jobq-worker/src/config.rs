use jobq_store::Namespace;
use serde::{Deserialize, Serialize};

/// Worker pool configuration.
///
/// Passed in explicitly wherever it is needed; nothing reads it from
/// process-global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Store URI, e.g. `redis://127.0.0.1:6379/`.
    pub store_uri: String,
    /// Prefix applied to every store key.
    pub namespace: String,
    /// Maximum store connections lent out at once.
    pub connections: usize,
    /// Number of worker loops the pool runs.
    pub concurrency: usize,
    /// Queues the pool watches.
    pub queues: Vec<String>,
    /// Fixed worker identity (auto-generated if not provided).
    pub worker_id: Option<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            store_uri: "redis://127.0.0.1:6379/".to_string(),
            namespace: "resque:".to_string(),
            connections: 2,
            concurrency: 25,
            queues: Vec::new(),
            worker_id: None,
        }
    }
}

impl WorkerConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: WorkerConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Namespace used to build every store key.
    pub fn namespace(&self) -> Namespace {
        Namespace::new(self.namespace.clone())
    }

    /// Identity for a new worker: the configured one, or `host-pid-nonce`.
    pub fn generate_worker_id(&self) -> String {
        if let Some(id) = &self.worker_id {
            return id.clone();
        }

        let host = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown".to_string());
        let pid = std::process::id();
        let nonce = uuid::Uuid::new_v4().simple().to_string();

        format!("{}-{}-{}", host, pid, &nonce[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.store_uri, "redis://127.0.0.1:6379/");
        assert_eq!(config.namespace, "resque:");
        assert_eq!(config.connections, 2);
        assert_eq!(config.concurrency, 25);
        assert!(config.queues.is_empty());
        assert!(config.worker_id.is_none());
    }

    #[test]
    fn parses_yaml() {
        let yaml = r#"
store_uri: "redis://store.internal:6379/"
namespace: "jobs:"
connections: 4
concurrency: 8
queues: ["high", "default"]
worker_id: null
"#;
        let config: WorkerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.namespace, "jobs:");
        assert_eq!(config.queues, ["high".to_string(), "default".to_string()]);
        assert_eq!(config.namespace().failed(), "jobs:failed");
    }

    #[test]
    fn configured_worker_id_wins() {
        let config = WorkerConfig {
            worker_id: Some("w1".to_string()),
            ..WorkerConfig::default()
        };
        assert_eq!(config.generate_worker_id(), "w1");
    }

    #[test]
    fn generated_ids_are_unique() {
        let config = WorkerConfig::default();
        assert_ne!(config.generate_worker_id(), config.generate_worker_id());
    }
}
