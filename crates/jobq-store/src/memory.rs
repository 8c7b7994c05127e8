use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{Command, ConnPool, StoreConn, StoreError};

/// In-process store backend.
///
/// Implements the handful of key/value, counter, list and set operations the
/// workers rely on, with buffered commands applied atomically on flush.
/// Useful for tests and for single-process deployments where a remote store
/// is overkill.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    strings: HashMap<String, String>,
    lists: HashMap<String, Vec<String>>,
    counters: HashMap<String, i64>,
    sets: HashMap<String, HashSet<String>>,
}

impl MemoryStore {
    fn apply(&self, commands: Vec<Command>) {
        let mut inner = self.inner.lock();
        for command in commands {
            match command {
                Command::Set { key, value } => {
                    inner.strings.insert(key, value);
                }
                Command::Del { key } => {
                    inner.strings.remove(&key);
                    inner.lists.remove(&key);
                    inner.counters.remove(&key);
                    inner.sets.remove(&key);
                }
                Command::Incr { key } => {
                    *inner.counters.entry(key).or_insert(0) += 1;
                }
                Command::RPush { key, value } => {
                    inner.lists.entry(key).or_default().push(value);
                }
                Command::SAdd { key, member } => {
                    inner.sets.entry(key).or_default().insert(member);
                }
                Command::SRem { key, member } => {
                    if let Some(set) = inner.sets.get_mut(&key) {
                        set.remove(&member);
                    }
                }
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().strings.get(key).cloned()
    }

    pub fn list(&self, key: &str) -> Vec<String> {
        self.inner.lock().lists.get(key).cloned().unwrap_or_default()
    }

    pub fn list_len(&self, key: &str) -> usize {
        self.inner.lock().lists.get(key).map(Vec::len).unwrap_or(0)
    }

    pub fn counter(&self, key: &str) -> i64 {
        self.inner.lock().counters.get(key).copied().unwrap_or(0)
    }

    pub fn set_contains(&self, key: &str, member: &str) -> bool {
        self.inner
            .lock()
            .sets
            .get(key)
            .map_or(false, |set| set.contains(member))
    }
}

/// Pool handing out buffered connections to one [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryPool {
    store: Arc<MemoryStore>,
}

impl MemoryPool {
    pub fn new() -> Self {
        MemoryPool {
            store: Arc::new(MemoryStore::default()),
        }
    }

    /// Handle for inspecting store state directly.
    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }
}

impl Default for MemoryPool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnPool for MemoryPool {
    async fn acquire(&self) -> Result<Box<dyn StoreConn>, StoreError> {
        Ok(Box::new(MemoryConn {
            store: Arc::clone(&self.store),
            buffered: Vec::new(),
        }))
    }
}

struct MemoryConn {
    store: Arc<MemoryStore>,
    buffered: Vec<Command>,
}

#[async_trait]
impl StoreConn for MemoryConn {
    fn send(&mut self, cmd: Command) {
        self.buffered.push(cmd);
    }

    async fn flush(&mut self) -> Result<(), StoreError> {
        self.store.apply(std::mem::take(&mut self.buffered));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commands_are_invisible_until_flush() {
        let pool = MemoryPool::new();
        let store = pool.store();

        let mut conn = pool.acquire().await.unwrap();
        conn.send(Command::Set {
            key: "k".to_string(),
            value: "v".to_string(),
        });
        assert_eq!(store.get("k"), None);

        conn.flush().await.unwrap();
        assert_eq!(store.get("k"), Some("v".to_string()));
    }

    #[tokio::test]
    async fn counters_lists_and_sets() {
        let pool = MemoryPool::new();
        let store = pool.store();

        let mut conn = pool.acquire().await.unwrap();
        conn.send(Command::Incr {
            key: "count".to_string(),
        });
        conn.send(Command::Incr {
            key: "count".to_string(),
        });
        conn.send(Command::RPush {
            key: "items".to_string(),
            value: "a".to_string(),
        });
        conn.send(Command::RPush {
            key: "items".to_string(),
            value: "b".to_string(),
        });
        conn.send(Command::SAdd {
            key: "members".to_string(),
            member: "w1".to_string(),
        });
        conn.flush().await.unwrap();

        assert_eq!(store.counter("count"), 2);
        assert_eq!(store.list("items"), ["a".to_string(), "b".to_string()]);
        assert_eq!(store.list_len("items"), 2);
        assert!(store.set_contains("members", "w1"));

        let mut conn = pool.acquire().await.unwrap();
        conn.send(Command::SRem {
            key: "members".to_string(),
            member: "w1".to_string(),
        });
        conn.send(Command::Del {
            key: "count".to_string(),
        });
        conn.flush().await.unwrap();

        assert!(!store.set_contains("members", "w1"));
        assert_eq!(store.counter("count"), 0);
    }

    #[tokio::test]
    async fn flush_drains_the_buffer() {
        let pool = MemoryPool::new();
        let store = pool.store();

        let mut conn = pool.acquire().await.unwrap();
        conn.send(Command::Incr {
            key: "count".to_string(),
        });
        conn.flush().await.unwrap();
        conn.flush().await.unwrap();

        assert_eq!(store.counter("count"), 1);
    }
}
