use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

use ::redis::aio::MultiplexedConnection;
use ::redis::{Client, Pipeline};

use crate::{Command, ConnPool, StoreConn, StoreError};

/// Bounded pool of multiplexed Redis connections.
///
/// `acquire` waits for a free slot when all connections are lent out and only
/// fails when the server cannot be reached or the pool has been closed.
pub struct RedisPool {
    client: Client,
    idle: Arc<Mutex<Vec<MultiplexedConnection>>>,
    slots: Arc<Semaphore>,
}

impl RedisPool {
    /// Connect lazily to `uri` (e.g. `redis://127.0.0.1:6379/`), lending out
    /// at most `connections` handles at a time.
    pub fn new(uri: &str, connections: usize) -> Result<Self, StoreError> {
        let client = Client::open(uri)?;
        Ok(RedisPool {
            client,
            idle: Arc::new(Mutex::new(Vec::with_capacity(connections))),
            slots: Arc::new(Semaphore::new(connections)),
        })
    }
}

#[async_trait]
impl ConnPool for RedisPool {
    async fn acquire(&self) -> Result<Box<dyn StoreConn>, StoreError> {
        let permit = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|_| StoreError::PoolClosed)?;

        let reused = self.idle.lock().pop();
        let conn = match reused {
            Some(conn) => conn,
            None => {
                debug!("Opening new redis connection");
                self.client.get_multiplexed_async_connection().await?
            }
        };

        Ok(Box::new(RedisConn {
            conn: Some(conn),
            pipe: ::redis::pipe(),
            idle: Arc::clone(&self.idle),
            _slot: permit,
        }))
    }
}

/// One borrowed Redis connection with a local command pipeline.
struct RedisConn {
    conn: Option<MultiplexedConnection>,
    pipe: Pipeline,
    idle: Arc<Mutex<Vec<MultiplexedConnection>>>,
    _slot: OwnedSemaphorePermit,
}

#[async_trait]
impl StoreConn for RedisConn {
    fn send(&mut self, cmd: Command) {
        match cmd {
            Command::Set { key, value } => {
                self.pipe.set(key, value).ignore();
            }
            Command::Del { key } => {
                self.pipe.del(key).ignore();
            }
            Command::Incr { key } => {
                self.pipe.incr(key, 1).ignore();
            }
            Command::RPush { key, value } => {
                self.pipe.rpush(key, value).ignore();
            }
            Command::SAdd { key, member } => {
                self.pipe.sadd(key, member).ignore();
            }
            Command::SRem { key, member } => {
                self.pipe.srem(key, member).ignore();
            }
        }
    }

    async fn flush(&mut self) -> Result<(), StoreError> {
        let conn = match self.conn.as_mut() {
            Some(conn) => conn,
            None => return Err(StoreError::Unavailable("connection was discarded".into())),
        };
        let pipe = std::mem::replace(&mut self.pipe, ::redis::pipe());
        match pipe.query_async::<()>(conn).await {
            Ok(()) => Ok(()),
            Err(err) => {
                // A connection that failed mid-flush is discarded, not pooled again.
                self.conn = None;
                Err(err.into())
            }
        }
    }
}

impl Drop for RedisConn {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.idle.lock().push(conn);
        }
    }
}
