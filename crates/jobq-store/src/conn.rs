use async_trait::async_trait;
use thiserror::Error;

use crate::Command;

/// Errors surfaced by the connection pool and store round trips.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The pool has been shut down and no longer lends connections.
    #[error("connection pool closed")]
    PoolClosed,

    /// The store cannot currently be reached.
    #[error("store unreachable: {0}")]
    Unavailable(String),

    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
}

/// A borrowed, single-use store connection.
///
/// Commands are buffered locally with [`StoreConn::send`] and shipped as one
/// pipelined round trip by [`StoreConn::flush`]. Dropping the connection
/// returns it to the pool it came from.
#[async_trait]
pub trait StoreConn: Send {
    /// Queue a command. No network I/O happens here.
    fn send(&mut self, cmd: Command);

    /// Ship all buffered commands in a single round trip.
    async fn flush(&mut self) -> Result<(), StoreError>;
}

/// Shared pool lending [`StoreConn`] handles.
#[async_trait]
pub trait ConnPool: Send + Sync {
    /// Borrow a connection, waiting if the pool is exhausted.
    ///
    /// An error means the store is currently unreachable.
    async fn acquire(&self) -> Result<Box<dyn StoreConn>, StoreError>;
}
