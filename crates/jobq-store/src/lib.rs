mod command;
mod conn;
mod keys;
mod memory;
mod redis;

pub use command::Command;
pub use conn::{ConnPool, StoreConn, StoreError};
pub use keys::Namespace;
pub use memory::{MemoryPool, MemoryStore};
pub use self::redis::RedisPool;
