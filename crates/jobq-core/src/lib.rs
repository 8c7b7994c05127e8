mod error;
mod identity;
mod job;
mod records;

pub use error::{BoxedError, WorkerError};
pub use identity::{InvalidIdentity, WorkerId};
pub use job::{Job, Payload};
pub use records::{FailureRecord, WorkRecord};
