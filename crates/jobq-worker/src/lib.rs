pub mod config;
pub mod executor;
pub mod registry;
pub mod reporter;
pub mod worker;

pub use config::WorkerConfig;
pub use executor::Executor;
pub use registry::{HandlerRegistry, JobHandler, WorkResult};
pub use reporter::{ReportError, StatusReporter};
pub use worker::Worker;
