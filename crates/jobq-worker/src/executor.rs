use std::backtrace::Backtrace;
use std::sync::Arc;

use tracing::error;

use jobq_core::{Job, WorkerError};
use jobq_store::ConnPool;

use crate::registry::{JobHandler, WorkResult};
use crate::reporter::StatusReporter;

/// Runs one job at a time, isolating panics in the work logic and always
/// driving the job to a terminal report.
#[derive(Clone)]
pub struct Executor {
    pool: Arc<dyn ConnPool>,
    reporter: StatusReporter,
}

impl Executor {
    pub fn new(pool: Arc<dyn ConnPool>, reporter: StatusReporter) -> Self {
        Executor { pool, reporter }
    }

    /// Execute `job` with `handler`.
    ///
    /// Never returns an error: every outcome is routed to the store. The one
    /// case where a job is dropped without a report is a store that cannot
    /// even record the heartbeat.
    pub async fn run(&self, job: &Job, handler: Arc<dyn JobHandler>) {
        {
            let mut conn = match self.pool.acquire().await {
                Ok(conn) => conn,
                Err(err) => {
                    error!("Dropping job on {}: store unreachable: {}", job.queue, err);
                    return;
                }
            };
            if let Err(err) = self.reporter.announce_start(&mut *conn, job) {
                error!("Failed to build heartbeat for {}: {}", job.queue, err);
            } else if let Err(err) = conn.flush().await {
                error!("Failed to write heartbeat for {}: {}", job.queue, err);
            }
        }

        let outcome = self.invoke(job, handler).await;

        let mut conn = match self.pool.acquire().await {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "Outcome of job on {} was never reported: store unreachable: {}",
                    job.queue, err
                );
                return;
            }
        };
        if let Err(err) = self.reporter.finish(&mut *conn, job, outcome.err()).await {
            error!("Failed to report outcome of job on {}: {}", job.queue, err);
        }
    }

    /// Fault boundary around the handler call.
    ///
    /// A panic in the work logic becomes a [`WorkerError`] carrying the stack
    /// captured here, so it reports like any other failure.
    async fn invoke(&self, job: &Job, handler: Arc<dyn JobHandler>) -> WorkResult {
        let job = job.clone();
        let call = tokio::spawn(async move { handler.perform(&job.queue, &job.payload.args).await });
        match call.await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                let backtrace: Vec<String> = Backtrace::force_capture()
                    .to_string()
                    .lines()
                    .map(str::to_owned)
                    .collect();
                let message = if join_err.is_panic() {
                    describe_panic(join_err.into_panic())
                } else {
                    "job task was cancelled".to_string()
                };
                Err(Box::new(WorkerError::new(message, backtrace)))
            }
        }
    }
}

fn describe_panic(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
