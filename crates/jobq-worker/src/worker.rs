use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

use jobq_core::{InvalidIdentity, Job, WorkerId};
use jobq_store::{ConnPool, Namespace};

use crate::executor::Executor;
use crate::registry::HandlerRegistry;
use crate::reporter::StatusReporter;

/// One background worker.
///
/// Drains an intake channel of jobs, one at a time in arrival order, and
/// reports every outcome to the shared store. The channel is closed by its
/// upstream owner; the worker never closes it.
#[derive(Clone)]
pub struct Worker {
    id: WorkerId,
    queues: Vec<String>,
    registry: Arc<HandlerRegistry>,
    pool: Arc<dyn ConnPool>,
    reporter: StatusReporter,
    executor: Executor,
}

impl Worker {
    /// Create a worker. Performs no store I/O.
    pub fn new(
        id: impl Into<String>,
        queues: Vec<String>,
        namespace: Namespace,
        pool: Arc<dyn ConnPool>,
        registry: Arc<HandlerRegistry>,
    ) -> Result<Self, InvalidIdentity> {
        let id = WorkerId::new(id)?;
        let reporter = StatusReporter::new(namespace, id.clone());
        let executor = Executor::new(Arc::clone(&pool), reporter.clone());
        Ok(Worker {
            id,
            queues,
            registry,
            pool,
            reporter,
            executor,
        })
    }

    /// Identity under which this worker appears in store keys and logs.
    pub fn id(&self) -> &WorkerId {
        &self.id
    }

    /// Announce the worker as alive and start draining `jobs` in the
    /// background.
    ///
    /// Returns once the drain task is running; the task is tracked by
    /// `monitor` and ends when the channel is closed. If the store cannot be
    /// reached for the announcement the worker does not start at all.
    pub async fn work(&self, jobs: mpsc::Receiver<Job>, monitor: &TaskTracker) {
        let mut conn = match self.pool.acquire().await {
            Ok(conn) => conn,
            Err(err) => {
                error!("Worker {} cannot start: store unreachable: {}", self.id, err);
                return;
            }
        };
        if let Err(err) = self.reporter.announce_alive(&mut *conn).await {
            error!("Worker {} cannot start: {}", self.id, err);
            return;
        }
        drop(conn);

        info!("Worker {} up, watching queues {:?}", self.id, self.queues);

        let worker = self.clone();
        let _ = monitor.spawn(async move { worker.drain(jobs).await });
    }

    /// Drain loop: one job at a time, in intake order, until the channel
    /// closes.
    async fn drain(self, mut jobs: mpsc::Receiver<Job>) {
        while let Some(job) = jobs.recv().await {
            match self.registry.get(&job.payload.class) {
                Some(handler) => {
                    self.executor.run(&job, handler).await;
                    debug!(
                        "done: ({} | {} | {:?})",
                        job.queue, job.payload.class, job.payload.args
                    );
                }
                None => self.fail_unregistered(&job).await,
            }
        }

        match self.pool.acquire().await {
            Ok(mut conn) => {
                if let Err(err) = self.reporter.retire(&mut *conn).await {
                    error!("Worker {} failed to deregister: {}", self.id, err);
                }
            }
            Err(err) => {
                error!(
                    "Worker {} failed to deregister: store unreachable: {}",
                    self.id, err
                );
            }
        }
        info!("Worker {} shut down", self.id);
    }

    /// A job whose class has no registered handler fails without ever
    /// invoking work logic.
    async fn fail_unregistered(&self, job: &Job) {
        let message = format!(
            "No handler for {} in queue {} with args {:?}",
            job.payload.class, job.queue, job.payload.args
        );
        error!("{}", message);

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
        if let Err(err) = self
            .reporter
            .finish(&mut *conn, job, Some(message.into()))
            .await
        {
            error!("Failed to report unregistered job on {}: {}", job.queue, err);
        }
    }
}
