use chrono::Utc;
use thiserror::Error;
use tracing::debug;

use jobq_core::{BoxedError, FailureRecord, Job, WorkRecord, WorkerError, WorkerId};
use jobq_store::{Command, Namespace, StoreConn, StoreError};

/// Errors from building or shipping a status report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Writes one worker's status to the shared store.
///
/// Constructed with an explicit namespace and identity. Every operation
/// buffers commands on a caller-owned connection; `finish` and the
/// registration calls flush themselves, `announce_start` leaves the flush to
/// the caller.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    namespace: Namespace,
    worker: WorkerId,
}

impl StatusReporter {
    pub fn new(namespace: Namespace, worker: WorkerId) -> Self {
        StatusReporter { namespace, worker }
    }

    /// Record `job` as this worker's current work under its heartbeat key.
    ///
    /// Overwrites whatever work record was there before. The caller flushes.
    pub fn announce_start(&self, conn: &mut dyn StoreConn, job: &Job) -> Result<(), ReportError> {
        let record = WorkRecord {
            queue: job.queue.clone(),
            run_at: Utc::now(),
            payload: job.payload.clone(),
        };
        let buffer = serde_json::to_string(&record)?;
        conn.send(Command::Set {
            key: self.namespace.worker(self.worker.as_str()),
            value: buffer,
        });
        debug!(
            "Processing {} since {} [{}]",
            record.queue, record.run_at, record.payload.class
        );
        Ok(())
    }

    /// Append a failure record and count the failure against this worker.
    pub fn report_failure(
        &self,
        conn: &mut dyn StoreConn,
        job: &Job,
        err: &BoxedError,
    ) -> Result<(), ReportError> {
        let backtrace = match err.downcast_ref::<WorkerError>() {
            Some(worker_err) => worker_err.backtrace().to_vec(),
            None => Vec::new(),
        };
        let record = FailureRecord {
            failed_at: Utc::now(),
            payload: job.payload.clone(),
            exception: "Error".to_string(),
            error: err.to_string(),
            backtrace,
            worker: self.worker.to_string(),
            queue: job.queue.clone(),
        };
        let buffer = serde_json::to_string(&record)?;
        conn.send(Command::RPush {
            key: self.namespace.failed(),
            value: buffer,
        });
        conn.send(Command::Incr {
            key: self.namespace.stat_failed(),
        });
        conn.send(Command::Incr {
            key: self.namespace.stat_failed_for(self.worker.as_str()),
        });
        Ok(())
    }

    /// Count a success globally and against this worker.
    pub fn report_success(&self, conn: &mut dyn StoreConn, _job: &Job) {
        conn.send(Command::Incr {
            key: self.namespace.stat_processed(),
        });
        conn.send(Command::Incr {
            key: self.namespace.stat_processed_for(self.worker.as_str()),
        });
    }

    /// Terminal reporting step: record the outcome, clear the heartbeat key,
    /// and ship the whole batch in one round trip.
    pub async fn finish(
        &self,
        conn: &mut dyn StoreConn,
        job: &Job,
        err: Option<BoxedError>,
    ) -> Result<(), ReportError> {
        match err {
            Some(err) => self.report_failure(conn, job, &err)?,
            None => self.report_success(conn, job),
        }
        conn.send(Command::Del {
            key: self.namespace.worker(self.worker.as_str()),
        });
        conn.flush().await?;
        Ok(())
    }

    /// Register this worker as alive.
    pub async fn announce_alive(&self, conn: &mut dyn StoreConn) -> Result<(), ReportError> {
        conn.send(Command::SAdd {
            key: self.namespace.workers(),
            member: self.worker.to_string(),
        });
        conn.send(Command::Set {
            key: self.namespace.worker_started(self.worker.as_str()),
            value: Utc::now().to_rfc3339(),
        });
        conn.flush().await?;
        Ok(())
    }

    /// Deregister this worker.
    pub async fn retire(&self, conn: &mut dyn StoreConn) -> Result<(), ReportError> {
        conn.send(Command::SRem {
            key: self.namespace.workers(),
            member: self.worker.to_string(),
        });
        conn.send(Command::Del {
            key: self.namespace.worker_started(self.worker.as_str()),
        });
        conn.flush().await?;
        Ok(())
    }
}
