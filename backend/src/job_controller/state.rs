//! Manages the state of long-running, asynchronous background jobs.
//!
//! This module tracks tasks that run outside the request/response cycle, such
//! as the batch render started by `POST /api/render/batch`
//! (`backend/src/services/render/batch.rs`).
//!
//! The main components are:
//! - `JobsState`: A clonable, thread-safe struct that holds the shared state of all jobs
//!   and the per-item results of finished batch jobs. It is injected into the Actix
//!   application state in `main.rs`.
//! - `JobUpdate`: A message struct used to communicate status changes from a background
//!   job back to the central state manager.
//! - `start_job_updater`: A long-running task that listens for `JobUpdate` messages
//!   on an MPSC channel and updates the shared `JobsState` accordingly.

use common::jobs::{BatchRenderResult, JobStatus};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// A thread-safe, shareable container for the state of all background jobs.
#[derive(Clone)]
pub struct JobsState {
    /// A map from a unique job ID to its current `JobStatus`.
    ///
    /// Read by `/api/render/status/{job_id}`, written only by the
    /// `start_job_updater` task (and by the scheduler when a job is registered).
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,

    /// Per-item outcomes of batch render jobs, keyed by job ID.
    ///
    /// A job's entry is written once, before its final status is reported, so a
    /// client that sees `Completed` can always read the results.
    pub results: Arc<RwLock<HashMap<String, Vec<BatchRenderResult>>>>,

    /// Sender side of the channel drained by `start_job_updater`. Background tasks
    /// push `JobUpdate`s here instead of writing the `jobs` map themselves.
    pub tx: mpsc::Sender<JobUpdate>,
}

/// Represents a status update for a specific background job.
#[derive(Debug)]
pub struct JobUpdate {
    /// The unique identifier of the job being updated.
    pub(crate) job_id: String,
    /// The new status of the job.
    pub(crate) status: JobStatus,
}

impl JobsState {
    /// Creates an empty state and the receiver to hand to `start_job_updater`.
    pub fn channel(capacity: usize) -> (JobsState, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(capacity);
        let state = JobsState {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            results: Arc::new(RwLock::new(HashMap::new())),
            tx,
        };
        (state, rx)
    }

    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().await.get(job_id).cloned()
    }

    pub async fn results(&self, job_id: &str) -> Option<Vec<BatchRenderResult>> {
        self.results.read().await.get(job_id).cloned()
    }

    /// Queues a status change for `job_id`. A closed channel only means the
    /// server is shutting down, so the error is logged and dropped.
    pub async fn report(&self, job_id: &str, status: JobStatus) {
        let update = JobUpdate {
            job_id: job_id.to_string(),
            status,
        };
        if let Err(e) = self.tx.send(update).await {
            log::warn!("Job updater is gone, dropping update: {}", e);
        }
    }
}

/// Starts the central job state updater task.
///
/// This function should be spawned as a long-running background task (as seen in `main.rs`).
/// It continuously listens for `JobUpdate` messages on the provided `rx` receiver and
/// stores each new status in the shared `jobs` map.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        log::debug!("Job {} -> {:?}", update.job_id, update.status);
        let mut jobs = state.jobs.write().await;
        jobs.insert(update.job_id, update.status);
    }
}
