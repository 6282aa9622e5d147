// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker loop: claim → resolve → execute → report.

use crate::config::PulseConfig;
use crate::events::{EventBus, JobEvent};
use crate::retry::{backoff_ms, is_retryable};
use crate::sink::StoreSink;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use qntx_core::{Clock, ErrorKind, Job, JobId, JobOutcome, WorkerId};
use qntx_dispatch::{HandlerError, HandlerRegistry, JobContext};
use qntx_store::JobStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Cancellation tokens of currently running jobs, shared with the facade
/// so external cancels reach handler contexts.
pub(crate) type ActiveJobs = Arc<Mutex<HashMap<JobId, CancellationToken>>>;

pub(crate) struct Worker<C: Clock> {
    pub(crate) id: WorkerId,
    pub(crate) jobs: JobStore,
    pub(crate) registry: HandlerRegistry,
    pub(crate) config: PulseConfig,
    pub(crate) clock: C,
    pub(crate) bus: EventBus,
    pub(crate) sink: Arc<StoreSink<C>>,
    pub(crate) active: ActiveJobs,
    pub(crate) shutdown: CancellationToken,
}

impl<C: Clock + 'static> Worker<C> {
    /// Claim and execute jobs until shutdown.
    pub(crate) async fn run(self) {
        tracing::debug!(worker_id = %self.id, "worker started");
        loop {
            if self.shutdown.is_cancelled() {
                break;
            }
            let claimed = self.jobs.claim_next(
                &self.id,
                self.config.lease.as_millis() as u64,
                self.clock.epoch_ms(),
            );
            match claimed {
                Ok(Some(job)) => {
                    self.bus.emit(JobEvent::from_job(&job));
                    self.execute(job).await;
                }
                Ok(None) => {
                    tokio::select! {
                        _ = self.shutdown.cancelled() => break,
                        _ = tokio::time::sleep(self.config.poll_interval) => {}
                    }
                }
                Err(e) => {
                    tracing::warn!(worker_id = %self.id, error = %e, "claim failed");
                    tokio::select! {
                        _ = self.shutdown.cancelled() => break,
                        _ = tokio::time::sleep(self.config.poll_interval) => {}
                    }
                }
            }
        }
        tracing::debug!(worker_id = %self.id, "worker stopped");
    }

    async fn execute(&self, job: Job) {
        let handler = match self.registry.resolve(&job.handler_name) {
            Ok(handler) => handler,
            Err(e) => {
                // Unknown handler is terminal, not retryable
                self.finish(&job, JobOutcome::Failed, Some(e.to_string()), None);
                return;
            }
        };

        let token = self.shutdown.child_token();
        self.active.lock().insert(job.id, token.clone());
        let ctx = JobContext::new(job.id, token.clone(), self.sink.clone());

        let started = std::time::Instant::now();
        let result =
            match tokio::time::timeout(self.config.deadline(), handler.execute(&ctx, &job)).await {
                Ok(inner) => inner,
                Err(_) => Err(HandlerError::new(ErrorKind::Backend, "handler timeout")),
            };
        self.active.lock().remove(&job.id);

        let cursor = self.sink.take_cursor(&job.id);
        match result {
            Ok(()) => {
                tracing::info!(
                    job_id = %job.id,
                    handler = %job.handler_name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "job completed"
                );
                self.finish(&job, JobOutcome::Success, None, cursor);
            }
            Err(e) if e.kind == ErrorKind::Canceled || token.is_cancelled() => {
                if self.shutdown.is_cancelled() {
                    // Interrupted by shutdown: leave the job running under
                    // its lease so the final reap requeues it.
                    tracing::info!(job_id = %job.id, "job interrupted by shutdown");
                } else {
                    tracing::info!(job_id = %job.id, "job canceled");
                    self.finish(&job, JobOutcome::Canceled, Some(e.to_string()), None);
                }
            }
            Err(e) => {
                // The claim already incremented attempts
                let attempts = job.attempts + 1;
                if is_retryable(&e) && attempts < job.max_attempts {
                    let backoff = backoff_ms(
                        job.id.as_str(),
                        attempts,
                        self.config.retry_base,
                        self.config.retry_cap,
                    );
                    tracing::warn!(
                        job_id = %job.id,
                        attempts,
                        backoff_ms = backoff,
                        error = %e,
                        "job retried"
                    );
                    self.complete(
                        &job,
                        JobOutcome::Retry,
                        Some(e.to_string()),
                        Some(self.clock.epoch_ms() + backoff),
                        None,
                    );
                } else {
                    tracing::error!(job_id = %job.id, attempts, error = %e, "job failed");
                    self.finish(&job, JobOutcome::Failed, Some(e.to_string()), None);
                }
            }
        }
    }

    fn finish(
        &self,
        job: &Job,
        outcome: JobOutcome,
        error: Option<String>,
        cursor: Option<DateTime<Utc>>,
    ) {
        self.complete(job, outcome, error, None, cursor);
    }

    fn complete(
        &self,
        job: &Job,
        outcome: JobOutcome,
        error: Option<String>,
        backoff_until_ms: Option<u64>,
        cursor: Option<DateTime<Utc>>,
    ) {
        match self.jobs.complete(&job.id, outcome, error, self.clock.utc(), backoff_until_ms, cursor)
        {
            Ok(updated) => self.bus.emit(JobEvent::from_job(&updated)),
            Err(e) => {
                tracing::error!(job_id = %job.id, error = %e, "completion write failed");
            }
        }
    }
}
