// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The handler contract and per-job execution context.

use crate::error::HandlerError;
use async_trait::async_trait;
use qntx_core::{Job, JobId, Progress};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Where handler-reported progress and annotations go. The scheduler
/// binds this to the job store; tests use [`NullSink`].
pub trait JobSink: Send + Sync {
    fn progress(&self, job_id: &JobId, progress: Progress);
    fn result_source(&self, job_id: &JobId, source: &str);
    fn add_cost(&self, job_id: &JobId, cost_usd: f64);
    /// Stage a schedule watermark to be written back atomically with the
    /// job's completion.
    fn set_cursor(&self, job_id: &JobId, cursor: chrono::DateTime<chrono::Utc>);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl JobSink for NullSink {
    fn progress(&self, _job_id: &JobId, _progress: Progress) {}
    fn result_source(&self, _job_id: &JobId, _source: &str) {}
    fn add_cost(&self, _job_id: &JobId, _cost_usd: f64) {}
    fn set_cursor(&self, _job_id: &JobId, _cursor: chrono::DateTime<chrono::Utc>) {}
}

/// Execution context handed to a handler: cancellation plus reporting
/// sinks bound to the owning job.
#[derive(Clone)]
pub struct JobContext {
    job_id: JobId,
    cancel: CancellationToken,
    sink: Arc<dyn JobSink>,
}

impl JobContext {
    pub fn new(job_id: JobId, cancel: CancellationToken, sink: Arc<dyn JobSink>) -> Self {
        Self { job_id, cancel, sink }
    }

    /// Context for previews and tests: fresh token, discarding sink.
    pub fn detached(job_id: JobId) -> Self {
        Self::new(job_id, CancellationToken::new(), Arc::new(NullSink))
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_canceled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Bail out with `Canceled` when the context has been canceled.
    /// Handlers call this at the top of each iteration and before every
    /// external call.
    pub fn check_canceled(&self) -> Result<(), HandlerError> {
        if self.is_canceled() {
            Err(HandlerError::canceled())
        } else {
            Ok(())
        }
    }

    pub fn update_progress(&self, current: u64, total: u64) {
        self.sink.progress(&self.job_id, Progress::new(current, total));
    }

    pub fn set_result_source(&self, source: &str) {
        self.sink.result_source(&self.job_id, source);
    }

    pub fn add_cost(&self, cost_usd: f64) {
        self.sink.add_cost(&self.job_id, cost_usd);
    }

    pub fn set_cursor(&self, cursor: chrono::DateTime<chrono::Utc>) {
        self.sink.set_cursor(&self.job_id, cursor);
    }
}

/// A unit of executable work, resolved from the registry by name.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Execute `job`. Implementations must honor cancellation at
    /// suspension points and report progress through `ctx`.
    async fn execute(&self, ctx: &JobContext, job: &Job) -> Result<(), HandlerError>;
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
