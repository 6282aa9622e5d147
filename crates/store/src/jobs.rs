// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job and schedule store facade.

use crate::error::StoreError;
use crate::event::LedgerEvent;
use crate::ledger::Ledger;
use chrono::{DateTime, Utc};
use qntx_core::{
    Job, JobId, JobOutcome, JobState, Progress, Schedule, ScheduleId, WorkerId,
};

/// What `cancel` did, so callers know whether cooperative cancellation is
/// still required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelDisposition {
    /// The job was queued and is now terminally canceled.
    Canceled,
    /// The job is running; the worker must cancel it cooperatively and
    /// report the final outcome.
    NeedsCooperative,
}

/// Durable job queue and schedule registry.
///
/// `claim_next` is linearizable: claims happen under the ledger lock, so
/// no two workers ever observe the same job queued and both claim it.
#[derive(Clone)]
pub struct JobStore {
    ledger: Ledger,
}

impl JobStore {
    pub(crate) fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    // =========================================================================
    // jobs
    // =========================================================================

    /// Insert a job in `queued` state. Assigns an id when the job's id is
    /// empty. Returns `Busy` when the queue is at capacity.
    pub fn enqueue(&self, mut job: Job) -> Result<JobId, StoreError> {
        let mut inner = self.ledger.lock();
        let depth = inner.state.queued_depth();
        if depth >= inner.config.max_queue_depth {
            return Err(StoreError::Busy { depth });
        }
        if job.id.is_empty() {
            job.id = JobId::new();
        }
        job.state = JobState::Queued;
        let at_ms = job.created_at.timestamp_millis() as u64;
        let id = job.id;
        tracing::debug!(job_id = %id, handler = %job.handler_name, "job enqueued");
        inner.commit(at_ms, LedgerEvent::JobEnqueued { job })?;
        Ok(id)
    }

    /// Atomically claim the next runnable job for `worker_id`, moving it to
    /// `running` under a lease. Schedule-originated jobs are preferred;
    /// within a class, oldest `created_at` first.
    pub fn claim_next(
        &self,
        worker_id: &WorkerId,
        lease_ms: u64,
        now_ms: u64,
    ) -> Result<Option<Job>, StoreError> {
        let mut inner = self.ledger.lock();
        let candidate = inner
            .state
            .jobs
            .values()
            .filter(|job| job.is_claimable(now_ms))
            .min_by_key(|job| {
                (job.schedule_id.is_none(), job.created_at, job.id.to_string())
            })
            .map(|job| job.id);

        let Some(job_id) = candidate else {
            return Ok(None);
        };

        let started_at = DateTime::from_timestamp_millis(now_ms as i64).unwrap_or_default();
        inner.commit(
            now_ms,
            LedgerEvent::JobClaimed {
                job_id,
                worker_id: *worker_id,
                lease_until_ms: now_ms + lease_ms,
                started_at,
            },
        )?;
        let job = inner.state.jobs.get(job_id.as_str()).cloned();
        if let Some(ref job) = job {
            tracing::debug!(
                job_id = %job.id,
                worker_id = %worker_id,
                attempts = job.attempts,
                "job claimed"
            );
        }
        Ok(job)
    }

    /// Record handler progress and extend the claim lease.
    pub fn heartbeat(
        &self,
        job_id: &JobId,
        progress: Progress,
        lease_extension_ms: u64,
        now_ms: u64,
    ) -> Result<(), StoreError> {
        let mut inner = self.ledger.lock();
        let job = inner
            .state
            .jobs
            .get(job_id.as_str())
            .ok_or_else(|| StoreError::NotFound { entity: "job", id: job_id.to_string() })?;
        if job.state != JobState::Running {
            return Err(StoreError::InvalidTransition {
                id: job_id.to_string(),
                from: job.state.to_string(),
                to: "running".to_string(),
            });
        }
        inner.commit(
            now_ms,
            LedgerEvent::JobProgress {
                job_id: *job_id,
                progress,
                lease_until_ms: now_ms + lease_extension_ms,
            },
        )
    }

    /// Attach a result-source tag and/or accumulate LLM spend.
    pub fn annotate(
        &self,
        job_id: &JobId,
        result_source: Option<String>,
        cost_delta_usd: f64,
        now_ms: u64,
    ) -> Result<(), StoreError> {
        let mut inner = self.ledger.lock();
        if !inner.state.jobs.contains_key(job_id.as_str()) {
            return Err(StoreError::NotFound { entity: "job", id: job_id.to_string() });
        }
        inner.commit(
            now_ms,
            LedgerEvent::JobAnnotated { job_id: *job_id, result_source, cost_delta_usd },
        )
    }

    /// Report a job outcome. `Retry` re-queues with the given backoff;
    /// terminal outcomes stamp `ended_at`. A `cursor` is written back to
    /// the owning schedule in the same ledger event, making completion and
    /// watermark advance atomic.
    pub fn complete(
        &self,
        job_id: &JobId,
        outcome: JobOutcome,
        error: Option<String>,
        at: DateTime<Utc>,
        backoff_until_ms: Option<u64>,
        cursor: Option<DateTime<Utc>>,
    ) -> Result<Job, StoreError> {
        let mut inner = self.ledger.lock();
        let job = inner
            .state
            .jobs
            .get(job_id.as_str())
            .ok_or_else(|| StoreError::NotFound { entity: "job", id: job_id.to_string() })?;

        let to = match outcome {
            JobOutcome::Success => JobState::Done,
            JobOutcome::Failed => JobState::Failed,
            JobOutcome::Canceled => JobState::Canceled,
            JobOutcome::Retry => JobState::Queued,
        };
        if !job.state.can_transition(to) {
            return Err(StoreError::InvalidTransition {
                id: job_id.to_string(),
                from: job.state.to_string(),
                to: to.to_string(),
            });
        }

        inner.commit(
            at.timestamp_millis() as u64,
            LedgerEvent::JobCompleted {
                job_id: *job_id,
                outcome,
                at,
                error,
                backoff_until_ms,
                cursor,
            },
        )?;
        inner
            .state
            .jobs
            .get(job_id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound { entity: "job", id: job_id.to_string() })
    }

    /// Cancel a job. Queued jobs become terminal immediately; running jobs
    /// require cooperative cancellation by their worker.
    pub fn cancel(&self, job_id: &JobId, at: DateTime<Utc>) -> Result<CancelDisposition, StoreError> {
        let state = {
            let inner = self.ledger.lock();
            inner
                .state
                .jobs
                .get(job_id.as_str())
                .map(|job| job.state)
                .ok_or_else(|| StoreError::NotFound { entity: "job", id: job_id.to_string() })?
        };
        match state {
            JobState::Queued => {
                self.complete(job_id, JobOutcome::Canceled, None, at, None, None)?;
                Ok(CancelDisposition::Canceled)
            }
            JobState::Running => Ok(CancelDisposition::NeedsCooperative),
            other => Err(StoreError::InvalidTransition {
                id: job_id.to_string(),
                from: other.to_string(),
                to: JobState::Canceled.to_string(),
            }),
        }
    }

    /// Requeue every running job whose lease lapsed. Returns the reaped ids.
    pub fn reap(&self, now_ms: u64) -> Result<Vec<JobId>, StoreError> {
        let mut inner = self.ledger.lock();
        let expired: Vec<JobId> = inner
            .state
            .jobs
            .values()
            .filter(|job| job.lease_expired(now_ms))
            .map(|job| job.id)
            .collect();
        for job_id in &expired {
            tracing::warn!(job_id = %job_id, "reaping job with expired lease");
            inner.commit(now_ms, LedgerEvent::JobReaped { job_id: *job_id, at_ms: now_ms })?;
        }
        Ok(expired)
    }

    /// Get a job by id or unique prefix.
    pub fn get(&self, id: &str) -> Option<Job> {
        self.ledger.with_state(|state| state.get_job(id).cloned())
    }

    /// All jobs, in no particular order.
    pub fn list(&self) -> Vec<Job> {
        self.ledger.with_state(|state| state.jobs.values().cloned().collect())
    }

    /// Jobs created by `schedule_id`, any state.
    pub fn jobs_for_schedule(&self, schedule_id: &ScheduleId) -> Vec<Job> {
        self.ledger.with_state(|state| {
            state
                .jobs
                .values()
                .filter(|job| job.schedule_id.as_ref() == Some(schedule_id))
                .cloned()
                .collect()
        })
    }

    // =========================================================================
    // schedules
    // =========================================================================

    /// Register a schedule. Assigns an id when the schedule's id is empty.
    pub fn create_schedule(&self, mut schedule: Schedule) -> Result<ScheduleId, StoreError> {
        if schedule.id.is_empty() {
            schedule.id = ScheduleId::new();
        }
        let id = schedule.id;
        let at_ms = schedule.next_fire_at.timestamp_millis() as u64;
        self.ledger.lock().commit(at_ms, LedgerEvent::ScheduleCreated { schedule })?;
        Ok(id)
    }

    /// Replace a schedule definition.
    pub fn update_schedule(&self, schedule: Schedule, now_ms: u64) -> Result<(), StoreError> {
        let mut inner = self.ledger.lock();
        if !inner.state.schedules.contains_key(schedule.id.as_str()) {
            return Err(StoreError::NotFound {
                entity: "schedule",
                id: schedule.id.to_string(),
            });
        }
        inner.commit(now_ms, LedgerEvent::ScheduleUpdated { schedule })
    }

    pub fn delete_schedule(&self, schedule_id: &ScheduleId, now_ms: u64) -> Result<(), StoreError> {
        let mut inner = self.ledger.lock();
        if !inner.state.schedules.contains_key(schedule_id.as_str()) {
            return Err(StoreError::NotFound {
                entity: "schedule",
                id: schedule_id.to_string(),
            });
        }
        inner.commit(now_ms, LedgerEvent::ScheduleDeleted { schedule_id: *schedule_id })
    }

    pub fn get_schedule(&self, id: &str) -> Option<Schedule> {
        self.ledger.with_state(|state| state.get_schedule(id).cloned())
    }

    pub fn list_schedules(&self) -> Vec<Schedule> {
        self.ledger.with_state(|state| state.schedules.values().cloned().collect())
    }

    /// Enabled schedules whose fire time has arrived.
    pub fn due_schedules(&self, now: DateTime<Utc>) -> Vec<Schedule> {
        self.ledger.with_state(|state| {
            state.schedules.values().filter(|s| s.is_due(now)).cloned().collect()
        })
    }

    /// Record one fire: stamps `last_fire_at` and advances `next_fire_at`
    /// by a single interval (catch-up bounded to one fire per tick).
    pub fn mark_fired(&self, schedule_id: &ScheduleId, now: DateTime<Utc>) -> Result<(), StoreError> {
        let mut inner = self.ledger.lock();
        let schedule = inner.state.schedules.get(schedule_id.as_str()).ok_or_else(|| {
            StoreError::NotFound { entity: "schedule", id: schedule_id.to_string() }
        })?;
        let mut updated = schedule.clone();
        updated.mark_fired(now);
        inner.commit(
            now.timestamp_millis() as u64,
            LedgerEvent::ScheduleFired {
                schedule_id: *schedule_id,
                at: now,
                next_fire_at: updated.next_fire_at,
            },
        )
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
