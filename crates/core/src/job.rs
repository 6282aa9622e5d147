// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier and state machine.

use crate::clock::Clock;
use crate::schedule::ScheduleId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a job instance.
    pub struct JobId("job-");
}

crate::define_id! {
    /// Identifier for one worker slot in the pool.
    pub struct WorkerId("wkr-");
}

/// Default retry budget for a new job.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Waiting to be claimed by a worker
    Queued,
    /// Claimed and executing under a lease
    Running,
    /// Finished successfully
    Done,
    /// Exhausted retries or hit a terminal error
    Failed,
    /// Canceled before or during execution
    Canceled,
}

impl JobState {
    /// Check if this state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed | JobState::Canceled)
    }

    /// Valid transitions: queued → running → (done | failed | canceled),
    /// plus running → queued on retry and queued → canceled.
    pub fn can_transition(&self, to: JobState) -> bool {
        match (self, to) {
            (JobState::Queued, JobState::Running) => true,
            (JobState::Queued, JobState::Canceled) => true,
            (JobState::Running, JobState::Done) => true,
            (JobState::Running, JobState::Failed) => true,
            (JobState::Running, JobState::Canceled) => true,
            // Retry path
            (JobState::Running, JobState::Queued) => true,
            _ => false,
        }
    }
}

crate::simple_display! {
    JobState {
        Queued => "queued",
        Running => "running",
        Done => "done",
        Failed => "failed",
        Canceled => "canceled",
    }
}

/// Worker-reported outcome of one execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOutcome {
    Success,
    Retry,
    Failed,
    Canceled,
}

crate::simple_display! {
    JobOutcome {
        Success => "success",
        Retry => "retry",
        Failed => "failed",
        Canceled => "canceled",
    }
}

/// Current/total progress pair reported by handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
}

impl Progress {
    pub fn new(current: u64, total: u64) -> Self {
        Self { current, total }
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.current, self.total)
    }
}

/// A unit of scheduled work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// Registry name of the handler that executes this job.
    pub handler_name: String,
    /// Opaque document decoded by the handler.
    pub payload: serde_json::Value,
    pub state: JobState,
    #[serde(default)]
    pub progress: Progress,
    #[serde(default)]
    pub attempts: u32,
    pub max_attempts: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Set when a schedule tick created this job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<ScheduleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Free-form tag describing where the job's output went.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_source: Option<String>,
    /// Accumulated LLM spend for this job.
    #[serde(default)]
    pub cost_usd: f64,
    /// Claim lease deadline; expired leases are reaped back to queued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_until_ms: Option<u64>,
    /// Earliest claim time after a retry backoff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_until_ms: Option<u64>,
}

impl Job {
    /// Create a queued job. Assigns a fresh id when `id` is empty.
    pub fn new(
        id: JobId,
        handler_name: impl Into<String>,
        payload: serde_json::Value,
        clock: &impl Clock,
    ) -> Self {
        let id = if id.is_empty() { JobId::new() } else { id };
        Self {
            id,
            handler_name: handler_name.into(),
            payload,
            state: JobState::Queued,
            progress: Progress::default(),
            attempts: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            created_at: clock.utc(),
            started_at: None,
            ended_at: None,
            schedule_id: None,
            error: None,
            result_source: None,
            cost_usd: 0.0,
            lease_until_ms: None,
            backoff_until_ms: None,
        }
    }

    /// True while the job still occupies queue or worker capacity.
    pub fn is_active(&self) -> bool {
        !self.state.is_terminal()
    }

    /// True when the job may be claimed at `now_ms` (queued, past backoff).
    pub fn is_claimable(&self, now_ms: u64) -> bool {
        self.state == JobState::Queued
            && self.backoff_until_ms.map(|until| now_ms >= until).unwrap_or(true)
    }

    /// True when a running job's lease has lapsed at `now_ms`.
    pub fn lease_expired(&self, now_ms: u64) -> bool {
        self.state == JobState::Running
            && self.lease_until_ms.map(|until| now_ms > until).unwrap_or(false)
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            handler_name: String = "noop",
        }
        set {
            payload: serde_json::Value = serde_json::Value::Null,
            state: JobState = JobState::Queued,
            progress: Progress = Progress::default(),
            attempts: u32 = 0,
            max_attempts: u32 = DEFAULT_MAX_ATTEMPTS,
            cost_usd: f64 = 0.0,
            created_at: DateTime<Utc> = DateTime::<Utc>::default(),
        }
        option {
            started_at: DateTime<Utc> = None,
            ended_at: DateTime<Utc> = None,
            schedule_id: ScheduleId = None,
            error: String = None,
            result_source: String = None,
            lease_until_ms: u64 = None,
            backoff_until_ms: u64 = None,
        }
        computed {
            id: JobId = JobId::new(),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
