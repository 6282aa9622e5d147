// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger events. Facts about what happened; state is derived from them.

use chrono::{DateTime, Utc};
use qntx_core::{Attestation, Job, JobId, JobOutcome, Progress, Schedule, ScheduleId, WorkerId};
use serde::{Deserialize, Serialize};

/// One durable fact in the write-ahead log.
///
/// Event application MUST be idempotent: replay applies the same event to
/// state that may already reflect it (the write path applies before the
/// process restarts and replays).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    AttestationCreated {
        attestation: Attestation,
    },
    JobEnqueued {
        job: Job,
    },
    JobClaimed {
        job_id: JobId,
        worker_id: WorkerId,
        lease_until_ms: u64,
        started_at: DateTime<Utc>,
    },
    JobProgress {
        job_id: JobId,
        progress: Progress,
        lease_until_ms: u64,
    },
    JobAnnotated {
        job_id: JobId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result_source: Option<String>,
        #[serde(default)]
        cost_delta_usd: f64,
    },
    JobCompleted {
        job_id: JobId,
        outcome: JobOutcome,
        at: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        backoff_until_ms: Option<u64>,
        /// Cursor written back to the owning schedule in the same event so
        /// completion and watermark advance are atomic.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cursor: Option<DateTime<Utc>>,
    },
    JobReaped {
        job_id: JobId,
        at_ms: u64,
    },
    ScheduleCreated {
        schedule: Schedule,
    },
    ScheduleUpdated {
        schedule: Schedule,
    },
    ScheduleDeleted {
        schedule_id: ScheduleId,
    },
    ScheduleFired {
        schedule_id: ScheduleId,
        at: DateTime<Utc>,
        next_fire_at: DateTime<Utc>,
    },
}
