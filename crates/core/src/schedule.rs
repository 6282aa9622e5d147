// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurring schedule records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a recurring schedule.
    pub struct ScheduleId("sch-");
}

/// A recurring source of jobs.
///
/// The ticker enqueues one job per due interval and advances
/// `next_fire_at`; catch-up is bounded to one fire per tick so a schedule
/// that slept through many intervals does not burst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub handler_name: String,
    /// Template the ticker instantiates into each fired job's payload.
    pub payload_template: serde_json::Value,
    pub interval_ms: u64,
    pub next_fire_at: DateTime<Utc>,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_fire_at: Option<DateTime<Utc>>,
    /// Per-schedule watermark; prompt jobs advance it to their latest
    /// processed timestamp so reruns are incremental.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<DateTime<Utc>>,
}

impl Schedule {
    pub fn new(
        id: ScheduleId,
        handler_name: impl Into<String>,
        payload_template: serde_json::Value,
        interval_ms: u64,
        first_fire_at: DateTime<Utc>,
    ) -> Self {
        let id = if id.is_empty() { ScheduleId::new() } else { id };
        Self {
            id,
            handler_name: handler_name.into(),
            payload_template,
            interval_ms,
            next_fire_at: first_fire_at,
            enabled: true,
            last_fire_at: None,
            cursor: None,
        }
    }

    /// True when the ticker should fire this schedule at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.enabled && now >= self.next_fire_at
    }

    /// Record a fire at `now` and advance the next fire time by one
    /// interval. When the schedule is far behind, the next fire time is
    /// re-anchored to `now + interval` so each tick fires at most once.
    pub fn mark_fired(&mut self, now: DateTime<Utc>) {
        self.last_fire_at = Some(now);
        let interval = Duration::milliseconds(self.interval_ms as i64);
        let advanced = self.next_fire_at + interval;
        self.next_fire_at = if advanced <= now { now + interval } else { advanced };
    }

    /// Instantiate the payload template for one fire, substituting the
    /// current cursor into the `temporal_cursor` field of object templates.
    pub fn instantiate_payload(&self) -> serde_json::Value {
        let mut payload = self.payload_template.clone();
        if let (Some(cursor), Some(object)) = (self.cursor, payload.as_object_mut()) {
            object.insert(
                "temporal_cursor".to_string(),
                serde_json::Value::String(cursor.to_rfc3339()),
            );
        }
        payload
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
