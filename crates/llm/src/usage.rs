// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only usage ledger with aggregate views.

use crate::error::LlmError;
use chrono::{DateTime, Days, NaiveDate, Utc};
use parking_lot::Mutex;
use qntx_core::UsageRecord;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Aggregate call statistics since a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub total: u64,
    pub successful: u64,
    /// `successful / total`, 0 when there were no calls.
    pub success_rate: f64,
    pub total_tokens: u64,
    pub total_cost: f64,
    pub unique_models: u64,
}

/// Per-model aggregate row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelBreakdown {
    pub model_name: String,
    pub model_provider: String,
    pub request_count: u64,
    pub total_tokens: u64,
    pub total_cost: f64,
    /// Mean response time over successful calls; `None` when no
    /// successful call carried a response timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_response_time_ms: Option<f64>,
}

/// One calendar day of usage, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayUsage {
    pub date: NaiveDate,
    pub requests: u64,
    pub cost: f64,
}

/// Append-only ledger of [`UsageRecord`]s.
///
/// Concurrent `track` calls all succeed; readers aggregate over a
/// snapshot of the in-memory records. When a ledger path is set, each
/// record is also appended to a JSONL file.
pub struct UsageTracker {
    records: Mutex<Vec<UsageRecord>>,
    path: Option<PathBuf>,
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl UsageTracker {
    /// Tracker without durable backing (tests, previews).
    pub fn in_memory() -> Self {
        Self { records: Mutex::new(Vec::new()), path: None }
    }

    /// Tracker appending to a JSONL ledger file, preloading any existing
    /// records.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LlmError> {
        let path = path.into();
        let mut records = Vec::new();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                for line in contents.lines().filter(|l| !l.trim().is_empty()) {
                    let record: UsageRecord = serde_json::from_str(line).map_err(|e| {
                        LlmError::Invalid { message: format!("corrupt usage ledger: {e}") }
                    })?;
                    records.push(record);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(LlmError::Network { message: e.to_string() }),
        }
        Ok(Self { records: Mutex::new(records), path: Some(path) })
    }

    /// Append one record.
    pub fn track(&self, record: UsageRecord) -> Result<(), LlmError> {
        if let Some(path) = &self.path {
            let mut line = serde_json::to_string(&record)
                .map_err(|e| LlmError::Invalid { message: e.to_string() })?;
            line.push('\n');
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| LlmError::Network { message: e.to_string() })?;
            file.write_all(line.as_bytes())
                .map_err(|e| LlmError::Network { message: e.to_string() })?;
        }
        self.records.lock().push(record);
        Ok(())
    }

    /// Number of records tracked.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot_since(&self, since: Option<DateTime<Utc>>) -> Vec<UsageRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| since.map(|s| r.request_ts >= s).unwrap_or(true))
            .cloned()
            .collect()
    }

    /// Aggregate statistics for records at or after `since`.
    pub fn stats(&self, since: Option<DateTime<Utc>>) -> UsageStats {
        let records = self.snapshot_since(since);
        let total = records.len() as u64;
        let successful = records.iter().filter(|r| r.success).count() as u64;
        let total_tokens: u64 = records.iter().filter_map(|r| r.tokens_used).sum();
        let total_cost: f64 = records.iter().filter_map(|r| r.cost).sum();
        let unique_models: HashSet<&str> =
            records.iter().map(|r| r.model_name.as_str()).collect();
        UsageStats {
            total,
            successful,
            success_rate: if total > 0 { successful as f64 / total as f64 } else { 0.0 },
            total_tokens,
            total_cost,
            unique_models: unique_models.len() as u64,
        }
    }

    /// Per-model rows sorted by total cost descending. Only successful
    /// calls contribute to response-time averages.
    pub fn breakdown(&self, since: Option<DateTime<Utc>>) -> Vec<ModelBreakdown> {
        let records = self.snapshot_since(since);
        let mut rows: HashMap<(String, String), (ModelBreakdown, Vec<i64>)> = HashMap::new();
        for record in &records {
            let key = (record.model_name.clone(), record.model_provider.clone());
            let (row, latencies) = rows.entry(key.clone()).or_insert_with(|| {
                (
                    ModelBreakdown {
                        model_name: key.0,
                        model_provider: key.1,
                        ..ModelBreakdown::default()
                    },
                    Vec::new(),
                )
            });
            row.request_count += 1;
            row.total_tokens += record.tokens_used.unwrap_or(0);
            row.total_cost += record.cost.unwrap_or(0.0);
            if record.success {
                if let Some(ms) = record.response_time_ms() {
                    latencies.push(ms);
                }
            }
        }

        let mut result: Vec<ModelBreakdown> = rows
            .into_values()
            .map(|(mut row, latencies)| {
                if !latencies.is_empty() {
                    row.avg_response_time_ms =
                        Some(latencies.iter().sum::<i64>() as f64 / latencies.len() as f64);
                }
                row
            })
            .collect();
        result.sort_by(|a, b| {
            b.total_cost
                .partial_cmp(&a.total_cost)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.model_name.cmp(&b.model_name))
        });
        result
    }

    /// Requests and cost per UTC calendar day for the trailing `days`
    /// window ending at `now`, zero-filled and ordered oldest first.
    pub fn time_series(&self, days: u32, now: DateTime<Utc>) -> Vec<DayUsage> {
        let mut per_day: HashMap<NaiveDate, (u64, f64)> = HashMap::new();
        for record in self.records.lock().iter() {
            let date = record.request_ts.date_naive();
            let entry = per_day.entry(date).or_default();
            entry.0 += 1;
            entry.1 += record.cost.unwrap_or(0.0);
        }

        let today = now.date_naive();
        (0..days)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back as u64)))
            .map(|date| {
                let (requests, cost) = per_day.get(&date).copied().unwrap_or_default();
                DayUsage { date, requests, cost }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "usage_tests.rs"]
mod tests;
