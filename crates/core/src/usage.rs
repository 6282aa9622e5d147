// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Usage ledger records, one per LLM call attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a usage record.
    pub struct UsageId("usg-");
}

/// One LLM call attempt, successful or not. Records are append-only and
/// never mutated; failed calls keep their record so spend is documented
/// even on partial failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: UsageId,
    /// What kind of operation drove the call (e.g. "prompt-pipeline").
    pub operation_type: String,
    /// Entity family the call was made for (e.g. "attestation").
    pub entity_type: String,
    /// Specific entity id (e.g. the source attestation's ASID).
    pub entity_id: String,
    pub model_name: String,
    pub model_provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_config_json: Option<String>,
    pub request_ts: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_ts: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_json: Option<String>,
}

impl UsageRecord {
    /// Milliseconds between request and response, when both are known.
    pub fn response_time_ms(&self) -> Option<i64> {
        self.response_ts.map(|r| (r - self.request_ts).num_milliseconds())
    }
}

crate::builder! {
    pub struct UsageRecordBuilder => UsageRecord {
        into {
            operation_type: String = "prompt-pipeline",
            entity_type: String = "attestation",
            entity_id: String = "as-0000000000",
            model_name: String = "openai/gpt-4o-mini",
            model_provider: String = "openrouter",
        }
        set {
            request_ts: DateTime<Utc> = DateTime::<Utc>::default(),
            success: bool = true,
        }
        option {
            model_config_json: String = None,
            response_ts: DateTime<Utc> = None,
            tokens_used: u64 = None,
            cost: f64 = None,
            error_message: String = None,
            metadata_json: String = None,
        }
        computed {
            id: UsageId = UsageId::new(),
        }
    }
}
