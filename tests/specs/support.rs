// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for the workspace specs.

use async_trait::async_trait;
use qntx_core::{Clock, FakeClock};
use qntx_llm::{HttpDoer, HttpResponse, LlmError};
use qntx_store::{Ledger, StoreConfig};
use std::sync::Arc;

/// A clock pinned to 2024-06-15T10:50:00Z.
pub fn clock() -> FakeClock {
    let clock = FakeClock::new();
    clock.set_epoch_ms(1_718_448_600_000);
    clock
}

pub fn open_ledger(config: StoreConfig) -> (tempfile::TempDir, Ledger) {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Ledger::open(dir.path(), config).unwrap();
    (dir, ledger)
}

/// Chat transport answering every request with a fixed-usage completion.
pub struct CannedChat;

impl CannedChat {
    pub fn arc() -> Arc<Self> {
        Arc::new(Self)
    }
}

#[async_trait]
impl HttpDoer for CannedChat {
    async fn post_json(
        &self,
        _url: &str,
        _headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, LlmError> {
        let prompt = body["messages"]
            .as_array()
            .and_then(|m| m.last())
            .and_then(|m| m["content"].as_str())
            .unwrap_or_default();
        let response = serde_json::json!({
            "model": body["model"],
            "choices": [{"message": {"role": "assistant", "content": format!("answer: {prompt}")}}],
            "usage": {"prompt_tokens": 1000, "completion_tokens": 500, "total_tokens": 1500}
        });
        Ok(HttpResponse { status: 200, body: response.to_string() })
    }
}

/// Seed one single-claim attestation at the clock's current time.
pub fn seed(
    store: &qntx_store::AttestationStore,
    clock: &impl Clock,
    subject: &str,
    predicate: &str,
    context: &str,
    actor: &str,
) -> qntx_core::Attestation {
    let att = qntx_core::Attestation::draft(subject, predicate, context, actor)
        .source("spec")
        .seal(clock)
        .unwrap();
    store.create(att.clone()).unwrap();
    att
}
