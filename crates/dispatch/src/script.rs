// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handlers whose code is stored as an attestation.

use crate::error::HandlerError;
use crate::handler::{Handler, JobContext};
use async_trait::async_trait;
use qntx_core::{Asid, Job};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// External execution environment for stored handler code.
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    /// Run `code` against `payload`, returning the script's outcome.
    async fn execute(
        &self,
        ctx: &CancellationToken,
        code: &str,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, HandlerError>;
}

/// A registry entry backed by a stored attestation: the ASID is its own
/// actor (self-certifying), and execution delegates to the injected
/// [`ScriptExecutor`].
pub struct ScriptHandler {
    code: String,
    source: Asid,
    executor: Arc<dyn ScriptExecutor>,
}

impl ScriptHandler {
    pub fn new(code: String, source: Asid, executor: Arc<dyn ScriptExecutor>) -> Self {
        Self { code, source, executor }
    }

    pub fn source(&self) -> &Asid {
        &self.source
    }
}

#[async_trait]
impl Handler for ScriptHandler {
    async fn execute(&self, ctx: &JobContext, job: &Job) -> Result<(), HandlerError> {
        ctx.check_canceled()?;
        tracing::debug!(
            job_id = %job.id,
            source = %self.source,
            "executing stored handler"
        );
        let outcome = self
            .executor
            .execute(ctx.cancellation(), &self.code, &job.payload)
            .await?;
        if let Some(source) = outcome.get("result_source").and_then(|v| v.as_str()) {
            ctx.set_result_source(source);
        }
        Ok(())
    }
}
