// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The prompt job handler.

use crate::error::PromptError;
use crate::frontmatter::{parse_doc, PromptDoc};
use crate::template::Template;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use qntx_ax::AxExecutor;
use qntx_core::{Asid, Attestation, Clock, ErrorKind, Job, UsageId, UsageRecord};
use qntx_dispatch::{Handler, HandlerError, JobContext, PromptPayload, HANDLER_PROMPT};
use qntx_llm::{ChatClient, ChatRequest, ChatResponse, Pricing, UsageTracker};
use qntx_store::{AttestationStore, StoreError};
use std::sync::Arc;

/// One preview tuple from a non-persisting run.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRow {
    pub source_id: Asid,
    pub rendered_prompt: String,
    pub response: String,
    pub tokens_used: u64,
    pub cost_usd: f64,
}

/// Executes prompt jobs per payload: query → expand → chat → attest.
pub struct PromptPipeline<C: Clock> {
    executor: AxExecutor,
    store: AttestationStore,
    client: ChatClient,
    pricing: Pricing,
    usage: Arc<UsageTracker>,
    clock: C,
}

impl<C: Clock> PromptPipeline<C> {
    pub fn new(
        executor: AxExecutor,
        store: AttestationStore,
        client: ChatClient,
        pricing: Pricing,
        usage: Arc<UsageTracker>,
        clock: C,
    ) -> Self {
        Self { executor, store, client, pricing, usage, clock }
    }

    fn decode(&self, job: &Job) -> Result<PromptPayload, HandlerError> {
        serde_json::from_value(job.payload.clone())
            .map_err(|e| HandlerError::new(ErrorKind::Invalid, format!("bad prompt payload: {e}")))
    }

    /// Actor stamped on result attestations: the explicit override, then
    /// `model@prompt_id` when a prompt id exists, then the bare model id.
    fn result_actor(payload: &PromptPayload, model: &str) -> String {
        if let Some(actor) = &payload.result_actor {
            return actor.clone();
        }
        match &payload.prompt_id {
            Some(prompt_id) => format!("{model}@{prompt_id}"),
            None => model.to_string(),
        }
    }

    fn chat_request(&self, payload: &PromptPayload, doc: &PromptDoc, rendered: String) -> ChatRequest {
        ChatRequest {
            system_prompt: payload.system_prompt.clone(),
            user_prompt: rendered,
            model: payload.model.clone().or_else(|| doc.meta.model.clone()),
            temperature: doc.meta.temperature,
            max_tokens: doc.meta.max_tokens,
        }
    }

    fn record_usage(
        &self,
        source: &Attestation,
        model: &str,
        request_ts: DateTime<Utc>,
        outcome: Result<&ChatResponse, &HandlerError>,
        cost: Option<f64>,
    ) {
        let record = UsageRecord {
            id: UsageId::new(),
            operation_type: "prompt-pipeline".to_string(),
            entity_type: "attestation".to_string(),
            entity_id: source.id.to_string(),
            model_name: model.to_string(),
            model_provider: self.client.config().provider.to_string(),
            model_config_json: None,
            request_ts,
            response_ts: Some(self.clock.utc()),
            tokens_used: outcome.ok().map(|r| r.usage.total_tokens),
            cost,
            success: outcome.is_ok(),
            error_message: outcome.err().map(|e| e.message.clone()),
            metadata_json: None,
        };
        if let Err(e) = self.usage.track(record) {
            tracing::warn!(error = %e, "usage tracking failed");
        }
    }

    /// Build the result attestation for one source. The deterministic id
    /// comes from the primary identity fields, so reprocessing the same
    /// source is a no-op insert.
    fn result_attestation(
        &self,
        source: &Attestation,
        payload: &PromptPayload,
        actor: &str,
        predicate: &str,
        response: &str,
    ) -> Result<Attestation, PromptError> {
        Attestation::draft(source.subject(), predicate, source.id.as_str(), actor)
            .subjects(source.subjects.clone())
            .source(HANDLER_PROMPT)
            .attribute("response", response)
            .attribute("source_id", source.id.as_str())
            .attribute("template", payload.template.as_str())
            .attribute("prompt_handler", HANDLER_PROMPT)
            .seal(&self.clock)
            .map_err(|e| PromptError::Payload { message: e.to_string() })
    }

    /// Run the pipeline for one payload. `persist` controls whether
    /// result attestations are written back. Returns the preview rows
    /// and the highest source timestamp processed.
    async fn run(
        &self,
        ctx: &JobContext,
        payload: &PromptPayload,
        persist: bool,
    ) -> Result<(Vec<PreviewRow>, Option<DateTime<Utc>>), HandlerError> {
        let doc = parse_doc(&payload.template)
            .map_err(|e| HandlerError::new(e.kind(), e.to_string()))?;
        let template = Template::parse(&doc.body)
            .map_err(|e| HandlerError::new(e.kind(), e.to_string()))?;

        let mut filter = payload.filter.clone();
        if let Some(cursor) = payload.temporal_cursor {
            filter.advance_since(cursor);
        }

        let result = self.executor.execute_ask_ascending(ctx.cancellation(), &filter)?;
        let total = result.attestations.len() as u64;
        ctx.update_progress(0, total);

        let predicate = payload
            .result_predicate
            .clone()
            .unwrap_or_else(|| crate::DEFAULT_RESULT_PREDICATE.to_string());

        let mut rows = Vec::with_capacity(result.attestations.len());
        let mut latest: Option<DateTime<Utc>> = None;
        for (index, source) in result.attestations.iter().enumerate() {
            ctx.check_canceled()?;

            let rendered = template.execute(source);
            let request = self.chat_request(payload, &doc, rendered.clone());
            let model = request
                .model
                .clone()
                .unwrap_or_else(|| self.client.default_model().to_string());

            ctx.check_canceled()?;
            let request_ts = self.clock.utc();
            let response = match self.client.chat(&request).await {
                Ok(response) => response,
                Err(e) => {
                    let error = HandlerError::new(e.kind(), e.to_string());
                    // The spend record survives the failure
                    self.record_usage(source, &model, request_ts, Err(&error), None);
                    return Err(error);
                }
            };

            let cost = self.pricing.cost(
                &model,
                response.usage.prompt_tokens,
                response.usage.completion_tokens,
            );
            self.record_usage(source, &model, request_ts, Ok(&response), Some(cost));
            ctx.add_cost(cost);

            if persist {
                let actor = Self::result_actor(payload, &model);
                let attestation = self
                    .result_attestation(source, payload, &actor, &predicate, &response.content)
                    .map_err(|e| HandlerError::new(e.kind(), e.to_string()))?;
                match self.store.create(attestation) {
                    Ok(_) => {}
                    // Reprocessing a source is a no-op, not a failure
                    Err(StoreError::Duplicate { id }) => {
                        tracing::debug!(attestation_id = %id, "result already attested");
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            rows.push(PreviewRow {
                source_id: source.id,
                rendered_prompt: rendered,
                response: response.content.clone(),
                tokens_used: response.usage.total_tokens,
                cost_usd: cost,
            });
            ctx.update_progress(index as u64 + 1, total);
            latest = Some(match latest {
                Some(current) if current >= source.timestamp => current,
                _ => source.timestamp,
            });
        }

        Ok((rows, latest))
    }

    /// One-shot execution: steps 1–4 without cursor advance, optionally
    /// persisting result attestations.
    pub async fn preview(
        &self,
        ctx: &JobContext,
        payload: &PromptPayload,
        persist: bool,
    ) -> Result<Vec<PreviewRow>, HandlerError> {
        let (rows, _) = self.run(ctx, payload, persist).await?;
        Ok(rows)
    }
}

#[async_trait]
impl<C: Clock + 'static> Handler for PromptPipeline<C> {
    async fn execute(&self, ctx: &JobContext, job: &Job) -> Result<(), HandlerError> {
        let payload = self.decode(job)?;
        let (rows, latest) = self.run(ctx, &payload, true).await?;
        ctx.set_result_source("attestations");
        if job.schedule_id.is_some() {
            if let Some(latest) = latest {
                ctx.set_cursor(latest);
            }
        }
        tracing::info!(
            job_id = %job.id,
            sources = rows.len(),
            "prompt pipeline completed"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
