// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ix <type>` ingestion resolution.

use crate::error::DispatchError;
use qntx_core::AxFilter;
use qntx_store::AttestationStore;

/// How an `ix <type>` command dispatches.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestDispatch {
    /// A stored handler attestation was found; its code runs through the
    /// script handler registered under `handler_name`.
    Stored { handler_name: String, code: String },
    /// No stored handler; a built-in handler takes the job.
    Builtin { handler_name: String },
}

/// Built-in fallbacks per script type.
fn builtin_handler(script_type: &str) -> Option<&'static str> {
    match script_type {
        "git" => Some(crate::HANDLER_IX_GIT),
        _ => None,
    }
}

/// Resolve an ingestion type: stored handler attestation first
/// (`predicate="handles"`, `context="<type>-ingestion"`), then the
/// built-in table. A miss on both is surfaced with the `script_type`
/// detail so UIs can offer to create the handler.
pub fn resolve_ingest(
    store: &AttestationStore,
    script_type: &str,
) -> Result<IngestDispatch, DispatchError> {
    let context = format!("{script_type}-ingestion");
    let filter = AxFilter::all()
        .predicates(vec![qntx_core::PREDICATE_HANDLES.to_string()])
        .contexts(vec![context.clone()]);

    // Newest handler definition wins
    if let Some(att) = store.query(&filter, Some(1), None).into_iter().next() {
        if let Some(code) = att.attribute("code").and_then(|v| v.as_str()) {
            return Ok(IngestDispatch::Stored {
                handler_name: context,
                code: code.to_string(),
            });
        }
        tracing::warn!(
            attestation_id = %att.id,
            script_type,
            "handler attestation missing code attribute"
        );
    }

    match builtin_handler(script_type) {
        Some(name) => Ok(IngestDispatch::Builtin { handler_name: name.to_string() }),
        None => Err(DispatchError::NoIngestHandler { script_type: script_type.to_string() }),
    }
}

/// Build the `(handler_name, payload)` pair for an `ix <type> <input…>`
/// command. Stored handlers get their code embedded in the payload so the
/// script handler can run it even when the job outlives the attestation
/// cache.
pub fn ingest_job(
    store: &AttestationStore,
    script_type: &str,
    input: &[qntx_ax::Token],
) -> Result<(String, serde_json::Value), DispatchError> {
    let input: Vec<String> = input.iter().map(|t| t.text.clone()).collect();
    match resolve_ingest(store, script_type)? {
        IngestDispatch::Stored { handler_name, code } => Ok((
            handler_name,
            serde_json::json!({
                "script_type": script_type,
                "code": code,
                "input": input,
            }),
        )),
        IngestDispatch::Builtin { handler_name } => Ok((
            handler_name,
            serde_json::json!({
                "script_type": script_type,
                "input": input,
            }),
        )),
    }
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
