// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RFC 4180 CSV export of attestations.

use crate::action::CsvPayload;
use crate::error::HandlerError;
use crate::handler::{Handler, JobContext};
use async_trait::async_trait;
use qntx_ax::AxExecutor;
use qntx_core::{Attestation, ErrorKind, Job};
use std::path::PathBuf;

/// Headers used when the payload does not override them.
pub const DEFAULT_CSV_HEADERS: &[&str] =
    &["id", "subjects", "predicates", "contexts", "actors", "timestamp", "source"];

const ARRAY_JOIN: char = ';';

fn format_timestamp(ts: chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// One cell value for a header. Recognized names read record fields
/// (singular forms take the primary element); anything else reads the
/// attribute map, stringified, empty on miss.
fn field_value(att: &Attestation, header: &str) -> String {
    match header {
        "id" => att.id.to_string(),
        "subjects" => att.subjects.join(&ARRAY_JOIN.to_string()),
        "subject" => att.subject().to_string(),
        "predicates" => att.predicates.join(&ARRAY_JOIN.to_string()),
        "predicate" => att.predicate().to_string(),
        "contexts" => att.contexts.join(&ARRAY_JOIN.to_string()),
        "context" => att.context().to_string(),
        "actors" => att.actors.join(&ARRAY_JOIN.to_string()),
        "actor" => att.actor().to_string(),
        "timestamp" => format_timestamp(att.timestamp),
        "source" => att.source.clone(),
        other => match att.attribute(other) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(value) => value.to_string(),
            None => String::new(),
        },
    }
}

/// Quote a cell per RFC 4180: embedded quotes doubled, the cell wrapped
/// when it contains the delimiter, a quote, or a line break.
fn quote_cell(value: &str, delimiter: char) -> String {
    if value.contains(delimiter) || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render attestations as CSV text per the payload's delimiter/headers.
pub fn export_csv(attestations: &[Attestation], payload: &CsvPayload) -> String {
    let headers: Vec<String> = match &payload.headers {
        Some(custom) => custom.clone(),
        None => DEFAULT_CSV_HEADERS.iter().map(|h| h.to_string()).collect(),
    };
    let delimiter = payload.delimiter;

    let mut out = String::new();
    let header_row: Vec<String> =
        headers.iter().map(|h| quote_cell(h, delimiter)).collect();
    out.push_str(&header_row.join(&delimiter.to_string()));
    out.push('\n');

    for att in attestations {
        let row: Vec<String> = headers
            .iter()
            .map(|h| quote_cell(&field_value(att, h), delimiter))
            .collect();
        out.push_str(&row.join(&delimiter.to_string()));
        out.push('\n');
    }
    out
}

/// Handler executing `so csv` jobs: run the embedded query, render, and
/// write the file under the export directory.
pub struct CsvHandler {
    executor: AxExecutor,
    export_dir: PathBuf,
}

impl CsvHandler {
    pub fn new(executor: AxExecutor, export_dir: impl Into<PathBuf>) -> Self {
        Self { executor, export_dir: export_dir.into() }
    }
}

#[async_trait]
impl Handler for CsvHandler {
    async fn execute(&self, ctx: &JobContext, job: &Job) -> Result<(), HandlerError> {
        let payload: CsvPayload = serde_json::from_value(job.payload.clone())
            .map_err(|e| HandlerError::new(ErrorKind::Invalid, format!("bad csv payload: {e}")))?;

        // Bare filenames only; the export directory is fixed
        let filename = PathBuf::from(&payload.filename);
        let filename = filename
            .file_name()
            .ok_or_else(|| {
                HandlerError::new(ErrorKind::Invalid, "csv filename has no file component")
                    .with_detail("filename", &payload.filename)
            })?
            .to_owned();

        ctx.check_canceled()?;
        let result = self.executor.execute_ask(ctx.cancellation(), &payload.filter)?;
        let total = result.attestations.len() as u64;
        ctx.update_progress(0, total);

        let contents = export_csv(&result.attestations, &payload);
        ctx.check_canceled()?;

        std::fs::create_dir_all(&self.export_dir)
            .map_err(|e| HandlerError::new(ErrorKind::Backend, e.to_string()))?;
        let path = self.export_dir.join(&filename);
        std::fs::write(&path, contents)
            .map_err(|e| HandlerError::new(ErrorKind::Backend, e.to_string()))?;

        ctx.update_progress(total, total);
        ctx.set_result_source(&filename.to_string_lossy());
        tracing::info!(
            job_id = %job.id,
            path = %path.display(),
            rows = total,
            "csv export written"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "csv_tests.rs"]
mod tests;
