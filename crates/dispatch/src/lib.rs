// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qntx-dispatch: handler registry and action dispatch.
//!
//! Translates `so <verb> …` action tails into typed job payloads, resolves
//! `ix <type>` ingestion commands through stored or built-in handlers, and
//! routes jobs to [`Handler`] implementations at execution time.

mod action;
mod csv;
mod error;
mod handler;
mod ingest;
mod registry;
mod script;

pub use action::{parse_action, Action, CsvPayload, PromptPayload};
pub use csv::{export_csv, CsvHandler, DEFAULT_CSV_HEADERS};
pub use error::{DispatchError, HandlerError};
pub use handler::{Handler, JobContext, JobSink, NullSink};
pub use ingest::{ingest_job, resolve_ingest, IngestDispatch};
pub use registry::HandlerRegistry;
pub use script::{ScriptExecutor, ScriptHandler};

/// Registry name of the prompt pipeline handler.
pub const HANDLER_PROMPT: &str = "prompt";
/// Registry name of the CSV export handler.
pub const HANDLER_CSV: &str = "csv";
/// Built-in git ingestion handler name.
pub const HANDLER_IX_GIT: &str = "ixgest.git";
