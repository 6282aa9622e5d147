// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qntx-store: durable attestation and job ledger.
//!
//! All writes append a [`LedgerEvent`] to a JSONL write-ahead log and apply
//! it to an in-memory [`MaterializedState`]. Startup loads the newest
//! snapshot (if any) and replays the WAL tail, so a crash mid-execution
//! loses nothing: a job left `running` with a stale lease is reaped back to
//! `queued` on the next startup.

mod attest;
mod config;
mod error;
mod event;
mod jobs;
mod ledger;
mod snapshot;
mod state;
mod wal;

pub use attest::AttestationStore;
pub use config::StoreConfig;
pub use error::StoreError;
pub use event::LedgerEvent;
pub use jobs::{CancelDisposition, JobStore};
pub use ledger::Ledger;
pub use snapshot::{Snapshot, CURRENT_SNAPSHOT_VERSION};
pub use state::MaterializedState;
pub use wal::{Wal, WalEntry};
