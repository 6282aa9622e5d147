// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared ledger: one WAL, one materialized state, one lock.

use crate::attest::AttestationStore;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::event::LedgerEvent;
use crate::jobs::JobStore;
use crate::snapshot::Snapshot;
use crate::state::MaterializedState;
use crate::wal::Wal;
use parking_lot::{Mutex, MutexGuard};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const WAL_FILE: &str = "ledger.wal";
const SNAPSHOT_FILE: &str = "ledger.snapshot";

pub(crate) struct LedgerInner {
    pub(crate) wal: Wal,
    pub(crate) state: MaterializedState,
    pub(crate) config: StoreConfig,
    snapshot_path: PathBuf,
}

impl LedgerInner {
    /// Append an event and apply it to state. The single write path: all
    /// facades call this under the ledger lock, which is what makes
    /// check-then-write sequences (duplicate detection, bounded actor,
    /// claim_next) linearizable.
    pub(crate) fn commit(&mut self, at_ms: u64, event: LedgerEvent) -> Result<(), StoreError> {
        self.wal.append(at_ms, event.clone())?;
        self.state.apply_event(&event);
        self.maybe_checkpoint()?;
        Ok(())
    }

    fn maybe_checkpoint(&mut self) -> Result<(), StoreError> {
        if self.wal.entries_since_open() < self.config.snapshot_threshold {
            return Ok(());
        }
        let snapshot = Snapshot::new(self.wal.last_seq(), self.state.clone());
        snapshot.write(&self.snapshot_path)?;
        self.wal.truncate()?;
        tracing::info!(
            wal_seq = snapshot.wal_seq,
            attestations = self.state.attestations.len(),
            jobs = self.state.jobs.len(),
            "checkpointed ledger snapshot"
        );
        Ok(())
    }
}

/// Handle to the durable ledger. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct Ledger {
    inner: Arc<Mutex<LedgerInner>>,
}

impl Ledger {
    /// Open the ledger in `dir`, loading the snapshot (if any) and
    /// replaying the WAL tail.
    pub fn open(dir: impl AsRef<Path>, config: StoreConfig) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(StoreError::backend)?;
        let snapshot_path = dir.join(SNAPSHOT_FILE);
        let wal_path = dir.join(WAL_FILE);

        let (mut state, snapshot_seq) = match Snapshot::load(&snapshot_path)? {
            Some(snapshot) => (snapshot.state, snapshot.wal_seq),
            None => (MaterializedState::default(), 0),
        };
        state.reindex();

        let entries = Wal::replay(&wal_path, snapshot_seq)?;
        let last_seq = entries.last().map(|e| e.seq).unwrap_or(snapshot_seq);
        let replayed = entries.len();
        for entry in entries {
            state.apply_event(&entry.event);
        }
        if replayed > 0 {
            tracing::info!(replayed, last_seq, "replayed WAL tail");
        }

        let wal = Wal::open(wal_path, last_seq)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(LedgerInner {
                wal,
                state,
                config,
                snapshot_path,
            })),
        })
    }

    /// Attestation-facing facade.
    pub fn attestations(&self) -> AttestationStore {
        AttestationStore::new(self.clone())
    }

    /// Job- and schedule-facing facade.
    pub fn jobs(&self) -> JobStore {
        JobStore::new(self.clone())
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, LedgerInner> {
        self.inner.lock()
    }

    /// Run a read-only closure against the materialized state.
    pub fn with_state<T>(&self, f: impl FnOnce(&MaterializedState) -> T) -> T {
        f(&self.inner.lock().state)
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
