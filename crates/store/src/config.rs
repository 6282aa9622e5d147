// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store tuning knobs.

/// Configuration for a [`crate::Ledger`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum number of distinct contexts any single actor value may
    /// appear in. Writes that would exceed it fail with `BoundedActor`.
    pub actor_context_bound: usize,
    /// Maximum number of queued jobs before `enqueue` returns `Busy`.
    pub max_queue_depth: usize,
    /// Checkpoint the WAL into a snapshot once it holds this many entries.
    pub snapshot_threshold: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            actor_context_bound: 64,
            max_queue_depth: 1024,
            snapshot_threshold: 10_000,
        }
    }
}

impl StoreConfig {
    qntx_core::setters! {
        set {
            actor_context_bound: usize,
            max_queue_depth: usize,
            snapshot_threshold: u64,
        }
    }
}
