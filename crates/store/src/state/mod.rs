// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay

mod attestations;
mod helpers;
mod jobs;
mod schedules;

use crate::event::LedgerEvent;
use chrono::{DateTime, Utc};
use qntx_core::{Asid, Attestation, Job, RelationshipDef, Schedule, TypeDef};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Materialized state built from ledger events.
///
/// Secondary indices are runtime-only: they are skipped during snapshot
/// serialization and rebuilt by [`MaterializedState::reindex`] on load.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MaterializedState {
    pub attestations: HashMap<Asid, Attestation>,
    pub jobs: HashMap<String, Job>,
    pub schedules: HashMap<String, Schedule>,

    /// (timestamp, id) ordered index over attestations.
    #[serde(skip)]
    pub by_time: BTreeSet<(DateTime<Utc>, Asid)>,
    /// (predicate, context) → attestation ids.
    #[serde(skip)]
    pub by_predicate_context: HashMap<(String, String), Vec<Asid>>,
    /// actor → distinct contexts it appears in (bounded-actor accounting).
    #[serde(skip)]
    pub actor_contexts: HashMap<String, BTreeSet<String>>,
    /// Latest-wins typespace views, keyed by type name.
    #[serde(skip)]
    pub type_defs: HashMap<String, TypeDef>,
    #[serde(skip)]
    pub relationship_defs: HashMap<String, RelationshipDef>,
}

impl MaterializedState {
    /// Apply an event to derive state changes.
    ///
    /// Handlers are idempotent: applying the same event twice produces the
    /// same state as applying it once (inserts are guarded by existence,
    /// increments by state transition).
    pub fn apply_event(&mut self, event: &LedgerEvent) {
        match event {
            LedgerEvent::AttestationCreated { .. } => attestations::apply(self, event),

            LedgerEvent::JobEnqueued { .. }
            | LedgerEvent::JobClaimed { .. }
            | LedgerEvent::JobProgress { .. }
            | LedgerEvent::JobAnnotated { .. }
            | LedgerEvent::JobCompleted { .. }
            | LedgerEvent::JobReaped { .. } => jobs::apply(self, event),

            LedgerEvent::ScheduleCreated { .. }
            | LedgerEvent::ScheduleUpdated { .. }
            | LedgerEvent::ScheduleDeleted { .. }
            | LedgerEvent::ScheduleFired { .. } => schedules::apply(self, event),
        }
    }

    /// Rebuild all secondary indices from the primary maps.
    /// Called after snapshot load (indices are not serialized).
    pub fn reindex(&mut self) {
        self.by_time.clear();
        self.by_predicate_context.clear();
        self.actor_contexts.clear();
        self.type_defs.clear();
        self.relationship_defs.clear();
        let ids: Vec<Asid> = self.attestations.keys().copied().collect();
        for id in ids {
            if let Some(att) = self.attestations.get(&id).cloned() {
                attestations::index(self, &att);
            }
        }
    }

    /// Get an attestation by id.
    pub fn get_attestation(&self, id: &Asid) -> Option<&Attestation> {
        self.attestations.get(id)
    }

    /// Get a job by ID or unique prefix (like git commit hashes).
    pub fn get_job(&self, id: &str) -> Option<&Job> {
        helpers::find_by_prefix(&self.jobs, id)
    }

    /// Get a schedule by ID or unique prefix.
    pub fn get_schedule(&self, id: &str) -> Option<&Schedule> {
        helpers::find_by_prefix(&self.schedules, id)
    }

    /// Number of jobs currently waiting in the queue.
    pub fn queued_depth(&self) -> usize {
        self.jobs.values().filter(|j| j.state == qntx_core::JobState::Queued).count()
    }

    /// Distinct contexts already recorded for `actor`.
    pub fn contexts_for_actor(&self, actor: &str) -> usize {
        self.actor_contexts.get(actor).map(BTreeSet::len).unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "../state_tests/mod.rs"]
mod tests;
