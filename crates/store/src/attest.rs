// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Attestation store facade.

use crate::error::StoreError;
use crate::event::LedgerEvent;
use crate::ledger::Ledger;
use chrono::{DateTime, Utc};
use qntx_core::{Asid, Attestation, AxFilter, RelationshipDef, TypeDef};

/// Durable, append-only attestation store.
///
/// Ordering contract: queries return timestamp-descending results with an
/// ascending-id tie break; streams return timestamp-ascending results.
#[derive(Clone)]
pub struct AttestationStore {
    ledger: Ledger,
}

/// Content comparison for idempotent re-inserts. Wall-clock fields
/// (`timestamp`, `created_at`) are excluded: re-creating the same logical
/// record later must count as the same write, not a conflicting one.
fn content_eq(a: &Attestation, b: &Attestation) -> bool {
    a.subjects == b.subjects
        && a.predicates == b.predicates
        && a.contexts == b.contexts
        && a.actors == b.actors
        && a.source == b.source
        && a.attributes == b.attributes
}

impl AttestationStore {
    pub(crate) fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    /// Insert an attestation.
    ///
    /// - same id, same content → idempotent success
    /// - same id, different content → `Duplicate`
    /// - actor exceeding its distinct-context bound → `BoundedActor`
    pub fn create(&self, attestation: Attestation) -> Result<Asid, StoreError> {
        let mut inner = self.ledger.lock();

        if let Some(existing) = inner.state.attestations.get(&attestation.id) {
            if content_eq(existing, &attestation) {
                return Ok(attestation.id);
            }
            return Err(StoreError::Duplicate { id: attestation.id.to_string() });
        }

        let bound = inner.config.actor_context_bound;
        for actor in &attestation.actors {
            let mut distinct: std::collections::BTreeSet<&str> = inner
                .state
                .actor_contexts
                .get(actor)
                .map(|set| set.iter().map(String::as_str).collect())
                .unwrap_or_default();
            for context in &attestation.contexts {
                distinct.insert(context);
            }
            if distinct.len() > bound {
                tracing::warn!(
                    actor = %actor,
                    contexts = attestation.contexts.join(","),
                    bound,
                    "rejecting write: bounded-actor violation"
                );
                return Err(StoreError::BoundedActor {
                    actor: actor.clone(),
                    contexts: attestation.contexts.clone(),
                    bound,
                });
            }
        }

        let at_ms = attestation.created_at.timestamp_millis() as u64;
        let id = attestation.id;
        inner.commit(at_ms, LedgerEvent::AttestationCreated { attestation })?;
        Ok(id)
    }

    /// Filter query with stable ordering (timestamp desc, id asc) and an
    /// optional result cap. `since` is a strict lower bound applied on top
    /// of the filter's own bounds.
    ///
    /// Single predicate+context filters (the typespace and stored-handler
    /// lookups) go through the `(predicate, context)` index instead of a
    /// time scan.
    pub fn query(
        &self,
        filter: &AxFilter,
        limit: Option<usize>,
        since: Option<DateTime<Utc>>,
    ) -> Vec<Attestation> {
        self.ledger.with_state(|state| {
            let candidates: Vec<&Attestation> =
                match (filter.predicates.as_slice(), filter.contexts.as_slice()) {
                    ([predicate], [context]) => state
                        .by_predicate_context
                        .get(&(predicate.clone(), context.clone()))
                        .map(|ids| {
                            ids.iter().filter_map(|id| state.attestations.get(id)).collect()
                        })
                        .unwrap_or_default(),
                    _ => state
                        .by_time
                        .iter()
                        .filter_map(|(_, id)| state.attestations.get(id))
                        .collect(),
                };

            let mut results: Vec<Attestation> = candidates
                .into_iter()
                .filter(|att| since.map(|s| att.timestamp > s).unwrap_or(true))
                .filter(|att| att.matches(filter))
                .cloned()
                .collect();
            results.sort_by(|a, b| {
                b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id))
            });
            let cap = limit.or(filter.limit);
            if let Some(cap) = cap {
                results.truncate(cap);
            }
            results
        })
    }

    /// Fetch one attestation by id.
    pub fn query_by_id(&self, id: &Asid) -> Result<Attestation, StoreError> {
        self.ledger
            .with_state(|state| state.get_attestation(id).cloned())
            .ok_or_else(|| StoreError::NotFound { entity: "attestation", id: id.to_string() })
    }

    /// Attestations with timestamp strictly greater than `watermark`,
    /// ordered ascending. Restartable from any later watermark.
    pub fn stream(&self, watermark: Option<DateTime<Utc>>) -> Vec<Attestation> {
        self.ledger.with_state(|state| {
            state
                .by_time
                .iter()
                .filter(|(ts, _)| watermark.map(|w| *ts > w).unwrap_or(true))
                .filter_map(|(_, id)| state.attestations.get(id))
                .cloned()
                .collect()
        })
    }

    /// Latest `type`/`graph` definition for a type name.
    pub fn resolve_type(&self, name: &str) -> Option<TypeDef> {
        self.ledger.with_state(|state| state.type_defs.get(name).cloned())
    }

    /// Latest `relationship_type`/`graph` definition for a name.
    pub fn resolve_relationship_type(&self, name: &str) -> Option<RelationshipDef> {
        self.ledger.with_state(|state| state.relationship_defs.get(name).cloned())
    }

    /// Snapshot of the full cached typespace.
    pub fn type_defs(&self) -> std::collections::HashMap<String, TypeDef> {
        self.ledger.with_state(|state| state.type_defs.clone())
    }

    /// Snapshot of the full cached relationship typespace.
    pub fn relationship_defs(&self) -> std::collections::HashMap<String, RelationshipDef> {
        self.ledger.with_state(|state| state.relationship_defs.clone())
    }

    /// Total number of stored attestations.
    pub fn len(&self) -> usize {
        self.ledger.with_state(|state| state.attestations.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "attest_tests.rs"]
mod tests;
