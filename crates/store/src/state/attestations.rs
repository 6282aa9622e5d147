// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Attestation event handlers and indexing.

use super::MaterializedState;
use crate::event::LedgerEvent;
use qntx_core::{Attestation, RelationshipDef, TypeDef};

pub(crate) fn apply(state: &mut MaterializedState, event: &LedgerEvent) {
    if let LedgerEvent::AttestationCreated { attestation } = event {
        // Idempotency: first write wins; attestations are immutable
        if state.attestations.contains_key(&attestation.id) {
            return;
        }
        state.attestations.insert(attestation.id, attestation.clone());
        index(state, attestation);
    }
}

/// Maintain secondary indices for one attestation.
pub(crate) fn index(state: &mut MaterializedState, att: &Attestation) {
    state.by_time.insert((att.timestamp, att.id));

    for predicate in &att.predicates {
        for context in &att.contexts {
            state
                .by_predicate_context
                .entry((predicate.clone(), context.clone()))
                .or_default()
                .push(att.id);
        }
    }

    for actor in &att.actors {
        let contexts = state.actor_contexts.entry(actor.clone()).or_default();
        for context in &att.contexts {
            contexts.insert(context.clone());
        }
    }

    // Latest-wins typespace views
    if let Some(def) = TypeDef::from_attestation(att) {
        match state.type_defs.get(&def.name) {
            Some(existing) if existing.defined_at >= def.defined_at => {}
            _ => {
                state.type_defs.insert(def.name.clone(), def);
            }
        }
    }
    if let Some(def) = RelationshipDef::from_attestation(att) {
        match state.relationship_defs.get(&def.name) {
            Some(existing) if existing.defined_at >= def.defined_at => {}
            _ => {
                state.relationship_defs.insert(def.name.clone(), def);
            }
        }
    }
}
