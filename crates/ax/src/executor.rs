// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ax query execution against the attestation store.

use crate::alias::{AliasResolver, Dimension, NoAliases};
use crate::error::AxError;
use qntx_core::{Attestation, AxFilter};
use qntx_store::AttestationStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Execution statistics surfaced alongside results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryStats {
    /// Attestations matching the filter (before any limit).
    pub matched: usize,
    /// Attestations considered.
    pub scanned: usize,
    pub elapsed_ms: u64,
}

/// Ordered result set of an `ExecuteAsk`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub attestations: Vec<Attestation>,
    pub stats: QueryStats,
}

/// Executes [`AxFilter`]s, resolving aliases through a pluggable
/// [`AliasResolver`] first.
#[derive(Clone)]
pub struct AxExecutor {
    store: AttestationStore,
    aliases: Arc<dyn AliasResolver>,
}

impl AxExecutor {
    pub fn new(store: AttestationStore) -> Self {
        Self { store, aliases: Arc::new(NoAliases) }
    }

    pub fn with_aliases(mut self, aliases: Arc<dyn AliasResolver>) -> Self {
        self.aliases = aliases;
        self
    }

    /// The store this executor reads from.
    pub fn store(&self) -> &AttestationStore {
        &self.store
    }

    fn resolve_dimension(&self, values: &mut [String], dimension: Dimension) {
        for value in values {
            if let Some(resolved) = self.aliases.resolve(value, dimension) {
                *value = resolved;
            }
        }
    }

    /// Canonicalize filter tokens through the alias resolver.
    fn resolve_filter(&self, filter: &AxFilter) -> AxFilter {
        let mut resolved = filter.clone();
        self.resolve_dimension(&mut resolved.subjects, Dimension::Subject);
        self.resolve_dimension(&mut resolved.predicates, Dimension::Predicate);
        self.resolve_dimension(&mut resolved.contexts, Dimension::Context);
        self.resolve_dimension(&mut resolved.actors, Dimension::Actor);
        resolved
    }

    /// Execute a filter, returning matching attestations ordered
    /// timestamp-descending (id ascending on ties) plus stats.
    pub fn execute_ask(
        &self,
        ctx: &CancellationToken,
        filter: &AxFilter,
    ) -> Result<QueryResult, AxError> {
        if ctx.is_cancelled() {
            return Err(AxError::Canceled);
        }
        let started = Instant::now();
        let resolved = self.resolve_filter(filter);
        let scanned = self.store.len();
        let attestations = self.store.query(&resolved, None, None);
        if ctx.is_cancelled() {
            return Err(AxError::Canceled);
        }
        let stats = QueryStats {
            matched: attestations.len(),
            scanned,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        tracing::debug!(
            matched = stats.matched,
            scanned = stats.scanned,
            elapsed_ms = stats.elapsed_ms,
            "ax query executed"
        );
        Ok(QueryResult { attestations, stats })
    }

    /// Execute with results ordered timestamp-ascending, the order the
    /// prompt pipeline processes sources in.
    pub fn execute_ask_ascending(
        &self,
        ctx: &CancellationToken,
        filter: &AxFilter,
    ) -> Result<QueryResult, AxError> {
        let mut result = self.execute_ask(ctx, filter)?;
        result.attestations.sort_by(|a, b| {
            a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id))
        });
        Ok(result)
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
