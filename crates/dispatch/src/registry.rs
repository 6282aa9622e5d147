// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handler registry: name → handler, static and dynamic.

use crate::error::DispatchError;
use crate::handler::Handler;
use crate::script::{ScriptExecutor, ScriptHandler};
use parking_lot::RwLock;
use qntx_core::Attestation;
use std::collections::HashMap;
use std::sync::Arc;

/// Suffix marking stored-handler contexts (`<type>-ingestion`).
const INGESTION_SUFFIX: &str = "-ingestion";

/// Thread-safe name → [`Handler`] map. Handlers registered from stored
/// attestations are first-class entries, not a special case.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    inner: Arc<RwLock<HashMap<String, Arc<dyn Handler>>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, handler: Arc<dyn Handler>) {
        let name = name.into();
        tracing::debug!(handler = %name, "handler registered");
        self.inner.write().insert(name, handler);
    }

    pub fn unregister(&self, name: &str) -> bool {
        self.inner.write().remove(name).is_some()
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Handler>, DispatchError> {
        self.inner
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| DispatchError::NotRegistered { name: name.to_string() })
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Install every stored handler currently in the store, newest
    /// definition per name winning. Returns how many were registered.
    pub fn load_from_store(
        &self,
        store: &qntx_store::AttestationStore,
        executor: Arc<dyn ScriptExecutor>,
    ) -> usize {
        let filter = qntx_core::AxFilter::all()
            .predicates(vec![qntx_core::PREDICATE_HANDLES.to_string()]);
        let mut installed = 0;
        // Results are newest-first; register oldest-first so the newest
        // definition ends up in the registry.
        for att in store.query(&filter, None, None).iter().rev() {
            if self.register_from_attestation(att, executor.clone()).is_some() {
                installed += 1;
            }
        }
        if installed > 0 {
            tracing::info!(installed, "stored handlers loaded");
        }
        installed
    }

    /// Install a stored handler from a `handles`/`<type>-ingestion`
    /// attestation. The handler is registered under the ingestion context
    /// name and delegates its `attributes.code` to `executor`.
    ///
    /// Returns the registered name, or `None` when the attestation is not
    /// a handler definition.
    pub fn register_from_attestation(
        &self,
        attestation: &Attestation,
        executor: Arc<dyn ScriptExecutor>,
    ) -> Option<String> {
        if !attestation.predicates.iter().any(|p| p == qntx_core::PREDICATE_HANDLES) {
            return None;
        }
        let context = attestation
            .contexts
            .iter()
            .find(|c| c.ends_with(INGESTION_SUFFIX))?;
        let code = attestation.attribute("code")?.as_str()?.to_string();

        let name = context.clone();
        self.register(
            name.clone(),
            Arc::new(ScriptHandler::new(code, attestation.id, executor)),
        );
        Some(name)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
