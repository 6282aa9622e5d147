// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executable form of an Ax query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filter over the attestation ledger.
///
/// Empty arrays mean "no constraint on that dimension". Composition is
/// conjunctive across dimensions and disjunctive within one. `since` is a
/// strict lower bound on the logical timestamp; `until` is inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub predicates: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl AxFilter {
    /// Filter matching every attestation.
    pub fn all() -> Self {
        Self::default()
    }

    /// True when no dimension or time constraint is set.
    pub fn is_unconstrained(&self) -> bool {
        self.subjects.is_empty()
            && self.predicates.is_empty()
            && self.contexts.is_empty()
            && self.actors.is_empty()
            && self.since.is_none()
            && self.until.is_none()
    }

    crate::setters! {
        set {
            subjects: Vec<String>,
            predicates: Vec<String>,
            contexts: Vec<String>,
            actors: Vec<String>,
        }
        option {
            since: DateTime<Utc>,
            until: DateTime<Utc>,
            limit: usize,
        }
    }

    /// Narrow `since` to the later of the current bound and `cursor`.
    /// Used by scheduled prompt jobs to make reruns incremental.
    pub fn advance_since(&mut self, cursor: DateTime<Utc>) {
        self.since = Some(match self.since {
            Some(existing) if existing > cursor => existing,
            _ => cursor,
        });
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
