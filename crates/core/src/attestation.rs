// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Attestation record and its construction path.

use crate::asid::Asid;
use crate::clock::Clock;
use crate::filter::AxFilter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Attribute map attached to an attestation. Values are arbitrary JSON.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Immutable record associating subjects with predicates in contexts,
/// attested by actors at a point in time.
///
/// The id is content-derived from the primary (first) subject, predicate,
/// and context plus the primary actor, so re-creating an attestation with
/// identical identity fields produces the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attestation {
    pub id: Asid,
    pub subjects: Vec<String>,
    pub predicates: Vec<String>,
    pub contexts: Vec<String>,
    pub actors: Vec<String>,
    /// Logical event time, caller-supplied.
    pub timestamp: DateTime<Utc>,
    /// Origin label, free text.
    pub source: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// Wall-clock insertion time.
    pub created_at: DateTime<Utc>,
}

impl Attestation {
    /// Start building an attestation from its four identity fields.
    pub fn draft(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        context: impl Into<String>,
        actor: impl Into<String>,
    ) -> AttestationDraft {
        AttestationDraft {
            subjects: vec![subject.into()],
            predicates: vec![predicate.into()],
            contexts: vec![context.into()],
            actors: vec![actor.into()],
            timestamp: None,
            source: String::new(),
            attributes: Attributes::new(),
        }
    }

    /// Primary subject (first element).
    pub fn subject(&self) -> &str {
        self.subjects.first().map(String::as_str).unwrap_or_default()
    }

    /// Primary predicate (first element).
    pub fn predicate(&self) -> &str {
        self.predicates.first().map(String::as_str).unwrap_or_default()
    }

    /// Primary context (first element).
    pub fn context(&self) -> &str {
        self.contexts.first().map(String::as_str).unwrap_or_default()
    }

    /// Primary actor (first element).
    pub fn actor(&self) -> &str {
        self.actors.first().map(String::as_str).unwrap_or_default()
    }

    /// Number of claims this attestation expands into.
    pub fn claim_count(&self) -> usize {
        self.subjects.len() * self.predicates.len() * self.contexts.len()
    }

    /// True when any element of `haystack` appears in `set`, or `set` is
    /// empty (no constraint on that dimension).
    fn dimension_matches(set: &[String], haystack: &[String]) -> bool {
        set.is_empty() || haystack.iter().any(|v| set.contains(v))
    }

    /// Filter membership test: conjunctive across dimensions, disjunctive
    /// within a dimension, with an optional half-open time window.
    pub fn matches(&self, filter: &AxFilter) -> bool {
        if !Self::dimension_matches(&filter.subjects, &self.subjects) {
            return false;
        }
        if !Self::dimension_matches(&filter.predicates, &self.predicates) {
            return false;
        }
        if !Self::dimension_matches(&filter.contexts, &self.contexts) {
            return false;
        }
        if !Self::dimension_matches(&filter.actors, &self.actors) {
            return false;
        }
        if let Some(since) = filter.since {
            // Strict lower bound
            if self.timestamp <= since {
                return false;
            }
        }
        if let Some(until) = filter.until {
            if self.timestamp > until {
                return false;
            }
        }
        true
    }

    /// Look up an attribute by dotted path (`key` or `outer.inner`).
    /// Returns `None` when any path segment is missing.
    pub fn attribute(&self, path: &str) -> Option<&serde_json::Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.attributes.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }
}

/// Validation failures when sealing a draft.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("attestation requires at least one {dimension}")]
    EmptyDimension { dimension: &'static str },
}

/// Mutable accumulation state for a new attestation.
///
/// `seal` validates the four sequences, stamps times from the clock, and
/// derives the ASID from the primary identity fields.
#[derive(Debug, Clone)]
pub struct AttestationDraft {
    subjects: Vec<String>,
    predicates: Vec<String>,
    contexts: Vec<String>,
    actors: Vec<String>,
    timestamp: Option<DateTime<Utc>>,
    source: String,
    attributes: Attributes,
}

impl AttestationDraft {
    crate::setters! {
        into {
            source: String,
        }
        set {
            subjects: Vec<String>,
            predicates: Vec<String>,
            contexts: Vec<String>,
            actors: Vec<String>,
            attributes: Attributes,
        }
    }

    /// Logical event time. Defaults to the clock's current time at seal.
    pub fn timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(ts);
        self
    }

    /// Append a single subject.
    pub fn also_subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.push(subject.into());
        self
    }

    /// Append a single context.
    pub fn also_context(mut self, context: impl Into<String>) -> Self {
        self.contexts.push(context.into());
        self
    }

    /// Set one attribute value.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Validate, stamp, and derive the content id.
    pub fn seal(self, clock: &impl Clock) -> Result<Attestation, DraftError> {
        for (dimension, values) in [
            ("subject", &self.subjects),
            ("predicate", &self.predicates),
            ("context", &self.contexts),
            ("actor", &self.actors),
        ] {
            if values.is_empty() || values.iter().any(String::is_empty) {
                return Err(DraftError::EmptyDimension { dimension });
            }
        }

        let now = clock.utc();
        let id = Asid::derive(
            &self.subjects[0],
            &self.predicates[0],
            &self.contexts[0],
            &self.actors[0],
        );
        Ok(Attestation {
            id,
            subjects: self.subjects,
            predicates: self.predicates,
            contexts: self.contexts,
            actors: self.actors,
            timestamp: self.timestamp.unwrap_or(now),
            source: self.source,
            attributes: self.attributes,
            created_at: now,
        })
    }
}

crate::builder! {
    pub struct AttestationBuilder => Attestation {
        into {
            source: String = "test",
        }
        set {
            subjects: Vec<String> = vec!["SUBJ".to_string()],
            predicates: Vec<String> = vec!["knows".to_string()],
            contexts: Vec<String> = vec!["ctx".to_string()],
            actors: Vec<String> = vec!["tester".to_string()],
            attributes: Attributes = Attributes::new(),
            timestamp: chrono::DateTime<chrono::Utc> = chrono::DateTime::<chrono::Utc>::default(),
            created_at: chrono::DateTime<chrono::Utc> = chrono::DateTime::<chrono::Utc>::default(),
        }
        computed {
            id: Asid = Asid::empty_placeholder(),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Asid {
    /// Placeholder for builder-constructed test attestations; call
    /// [`Attestation::rekey`] to derive the real id.
    pub fn empty_placeholder() -> Self {
        Self(crate::id::IdBuf::empty())
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Attestation {
    /// Recompute the content id from the current identity fields.
    pub fn rekey(mut self) -> Self {
        self.id = Asid::derive(self.subject(), self.predicate(), self.context(), self.actor());
        self
    }
}

#[cfg(test)]
#[path = "attestation_tests.rs"]
mod tests;
