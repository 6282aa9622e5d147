// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds and detail pairs shared across the boundary surface.
//!
//! Every error crossing the core boundary carries one of these kinds plus
//! an ordered list of key=value [`Detail`] pairs so callers can react
//! programmatically (e.g. offer to create a missing handler from the
//! `script_type` detail).

use serde::{Deserialize, Serialize};

/// Machine-readable classification of a core error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input: filter, template, action, payload
    Invalid,
    /// No such attestation, job, or schedule
    NotFound,
    /// Handler name unknown
    NotRegistered,
    /// Byte-differing write of an existing id
    Duplicate,
    /// Actor would exceed its distinct-context bound
    BoundedActor,
    /// Missing required configuration (e.g. api_key)
    NotConfigured,
    /// External service returned an error response
    Remote,
    /// Transient persistence failure
    Backend,
    /// Context canceled
    Canceled,
    /// Queue full
    Busy,
}

impl ErrorKind {
    /// True when callers may retry the failed operation as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Backend | ErrorKind::Busy)
    }
}

crate::simple_display! {
    ErrorKind {
        Invalid => "invalid",
        NotFound => "not_found",
        NotRegistered => "not_registered",
        Duplicate => "duplicate",
        BoundedActor => "bounded_actor",
        NotConfigured => "not_configured",
        Remote => "remote",
        Backend => "backend",
        Canceled => "canceled",
        Busy => "busy",
    }
}

/// One key=value pair of machine-readable error context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub key: String,
    pub value: String,
}

impl std::fmt::Display for Detail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Shorthand constructor for a [`Detail`].
pub fn detail(key: impl Into<String>, value: impl std::fmt::Display) -> Detail {
    Detail { key: key.into(), value: value.to_string() }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
