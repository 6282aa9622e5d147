// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders and proptest strategies shared across crate tests.

use crate::attestation::{Attestation, Attributes};
use crate::clock::FakeClock;
use chrono::{DateTime, Utc};

/// A fake clock pinned to a known epoch for deterministic timestamps.
pub fn fixed_clock() -> FakeClock {
    let clock = FakeClock::new();
    clock.set_epoch_ms(1_718_448_600_000); // 2024-06-15T10:50:00Z
    clock
}

/// Parse an RFC 3339 timestamp, panicking on bad test input.
#[allow(clippy::panic)]
pub fn ts(s: &str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(e) => panic!("bad test timestamp {s:?}: {e}"),
    }
}

/// A minimal single-claim attestation with a derived id.
pub fn simple_attestation(subject: &str, predicate: &str, context: &str, actor: &str) -> Attestation {
    Attestation::builder()
        .subjects(vec![subject.to_string()])
        .predicates(vec![predicate.to_string()])
        .contexts(vec![context.to_string()])
        .actors(vec![actor.to_string()])
        .timestamp(ts("2024-06-15T10:30:00Z"))
        .created_at(ts("2024-06-15T10:30:00Z"))
        .build()
        .rekey()
}

/// Attributes map from string key/value pairs.
pub fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect()
}

pub mod strategies {
    //! Proptest strategies for the data model.

    use proptest::prelude::*;

    /// Short non-empty identifier-ish strings.
    pub fn field() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,11}"
    }

    /// Non-empty vectors of field strings, up to four elements.
    pub fn fields() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec(field(), 1..=4)
    }
}
