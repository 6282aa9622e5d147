// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic attestation identifiers.

use crate::id::IdBuf;
use sha2::{Digest, Sha256};

/// Separator between the hashed identity fields. Not a legal character in
/// any of them, so `("a","bc")` and `("ab","c")` never collide.
const FIELD_SEP: u8 = 0x1f;

/// Content-derived attestation ID.
///
/// An ASID is `as-` followed by the first 20 hex characters of the SHA-256
/// of `(primary_subject, primary_predicate, primary_context, actor)`.
/// Re-creating an attestation from identical inputs yields the same ID,
/// which makes inserts idempotent and result attestations deduplicable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Asid(pub IdBuf);

impl Asid {
    pub const PREFIX: &'static str = "as-";

    /// Derive the ASID for the given identity fields.
    pub fn derive(subject: &str, predicate: &str, context: &str, actor: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(subject.as_bytes());
        hasher.update([FIELD_SEP]);
        hasher.update(predicate.as_bytes());
        hasher.update([FIELD_SEP]);
        hasher.update(context.as_bytes());
        hasher.update([FIELD_SEP]);
        hasher.update(actor.as_bytes());
        let digest = hasher.finalize();

        // 10 bytes → 20 hex chars; with the prefix this exactly fills IdBuf.
        let mut id = String::with_capacity(Self::PREFIX.len() + 20);
        id.push_str(Self::PREFIX);
        for byte in &digest[..10] {
            use std::fmt::Write;
            // Writing hex into a String cannot fail.
            let _ = write!(id, "{:02x}", byte);
        }
        Self(IdBuf::new(&id))
    }

    /// Create an ASID from an existing string (for parsing/deserialization).
    pub fn from_string(id: impl AsRef<str>) -> Self {
        Self(IdBuf::new(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Get the hex suffix (without prefix).
    pub fn suffix(&self) -> &str {
        self.0.as_str().strip_prefix(Self::PREFIX).unwrap_or(self.0.as_str())
    }

    /// Returns a string slice of the suffix truncated to at most `n` characters.
    pub fn short(&self, n: usize) -> &str {
        let suffix = self.suffix();
        let end = std::cmp::min(n, suffix.len());
        &suffix[..end]
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Asid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_str())
    }
}

impl From<&str> for Asid {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl From<String> for Asid {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

impl AsRef<str> for Asid {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq<str> for Asid {
    fn eq(&self, other: &str) -> bool {
        self.0.as_str() == other
    }
}

impl PartialEq<&str> for Asid {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_str() == *other
    }
}

impl std::borrow::Borrow<str> for Asid {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
#[path = "asid_tests.rs"]
mod tests;
