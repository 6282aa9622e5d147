// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claims: the expanded (subject, predicate, context) view of an attestation.

use crate::asid::Asid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One (subject, predicate, context) triple derived from an attestation by
/// cartesian expansion. All claims of one attestation share its actor,
/// timestamp, and id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub subject: String,
    pub predicate: String,
    pub context: String,
    pub actor: String,
    pub timestamp: DateTime<Utc>,
    /// Id of the attestation this claim was expanded from.
    pub attestation_id: Asid,
}

impl Claim {
    /// True for the typespace predicates (`type`, `relationship_type`,
    /// `node_type`). Metadata claims feed type maps and are never
    /// materialized as graph links by downstream consumers.
    pub fn is_metadata(&self) -> bool {
        matches!(
            self.predicate.as_str(),
            crate::PREDICATE_TYPE | crate::PREDICATE_RELATIONSHIP_TYPE | crate::PREDICATE_NODE_TYPE
        )
    }
}

#[cfg(test)]
#[path = "claim_tests.rs"]
mod tests;
