// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typespace definitions extracted from graph attestations.
//!
//! Types are not a separate schema registry: an attestation with predicate
//! `type` (or `relationship_type`) in context `graph` defines display and
//! physics metadata for its subject. The latest attestation by timestamp
//! wins for a given name.

use crate::attestation::Attestation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn string_list(value: &serde_json::Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect()
    })
}

/// Display metadata for a node type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Type name (the defining attestation's subject).
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    /// Attribute fields rendered as rich text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_string_fields: Option<Vec<String>>,
    /// Attribute fields holding arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_fields: Option<Vec<String>>,
    /// Timestamp of the defining attestation, used for latest-wins.
    pub defined_at: DateTime<Utc>,
}

impl TypeDef {
    /// Extract a definition from a `type`/`graph` attestation.
    /// Returns `None` when the attestation is not a typespace record.
    pub fn from_attestation(att: &Attestation) -> Option<Self> {
        if !att.predicates.iter().any(|p| p == crate::PREDICATE_TYPE)
            || !att.contexts.iter().any(|c| c == crate::CONTEXT_GRAPH)
        {
            return None;
        }
        let attrs = &att.attributes;
        Some(Self {
            name: att.subject().to_string(),
            label: attrs.get("label").and_then(|v| v.as_str()).map(str::to_string),
            color: attrs.get("color").and_then(|v| v.as_str()).map(str::to_string),
            opacity: attrs.get("opacity").and_then(|v| v.as_f64()),
            deprecated: attrs.get("deprecated").and_then(|v| v.as_bool()),
            rich_string_fields: attrs.get("rich_string_fields").and_then(string_list),
            array_fields: attrs.get("array_fields").and_then(string_list),
            defined_at: att.timestamp,
        })
    }
}

/// Display and physics metadata for a relationship (link) type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipDef {
    /// Relationship name (the defining attestation's subject).
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_strength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    /// Timestamp of the defining attestation, used for latest-wins.
    pub defined_at: DateTime<Utc>,
}

impl RelationshipDef {
    /// Extract a definition from a `relationship_type`/`graph` attestation.
    /// Returns `None` when the attestation is not a typespace record.
    pub fn from_attestation(att: &Attestation) -> Option<Self> {
        if !att.predicates.iter().any(|p| p == crate::PREDICATE_RELATIONSHIP_TYPE)
            || !att.contexts.iter().any(|c| c == crate::CONTEXT_GRAPH)
        {
            return None;
        }
        let attrs = &att.attributes;
        Some(Self {
            name: att.subject().to_string(),
            label: attrs.get("label").and_then(|v| v.as_str()).map(str::to_string),
            color: attrs.get("color").and_then(|v| v.as_str()).map(str::to_string),
            link_distance: attrs.get("link_distance").and_then(|v| v.as_f64()),
            link_strength: attrs.get("link_strength").and_then(|v| v.as_f64()),
            deprecated: attrs.get("deprecated").and_then(|v| v.as_bool()),
            defined_at: att.timestamp,
        })
    }
}

#[cfg(test)]
#[path = "typedef_tests.rs"]
mod tests;
