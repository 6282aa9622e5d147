// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typespace resolution over query results.

use crate::executor::QueryResult;
use qntx_core::{RelationshipDef, TypeDef};
use std::collections::HashMap;

/// Node and relationship type maps extracted from a result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeMaps {
    pub node_types: HashMap<String, TypeDef>,
    pub relationship_types: HashMap<String, RelationshipDef>,
}

/// Walk a result set and extract every type definition it carries,
/// keeping the latest definition per name.
pub fn resolve_types(result: &QueryResult) -> TypeMaps {
    let mut maps = TypeMaps::default();
    for att in &result.attestations {
        if let Some(def) = TypeDef::from_attestation(att) {
            match maps.node_types.get(&def.name) {
                Some(existing) if existing.defined_at >= def.defined_at => {}
                _ => {
                    maps.node_types.insert(def.name.clone(), def);
                }
            }
        }
        if let Some(def) = RelationshipDef::from_attestation(att) {
            match maps.relationship_types.get(&def.name) {
                Some(existing) if existing.defined_at >= def.defined_at => {}
                _ => {
                    maps.relationship_types.insert(def.name.clone(), def);
                }
            }
        }
    }
    maps
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
