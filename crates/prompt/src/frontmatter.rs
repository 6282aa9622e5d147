// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! YAML frontmatter over prompt bodies.

use crate::error::PromptError;
use serde::{Deserialize, Serialize};

/// Metadata block of a stored prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<String>>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub prompt_type: Option<String>,
}

/// A parsed prompt document: metadata plus the template body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptDoc {
    pub meta: PromptMeta,
    pub body: String,
}

const FENCE: &str = "---";

/// Split `---\n<yaml>\n---\n<body>` into metadata and body. Input
/// without a frontmatter fence is all body with default metadata.
pub fn parse_doc(input: &str) -> Result<PromptDoc, PromptError> {
    let Some(rest) = input.strip_prefix(FENCE) else {
        return Ok(PromptDoc { meta: PromptMeta::default(), body: input.to_string() });
    };
    let Some(rest) = rest.strip_prefix('\n') else {
        // e.g. a body starting with "----" horizontal rule
        return Ok(PromptDoc { meta: PromptMeta::default(), body: input.to_string() });
    };

    let mut yaml_end = None;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == FENCE {
            yaml_end = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }
    let Some((yaml_end, body_start)) = yaml_end else {
        return Err(PromptError::Frontmatter { message: "unterminated frontmatter".to_string() });
    };

    let yaml = &rest[..yaml_end];
    let meta: PromptMeta = if yaml.trim().is_empty() {
        PromptMeta::default()
    } else {
        serde_yaml::from_str(yaml)
            .map_err(|e| PromptError::Frontmatter { message: e.to_string() })?
    };
    Ok(PromptDoc { meta, body: rest[body_start..].to_string() })
}

/// Emit a document back to `---\n<yaml>\n---\n<body>` form.
/// `parse_doc(emit_doc(doc))` yields an equal document.
pub fn emit_doc(doc: &PromptDoc) -> String {
    if doc.meta == PromptMeta::default() {
        return doc.body.clone();
    }
    let yaml = serde_yaml::to_string(&doc.meta).unwrap_or_default();
    format!("{FENCE}\n{yaml}{FENCE}\n{}", doc.body)
}

#[cfg(test)]
#[path = "frontmatter_tests.rs"]
mod tests;
