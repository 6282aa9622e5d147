// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `{{placeholder}}` template expansion over attestations.

use crate::error::TemplateError;
use chrono::SecondsFormat;
use qntx_core::Attestation;
use regex::Regex;
use std::sync::LazyLock;

/// Placeholder scanner. Matched lazily so `{{a}} {{b}}` yields two
/// placeholders, not one.
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").expect("constant regex pattern is valid")
});

/// One resolved placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Subject,
    Subjects,
    Predicate,
    Predicates,
    Context,
    Contexts,
    Actor,
    Actors,
    Temporal,
    Id,
    Source,
    Attributes,
    /// Dotted path into the attribute map.
    AttributePath(String),
}

impl Slot {
    fn parse(name: &str) -> Option<Slot> {
        match name {
            "subject" => Some(Slot::Subject),
            "subjects" => Some(Slot::Subjects),
            "predicate" => Some(Slot::Predicate),
            "predicates" => Some(Slot::Predicates),
            "context" => Some(Slot::Context),
            "contexts" => Some(Slot::Contexts),
            "actor" => Some(Slot::Actor),
            "actors" => Some(Slot::Actors),
            "temporal" => Some(Slot::Temporal),
            "id" => Some(Slot::Id),
            "source" => Some(Slot::Source),
            "attributes" => Some(Slot::Attributes),
            other => other
                .strip_prefix("attributes.")
                .filter(|path| !path.is_empty())
                .map(|path| Slot::AttributePath(path.to_string())),
        }
    }

    fn name(&self) -> String {
        match self {
            Slot::Subject => "subject".to_string(),
            Slot::Subjects => "subjects".to_string(),
            Slot::Predicate => "predicate".to_string(),
            Slot::Predicates => "predicates".to_string(),
            Slot::Context => "context".to_string(),
            Slot::Contexts => "contexts".to_string(),
            Slot::Actor => "actor".to_string(),
            Slot::Actors => "actors".to_string(),
            Slot::Temporal => "temporal".to_string(),
            Slot::Id => "id".to_string(),
            Slot::Source => "source".to_string(),
            Slot::Attributes => "attributes".to_string(),
            Slot::AttributePath(path) => format!("attributes.{path}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Slot(Slot),
}

/// A parsed template. Unknown bare placeholder names are rejected at
/// parse time, not render time.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    raw: String,
    segments: Vec<Segment>,
}

fn json_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

impl Template {
    /// Parse a template body, validating every placeholder.
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        // A `{{` without a closing `}}` is an authoring error
        if let Some(open) = raw.rfind("{{") {
            if !raw[open..].contains("}}") {
                return Err(TemplateError::Unterminated { offset: open });
            }
        }

        let mut segments = Vec::new();
        let mut cursor = 0;
        for captures in PLACEHOLDER.captures_iter(raw) {
            // Indexing is safe: group 0 always exists on a match
            #[allow(clippy::expect_used)]
            let whole = captures.get(0).expect("match has group 0");
            if whole.start() > cursor {
                segments.push(Segment::Literal(raw[cursor..whole.start()].to_string()));
            }
            let name = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            if name.is_empty() {
                return Err(TemplateError::Empty { offset: whole.start() });
            }
            let slot = Slot::parse(name)
                .ok_or_else(|| TemplateError::UnknownPlaceholder { name: name.to_string() })?;
            segments.push(Segment::Slot(slot));
            cursor = whole.end();
        }
        if cursor < raw.len() {
            segments.push(Segment::Literal(raw[cursor..].to_string()));
        }
        Ok(Self { raw: raw.to_string(), segments })
    }

    /// The exact input string: `Template::parse(s).raw() == s`.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in first-appearance order, deduplicated.
    pub fn placeholders(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for segment in &self.segments {
            if let Segment::Slot(slot) = segment {
                let name = slot.name();
                if !seen.contains(&name) {
                    seen.push(name);
                }
            }
        }
        seen
    }

    /// Render against one attestation. Attribute misses render as the
    /// empty string; structured values render as JSON.
    pub fn execute(&self, att: &Attestation) -> String {
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(slot) => out.push_str(&render(slot, att)),
            }
        }
        out
    }
}

fn render(slot: &Slot, att: &Attestation) -> String {
    match slot {
        Slot::Subject => att.subject().to_string(),
        Slot::Subjects => json_list(&att.subjects),
        Slot::Predicate => att.predicate().to_string(),
        Slot::Predicates => json_list(&att.predicates),
        Slot::Context => att.context().to_string(),
        Slot::Contexts => json_list(&att.contexts),
        Slot::Actor => att.actor().to_string(),
        Slot::Actors => json_list(&att.actors),
        Slot::Temporal => att.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        Slot::Id => att.id.to_string(),
        Slot::Source => att.source.clone(),
        Slot::Attributes => {
            serde_json::to_string(&att.attributes).unwrap_or_else(|_| "{}".to_string())
        }
        Slot::AttributePath(path) => match att.attribute(path) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(value) => value.to_string(),
            None => String::new(),
        },
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
