// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use qntx_core::test_support::{attrs, simple_attestation, ts};

fn fridge_attestation() -> qntx_core::Attestation {
    let mut att = simple_attestation("ALICE", "inventory", "fridge", "smartfridge_001");
    att.timestamp = ts("2024-06-15T10:30:00Z");
    att.attributes = attrs(&[("milk", "240ml"), ("eggs", "6pc")]);
    att
}

// =============================================================================
// parse
// =============================================================================

#[test]
fn raw_roundtrips() {
    let input = "{{subject}}'s {{context}} has {{attributes.milk}}";
    let template = Template::parse(input).unwrap();
    assert_eq!(template.raw(), input);
}

#[test]
fn placeholders_in_order_deduplicated() {
    let template =
        Template::parse("{{subject}} {{context}} {{subject}} {{attributes.milk}}").unwrap();
    assert_eq!(template.placeholders(), vec!["subject", "context", "attributes.milk"]);
}

#[test]
fn unknown_bare_name_is_parse_error() {
    let err = Template::parse("Hello {{nonsense}}").unwrap_err();
    assert_eq!(err, TemplateError::UnknownPlaceholder { name: "nonsense".to_string() });
    assert!(err.details().iter().any(|d| d.key == "placeholder" && d.value == "nonsense"));
}

#[test]
fn empty_placeholder_is_parse_error() {
    let err = Template::parse("x {{}} y").unwrap_err();
    assert!(matches!(err, TemplateError::Empty { .. }));
}

#[test]
fn unterminated_placeholder_is_parse_error() {
    let err = Template::parse("Hello {{subject").unwrap_err();
    assert!(matches!(err, TemplateError::Unterminated { .. }));
}

#[test]
fn bare_attributes_prefix_requires_path() {
    let err = Template::parse("{{attributes.}}").unwrap_err();
    assert!(matches!(err, TemplateError::UnknownPlaceholder { .. }));
}

#[test]
fn whitespace_inside_braces_is_tolerated() {
    let template = Template::parse("{{ subject }}").unwrap();
    assert_eq!(template.execute(&fridge_attestation()), "ALICE");
}

// =============================================================================
// execute
// =============================================================================

#[test]
fn renders_singulars_and_attribute_paths() {
    let template = Template::parse("{{subject}}'s {{context}} has {{attributes.milk}}").unwrap();
    assert_eq!(template.execute(&fridge_attestation()), "ALICE's fridge has 240ml");
}

#[test]
fn renders_plural_as_json_array() {
    let mut att = fridge_attestation();
    att.contexts.push("cupboard".into());
    let template = Template::parse("Contexts: {{contexts}}").unwrap();
    assert_eq!(template.execute(&att), r#"Contexts: ["fridge","cupboard"]"#);
}

#[test]
fn renders_temporal_as_iso8601_utc() {
    let template = Template::parse("at {{temporal}}").unwrap();
    assert_eq!(template.execute(&fridge_attestation()), "at 2024-06-15T10:30:00Z");
}

#[test]
fn renders_id_source_and_actor() {
    let att = fridge_attestation();
    let template = Template::parse("{{id}} {{source}} {{actor}}").unwrap();
    assert_eq!(template.execute(&att), format!("{} test smartfridge_001", att.id));
}

#[test]
fn renders_attributes_as_json_object() {
    let template = Template::parse("{{attributes}}").unwrap();
    let rendered = template.execute(&fridge_attestation());
    let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(parsed["milk"], "240ml");
    assert_eq!(parsed["eggs"], "6pc");
}

#[test]
fn missing_attribute_renders_empty() {
    let template = Template::parse("[{{attributes.absent}}]").unwrap();
    assert_eq!(template.execute(&fridge_attestation()), "[]");
}

#[test]
fn nested_attribute_path() {
    let mut att = fridge_attestation();
    att.attributes.insert("outer".into(), serde_json::json!({"inner": "deep"}));
    let template = Template::parse("{{attributes.outer.inner}}").unwrap();
    assert_eq!(template.execute(&att), "deep");
}

#[test]
fn non_string_attribute_renders_as_json() {
    let mut att = fridge_attestation();
    att.attributes.insert("count".into(), serde_json::json!(7));
    let template = Template::parse("{{attributes.count}}").unwrap();
    assert_eq!(template.execute(&att), "7");
}

#[test]
fn template_without_placeholders_is_literal() {
    let template = Template::parse("no placeholders here").unwrap();
    assert_eq!(template.execute(&fridge_attestation()), "no placeholders here");
    assert!(template.placeholders().is_empty());
}
