//! Style configuration tests
//!
//! A style document deep-merges over the complete defaults; unspecified
//! keys inherit, and one legacy flat key is migrated.

use pretty_assertions::assert_eq;
use tsqlfmt::config::{
    parse_style_json, BracketMode, CaseOption, FormatConfig, LineEnding, ParenthesisStyle,
};

#[test]
fn empty_document_equals_defaults() {
    assert_eq!(parse_style_json("{}").unwrap(), FormatConfig::default());
}

#[test]
fn defaults_are_fully_populated() {
    let config = FormatConfig::default();
    assert_eq!(config.whitespace.indent_width, 4);
    assert_eq!(config.whitespace.max_line_width, 120);
    assert_eq!(config.casing.keywords, CaseOption::Uppercase);
    assert_eq!(config.brackets.identifiers, BracketMode::None);
    assert_eq!(config.parentheses.style, ParenthesisStyle::ExpandedToStatement);
    assert_eq!(config.statements.line_ending, LineEnding::Lf);
    assert!(config.dml.collapse_short_statements);
    assert!(config.statements.preserve_blank_lines);
}

#[test]
fn partial_documents_inherit_the_rest() {
    let config = parse_style_json(
        r#"{"whitespace": {"indentWidth": 2}, "casing": {"keywords": "lowercase"}}"#,
    )
    .unwrap();
    assert_eq!(config.whitespace.indent_width, 2);
    assert_eq!(config.whitespace.max_line_width, 120);
    assert_eq!(config.casing.keywords, CaseOption::Lowercase);
    assert_eq!(config.casing.functions, CaseOption::Uppercase);
}

#[test]
fn nested_subtrees_merge_key_by_key() {
    let config = parse_style_json(
        r#"{"operators": {"andOr": {"placeBeforeCondition": false}}}"#,
    )
    .unwrap();
    assert!(!config.operators.and_or.place_before_condition);
    assert!(config.operators.and_or.place_on_new_line);
    assert!(!config.operators.comparison.align_operators);
}

#[test]
fn legacy_flat_comma_key_is_hoisted() {
    let config = parse_style_json(r#"{"lists": {"placeCommasBeforeItems": true}}"#).unwrap();
    assert!(config.lists.commas.place_commas_before_items);
    assert!(config.lists.commas.space_after_comma);
}

#[test]
fn legacy_key_does_not_clobber_sibling_comma_settings() {
    let config = parse_style_json(
        r#"{"lists": {
            "placeCommasBeforeItems": true,
            "commas": {"spaceAfterComma": false}
        }}"#,
    )
    .unwrap();
    assert!(config.lists.commas.place_commas_before_items);
    assert!(!config.lists.commas.space_after_comma);
}

#[test]
fn all_enum_literals_parse() {
    for style in [
        "expandedToStatement",
        "compactToStatement",
        "expandedToParenthesis",
        "compactToParenthesis",
    ] {
        let doc = format!(r#"{{"parentheses": {{"style": "{style}"}}}}"#);
        assert!(parse_style_json(&doc).is_ok(), "style {style} should parse");
    }
    for case in ["asis", "lowercase", "uppercase", "lowerCamelCase", "upperCamelCase"] {
        let doc = format!(r#"{{"casing": {{"keywords": "{case}"}}}}"#);
        assert!(parse_style_json(&doc).is_ok(), "case {case} should parse");
    }
    for mode in ["all", "userDefined", "none"] {
        let doc = format!(r#"{{"brackets": {{"identifiers": "{mode}"}}}}"#);
        assert!(parse_style_json(&doc).is_ok(), "mode {mode} should parse");
    }
}

#[test]
fn invalid_documents_are_rejected() {
    assert!(parse_style_json("[]").is_err());
    assert!(parse_style_json("42").is_err());
    assert!(parse_style_json("{not json").is_err());
    assert!(parse_style_json(r#"{"casing": {"keywords": "shouting"}}"#).is_err());
}
