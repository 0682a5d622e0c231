//! Style document loading
//!
//! A style file is a JSON object deep-merged over the complete default
//! configuration, so unspecified keys inherit their defaults and the
//! resulting tree is always fully populated.

use std::path::Path;

use serde_json::Value;

use crate::config::FormatConfig;
use crate::error::{Error, Result};

/// Load a style document from a file and merge it over the defaults.
pub fn load_style_file(path: &Path) -> Result<FormatConfig> {
    let text = std::fs::read_to_string(path)?;
    parse_style_json(&text)
}

/// Parse a style document from JSON text and merge it over the defaults.
pub fn parse_style_json(json: &str) -> Result<FormatConfig> {
    let mut overlay: Value = serde_json::from_str(json)?;
    if !overlay.is_object() {
        return Err(Error::StyleError {
            message: "style document must be a JSON object".to_string(),
        });
    }
    migrate_legacy_keys(&mut overlay);

    let mut base = serde_json::to_value(FormatConfig::default())?;
    deep_merge(&mut base, overlay);
    let config: FormatConfig = serde_json::from_value(base)?;
    Ok(config)
}

/// Hoist `lists.placeCommasBeforeItems` (the old flat key) into
/// `lists.commas.placeCommasBeforeItems`.
fn migrate_legacy_keys(overlay: &mut Value) {
    let Some(lists) = overlay.get_mut("lists").and_then(Value::as_object_mut) else {
        return;
    };
    let Some(legacy) = lists.remove("placeCommasBeforeItems") else {
        return;
    };
    tracing::debug!("migrating legacy style key lists.placeCommasBeforeItems");
    let commas = lists
        .entry("commas")
        .or_insert_with(|| Value::Object(Default::default()));
    if let Some(commas) = commas.as_object_mut() {
        commas.insert("placeCommasBeforeItems".to_string(), legacy);
    }
}

/// Recursively merge `overlay` into `base`: objects merge key by key,
/// everything else replaces.
fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base_slot, value) => {
            *base_slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BracketMode, CaseOption};

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_style_json("{}").expect("should parse");
        assert_eq!(config, FormatConfig::default());
    }

    #[test]
    fn unspecified_keys_inherit_defaults() {
        let config =
            parse_style_json(r#"{"casing": {"keywords": "lowercase"}}"#).expect("should parse");
        assert_eq!(config.casing.keywords, CaseOption::Lowercase);
        assert_eq!(config.casing.functions, CaseOption::Uppercase);
        assert_eq!(config.whitespace.indent_width, 4);
    }

    #[test]
    fn legacy_comma_key_is_hoisted() {
        let config =
            parse_style_json(r#"{"lists": {"placeCommasBeforeItems": true}}"#).expect("should parse");
        assert!(config.lists.commas.place_commas_before_items);
        assert!(config.lists.commas.space_after_comma);
    }

    #[test]
    fn bracket_modes_parse() {
        let config = parse_style_json(r#"{"brackets": {"identifiers": "userDefined"}}"#)
            .expect("should parse");
        assert_eq!(config.brackets.identifiers, BracketMode::UserDefined);
    }

    #[test]
    fn non_object_document_is_rejected() {
        assert!(parse_style_json("[1, 2]").is_err());
        assert!(parse_style_json("not json").is_err());
    }
}
