//! Casing and identifier bracketing
//!
//! Every rendered word is re-cased per its lexical category; plain
//! identifiers are never re-cased, only bracketed per policy. Quoted
//! identifier contents are left untouched; only the bracket syntax itself
//! is normalized.

use crate::config::{BracketMode, CaseOption, FormatConfig};
use crate::keywords::{self, WordCategory};
use crate::parser::lexer::{Token, TokenKind};

/// Apply a case option to a word.
pub fn apply_case(text: &str, option: CaseOption) -> String {
    match option {
        CaseOption::AsIs => text.to_string(),
        CaseOption::Lowercase => text.to_lowercase(),
        CaseOption::Uppercase => text.to_uppercase(),
        CaseOption::LowerCamelCase => camel_case(text, false),
        CaseOption::UpperCamelCase => camel_case(text, true),
    }
}

fn camel_case(text: &str, upper_first: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in text.split('_') {
        let mut chars = segment.chars();
        match chars.next() {
            Some(first) => {
                out.extend(first.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
            }
            None => continue,
        }
    }
    if !upper_first {
        let mut chars = out.chars();
        if let Some(first) = chars.next() {
            let rest: String = chars.collect();
            out = first.to_lowercase().collect::<String>() + &rest;
        }
    }
    out
}

/// Render a word token per its lexical category.
pub fn render_word(token: &Token, cfg: &FormatConfig) -> String {
    match keywords::classify(&token.text) {
        WordCategory::Keyword => apply_case(&token.text, cfg.casing.keywords),
        WordCategory::Function => apply_case(&token.text, cfg.casing.functions),
        WordCategory::DataType => {
            let cased = apply_case(&token.text, cfg.casing.data_types);
            if cfg.brackets.data_types == BracketMode::All {
                format!("[{cased}]")
            } else {
                cased
            }
        }
        WordCategory::GlobalVariable => apply_case(&token.text, cfg.casing.global_variables),
        WordCategory::Identifier => bracket_identifier(&token.text, cfg),
    }
}

/// Render a word token appearing in data-type position. User-defined type
/// names honor the data-type bracket mode rather than the identifier one.
pub fn render_data_type_word(token: &Token, cfg: &FormatConfig) -> String {
    match keywords::classify(&token.text) {
        WordCategory::DataType => {
            let cased = apply_case(&token.text, cfg.casing.data_types);
            if cfg.brackets.data_types == BracketMode::All {
                format!("[{cased}]")
            } else {
                cased
            }
        }
        WordCategory::Identifier if !token.text.is_empty() => match cfg.brackets.data_types {
            BracketMode::All | BracketMode::UserDefined => format!("[{}]", token.text),
            BracketMode::None => token.text.clone(),
        },
        WordCategory::Identifier => String::new(),
        _ => render_word(token, cfg),
    }
}

fn bracket_identifier(text: &str, cfg: &FormatConfig) -> String {
    // Variables and temp-table names are never bracketed; the empty
    // sentinel for a missing data type renders as nothing
    if text.is_empty() || text.starts_with('@') || text.starts_with('#') {
        return text.to_string();
    }
    match cfg.brackets.identifiers {
        BracketMode::All | BracketMode::UserDefined => format!("[{text}]"),
        BracketMode::None => text.to_string(),
    }
}

/// Render a quoted identifier token (`[x]` or `"x"`), normalizing the
/// bracket syntax and stripping brackets only when that is safe.
pub fn render_quoted_identifier(token: &Token, cfg: &FormatConfig) -> String {
    let inner = quoted_inner(&token.text);
    let reserved = keywords::classify(inner) != WordCategory::Identifier;
    let needs_brackets = !is_plain_word(inner)
        || (reserved && cfg.brackets.preserve_reserved_word_brackets);
    match cfg.brackets.identifiers {
        BracketMode::All | BracketMode::UserDefined => format!("[{inner}]"),
        BracketMode::None => {
            if needs_brackets {
                format!("[{inner}]")
            } else {
                inner.to_string()
            }
        }
    }
}

fn quoted_inner(text: &str) -> &str {
    text.strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .or_else(|| text.strip_prefix('"').and_then(|t| t.strip_suffix('"')))
        .unwrap_or(text)
}

fn is_plain_word(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '@' || c == '#')
        && text
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '@' || c == '#')
}

/// Render any token inline: words are cased, quoted identifiers normalized,
/// everything else keeps its source text.
pub fn render_token(token: &Token, cfg: &FormatConfig) -> String {
    match token.kind {
        TokenKind::Word => render_word(token, cfg),
        TokenKind::QuotedIdentifier => render_quoted_identifier(token, cfg),
        TokenKind::BatchSeparator => apply_case(&token.text, cfg.casing.keywords),
        _ => token.text.clone(),
    }
}
