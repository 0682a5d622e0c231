//! tsqlfmt - A configurable T-SQL formatter that preserves comments and
//! blank lines
//!
//! This library provides the core formatting pipeline for the tsqlfmt CLI:
//! lexer, trivia attachment, parser, formatter, and the read-only analyzer.
//! The pipeline is total: malformed SQL degrades to raw token runs and
//! still produces formatted output.

pub mod analyzer;
pub mod ast;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod keywords;
pub mod parser;

pub use config::FormatConfig;
pub use error::{Error, Result};

/// Format T-SQL text under the default configuration.
pub fn format(input: &str) -> String {
    format_with_config(input, &FormatConfig::default())
}

/// Format T-SQL text under the given configuration.
pub fn format_with_config(input: &str, config: &FormatConfig) -> String {
    let script = parser::parse(input);
    formatter::format_script(&script, config)
}

/// Check if T-SQL text is already formatted under the given configuration.
pub fn check(input: &str, config: &FormatConfig) -> bool {
    format_with_config(input, config) == input
}
