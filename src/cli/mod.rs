//! CLI argument parsing, file discovery, and input decoding

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::{BracketMode, FormatConfig, LineEnding};
use crate::error::{Error, Result};

/// tsqlfmt - A configurable T-SQL formatter
#[derive(Parser, Debug)]
#[command(name = "tsqlfmt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Input file or directory (use - or omit for stdin)
    pub input: Option<PathBuf>,

    /// Path to a JSON style document
    #[arg(long)]
    pub style: Option<PathBuf>,

    /// Write formatted output back to files instead of stdout
    #[arg(short, long)]
    pub write: bool,

    /// Print the raw lexer output instead of formatting
    #[arg(long)]
    pub tokens: bool,

    /// Print the serialized AST instead of formatting
    #[arg(long)]
    pub ast: bool,

    /// Override the identifier bracket mode from the style document
    #[arg(long, value_enum)]
    pub bracket_identifiers: Option<BracketModeArg>,

    /// Override the data-type bracket mode from the style document
    #[arg(long, value_enum)]
    pub bracket_data_types: Option<BracketModeArg>,

    /// Insert semicolons after statements that lack them
    #[arg(long)]
    pub insert_semicolons: bool,

    /// Override the output line ending
    #[arg(long, value_enum)]
    pub line_ending: Option<LineEndingArg>,

    /// Run the analyzer and print warnings to stderr
    #[arg(long)]
    pub analyze: bool,

    /// Analyzer: warn on table references without a schema prefix
    #[arg(long)]
    pub warn_missing_schema: bool,

    /// Analyzer: warn on FROM/JOIN sources without an alias
    #[arg(long)]
    pub warn_missing_alias: bool,
}

/// Bracket mode override accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BracketModeArg {
    All,
    UserDefined,
    None,
}

impl From<BracketModeArg> for BracketMode {
    fn from(arg: BracketModeArg) -> Self {
        match arg {
            BracketModeArg::All => BracketMode::All,
            BracketModeArg::UserDefined => BracketMode::UserDefined,
            BracketModeArg::None => BracketMode::None,
        }
    }
}

/// Line ending override accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LineEndingArg {
    Lf,
    Crlf,
}

impl From<LineEndingArg> for LineEnding {
    fn from(arg: LineEndingArg) -> Self {
        match arg {
            LineEndingArg::Lf => LineEnding::Lf,
            LineEndingArg::Crlf => LineEnding::Crlf,
        }
    }
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut FormatConfig) {
        if let Some(mode) = self.bracket_identifiers {
            config.brackets.identifiers = mode.into();
        }
        if let Some(mode) = self.bracket_data_types {
            config.brackets.data_types = mode.into();
        }
        if self.insert_semicolons {
            config.statements.insert_semicolons = true;
        }
        if let Some(ending) = self.line_ending {
            config.statements.line_ending = ending.into();
        }
    }
}

/// Discover .sql files under the given paths.
pub fn discover_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
                    files.push(path.to_path_buf());
                }
            }
        }
    }
    files.sort();
    files
}

/// Read a source file, sniffing UTF-8 and UTF-16 byte-order marks before
/// decoding.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    decode_source(&bytes)
}

/// Decode raw input bytes per their BOM.
pub fn decode_source(bytes: &[u8]) -> Result<String> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return decode_utf16(&bytes[2..], u16::from_le_bytes);
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return decode_utf16(&bytes[2..], u16::from_be_bytes);
    }
    let body = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF][..]).unwrap_or(bytes);
    String::from_utf8(body.to_vec()).map_err(|e| Error::EncodingError {
        message: format!("input is not valid UTF-8: {e}"),
    })
}

fn decode_utf16(bytes: &[u8], decode: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::EncodingError {
            message: "UTF-16 input has an odd number of bytes".to_string(),
        });
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| decode([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| Error::EncodingError {
        message: format!("input is not valid UTF-16: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_utf8() {
        assert_eq!(decode_source(b"SELECT 1").unwrap(), "SELECT 1");
    }

    #[test]
    fn strips_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"SELECT 1");
        assert_eq!(decode_source(&bytes).unwrap(), "SELECT 1");
    }

    #[test]
    fn decodes_utf16_le() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "GO".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_source(&bytes).unwrap(), "GO");
    }

    #[test]
    fn decodes_utf16_be() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "GO".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_source(&bytes).unwrap(), "GO");
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert!(decode_source(&[0xC3, 0x28]).is_err());
    }
}
