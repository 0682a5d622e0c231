//! Error types for tsqlfmt

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for tsqlfmt operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tsqlfmt
///
/// The core pipeline (lexer, parser, formatter) is total and never produces
/// these; errors only arise at the I/O boundary and in the style loader.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    #[diagnostic(code(tsqlfmt::io_error))]
    IoError(#[from] std::io::Error),

    #[error("style error: {message}")]
    #[diagnostic(code(tsqlfmt::style_error))]
    StyleError { message: String },

    #[error("encoding error: {message}")]
    #[diagnostic(code(tsqlfmt::encoding_error))]
    EncodingError { message: String },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::StyleError {
            message: err.to_string(),
        }
    }
}
