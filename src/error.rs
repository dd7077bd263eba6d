//! Error types for literate conversion.

use thiserror::Error;

/// Errors produced while converting a source text.
#[derive(Debug, Error)]
pub enum LiterateError {
    /// Input ended inside a template literal with substitutions.
    #[error("unterminated template literal starting at line {line}, column {column}")]
    UnterminatedTemplate {
        /// Byte offset of the opening backtick
        offset: usize,
        line: usize,
        column: usize,
    },

    /// Writing the document failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient `Result` alias for conversion operations.
pub type LiterateResult<T> = Result<T, LiterateError>;
