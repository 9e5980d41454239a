//! Error kinds shared across the anonymization engine crates.

use thiserror::Error;

/// Errors raised by column handling, the lexer, and the PIC/USAGE
/// recognizer. These are the "core" error kinds; higher-level crates wrap
/// them in their own error enums via `#[from]`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A proposed rewrite would push the code body past column 72.
    /// Recoverable: callers still emit the new body and record the warning.
    #[error("column overflow: proposed body is {actual_length} bytes, max is {max_length}")]
    ColumnOverflow {
        actual_length: usize,
        max_length: usize,
    },

    /// Malformed structure encountered while lexing or recognizing a
    /// clause. Recoverable at line granularity.
    #[error("{file}:{line}: parse error: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },
}
