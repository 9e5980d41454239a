//! Top-level error type: aggregates every per-crate error via `#[from]`
//! and adds the run-level fatal kinds spec.md §7 names that have no
//! lower-crate home (`IdentifierLengthError`, `ReservedWordCollisionError`,
//! `ConfigError`).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] cobol_anonymize_core::CoreError),

    #[error(transparent)]
    Graph(#[from] cobol_anonymize_graph::GraphError),

    #[error(transparent)]
    Mapping(#[from] cobol_anonymize_mapping::MappingError),

    #[error("{0}")]
    Config(String),

    /// A generated identifier exceeds 30 characters. Indicates a bug in
    /// the naming strategy, not bad input; fatal.
    #[error("generated identifier '{identifier}' exceeds 30 characters (length: {length})")]
    IdentifierLength { identifier: String, length: usize },

    /// A generated identifier collided with a reserved word after the
    /// mapping table's retry budget was exhausted; fatal.
    #[error("generated identifier '{identifier}' collides with reserved word '{reserved_word}'")]
    ReservedWordCollision {
        identifier: String,
        reserved_word: String,
    },

    /// A copybook referenced by `COPY` could not be found and strict
    /// copybook presence was requested.
    #[error("{file}:{line}: copybook '{copybook}' not found")]
    CopyNotFound {
        copybook: String,
        file: String,
        line: usize,
    },

    #[error("validation failed with {0} error(s); see the report for details")]
    ValidationFailed(usize),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to write to non-empty output directory {path} without overwrite")]
    OutputNotEmpty { path: String },
}

pub type Result<T> = std::result::Result<T, Error>;
