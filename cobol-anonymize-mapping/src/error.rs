use thiserror::Error;

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("could not generate a unique valid name for '{original}' after {attempts} attempts")]
    NameExhaustion { original: String, attempts: u32 },

    #[error("failed to read mapping file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse mapping JSON at {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write mapping CSV at {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}
