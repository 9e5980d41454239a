//! Deterministic, column-exact COBOL batch anonymization engine.
//!
//! Ties together discovery & dependency resolution, identifier
//! classification, synthetic-name mapping, per-line transformation, and
//! emission into a single five-stage [`Pipeline`]. Stages 1-3 always
//! finish — and the mapping table is frozen — before any stage-4 rewrite
//! begins; the record-layout decoder (`cobol_anonymize_layout`) is a
//! secondary, opt-in concern for callers that want to inspect a file's
//! DATA DIVISION rather than anonymize it.

mod config;
mod discovery;
mod emit;
mod error;
mod pipeline;
mod report;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::Pipeline;
pub use report::{FileStatistics, Report};

pub use cobol_anonymize_mapping::NamingScheme;
pub use cobol_anonymize_transform::{Severity, ValidationFinding, ValidationReport};

/// Runs the full pipeline for `config` and returns the run [`Report`].
///
/// Convenience wrapper around `Pipeline::new(config).run()` for callers
/// that don't need to hold onto the `Pipeline` itself.
pub fn anonymize(config: Config) -> Result<Report> {
    Pipeline::new(config).run()
}
