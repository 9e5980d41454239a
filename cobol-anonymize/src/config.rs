//! Plain, `serde`-(de)serializable configuration matching spec.md §6's
//! flat option table. Parsing a config file from disk, merging CLI flags,
//! and environment-variable overlays are the caller's job; this struct is
//! the engine's only contract boundary.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use cobol_anonymize_mapping::NamingScheme;

fn default_extensions() -> Vec<String> {
    vec!["cob".to_string(), "cbl".to_string(), "cpy".to_string()]
}

fn default_encoding() -> String {
    "latin-1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_naming_scheme() -> NamingScheme {
    NamingScheme::Corporate
}

/// Engine configuration. Mirrors spec.md §6's option table field-for-field.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_encoding")]
    pub encoding: String,

    #[serde(default)]
    pub copybook_paths: Vec<PathBuf>,

    #[serde(default = "default_true")]
    pub anonymize_programs: bool,
    #[serde(default = "default_true")]
    pub anonymize_copybooks: bool,
    #[serde(default = "default_true")]
    pub anonymize_data: bool,
    #[serde(default = "default_true")]
    pub anonymize_paragraphs: bool,
    #[serde(default = "default_true")]
    pub anonymize_sections: bool,
    #[serde(default = "default_true")]
    pub anonymize_comments: bool,
    #[serde(default = "default_true")]
    pub anonymize_literals: bool,

    /// Overrides `anonymize_comments` when set: comment bodies are blanked
    /// rather than translated.
    #[serde(default)]
    pub strip_comments: bool,

    #[serde(default)]
    pub preserve_external: bool,

    #[serde(default = "default_true")]
    pub clean_sequence_area: bool,

    #[serde(default = "default_naming_scheme")]
    pub naming_scheme: NamingScheme,

    /// Reserved for reproducible adjective/noun and literal-scheme choice.
    /// The naming strategy itself is already deterministic on
    /// (original_name, role, counter); `seed` is accepted for interface
    /// compatibility and future use but does not currently perturb it.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub validate_only: bool,
    #[serde(default)]
    pub overwrite: bool,

    /// When true, a missing copybook is a fatal `CopyNotFoundError`
    /// instead of a warning.
    #[serde(default)]
    pub strict_copybooks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("anonymized"),
            extensions: default_extensions(),
            encoding: default_encoding(),
            copybook_paths: Vec::new(),
            anonymize_programs: true,
            anonymize_copybooks: true,
            anonymize_data: true,
            anonymize_paragraphs: true,
            anonymize_sections: true,
            anonymize_comments: true,
            anonymize_literals: true,
            strip_comments: false,
            preserve_external: false,
            clean_sequence_area: true,
            naming_scheme: default_naming_scheme(),
            seed: None,
            dry_run: false,
            validate_only: false,
            overwrite: false,
            strict_copybooks: false,
        }
    }
}

impl Config {
    /// Validates the configuration before any file I/O, per spec.md §7's
    /// "ConfigError surfaced before any file I/O" rule.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.input_dir.exists() {
            errors.push(format!(
                "input directory does not exist: {}",
                self.input_dir.display()
            ));
        }
        if !self.validate_only && !self.dry_run && self.output_dir.exists() && !self.output_dir.is_dir()
        {
            errors.push(format!(
                "output path is not a directory: {}",
                self.output_dir.display()
            ));
        }
        for path in &self.copybook_paths {
            if !path.exists() {
                errors.push(format!("copybook path does not exist: {}", path.display()));
            }
        }
        if self.extensions.is_empty() {
            errors.push("extensions list must not be empty".to_string());
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
