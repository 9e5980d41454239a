//! Run summary: per-file statistics, warnings, and validation findings,
//! the way the pipeline's caller learns what happened without re-reading
//! every emitted file.

use serde::Serialize;

use cobol_anonymize_mapping::MappingTable;
use cobol_anonymize_transform::ValidationReport;

/// Statistics for a single processed file.
#[derive(Clone, Debug, Serialize)]
pub struct FileStatistics {
    pub original_name: String,
    pub anonymized_name: String,
    pub total_lines: usize,
    pub warnings: usize,
}

/// The complete outcome of a pipeline run.
#[derive(Debug, Serialize)]
pub struct Report {
    pub generated_at: String,
    pub source_directory: String,
    pub output_directory: String,
    pub naming_scheme: String,
    pub total_files: usize,
    pub total_lines: usize,
    pub total_identifiers: usize,
    pub external_names: Vec<String>,
    pub file_statistics: Vec<FileStatistics>,
    pub warnings: Vec<String>,
    #[serde(skip)]
    pub validation: ValidationReport,
}

impl Report {
    pub fn new(source_directory: String, output_directory: String, naming_scheme: &str) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            source_directory,
            output_directory,
            naming_scheme: naming_scheme.to_string(),
            total_files: 0,
            total_lines: 0,
            total_identifiers: 0,
            external_names: Vec::new(),
            file_statistics: Vec::new(),
            warnings: Vec::new(),
            validation: ValidationReport::default(),
        }
    }

    pub fn fill_from_mapping(&mut self, mapping: &MappingTable) {
        self.total_identifiers = mapping.all_entries().count();
        self.external_names = mapping
            .all_entries()
            .filter(|e| e.is_external)
            .map(|e| e.original_name.clone())
            .collect();
        self.external_names.sort();
    }

    pub fn has_validation_errors(&self) -> bool {
        self.validation.has_errors()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
