//! Orchestrates the five pipeline stages in the strict order spec.md §5
//! requires: discovery & dependency resolution, classification, mapping,
//! transformation, emission. Stages 1-3 fully complete — and the mapping
//! table is frozen to read-only access — before any stage-4 work starts;
//! the borrow checker enforces this directly, since [`Transformer`] only
//! ever holds a shared reference to the finished table.

use std::collections::HashMap;
use std::path::PathBuf;

use cobol_anonymize_classify::IdentifierClassifier;
use cobol_anonymize_core::{IndicatorKind, LineAreas, LineTerminator, Role, SourceLine};
use cobol_anonymize_graph::{build_dependency_graph, normalize, CopyResolver};
use cobol_anonymize_mapping::{MappingTable, NamingScheme};
use cobol_anonymize_transform::{validate as validate_output, LiteralRewriter, Transformer, TransformerConfig};

use crate::config::Config;
use crate::discovery::{discover_files, DiscoveredFile};
use crate::emit;
use crate::error::{Error, Result};
use crate::report::{FileStatistics, Report};

/// One definition-site occurrence collected during stage 2, tagged with
/// the file it came from (the classifier itself is file-scoped and knows
/// nothing about the batch).
struct TaggedDefinition {
    file_name: String,
    name: String,
    role: Role,
    is_external: bool,
    line_number: usize,
}

pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<Report> {
        let errors = self.config.validate();
        if !errors.is_empty() {
            return Err(Error::Config(errors.join("; ")));
        }

        let mut report = Report::new(
            self.config.input_dir.display().to_string(),
            self.config.output_dir.display().to_string(),
            self.config.naming_scheme.as_str(),
        );

        // --- Stage 1: discovery & dependency resolution ---
        log::info!("discovering files under {}", self.config.input_dir.display());
        let files = discover_files(
            &self.config.input_dir,
            &self.config.copybook_paths,
            &self.config.extensions,
            &self.config.encoding,
        )?;
        report.total_files = files.len();

        let order = self.resolve_processing_order(&files, &mut report)?;
        let by_key: HashMap<String, &DiscoveredFile> =
            files.iter().map(|f| (normalize(&f.file_name), f)).collect();
        let ordered_files: Vec<&DiscoveredFile> =
            order.iter().filter_map(|key| by_key.get(key).copied()).collect();

        // --- Stage 2: classification ---
        log::info!("classifying {} files", ordered_files.len());
        let mut definitions = Vec::new();
        let mut per_file_lines: HashMap<String, Vec<SourceLine>> = HashMap::new();
        for file in &ordered_files {
            let lines = split_lines(&file.contents);
            report.total_lines += lines.len();
            definitions.extend(self.classify_file(file, &lines));
            per_file_lines.insert(file.file_name.clone(), lines);
        }

        // --- Stage 3: mapping ---
        log::info!("building mapping table ({} definitions)", definitions.len());
        let mut mapping = MappingTable::new(self.config.naming_scheme);
        for def in &definitions {
            mapping
                .get_or_create(&def.name, def.role, def.is_external, Some(&def.file_name), Some(def.line_number))
                .map_err(Error::from)?;
        }
        for file in &ordered_files {
            let stem = std::path::Path::new(&file.file_name)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(&file.file_name);
            let id_type = if file.file_name.to_lowercase().ends_with(".cpy") {
                Role::Copybook
            } else {
                Role::Program
            };
            mapping
                .get_or_create(stem, id_type, false, Some(&file.file_name), None)
                .map_err(Error::from)?;
        }
        report.fill_from_mapping(&mapping);

        // --- Stage 4: transformation (mapping table is now read-only) ---
        // `dry_run`/`validate_only` still transform in memory and run the
        // stage-5 checks below — only the actual filesystem writes are
        // skipped (inside `emit::prepare_output_dir`/`write_file`/
        // `write_mapping_artifacts`), so validate-only mode still catches
        // the errors it exists to catch.
        emit::prepare_output_dir(
            &self.config.output_dir,
            self.config.overwrite,
            self.config.dry_run,
            self.config.validate_only,
        )?;

        let literal_scheme = select_literal_scheme(self.config.naming_scheme);
        let transformer_config = self.transformer_config();

        let mut emitted_files = Vec::with_capacity(ordered_files.len());
        for file in &ordered_files {
            let lines = per_file_lines.get(&file.file_name).expect("classified above");
            let mut transformer = Transformer::new(
                transformer_config.clone(),
                &mapping,
                LiteralRewriter::new(literal_scheme),
            );
            let result = transformer.transform_file(lines, &file.file_name);

            let anonymized_name = emit::anonymized_file_name(&file.file_name, &mapping);
            emit::write_file(
                &self.config.output_dir,
                &anonymized_name,
                &result.lines,
                self.config.dry_run,
                self.config.validate_only,
            )?;

            for warning in &result.warnings {
                report.warnings.push(format!(
                    "{}:{}: {}",
                    file.file_name, warning.line_number, warning.message
                ));
                log::warn!("{}:{}: {}", file.file_name, warning.line_number, warning.message);
            }

            report.file_statistics.push(FileStatistics {
                original_name: file.file_name.clone(),
                anonymized_name: anonymized_name.clone(),
                total_lines: result.lines.len(),
                warnings: result.warnings.len(),
            });
            emitted_files.push((anonymized_name, result.lines));
        }

        // --- Stage 5: post-emission validation & mapping artifacts ---
        log::info!("validating {} emitted files", emitted_files.len());
        report.validation = validate_output(&emitted_files, &mapping);
        for finding in &report.validation.findings {
            report
                .warnings
                .push(format!("{}: {}", finding.file, finding.message));
        }

        if !self.config.dry_run && !self.config.validate_only {
            emit::write_mapping_artifacts(&self.config.output_dir, &mapping)?;
        }

        if report.has_validation_errors() {
            let error_count = report
                .validation
                .findings
                .iter()
                .filter(|f| f.severity == cobol_anonymize_transform::Severity::Error)
                .count();
            return Err(Error::ValidationFailed(error_count));
        }

        Ok(report)
    }

    /// Scans `COPY` statements and returns the dependency-ordered,
    /// normalized file key list. A missing copybook is fatal only when
    /// `strict_copybooks` is set; otherwise it's logged and recorded as
    /// a warning in `report`.
    fn resolve_processing_order(&self, files: &[DiscoveredFile], report: &mut Report) -> Result<Vec<String>> {
        let mut resolver = CopyResolver::new(self.config.copybook_paths.clone(), self.config.strict_copybooks);
        let file_pairs: Vec<(String, String)> = files
            .iter()
            .map(|f| (f.file_name.clone(), f.contents.clone()))
            .collect();
        let (graph, warnings) = build_dependency_graph(&mut resolver, &file_pairs);

        for warning in warnings {
            match warning {
                cobol_anonymize_graph::ResolverError::CopyNotFound { copybook, file, line } => {
                    if self.config.strict_copybooks {
                        return Err(Error::CopyNotFound { copybook, file, line });
                    }
                    let message = format!("{file}:{line}: copybook '{copybook}' not found");
                    log::warn!("{message}");
                    report.warnings.push(message);
                }
            }
        }

        graph.topological_order().map_err(Error::from)
    }

    fn classify_file(&self, file: &DiscoveredFile, lines: &[SourceLine]) -> Vec<TaggedDefinition> {
        let mut classifier = IdentifierClassifier::new();
        let mut out = Vec::new();
        for line in lines {
            let areas = LineAreas::parse(line);
            let is_comment = areas.indicator_kind() == IndicatorKind::Comment;
            let found = classifier.classify_line(&areas.code_area(), line.line_number, is_comment);
            for ident in found.into_iter().filter(|i| i.is_definition) {
                if let Some(role) = ident.role.role() {
                    out.push(TaggedDefinition {
                        file_name: file.file_name.clone(),
                        name: ident.name,
                        role,
                        is_external: ident.is_external,
                        line_number: ident.line_number,
                    });
                }
            }
        }
        out
    }

    fn transformer_config(&self) -> TransformerConfig {
        use cobol_anonymize_transform::CommentMode;
        let comment_mode = if self.config.strip_comments {
            CommentMode::Strip
        } else if self.config.anonymize_comments {
            CommentMode::Anonymize
        } else {
            CommentMode::Preserve
        };
        TransformerConfig {
            anonymize_programs: self.config.anonymize_programs,
            anonymize_copybooks: self.config.anonymize_copybooks,
            anonymize_data: self.config.anonymize_data,
            anonymize_paragraphs: self.config.anonymize_paragraphs,
            anonymize_sections: self.config.anonymize_sections,
            comment_mode,
            anonymize_literals: self.config.anonymize_literals,
            preserve_external: self.config.preserve_external,
            clean_sequence_area: self.config.clean_sequence_area,
        }
    }
}

/// Picks a word-based scheme distinct from the identifier naming scheme
/// for literal-content generation, falling back to `Animals` when the
/// identifier scheme itself is `Numeric` (which has no "other word-based"
/// siblings to avoid).
fn select_literal_scheme(naming_scheme: NamingScheme) -> NamingScheme {
    naming_scheme
        .other_word_based()
        .into_iter()
        .next()
        .unwrap_or(NamingScheme::Animals)
}

fn split_lines(content: &str) -> Vec<SourceLine> {
    let mut lines = Vec::new();
    let mut line_number = 1;
    for raw in content.split('\n') {
        let (body, terminator) = if let Some(stripped) = raw.strip_suffix('\r') {
            (stripped, LineTerminator::CrLf)
        } else {
            (raw, LineTerminator::Lf)
        };
        lines.push(SourceLine {
            content: body.to_string(),
            line_number,
            terminator,
        });
        line_number += 1;
    }
    // `split('\n')` yields a trailing empty element when content ends in
    // a newline; drop it so emission doesn't add a spurious blank line.
    if content.ends_with('\n') {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_drops_trailing_empty_after_final_newline() {
        let lines = split_lines("A\nB\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].content, "B");
    }

    #[test]
    fn split_lines_keeps_last_line_without_trailing_newline() {
        let lines = split_lines("A\nB");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].content, "B");
    }

    #[test]
    fn literal_scheme_differs_from_identifier_scheme() {
        assert_ne!(select_literal_scheme(NamingScheme::Corporate), NamingScheme::Corporate);
        assert_eq!(select_literal_scheme(NamingScheme::Numeric), NamingScheme::Animals);
    }
}
