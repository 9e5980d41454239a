//! Token-by-token line reconstruction: the heart of stage 4.

use cobol_anonymize_core::{is_filler, is_reserved, is_system, IndicatorKind, LineAreas, SourceLine, Token, TokenKind};
use cobol_anonymize_lexer::tokenize;
use cobol_anonymize_mapping::MappingTable;

use crate::comment::{CommentMode, CommentRewriter};
use crate::literal::LiteralRewriter;
use crate::redefines::RedefinesTracker;

/// Flags controlling which categories stage 4 rewrites. Mirrors the
/// `anonymize_*` options of the engine configuration.
#[derive(Clone, Debug)]
pub struct TransformerConfig {
    pub anonymize_programs: bool,
    pub anonymize_copybooks: bool,
    pub anonymize_data: bool,
    pub anonymize_paragraphs: bool,
    pub anonymize_sections: bool,
    pub comment_mode: CommentMode,
    pub anonymize_literals: bool,
    pub preserve_external: bool,
    pub clean_sequence_area: bool,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            anonymize_programs: true,
            anonymize_copybooks: true,
            anonymize_data: true,
            anonymize_paragraphs: true,
            anonymize_sections: true,
            comment_mode: CommentMode::Anonymize,
            anonymize_literals: false,
            preserve_external: true,
            clean_sequence_area: false,
        }
    }
}

/// One line's transformation outcome.
#[derive(Clone, Debug)]
pub struct LineWarning {
    pub line_number: usize,
    pub message: String,
}

/// Everything produced by transforming a single file.
pub struct FileTransformResult {
    pub lines: Vec<String>,
    pub warnings: Vec<LineWarning>,
}

/// Rewrites every line of one file against a frozen, read-only mapping
/// table. Holds the per-file state (REDEFINES tracker, comment name
/// counter, literal generator position) that must not leak across files.
pub struct Transformer<'a> {
    config: TransformerConfig,
    mapping: &'a MappingTable,
    redefines: RedefinesTracker,
    comments: CommentRewriter,
    literals: LiteralRewriter,
}

impl<'a> Transformer<'a> {
    pub fn new(
        config: TransformerConfig,
        mapping: &'a MappingTable,
        literal_rewriter: LiteralRewriter,
    ) -> Self {
        let comment_mode = config.comment_mode;
        Self {
            config,
            mapping,
            redefines: RedefinesTracker::new(),
            comments: CommentRewriter::new(comment_mode),
            literals: literal_rewriter,
        }
    }

    pub fn redefines(&self) -> &RedefinesTracker {
        &self.redefines
    }

    pub fn transform_file(&mut self, lines: &[SourceLine], _file_name: &str) -> FileTransformResult {
        let mut out_lines = Vec::with_capacity(lines.len());
        let mut warnings = Vec::new();

        for line in lines {
            let mut areas = LineAreas::parse(line);

            if areas.indicator_kind() == IndicatorKind::Comment {
                let body = areas.code_area();
                let rewritten = self.comments.rewrite(&body);
                // Comment text isn't subject to the code-area byte limit
                // (translations can run longer than the original, e.g.
                // GESTIONE -> MANAGEMENT), so it all goes in area_b and
                // area_a is left blank.
                areas.area_a = String::new();
                areas.area_b = rewritten;
                out_lines.push(self.finish_line(&areas, line));
                continue;
            }

            let code_area = areas.code_area();
            self.redefines.observe(&code_area, line.line_number);

            let mut tokens = tokenize(&code_area, line.line_number);
            self.rewrite_identifiers(&mut tokens);
            self.rewrite_call_literal(&mut tokens);
            if self.config.anonymize_literals {
                self.rewrite_remaining_literals(&mut tokens);
            }

            let new_body = reconstruct_code_area(&code_area, &tokens);

            if let Err(err) = cobol_anonymize_core::line::validate_code_area(&new_body) {
                log::warn!("line {}: {}", line.line_number, err);
                warnings.push(LineWarning {
                    line_number: line.line_number,
                    message: err.to_string(),
                });
            }

            areas.area_a = String::new();
            areas.area_b = new_body;
            if self.config.clean_sequence_area {
                areas.sequence = " ".repeat(areas.sequence.chars().count());
            }

            out_lines.push(self.finish_line(&areas, line));
        }

        FileTransformResult {
            lines: out_lines,
            warnings,
        }
    }

    fn finish_line(&self, areas: &LineAreas, _original: &SourceLine) -> String {
        areas.reconstruct()
    }

    fn rewrite_identifiers(&mut self, tokens: &mut [Token]) {
        for token in tokens.iter_mut() {
            if token.kind != TokenKind::Identifier {
                continue;
            }
            if is_filler(&token.original_value) || is_reserved(&token.original_value) {
                continue;
            }
            if is_system(&token.original_value) {
                continue;
            }
            if self.config.preserve_external && self.mapping.is_external(&token.original_value) {
                continue;
            }
            if let Some(entry) = self.mapping.get(&token.original_value) {
                if self.config.category_enabled(entry.id_type)
                    && !entry.anonymized_name.eq_ignore_ascii_case(&token.original_value)
                {
                    token.set_value(entry.anonymized_name.clone());
                }
            }
        }
    }

    /// `CALL 'PROGRAM-NAME' ...`: if the literal names a mapped program,
    /// substitute its contents while keeping the original quote char.
    fn rewrite_call_literal(&mut self, tokens: &mut [Token]) {
        let is_call = tokens
            .iter()
            .find(|t| t.kind != TokenKind::Whitespace)
            .map(|t| t.original_value.eq_ignore_ascii_case("CALL"))
            .unwrap_or(false);
        if !is_call {
            return;
        }
        if let Some(token) = tokens.iter_mut().find(|t| t.kind == TokenKind::StringLiteral) {
            let quote = token.original_value.chars().next().unwrap_or('\'');
            let inner = &token.original_value[1..token.original_value.len().saturating_sub(1)];
            if let Some(entry) = self.mapping.get(inner) {
                if !entry.anonymized_name.eq_ignore_ascii_case(inner) {
                    token.set_value(format!("{quote}{}{quote}", entry.anonymized_name));
                }
            }
        }
    }

    fn rewrite_remaining_literals(&mut self, tokens: &mut [Token]) {
        for token in tokens.iter_mut() {
            if token.kind != TokenKind::StringLiteral {
                continue;
            }
            // Skip literals already rewritten as a CALL program target.
            if token.value != token.original_value {
                continue;
            }
            let quote = token.original_value.chars().next().unwrap_or('\'');
            let inner_len = token.original_value.len().saturating_sub(2);
            let inner = if token.original_value.len() >= 2 {
                &token.original_value[1..1 + inner_len]
            } else {
                ""
            };
            let anonymized = self.literals.anonymize(inner);
            token.set_value(format!("{quote}{anonymized}{quote}"));
        }
    }
}

impl TransformerConfig {
    fn category_enabled(&self, role: cobol_anonymize_core::Role) -> bool {
        use cobol_anonymize_core::Role;
        match role {
            Role::Program => self.anonymize_programs,
            Role::Copybook => self.anonymize_copybooks,
            Role::Data | Role::Condition88 | Role::File | Role::Index => self.anonymize_data,
            Role::Paragraph => self.anonymize_paragraphs,
            Role::Section => self.anonymize_sections,
            Role::External => !self.preserve_external,
        }
    }
}

/// Rebuilds the code area by walking tokens in start-position order,
/// emitting the original bytes for any gap between the previous token's
/// end and the current token's start (preserving indentation/punctuation
/// exactly) then the token's possibly-modified value.
fn reconstruct_code_area(original_code_area: &str, tokens: &[Token]) -> String {
    let mut out = String::with_capacity(original_code_area.len());
    let mut cursor = 0usize;
    for token in tokens {
        if token.start > cursor {
            out.push_str(&original_code_area[cursor..token.start]);
        }
        out.push_str(&token.value);
        cursor = token.end.max(cursor);
    }
    if cursor < original_code_area.len() {
        out.push_str(&original_code_area[cursor..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cobol_anonymize_core::{LineTerminator, Role};
    use cobol_anonymize_mapping::NamingScheme;

    fn line(content: &str, n: usize) -> SourceLine {
        SourceLine {
            content: content.to_string(),
            line_number: n,
            terminator: LineTerminator::Lf,
        }
    }

    #[test]
    fn program_id_is_replaced_at_same_column() {
        let mut mapping = MappingTable::new(NamingScheme::Numeric);
        mapping
            .get_or_create("TESTPROG", Role::Program, false, None, None)
            .unwrap();
        let literals = LiteralRewriter::new(NamingScheme::Animals);
        let mut transformer = Transformer::new(TransformerConfig::default(), &mapping, literals);

        let input = line("       PROGRAM-ID.    TESTPROG.", 1);
        let result = transformer.transform_file(&[input], "P.cbl");
        assert!(result.lines[0].contains("PG"));
        assert!(!result.lines[0].contains("TESTPROG"));
    }

    #[test]
    fn pic_clause_is_untouched_by_identifier_rewrite() {
        let mut mapping = MappingTable::new(NamingScheme::Numeric);
        mapping
            .get_or_create("WS-FIELD", Role::Data, false, None, None)
            .unwrap();
        let literals = LiteralRewriter::new(NamingScheme::Animals);
        let mut transformer = Transformer::new(TransformerConfig::default(), &mapping, literals);

        let input = line("       05 WS-FIELD PIC X(30).", 1);
        let result = transformer.transform_file(&[input], "P.cbl");
        assert!(result.lines[0].contains("PIC X(30)."));
    }

    #[test]
    fn call_literal_naming_mapped_program_is_substituted() {
        let mut mapping = MappingTable::new(NamingScheme::Numeric);
        let synthetic = mapping
            .get_or_create("TESTPROG", Role::Program, false, None, None)
            .unwrap();
        let literals = LiteralRewriter::new(NamingScheme::Animals);
        let mut transformer = Transformer::new(TransformerConfig::default(), &mapping, literals);

        let input = line("           CALL 'TESTPROG' USING WS-DATA.", 1);
        let result = transformer.transform_file(&[input], "P.cbl");
        assert!(result.lines[0].contains(&synthetic));
        assert!(!result.lines[0].contains("'TESTPROG'"));
    }
}
