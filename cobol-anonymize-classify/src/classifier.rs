//! Classifies every identifier occurrence on a line, given the running
//! [`FileContext`].

use once_cell::sync::Lazy;
use regex::Regex;

use cobol_anonymize_core::{is_reserved, is_system, Role, Token, TokenKind};
use cobol_anonymize_lexer::tokenize;

use crate::context::{DataSection, Division, FileContext};
use crate::identifier::{ClassifiedIdentifier, IdentifierRole};

static COPY_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bCOPY\s+").unwrap());
static FD_SD_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*(FD|SD)\s+").unwrap());
static SECTION_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bSECTION\s*\.").unwrap());
static EXTERNAL_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(?:^|[\s.])EXTERNAL(?:[\s.,]|$)").unwrap());

/// Tracks context across lines of a single file and classifies each one.
pub struct IdentifierClassifier {
    context: FileContext,
    identifiers: Vec<ClassifiedIdentifier>,
    seen_definitions: std::collections::HashSet<String>,
}

impl IdentifierClassifier {
    pub fn new() -> Self {
        Self {
            context: FileContext::new(),
            identifiers: Vec::new(),
            seen_definitions: std::collections::HashSet::new(),
        }
    }

    pub fn all_identifiers(&self) -> &[ClassifiedIdentifier] {
        &self.identifiers
    }

    pub fn definitions(&self) -> impl Iterator<Item = &ClassifiedIdentifier> {
        self.identifiers.iter().filter(|i| i.is_definition)
    }

    /// Classifies one line's code area. `is_comment` lines and blank lines
    /// contribute nothing.
    pub fn classify_line(&mut self, code_area: &str, line_number: usize, is_comment: bool) -> Vec<ClassifiedIdentifier> {
        if is_comment {
            return Vec::new();
        }
        let upper = code_area.to_uppercase();
        self.update_context(&upper);

        let is_external = EXTERNAL_CLAUSE.is_match(&upper);
        if is_external {
            self.context.is_external_block = true;
        }

        let tokens = tokenize(code_area, line_number);

        let classified = if upper.contains("PROGRAM-ID") {
            self.classify_program_id(&tokens, line_number).into_iter().collect()
        } else if COPY_KEYWORD.is_match(&upper) {
            self.classify_copy_statement(&tokens, line_number).into_iter().collect()
        } else if FD_SD_LINE.is_match(&upper) {
            self.classify_fd_declaration(&tokens, line_number).into_iter().collect()
        } else if self.is_section_header(&upper) {
            self.classify_section_header(&tokens, line_number).into_iter().collect()
        } else if self.is_paragraph_definition(&tokens, &upper) {
            self.classify_paragraph(&tokens, line_number).into_iter().collect()
        } else if is_data_definition(&tokens) {
            self.classify_data_definition(&tokens, line_number, is_external)
        } else {
            self.classify_references(&tokens, line_number)
        };

        self.identifiers.extend(classified.clone());
        classified
    }

    fn update_context(&mut self, upper: &str) {
        if upper.contains("IDENTIFICATION DIVISION") {
            self.context.enter_division(Division::Identification);
        } else if upper.contains("ENVIRONMENT DIVISION") {
            self.context.enter_division(Division::Environment);
        } else if upper.contains("DATA DIVISION") {
            self.context.enter_division(Division::Data);
        } else if upper.contains("PROCEDURE DIVISION") {
            self.context.enter_division(Division::Procedure);
        }

        if matches!(self.context.division, Division::Data) {
            if upper.contains("FILE SECTION") {
                self.context.enter_section(DataSection::File);
            } else if upper.contains("WORKING-STORAGE SECTION") {
                self.context.enter_section(DataSection::WorkingStorage);
            } else if upper.contains("LOCAL-STORAGE SECTION") {
                self.context.enter_section(DataSection::LocalStorage);
            } else if upper.contains("LINKAGE SECTION") {
                self.context.enter_section(DataSection::Linkage);
            } else if upper.contains("SCREEN SECTION") {
                self.context.enter_section(DataSection::Screen);
            } else if upper.contains("REPORT SECTION") {
                self.context.enter_section(DataSection::Report);
            }
        }
    }

    fn is_section_header(&self, upper: &str) -> bool {
        self.context.in_procedure_division() && SECTION_HEADER.is_match(upper)
    }

    fn is_paragraph_definition(&self, tokens: &[Token], upper: &str) -> bool {
        if !self.context.in_procedure_division() {
            return false;
        }
        let stripped = upper.trim();
        if stripped.is_empty() {
            return false;
        }
        match tokens.iter().find(|t| t.kind != TokenKind::Whitespace) {
            Some(first) if first.kind == TokenKind::Identifier => {
                let remaining = stripped[first.original_value.len().min(stripped.len())..].trim();
                remaining == "." || remaining.is_empty()
            }
            _ => false,
        }
    }

    fn classify_program_id(&mut self, tokens: &[Token], line_number: usize) -> Option<ClassifiedIdentifier> {
        let token = find_token_after_substring_keyword(tokens, "PROGRAM-ID")?;
        self.seen_definitions.insert(token.original_value.to_uppercase());
        Some(ClassifiedIdentifier::definition(
            token.original_value.clone(),
            Role::Program,
            line_number,
            None,
            None,
            false,
        ))
    }

    fn classify_copy_statement(&mut self, tokens: &[Token], line_number: usize) -> Option<ClassifiedIdentifier> {
        let token = find_token_after_keyword(tokens, &["COPY"])?;
        Some(ClassifiedIdentifier::reference(
            token.original_value.clone(),
            IdentifierRole::Known(Role::Copybook),
            line_number,
        ))
    }

    fn classify_fd_declaration(&mut self, tokens: &[Token], line_number: usize) -> Option<ClassifiedIdentifier> {
        let token = find_identifier_after_keyword(tokens, &["FD", "SD"])?;
        self.context.current_fd_name = Some(token.original_value.clone());
        self.seen_definitions.insert(token.original_value.to_uppercase());
        Some(ClassifiedIdentifier::definition(
            token.original_value.clone(),
            Role::File,
            line_number,
            None,
            None,
            false,
        ))
    }

    fn classify_section_header(&mut self, tokens: &[Token], line_number: usize) -> Option<ClassifiedIdentifier> {
        let first = tokens.iter().find(|t| t.kind != TokenKind::Whitespace)?;
        if first.kind != TokenKind::Identifier {
            return None;
        }
        self.context.last_section = Some(first.original_value.clone());
        self.seen_definitions.insert(first.original_value.to_uppercase());
        Some(ClassifiedIdentifier::definition(
            first.original_value.clone(),
            Role::Section,
            line_number,
            None,
            None,
            false,
        ))
    }

    fn classify_paragraph(&mut self, tokens: &[Token], line_number: usize) -> Option<ClassifiedIdentifier> {
        let first = tokens.iter().find(|t| t.kind != TokenKind::Whitespace)?;
        if first.kind != TokenKind::Identifier {
            return None;
        }
        self.context.last_paragraph = Some(first.original_value.clone());
        self.seen_definitions.insert(first.original_value.to_uppercase());
        Some(ClassifiedIdentifier::definition(
            first.original_value.clone(),
            Role::Paragraph,
            line_number,
            None,
            None,
            false,
        ))
    }

    fn classify_data_definition(&mut self, tokens: &[Token], line_number: usize, is_external: bool) -> Vec<ClassifiedIdentifier> {
        let mut out = Vec::new();
        let mut level_number: Option<u32> = None;
        let mut data_name: Option<String> = None;
        let mut in_indexed_by = false;

        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::LevelNumber => {
                    level_number = token.original_value.trim().parse().ok();
                }
                TokenKind::Identifier => {
                    if data_name.is_none() && !in_indexed_by {
                        let name = token.original_value.clone();
                        let role = if level_number == Some(88) {
                            Role::Condition88
                        } else if is_external || self.context.is_external_block {
                            Role::External
                        } else {
                            Role::Data
                        };
                        if let Some(level) = level_number {
                            if level != 88 {
                                self.context.push_level(level, &name);
                            }
                        }
                        self.seen_definitions.insert(name.to_uppercase());
                        out.push(ClassifiedIdentifier::definition(
                            name.clone(),
                            role,
                            line_number,
                            level_number,
                            self.context.parent_name().map(|s| s.to_string()),
                            is_external,
                        ));
                        data_name = Some(name);
                    } else if in_indexed_by {
                        self.seen_definitions.insert(token.original_value.to_uppercase());
                        out.push(ClassifiedIdentifier::definition(
                            token.original_value.clone(),
                            Role::Index,
                            line_number,
                            None,
                            None,
                            false,
                        ));
                    }
                }
                TokenKind::Reserved if token.original_value.eq_ignore_ascii_case("INDEXED") => {
                    if let Some(next) = tokens[i + 1..].iter().find(|t| t.kind != TokenKind::Whitespace) {
                        if next.kind == TokenKind::Reserved && next.original_value.eq_ignore_ascii_case("BY") {
                            in_indexed_by = true;
                        }
                    }
                }
                _ => {}
            }
        }

        out
    }

    fn classify_references(&self, tokens: &[Token], line_number: usize) -> Vec<ClassifiedIdentifier> {
        tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .filter(|t| !is_reserved(&t.original_value) && !is_system(&t.original_value))
            .map(|t| {
                let role = if self.seen_definitions.contains(&t.original_value.to_uppercase()) {
                    IdentifierRole::Known(Role::Data)
                } else {
                    IdentifierRole::Unknown
                };
                ClassifiedIdentifier::reference(t.original_value.clone(), role, line_number)
            })
            .collect()
    }
}

impl Default for IdentifierClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn is_data_definition(tokens: &[Token]) -> bool {
    tokens
        .iter()
        .find(|t| t.kind != TokenKind::Whitespace)
        .map(|t| t.kind == TokenKind::LevelNumber)
        .unwrap_or(false)
}

/// Finds the first identifier/reserved-word token after a keyword whose
/// value exactly matches one of `keywords` (case-insensitive).
fn find_token_after_keyword<'a>(tokens: &'a [Token], keywords: &[&str]) -> Option<&'a Token> {
    let mut found = false;
    for token in tokens {
        if token.kind == TokenKind::Whitespace {
            continue;
        }
        if found {
            if matches!(token.kind, TokenKind::Identifier | TokenKind::Reserved) {
                return Some(token);
            }
            if token.kind == TokenKind::Punctuation {
                continue;
            }
            return None;
        }
        if matches!(token.kind, TokenKind::Reserved | TokenKind::Identifier)
            && keywords.iter().any(|kw| token.original_value.eq_ignore_ascii_case(kw))
        {
            found = true;
        }
    }
    None
}

/// Like [`find_token_after_keyword`], but only accepts `Identifier`
/// tokens after the keyword (used for `FD`/`SD`, which must be followed
/// by a file name, not another reserved word).
fn find_identifier_after_keyword<'a>(tokens: &'a [Token], keywords: &[&str]) -> Option<&'a Token> {
    let mut found = false;
    for token in tokens {
        if token.kind == TokenKind::Whitespace {
            continue;
        }
        if found {
            if token.kind == TokenKind::Identifier {
                return Some(token);
            }
            if token.kind == TokenKind::Punctuation {
                continue;
            }
            return None;
        }
        if matches!(token.kind, TokenKind::Reserved | TokenKind::Identifier)
            && keywords.iter().any(|kw| token.original_value.eq_ignore_ascii_case(kw))
        {
            found = true;
        }
    }
    None
}

/// `PROGRAM-ID` may lex as a single reserved word or, depending on
/// surrounding hyphenation, be split; match by substring the way the
/// keyword search itself is insensitive to that split.
fn find_token_after_substring_keyword<'a>(tokens: &'a [Token], keyword: &str) -> Option<&'a Token> {
    let mut found = false;
    for token in tokens {
        if token.kind == TokenKind::Whitespace {
            continue;
        }
        if found {
            if matches!(token.kind, TokenKind::Identifier | TokenKind::Reserved) {
                return Some(token);
            }
            if token.kind == TokenKind::Punctuation {
                continue;
            }
            return None;
        }
        if matches!(token.kind, TokenKind::Reserved | TokenKind::Identifier)
            && token.original_value.to_uppercase().contains(keyword)
        {
            found = true;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use cobol_anonymize_core::Role;

    #[test]
    fn program_id_is_classified_as_program_name() {
        let mut c = IdentifierClassifier::new();
        c.classify_line("IDENTIFICATION DIVISION.", 1, false);
        let found = c.classify_line("PROGRAM-ID. MYPROG.", 2, false);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].role, IdentifierRole::Known(Role::Program));
        assert!(found[0].is_definition);
    }

    #[test]
    fn data_item_pushes_parent_for_nested_group() {
        let mut c = IdentifierClassifier::new();
        c.classify_line("DATA DIVISION.", 1, false);
        c.classify_line("WORKING-STORAGE SECTION.", 2, false);
        c.classify_line("01  WS-GROUP.", 3, false);
        let found = c.classify_line("05  WS-CHILD PIC X(5).", 4, false);
        assert_eq!(found[0].parent_name.as_deref(), Some("WS-GROUP"));
    }

    #[test]
    fn level_88_is_condition_name() {
        let mut c = IdentifierClassifier::new();
        c.classify_line("DATA DIVISION.", 1, false);
        c.classify_line("WORKING-STORAGE SECTION.", 2, false);
        c.classify_line("01  WS-FLAG PIC X.", 3, false);
        let found = c.classify_line("88  WS-FLAG-ON VALUE 'Y'.", 4, false);
        assert_eq!(found[0].role, IdentifierRole::Known(Role::Condition88));
    }

    #[test]
    fn indexed_by_produces_index_name() {
        let mut c = IdentifierClassifier::new();
        c.classify_line("DATA DIVISION.", 1, false);
        c.classify_line("WORKING-STORAGE SECTION.", 2, false);
        let found = c.classify_line(
            "01  WS-TABLE OCCURS 10 TIMES INDEXED BY WS-IDX.",
            3,
            false,
        );
        assert!(found.iter().any(|i| i.role == IdentifierRole::Known(Role::Index) && i.name == "WS-IDX"));
    }

    #[test]
    fn filler_is_not_emitted_as_a_reference() {
        let mut c = IdentifierClassifier::new();
        c.classify_line("PROCEDURE DIVISION.", 1, false);
        let found = c.classify_line("    MOVE FILLER TO WS-OUT", 2, false);
        assert!(!found.iter().any(|i| i.name.eq_ignore_ascii_case("FILLER")));
    }
}
