//! Column-aware lexer: turns a line's code area (columns 8-72) into a
//! stream of [`Token`]s, then overlays PIC/USAGE clause spans as protected
//! ranges.

use cobol_anonymize_core::{
    find_pic_clauses, find_usage_clauses, is_reserved, Token, TokenKind,
};

/// Tokenizes a line's code area.
///
/// `offset` is the byte offset of the code area's first character within
/// the full line (used only so callers can relate token spans back to the
/// original line if needed); token `start`/`end` are relative to the code
/// area itself, matching the data model in the specification.
pub fn tokenize(code_area: &str, line_number: usize) -> Vec<Token> {
    let mut tokens = lex_raw(code_area, line_number);
    retag_leading_level_number(&mut tokens);
    overlay_protected_clauses(code_area, &mut tokens);
    tokens
}

fn lex_raw(code_area: &str, line_number: usize) -> Vec<Token> {
    let bytes = code_area.as_bytes();
    let len = bytes.len();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < len {
        let c = bytes[i] as char;

        if c.is_whitespace() {
            let start = i;
            while i < len && (bytes[i] as char).is_whitespace() {
                i += 1;
            }
            tokens.push(Token::new(TokenKind::Whitespace, &code_area[start..i], start, i, line_number));
            continue;
        }

        if c == '\'' || c == '"' {
            let quote = c;
            let start = i;
            i += 1;
            while i < len && bytes[i] as char != quote {
                i += 1;
            }
            if i < len {
                i += 1; // consume closing quote
            }
            tokens.push(Token::new(TokenKind::StringLiteral, &code_area[start..i], start, i, line_number));
            continue;
        }

        if c.is_ascii_digit() {
            let start = i;
            while i < len && (bytes[i] as char).is_ascii_digit() {
                i += 1;
            }
            // A decimal point mid-number (not a trailing period) keeps the
            // literal going, e.g. 3.14 inside a VALUE clause.
            if i < len
                && bytes[i] as char == '.'
                && i + 1 < len
                && (bytes[i + 1] as char).is_ascii_digit()
            {
                i += 1;
                while i < len && (bytes[i] as char).is_ascii_digit() {
                    i += 1;
                }
            }
            tokens.push(Token::new(TokenKind::NumericLiteral, &code_area[start..i], start, i, line_number));
            continue;
        }

        if c.is_ascii_alphabetic() {
            let start = i;
            while i < len {
                let ch = bytes[i] as char;
                if ch.is_ascii_alphanumeric() || ch == '-' {
                    i += 1;
                } else {
                    break;
                }
            }
            // A trailing hyphen is never part of a COBOL word; back off.
            let mut end = i;
            while end > start && code_area.as_bytes()[end - 1] == b'-' {
                end -= 1;
            }
            i = end;
            let word = &code_area[start..end];
            let kind = if is_reserved(word) {
                TokenKind::Reserved
            } else {
                TokenKind::Identifier
            };
            tokens.push(Token::new(kind, word, start, end, line_number));
            continue;
        }

        // Punctuation and operators.
        let start = i;
        let (kind, width) = classify_symbol(code_area, i);
        i += width;
        tokens.push(Token::new(kind, &code_area[start..i], start, i, line_number));
    }

    tokens
}

fn classify_symbol(code_area: &str, i: usize) -> (TokenKind, usize) {
    let bytes = code_area.as_bytes();
    let c = bytes[i] as char;
    let next = bytes.get(i + 1).map(|b| *b as char);
    match (c, next) {
        (',', _) | (';', _) | ('.', _) | ('(', _) | (')', _) => (TokenKind::Punctuation, 1),
        ('>', Some('=')) | ('<', Some('=')) | ('<', Some('>')) => (TokenKind::Operator, 2),
        ('+', _) | ('-', _) | ('*', _) | ('/', _) | ('=', _) | ('>', _) | ('<', _) => {
            (TokenKind::Operator, 1)
        }
        _ => (TokenKind::Unknown, 1),
    }
}

/// The first non-whitespace token of a data-definition line is a level
/// number (01-49, 66, 77, 88); retag it if the lexical shape matches.
fn retag_leading_level_number(tokens: &mut [Token]) {
    if let Some(first) = tokens.iter_mut().find(|t| t.kind != TokenKind::Whitespace) {
        if first.kind == TokenKind::NumericLiteral {
            let digits = first.original_value.trim();
            if digits.len() <= 2 && digits.chars().all(|c| c.is_ascii_digit()) {
                if let Ok(n) = digits.parse::<u32>() {
                    if (1..=49).contains(&n) || n == 66 || n == 77 || n == 88 {
                        first.kind = TokenKind::LevelNumber;
                    }
                }
            }
        }
    }
}

/// Finds PIC/USAGE clause spans in the code area and marks every token
/// that falls (even partially) within one of them as protected, merging
/// the covered tokens into a single protected span token so the
/// transformer can never see a seam inside a clause.
fn overlay_protected_clauses(code_area: &str, tokens: &mut Vec<Token>) {
    let mut spans: Vec<(usize, usize, TokenKind)> = find_pic_clauses(code_area)
        .into_iter()
        .map(|c| (c.start, c.end, TokenKind::PicClause))
        .collect();
    spans.extend(
        find_usage_clauses(code_area)
            .into_iter()
            .map(|c| (c.start, c.end, TokenKind::UsageClause)),
    );
    if spans.is_empty() {
        return;
    }
    spans.sort_by_key(|s| s.0);

    let line_number = tokens.first().map(|t| t.line_number).unwrap_or(1);
    let mut rebuilt = Vec::with_capacity(tokens.len());
    let mut cursor = 0usize;

    for (start, end, kind) in spans {
        // Keep any tokens entirely before this span untouched.
        while cursor < tokens.len() && tokens[cursor].end <= start {
            rebuilt.push(tokens[cursor].clone());
            cursor += 1;
        }
        // Skip tokens swallowed by the span and record its exact text.
        while cursor < tokens.len() && tokens[cursor].start < end {
            cursor += 1;
        }
        let text = &code_area[start..end];
        rebuilt.push(Token::new(kind, text, start, end, line_number));
    }
    while cursor < tokens.len() {
        rebuilt.push(tokens[cursor].clone());
        cursor += 1;
    }
    rebuilt.sort_by_key(|t| t.start);
    *tokens = rebuilt;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_identifiers_and_reserved_words() {
        let tokens = tokenize("MOVE WS-FIELD TO WS-OTHER", 1);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert!(kinds.contains(&cobol_anonymize_core::TokenKind::Reserved));
        assert!(kinds.contains(&cobol_anonymize_core::TokenKind::Identifier));
    }

    #[test]
    fn leading_level_number_is_retagged() {
        let tokens = tokenize("05  WS-FIELD", 1);
        let first = tokens.iter().find(|t| t.kind != TokenKind::Whitespace).unwrap();
        assert_eq!(first.kind, TokenKind::LevelNumber);
    }

    #[test]
    fn pic_clause_becomes_a_single_protected_token() {
        let tokens = tokenize("05  WS-FIELD PIC X(30).", 1);
        let pic = tokens.iter().find(|t| t.kind == TokenKind::PicClause).unwrap();
        assert_eq!(pic.original_value, "PIC X(30)");
        assert!(pic.kind.is_protected());
    }

    #[test]
    fn string_literal_is_tokenized() {
        let tokens = tokenize("CALL 'TESTPROG' USING WS-DATA", 1);
        let lit = tokens
            .iter()
            .find(|t| t.kind == TokenKind::StringLiteral)
            .unwrap();
        assert_eq!(lit.original_value, "'TESTPROG'");
    }
}
