//! Token kinds produced by the column-aware lexer over a line's code area.

use std::fmt;

/// The kind of a lexical token within a COBOL code area.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    Identifier,
    Reserved,
    StringLiteral,
    NumericLiteral,
    LevelNumber,
    Operator,
    Punctuation,
    Whitespace,
    Comment,
    /// Spans an entire `PIC`/`PICTURE` clause. Protected: never rewritten.
    PicClause,
    /// Spans an entire `USAGE` clause. Protected: never rewritten.
    UsageClause,
    Unknown,
}

impl TokenKind {
    /// Protected tokens must never have any of their bytes altered by the
    /// transformer.
    pub fn is_protected(&self) -> bool {
        matches!(self, TokenKind::PicClause | TokenKind::UsageClause)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Reserved => "reserved",
            TokenKind::StringLiteral => "string-literal",
            TokenKind::NumericLiteral => "numeric-literal",
            TokenKind::LevelNumber => "level-number",
            TokenKind::Operator => "operator",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comment => "comment",
            TokenKind::PicClause => "pic-clause",
            TokenKind::UsageClause => "usage-clause",
            TokenKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A single token lexed from a line's code area.
///
/// `start`/`end` are byte offsets within the code area (area A + area B
/// concatenated, i.e. columns 8-72). `original_value` carries the
/// pre-transformation text so the reconstructor can absorb length changes;
/// `value` starts out equal to it and is mutated in place by the
/// transformer.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub original_value: String,
    pub start: usize,
    pub end: usize,
    pub line_number: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, start: usize, end: usize, line_number: usize) -> Self {
        let value = value.into();
        Self {
            original_value: value.clone(),
            value,
            start,
            end,
            kind,
            line_number,
        }
    }

    pub fn len(&self) -> usize {
        self.original_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original_value.is_empty()
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self.kind, TokenKind::Identifier)
    }

    /// Replaces the token's (possibly length-changing) value. The original
    /// span bookkeeping (`start`, `end`, `original_value`) is untouched so
    /// reconstruction can still find the original gap boundaries.
    pub fn set_value(&mut self, new_value: impl Into<String>) {
        self.value = new_value.into();
    }
}
