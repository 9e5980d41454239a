//! Shared types for the COBOL batch anonymization engine.
//!
//! This crate has no knowledge of files, directories, or the pipeline; it
//! only defines the fixed-format line model, the token vocabulary, the
//! closed reserved-word/figurative/special-register/system-identifier
//! catalog, and PIC/USAGE clause recognition — the vocabulary every other
//! crate in the workspace builds on.

pub mod error;
pub mod line;
pub mod pic;
pub mod reserved;
pub mod token;

pub use error::CoreError;
pub use line::{IndicatorKind, LineAreas, LineTerminator, SourceLine, MAX_CODE_AREA_LEN};
pub use pic::{find_pic_clauses, find_usage_clauses, PicClause, PicKind, UsageClause, UsageKind};
pub use reserved::{category, is_figurative, is_filler, is_reserved, is_special_register, is_system, WordCategory};
pub use token::{Token, TokenKind};

/// The nine identifier roles the classifier assigns.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Program,
    Copybook,
    Section,
    Paragraph,
    Data,
    Condition88,
    File,
    Index,
    External,
}

impl Role {
    /// Short prefix used by the numeric naming strategy.
    pub fn prefix(self) -> &'static str {
        match self {
            Role::Program => "PG",
            Role::Copybook => "CP",
            Role::Section => "SC",
            Role::Paragraph => "PA",
            Role::Data => "D",
            Role::Condition88 => "C",
            Role::File => "FL",
            Role::Index => "IX",
            Role::External => "EX",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Program => "PROGRAM_NAME",
            Role::Copybook => "COPYBOOK_NAME",
            Role::Section => "SECTION_NAME",
            Role::Paragraph => "PARAGRAPH_NAME",
            Role::Data => "DATA_NAME",
            Role::Condition88 => "CONDITION_NAME",
            Role::File => "FILE_NAME",
            Role::Index => "INDEX_NAME",
            Role::External => "EXTERNAL_NAME",
        };
        f.write_str(s)
    }
}
