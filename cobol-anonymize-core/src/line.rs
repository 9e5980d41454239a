//! Fixed-format COBOL line parsing and reconstruction.
//!
//! Columns 1-6: sequence area. Column 7: indicator. Columns 8-11: area A.
//! Columns 12-72: area B (the only region transformation may rewrite).
//! Columns 73-80: identification area.

use std::fmt;

use crate::error::CoreError;

/// How a line was terminated in the source file.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineTerminator {
    #[default]
    Lf,
    CrLf,
    Cr,
    None,
}

impl LineTerminator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
            Self::None => "",
        }
    }
}

/// COBOL column-7 indicator kind.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum IndicatorKind {
    /// Normal code line (blank indicator).
    Code,
    /// `*` or `/` comment line.
    Comment,
    /// `D`/`d` debug line.
    Debug,
    /// `-` continuation line.
    Continuation,
}

impl IndicatorKind {
    pub fn from_char(c: char) -> Self {
        match c {
            '*' | '/' => Self::Comment,
            'D' | 'd' => Self::Debug,
            '-' => Self::Continuation,
            _ => Self::Code,
        }
    }

    pub fn is_comment(self) -> bool {
        matches!(self, Self::Comment)
    }
}

/// Known developer-convention change tags found in the sequence area.
pub const CHANGE_TAGS: &[&str] = &["BENIQ", "CDR", "DM2724", "REPLAT", "CHG", "FIX", "MOD"];

pub fn detect_change_tag(sequence: &str) -> Option<&'static str> {
    let upper = sequence.to_uppercase();
    let upper = upper.trim();
    CHANGE_TAGS.iter().copied().find(|tag| upper.contains(*tag))
}

// 0-indexed column boundaries.
const SEQUENCE_START: usize = 0;
const SEQUENCE_END: usize = 6;
const INDICATOR_COL: usize = 6;
const AREA_A_START: usize = 7;
const AREA_A_END: usize = 11;
const AREA_B_START: usize = 11;
const CODE_END: usize = 72;
const ID_AREA_START: usize = 72;
const ID_AREA_END: usize = 80;
const PARSE_WIDTH: usize = 80;

/// Maximum non-blank bytes the code area (columns 8-72) may contain.
pub const MAX_CODE_AREA_LEN: usize = 65;

/// A single raw line read from an input file, before or after transformation.
#[derive(Clone, Debug)]
pub struct SourceLine {
    pub content: String,
    pub line_number: usize,
    pub terminator: LineTerminator,
}

/// A line split into its fixed-format areas.
#[derive(Clone, Debug)]
pub struct LineAreas {
    pub sequence: String,
    pub indicator: char,
    pub area_a: String,
    pub area_b: String,
    pub identification: String,
    pub original_length: usize,
    pub line_number: usize,
    pub terminator: LineTerminator,
    pub change_tag: Option<&'static str>,
}

impl LineAreas {
    /// Splits a raw source line into its column areas.
    ///
    /// Tabs are expanded to four spaces for parsing only; `original_length`
    /// always reflects the pre-expansion byte length of `line.content`.
    pub fn parse(line: &SourceLine) -> Self {
        let original_length = line.content.len();
        let expanded = line.content.replace('\t', "    ");
        let padded = pad_to(&expanded, PARSE_WIDTH);
        let chars: Vec<char> = padded.chars().collect();

        let sequence: String = chars[SEQUENCE_START..SEQUENCE_END].iter().collect();
        let indicator = chars[INDICATOR_COL];
        let area_a: String = chars[AREA_A_START..AREA_A_END].iter().collect();
        let area_b: String = chars[AREA_B_START..CODE_END].iter().collect();
        let identification: String = chars[ID_AREA_START..ID_AREA_END].iter().collect();

        let change_tag = detect_change_tag(&sequence);

        Self {
            sequence,
            indicator,
            area_a,
            area_b,
            identification,
            original_length,
            line_number: line.line_number,
            terminator: line.terminator,
            change_tag,
        }
    }

    pub fn indicator_kind(&self) -> IndicatorKind {
        IndicatorKind::from_char(self.indicator)
    }

    /// Columns 8-72 combined (area A + area B).
    pub fn code_area(&self) -> String {
        format!("{}{}", self.area_a, self.area_b)
    }

    /// Reconstructs the full line from its (possibly modified) areas,
    /// honoring `original_length` exactly.
    pub fn reconstruct(&self) -> String {
        let full = format!(
            "{}{}{}{}{}",
            self.sequence, self.indicator, self.area_a, self.area_b, self.identification
        );
        let chars: Vec<char> = full.chars().collect();
        match chars.len().cmp(&self.original_length) {
            std::cmp::Ordering::Greater => chars[..self.original_length].iter().collect(),
            std::cmp::Ordering::Less => pad_to(&full, self.original_length),
            std::cmp::Ordering::Equal => full,
        }
    }

    /// Replaces area B (and optionally area A) with a freshly built code
    /// body, validating it does not overflow the 65-byte code-area limit.
    pub fn set_code_body(&mut self, area_a: String, area_b: String) -> Result<(), CoreError> {
        validate_code_area(&format!("{area_a}{area_b}"))?;
        self.area_a = area_a;
        self.area_b = area_b;
        Ok(())
    }
}

fn pad_to(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        let mut out = String::with_capacity(width);
        out.push_str(s);
        for _ in len..width {
            out.push(' ');
        }
        out
    }
}

/// Validates that a proposed new code-area body (area A + area B) does not
/// exceed 65 bytes of non-blank content.
pub fn validate_code_area(proposed_body: &str) -> Result<(), CoreError> {
    let non_blank = proposed_body.trim_end().len();
    if non_blank > MAX_CODE_AREA_LEN {
        return Err(CoreError::ColumnOverflow {
            actual_length: non_blank,
            max_length: MAX_CODE_AREA_LEN,
        });
    }
    Ok(())
}

impl fmt::Display for LineAreas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reconstruct())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(content: &str) -> SourceLine {
        SourceLine {
            content: content.to_string(),
            line_number: 1,
            terminator: LineTerminator::Lf,
        }
    }

    #[test]
    fn round_trip_is_byte_exact() {
        let raw = "       05  WS-FIELD PIC X(30).";
        let areas = LineAreas::parse(&line(raw));
        assert_eq!(areas.reconstruct(), raw);
        assert_eq!(areas.original_length, raw.len());
    }

    #[test]
    fn short_line_round_trips() {
        let raw = "      * hi";
        let areas = LineAreas::parse(&line(raw));
        assert_eq!(areas.reconstruct(), raw);
    }

    #[test]
    fn indicator_kinds() {
        assert!(IndicatorKind::from_char('*').is_comment());
        assert!(IndicatorKind::from_char('/').is_comment());
        assert_eq!(IndicatorKind::from_char('-'), IndicatorKind::Continuation);
        assert_eq!(IndicatorKind::from_char(' '), IndicatorKind::Code);
    }

    #[test]
    fn change_tag_detection() {
        let areas = LineAreas::parse(&line("CDR001* comment"));
        assert_eq!(areas.change_tag, Some("CDR"));
    }

    #[test]
    fn overflow_detection() {
        let body = "X".repeat(66);
        assert!(validate_code_area(&body).is_err());
        let body = format!("{}{}", "X".repeat(65), "");
        assert!(validate_code_area(&body).is_ok());
    }
}
