//! Recognition of `PIC`/`PICTURE` and `USAGE` clauses.
//!
//! These spans are registered by the transformer as protected ranges: no
//! byte inside them may ever be rewritten.

use once_cell::sync::Lazy;
use regex::Regex;

/// Primary kind of a PIC pattern.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PicKind {
    Alphanumeric,
    Numeric,
    Alphabetic,
    Signed,
    Decimal,
    EditedNumeric,
    Mixed,
}

/// A recognized `PIC`/`PICTURE` clause occurrence.
#[derive(Clone, Debug)]
pub struct PicClause {
    pub raw: String,
    pub start: usize,
    pub end: usize,
    pub pattern: String,
    pub kind: PicKind,
    pub display_length: usize,
}

/// Canonical USAGE clause kinds.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum UsageKind {
    Display,
    Comp,
    Comp1,
    Comp2,
    Comp3,
    Comp4,
    Comp5,
    Binary,
    PackedDecimal,
    Pointer,
    Index,
}

/// A recognized `USAGE` clause occurrence.
#[derive(Clone, Debug)]
pub struct UsageClause {
    pub raw: String,
    pub start: usize,
    pub end: usize,
    pub kind: UsageKind,
}

static PIC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(PIC(?:TURE)?)\s+(?:IS\s+)?([SsVvXxAa9ZzBbPp0/,\-+*()0-9]+)\.?").unwrap()
});

static PIC_CHAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([XxAa9SsVvZzBbPp\-+.*])(?:\((\d+)\))?").unwrap());

/// Guards against matching `INDEX` inside `WS-INDEX`: the keyword must be
/// whole-word, flanked by whitespace, `.`, `,`, or the string boundary.
static USAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|[\s.])(?:USAGE\s+(?:IS\s+)?)?(COMP(?:UTATIONAL)?(?:-[1-5])?|BINARY|PACKED-DECIMAL|DISPLAY|POINTER|INDEX)(?:[\s.,]|$)",
    )
    .unwrap()
});

pub fn find_pic_clauses(line: &str) -> Vec<PicClause> {
    PIC_PATTERN
        .captures_iter(line)
        .map(|cap| {
            let whole = cap.get(0).unwrap();
            let pattern = cap.get(2).unwrap().as_str().to_string();
            PicClause {
                raw: whole.as_str().to_string(),
                start: whole.start(),
                end: whole.end(),
                display_length: calculate_pic_length(&pattern),
                kind: determine_pic_kind(&pattern),
                pattern,
            }
        })
        .collect()
}

pub fn find_usage_clauses(line: &str) -> Vec<UsageClause> {
    USAGE_PATTERN
        .captures_iter(line)
        .filter_map(|cap| {
            let g = cap.get(1)?;
            let text = g.as_str().to_uppercase();
            let kind = usage_kind_from_text(&text)?;
            let whole = cap.get(0).unwrap();
            Some(UsageClause {
                raw: whole.as_str().to_string(),
                start: g.start(),
                end: g.end(),
                kind,
            })
        })
        .collect()
}

fn usage_kind_from_text(text: &str) -> Option<UsageKind> {
    Some(match text {
        "COMP" | "COMPUTATIONAL" => UsageKind::Comp,
        "COMP-1" | "COMPUTATIONAL-1" => UsageKind::Comp1,
        "COMP-2" | "COMPUTATIONAL-2" => UsageKind::Comp2,
        "COMP-3" | "COMPUTATIONAL-3" => UsageKind::Comp3,
        "COMP-4" | "COMPUTATIONAL-4" => UsageKind::Comp4,
        "COMP-5" | "COMPUTATIONAL-5" => UsageKind::Comp5,
        "BINARY" => UsageKind::Binary,
        "PACKED-DECIMAL" => UsageKind::PackedDecimal,
        "DISPLAY" => UsageKind::Display,
        "POINTER" => UsageKind::Pointer,
        "INDEX" => UsageKind::Index,
        _ => return None,
    })
}

/// Display length in character positions; `S`, `V`, and `P` consume no
/// display position.
pub fn calculate_pic_length(pattern: &str) -> usize {
    let upper = pattern.to_uppercase();
    let mut length = 0usize;
    for cap in PIC_CHAR_PATTERN.captures_iter(&upper) {
        let ch = cap.get(1).unwrap().as_str().chars().next().unwrap();
        let count: usize = cap
            .get(2)
            .map(|m| m.as_str().parse().unwrap_or(1))
            .unwrap_or(1);
        match ch {
            'X' | 'A' | '9' | 'Z' | 'B' | '-' | '+' | '.' | '*' => length += count,
            'S' | 'V' | 'P' => {}
            _ => {}
        }
    }
    length
}

pub fn determine_pic_kind(pattern: &str) -> PicKind {
    let upper = pattern.to_uppercase();
    let has_x = upper.contains('X');
    let has_a = upper.contains('A');
    let has_9 = upper.contains('9');
    let has_s = upper.contains('S');
    let has_v = upper.contains('V');
    let has_edit = upper.chars().any(|c| matches!(c, 'Z' | 'B' | '-' | '+' | '*' | '/'));

    if has_edit {
        PicKind::EditedNumeric
    } else if has_x && !has_9 {
        PicKind::Alphanumeric
    } else if has_a && !has_9 && !has_x {
        PicKind::Alphabetic
    } else if has_s && has_9 {
        PicKind::Signed
    } else if has_v {
        PicKind::Decimal
    } else if has_9 {
        PicKind::Numeric
    } else {
        PicKind::Mixed
    }
}

/// Number of digits after `V` (implicit decimal point) in a PIC pattern.
pub fn decimal_positions(pattern: &str) -> usize {
    let upper = pattern.to_uppercase();
    match upper.find('V') {
        None => 0,
        Some(v_idx) => {
            let after = &upper[v_idx + 1..];
            let mut count = 0usize;
            for cap in PIC_CHAR_PATTERN.captures_iter(after) {
                let ch = cap.get(1).unwrap().as_str().chars().next().unwrap();
                if ch == '9' {
                    let n: usize = cap
                        .get(2)
                        .map(|m| m.as_str().parse().unwrap_or(1))
                        .unwrap_or(1);
                    count += n;
                } else {
                    break;
                }
            }
            count
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_simple_alphanumeric_pic() {
        let clauses = find_pic_clauses("05  WS-FIELD PIC X(30).");
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].display_length, 30);
        assert_eq!(clauses[0].kind, PicKind::Alphanumeric);
    }

    #[test]
    fn signed_decimal_pic_length_excludes_s_and_v() {
        let clauses = find_pic_clauses("PIC S9(5)V99.");
        assert_eq!(clauses[0].display_length, 7);
        assert_eq!(clauses[0].kind, PicKind::Signed);
        assert_eq!(decimal_positions(&clauses[0].pattern), 2);
    }

    #[test]
    fn usage_whole_word_guard_rejects_index_substring() {
        let clauses = find_usage_clauses("05 WS-INDEX PIC 9(4).");
        assert!(clauses.is_empty());
    }

    #[test]
    fn usage_comp_3_recognized() {
        let clauses = find_usage_clauses("USAGE IS COMP-3.");
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].kind, UsageKind::Comp3);
    }
}
