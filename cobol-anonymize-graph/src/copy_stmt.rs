//! Parsing of `COPY` statements, including `OF <library>` qualifiers and
//! `REPLACING` pairs (bare-identifier or pseudo-text).

use once_cell::sync::Lazy;
use regex::Regex;

/// One `REPLACING` substitution pair. Replacements are recorded, not
/// applied at the textual level (Non-goal).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReplacingPair {
    Identifier { from: String, to: String },
    PseudoText { from: String, to: String },
}

#[derive(Clone, Debug)]
pub struct CopyStatement {
    pub copybook_name: String,
    pub library: Option<String>,
    pub replacing: Vec<ReplacingPair>,
    pub file: String,
    pub line: usize,
}

// `COPY name [OF library] [REPLACING pairs].` spanning any number of lines
// up to the terminating period.
static COPY_STMT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\bCOPY\s+([A-Z0-9][A-Z0-9-]*)(?:\s+OF\s+([A-Z0-9][A-Z0-9-]*))?(?:\s+REPLACING\s+(.*?))?\s*\.")
        .unwrap()
});

static PSEUDO_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)==\s*(.*?)\s*==\s+BY\s+==\s*(.*?)\s*==").unwrap()
});

static IDENT_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([A-Z0-9][A-Z0-9-]*)\s+BY\s+([A-Z0-9][A-Z0-9-]*)\b").unwrap());

/// Finds every `COPY` statement in `text`, a whole file's contents.
/// `file` is recorded on each statement for dependency-graph reporting;
/// line numbers are 1-based and computed from the match offset.
pub fn find_copy_statements(text: &str, file: &str) -> Vec<CopyStatement> {
    COPY_STMT
        .captures_iter(text)
        .map(|cap| {
            let whole = cap.get(0).unwrap();
            let line = 1 + text[..whole.start()].matches('\n').count();
            let copybook_name = cap.get(1).unwrap().as_str().to_uppercase();
            let library = cap.get(2).map(|m| m.as_str().to_uppercase());
            let replacing = cap
                .get(3)
                .map(|m| parse_replacing(m.as_str()))
                .unwrap_or_default();
            CopyStatement {
                copybook_name,
                library,
                replacing,
                file: file.to_string(),
                line,
            }
        })
        .collect()
}

fn parse_replacing(text: &str) -> Vec<ReplacingPair> {
    // Pseudo-text pairs are tried first since `==A== BY ==B==` would
    // otherwise also match the looser bare-identifier pattern.
    let mut consumed = vec![false; text.len()];
    let mut pairs = Vec::new();

    for cap in PSEUDO_PAIR.captures_iter(text) {
        let whole = cap.get(0).unwrap();
        for i in whole.start()..whole.end() {
            consumed[i] = true;
        }
        pairs.push(ReplacingPair::PseudoText {
            from: cap.get(1).unwrap().as_str().to_string(),
            to: cap.get(2).unwrap().as_str().to_string(),
        });
    }

    for cap in IDENT_PAIR.captures_iter(text) {
        let whole = cap.get(0).unwrap();
        if consumed[whole.start()..whole.end()].iter().any(|&c| c) {
            continue;
        }
        pairs.push(ReplacingPair::Identifier {
            from: cap.get(1).unwrap().as_str().to_uppercase(),
            to: cap.get(2).unwrap().as_str().to_uppercase(),
        });
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_copy_statement() {
        let stmts = find_copy_statements("       COPY CUSTREC.", "PROG1.cbl");
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].copybook_name, "CUSTREC");
        assert!(stmts[0].library.is_none());
    }

    #[test]
    fn copy_with_library_and_replacing() {
        let stmts = find_copy_statements(
            "       COPY CUSTREC OF MYLIB REPLACING A BY B.",
            "PROG1.cbl",
        );
        assert_eq!(stmts[0].library.as_deref(), Some("MYLIB"));
        assert_eq!(
            stmts[0].replacing[0],
            ReplacingPair::Identifier {
                from: "A".into(),
                to: "B".into(),
            }
        );
    }

    #[test]
    fn copy_with_pseudo_text_replacing() {
        let stmts = find_copy_statements(
            "       COPY CUSTREC REPLACING ==:TAG:== BY ==PFX==.",
            "PROG1.cbl",
        );
        assert_eq!(
            stmts[0].replacing[0],
            ReplacingPair::PseudoText {
                from: ":TAG:".into(),
                to: "PFX".into(),
            }
        );
    }

    #[test]
    fn multiline_copy_statement_tracks_line_number() {
        let text = "       IDENTIFICATION DIVISION.\n       COPY\n           CUSTREC.\n";
        let stmts = find_copy_statements(text, "PROG1.cbl");
        assert_eq!(stmts[0].copybook_name, "CUSTREC");
        assert_eq!(stmts[0].line, 2);
    }
}
