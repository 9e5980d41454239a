//! Tracks `REDEFINES` relationships as they're encountered while rewriting
//! lines, for consumers (notably the layout decoder) that need to resolve
//! a redefining item's offset from its target's.

use once_cell::sync::Lazy;
use regex::Regex;

/// `<level> <redefining-name> REDEFINES <target-name>`.
static REDEFINES_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(\d{1,2})\s+([A-Z0-9][A-Z0-9-]*)\s+REDEFINES\s+([A-Z0-9][A-Z0-9-]*)").unwrap()
});

#[derive(Clone, Debug)]
pub struct RedefinesEntry {
    pub level: u32,
    pub redefining_name: String,
    pub target_name: String,
    pub line_number: usize,
}

#[derive(Default)]
pub struct RedefinesTracker {
    entries: Vec<RedefinesEntry>,
}

impl RedefinesTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans a data-definition line's code area for a `REDEFINES` clause
    /// and, if present, records it and returns the parsed entry.
    pub fn observe(&mut self, code_area: &str, line_number: usize) -> Option<&RedefinesEntry> {
        let cap = REDEFINES_LINE.captures(code_area)?;
        let entry = RedefinesEntry {
            level: cap.get(1).unwrap().as_str().parse().ok()?,
            redefining_name: cap.get(2).unwrap().as_str().to_uppercase(),
            target_name: cap.get(3).unwrap().as_str().to_uppercase(),
            line_number,
        };
        self.entries.push(entry);
        self.entries.last()
    }

    pub fn entries(&self) -> &[RedefinesEntry] {
        &self.entries
    }

    pub fn target_of(&self, redefining_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.redefining_name.eq_ignore_ascii_case(redefining_name))
            .map(|e| e.target_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redefines_clause_is_parsed() {
        let mut tracker = RedefinesTracker::new();
        let entry = tracker
            .observe("01  WS-LEVEL2-R REDEFINES WS-LEVEL2 PIC 9(10).", 2)
            .unwrap();
        assert_eq!(entry.redefining_name, "WS-LEVEL2-R");
        assert_eq!(entry.target_name, "WS-LEVEL2");
        assert_eq!(tracker.target_of("ws-level2-r"), Some("WS-LEVEL2"));
    }

    #[test]
    fn non_redefines_line_yields_none() {
        let mut tracker = RedefinesTracker::new();
        assert!(tracker.observe("01  WS-LEVEL2 PIC X(10).", 1).is_none());
    }
}
