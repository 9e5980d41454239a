//! Builds a [`LayoutTree`] from a file's DATA DIVISION lines, reusing the
//! classifier's own level-stack/section discipline rather than
//! reimplementing it.

use once_cell::sync::Lazy;
use regex::Regex;

use cobol_anonymize_classify::{DataSection, Division, FileContext};
use cobol_anonymize_core::pic::{decimal_positions, find_pic_clauses, find_usage_clauses, UsageKind};
use cobol_anonymize_core::is_filler;

use crate::model::{DataItem, LayoutTree, PicInfo};

static LEVEL_AND_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(\d{1,2})\s+([A-Z0-9][A-Z0-9-]*)").unwrap());
static OCCURS_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bOCCURS\s+(\d+)").unwrap());
static REDEFINES_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bREDEFINES\s+([A-Z0-9][A-Z0-9-]*)").unwrap());

/// Folds a sequence of `(line_number, code_area)` pairs spanning one
/// file's DATA DIVISION into a field tree.
pub fn build_layout<'a>(lines: impl IntoIterator<Item = (usize, &'a str)>) -> LayoutTree {
    let mut tree = LayoutTree::default();
    let mut context = FileContext::new();

    for (line_number, code_area) in lines {
        let upper = code_area.to_uppercase();
        update_division_context(&mut context, &upper);

        if !matches!(context.division, Division::Data) {
            continue;
        }
        if !matches!(
            context.section,
            DataSection::File | DataSection::WorkingStorage | DataSection::LocalStorage | DataSection::Linkage
        ) {
            continue;
        }

        let Some(cap) = LEVEL_AND_NAME.captures(code_area) else {
            continue;
        };
        let level: u32 = match cap.get(1).unwrap().as_str().parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        let name = cap.get(2).unwrap().as_str().to_uppercase();
        if level == 88 {
            // Condition names aren't storage-bearing; skip for the layout.
            continue;
        }

        let parent_name = context.parent_name().map(|s| s.to_string());
        context.push_level(level, &name);

        let redefines_name = REDEFINES_CLAUSE
            .captures(&upper)
            .map(|c| c.get(1).unwrap().as_str().to_uppercase());
        let occurs_count = OCCURS_CLAUSE
            .captures(&upper)
            .and_then(|c| c.get(1).unwrap().as_str().parse().ok());

        let pic_clauses = find_pic_clauses(code_area);
        let usage_clauses = find_usage_clauses(code_area);
        let usage = usage_clauses
            .first()
            .map(|u| u.kind)
            .unwrap_or(UsageKind::Display);

        let pic = pic_clauses.first().map(|clause| {
            let decimals = decimal_positions(&clause.pattern) as u32;
            let mut info = PicInfo::from_clause(clause, usage, decimals);
            info.storage_length = crate::length::storage_length(&info);
            info
        });

        let item = DataItem {
            name: name.clone(),
            level,
            line_number,
            parent_name: parent_name.clone(),
            children: Vec::new(),
            pic,
            occurs_count,
            redefines_name,
            offset: 0,
            storage_length: 0,
            is_filler: is_filler(&name),
        };

        if let Some(parent) = &parent_name {
            if let Some(parent_item) = tree.items.get_mut(parent) {
                parent_item.children.push(name.clone());
            }
        } else if level == 1 {
            tree.records.push(name.clone());
        }

        tree.items.insert(name, item);
    }

    tree
}

fn update_division_context(context: &mut FileContext, upper: &str) {
    if upper.contains("IDENTIFICATION DIVISION") {
        context.enter_division(Division::Identification);
    } else if upper.contains("ENVIRONMENT DIVISION") {
        context.enter_division(Division::Environment);
    } else if upper.contains("DATA DIVISION") {
        context.enter_division(Division::Data);
    } else if upper.contains("PROCEDURE DIVISION") {
        context.enter_division(Division::Procedure);
    }

    if matches!(context.division, Division::Data) {
        if upper.contains("FILE SECTION") {
            context.enter_section(DataSection::File);
        } else if upper.contains("WORKING-STORAGE SECTION") {
            context.enter_section(DataSection::WorkingStorage);
        } else if upper.contains("LOCAL-STORAGE SECTION") {
            context.enter_section(DataSection::LocalStorage);
        } else if upper.contains("LINKAGE SECTION") {
            context.enter_section(DataSection::Linkage);
        } else if upper.contains("SCREEN SECTION") {
            context.enter_section(DataSection::Screen);
        } else if upper.contains("REPORT SECTION") {
            context.enter_section(DataSection::Report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &[(usize, &str)]) -> LayoutTree {
        build_layout(src.iter().map(|(n, s)| (*n, *s)))
    }

    #[test]
    fn simple_group_and_child_are_linked() {
        let tree = lines(&[
            (1, "DATA DIVISION."),
            (2, "WORKING-STORAGE SECTION."),
            (3, "01  WS-GROUP."),
            (4, "05  WS-CHILD PIC X(5)."),
        ]);
        let group = tree.get("WS-GROUP").unwrap();
        assert_eq!(group.children, vec!["WS-CHILD".to_string()]);
        let child = tree.get("WS-CHILD").unwrap();
        assert_eq!(child.parent_name.as_deref(), Some("WS-GROUP"));
        assert!(child.is_elementary());
        assert!(group.is_group());
    }

    #[test]
    fn occurs_and_redefines_are_captured() {
        let tree = lines(&[
            (1, "DATA DIVISION."),
            (2, "WORKING-STORAGE SECTION."),
            (3, "01  WS-TABLE PIC X(10) OCCURS 5 TIMES."),
            (4, "01  WS-TABLE-R REDEFINES WS-TABLE PIC X(50)."),
        ]);
        assert_eq!(tree.get("WS-TABLE").unwrap().occurs_count, Some(5));
        assert_eq!(tree.get("WS-TABLE-R").unwrap().redefines_name.as_deref(), Some("WS-TABLE"));
    }
}
