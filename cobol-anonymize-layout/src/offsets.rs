//! Depth-first byte-offset assignment, honoring `OCCURS` and `REDEFINES`.

use crate::model::LayoutTree;

/// Assigns `offset`/`storage_length` to every item in every record of
/// `tree`, walking each record depth-first. A group's storage length is
/// the sum of its children's (OCCURS-multiplied) lengths; a `REDEFINES`
/// item reuses its target's starting offset instead of advancing the
/// record cursor.
pub fn assign_offsets(tree: &mut LayoutTree) {
    let records = tree.records.clone();
    for record_name in &records {
        assign_subtree(tree, record_name, 0);
    }
}

/// Assigns offsets for `name`'s subtree starting at `start_offset`,
/// returning the number of bytes the subtree occupies (before any
/// `OCCURS` multiplication applied by the caller).
fn assign_subtree(tree: &mut LayoutTree, name: &str, start_offset: u32) -> u32 {
    let redefines_target = tree.items.get(name).and_then(|i| i.redefines_name.clone());
    let offset = match redefines_target {
        Some(target) => tree.items.get(&target).map(|t| t.offset).unwrap_or(start_offset),
        None => start_offset,
    };

    let children = tree.items.get(name).map(|i| i.children.clone()).unwrap_or_default();
    let base_length = if children.is_empty() {
        tree.items.get(name).and_then(|i| i.pic.as_ref()).map(|p| p.storage_length).unwrap_or(0)
    } else {
        let mut cursor = offset;
        for child in &children {
            let child_len = assign_subtree(tree, child, cursor);
            let child_redefines = tree.items.get(child).map(|i| i.redefines_name.is_some()).unwrap_or(false);
            if !child_redefines {
                cursor += child_len;
            }
        }
        cursor - offset
    };

    if let Some(item) = tree.items.get_mut(name) {
        item.offset = offset;
        item.storage_length = base_length;
    }

    let total = tree.items.get(name).map(|i| i.total_length()).unwrap_or(base_length);

    // A redefining item never advances the record past its target's
    // footprint; only the root call's return value feeds the caller's
    // cursor advancement, and callers skip redefining children entirely.
    if redefines_target_exists(tree, name) {
        0
    } else {
        total
    }
}

fn redefines_target_exists(tree: &LayoutTree, name: &str) -> bool {
    tree.items.get(name).map(|i| i.redefines_name.is_some()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::build_layout;

    #[test]
    fn group_offset_sums_children() {
        let mut tree = build_layout(
            [
                (1, "DATA DIVISION."),
                (2, "WORKING-STORAGE SECTION."),
                (3, "01  WS-GROUP."),
                (4, "05  WS-A PIC X(5)."),
                (5, "05  WS-B PIC 9(3)."),
            ]
            .into_iter(),
        );
        assign_offsets(&mut tree);
        assert_eq!(tree.get("WS-A").unwrap().offset, 0);
        assert_eq!(tree.get("WS-B").unwrap().offset, 5);
        assert_eq!(tree.get("WS-GROUP").unwrap().storage_length, 8);
    }

    #[test]
    fn occurs_multiplies_total_length_without_shifting_offset() {
        let mut tree = build_layout(
            [
                (1, "DATA DIVISION."),
                (2, "WORKING-STORAGE SECTION."),
                (3, "01  WS-TABLE PIC X(10) OCCURS 5 TIMES."),
            ]
            .into_iter(),
        );
        assign_offsets(&mut tree);
        let item = tree.get("WS-TABLE").unwrap();
        assert_eq!(item.offset, 0);
        assert_eq!(item.storage_length, 10);
        assert_eq!(item.total_length(), 50);
    }

    #[test]
    fn redefines_reuses_target_offset() {
        let mut tree = build_layout(
            [
                (1, "DATA DIVISION."),
                (2, "WORKING-STORAGE SECTION."),
                (3, "01  WS-A PIC X(10)."),
                (4, "01  WS-B REDEFINES WS-A PIC 9(10)."),
            ]
            .into_iter(),
        );
        assign_offsets(&mut tree);
        assert_eq!(tree.get("WS-A").unwrap().offset, 0);
        assert_eq!(tree.get("WS-B").unwrap().offset, 0);
    }
}
