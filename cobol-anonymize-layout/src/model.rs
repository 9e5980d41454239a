//! Field-tree types, ported from `cobol_data_structure.models`.

use cobol_anonymize_core::pic::{PicClause, PicKind, UsageKind};

/// COBOL field kind, mirroring the original's `FieldType`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FieldKind {
    Alphanumeric,
    Numeric,
    SignedNumeric,
    Comp,
    Comp3,
    Group,
    Filler,
    Unknown,
}

/// A parsed `PIC`/`USAGE` pair for one elementary item.
#[derive(Clone, Debug)]
pub struct PicInfo {
    pub raw: String,
    pub kind: FieldKind,
    pub display_length: usize,
    pub storage_length: u32,
    pub decimal_positions: u32,
    pub is_signed: bool,
    pub usage: UsageKind,
}

impl PicInfo {
    pub fn from_clause(clause: &PicClause, usage: UsageKind, decimal_positions: u32) -> Self {
        let is_signed = matches!(clause.kind, PicKind::Signed);
        let kind = match clause.kind {
            _ if matches!(usage, UsageKind::Comp3 | UsageKind::PackedDecimal) => FieldKind::Comp3,
            _ if matches!(
                usage,
                UsageKind::Comp | UsageKind::Comp4 | UsageKind::Comp5 | UsageKind::Binary
            ) =>
            {
                FieldKind::Comp
            }
            PicKind::Alphanumeric | PicKind::Alphabetic => FieldKind::Alphanumeric,
            PicKind::Signed => FieldKind::SignedNumeric,
            PicKind::Numeric | PicKind::Decimal => FieldKind::Numeric,
            PicKind::EditedNumeric | PicKind::Mixed => FieldKind::Unknown,
        };
        Self {
            raw: clause.pattern.clone(),
            kind,
            display_length: clause.display_length,
            storage_length: 0,
            decimal_positions,
            is_signed,
            usage,
        }
    }
}

/// One field definition in a record tree.
///
/// `parent_name` links upward by name only, never by reference, so the
/// tree has no back-pointers and can be stored as a flat map.
#[derive(Clone, Debug)]
pub struct DataItem {
    pub name: String,
    pub level: u32,
    pub line_number: usize,
    pub parent_name: Option<String>,
    pub children: Vec<String>,
    pub pic: Option<PicInfo>,
    pub occurs_count: Option<u32>,
    pub redefines_name: Option<String>,
    pub offset: u32,
    pub storage_length: u32,
    pub is_filler: bool,
}

impl DataItem {
    pub fn is_group(&self) -> bool {
        self.pic.is_none() && !self.children.is_empty()
    }

    pub fn is_elementary(&self) -> bool {
        self.pic.is_some()
    }

    /// Storage length including `OCCURS` repetitions.
    pub fn total_length(&self) -> u32 {
        match self.occurs_count {
            Some(n) if n > 1 => self.storage_length * n,
            _ => self.storage_length,
        }
    }
}

/// A parsed record tree, keyed by field name. `records` holds the 01-level
/// item names in source order.
#[derive(Default, Debug)]
pub struct LayoutTree {
    pub records: Vec<String>,
    pub items: std::collections::HashMap<String, DataItem>,
}

impl LayoutTree {
    pub fn get(&self, name: &str) -> Option<&DataItem> {
        self.items.get(&name.to_uppercase())
    }

    /// Depth-first flattening of one record's subtree, root first.
    pub fn flatten(&self, record_name: &str) -> Vec<&DataItem> {
        let mut out = Vec::new();
        if let Some(root) = self.get(record_name) {
            self.collect(root, &mut out);
        }
        out
    }

    fn collect<'a>(&'a self, item: &'a DataItem, out: &mut Vec<&'a DataItem>) {
        out.push(item);
        for child_name in &item.children {
            if let Some(child) = self.items.get(child_name) {
                self.collect(child, out);
            }
        }
    }
}
