//! Decodes a field's raw bytes into a typed value, ported from
//! `convert_value`/`convert_numeric`. No floating point: fixed-point
//! numerics are returned as an `(i64, scale)` pair, matching the
//! original's use of `Decimal` rather than `float`.

use crate::model::{DataItem, FieldKind, LayoutTree};

/// A decoded field value.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodedValue {
    Text(String),
    Integer(i64),
    /// `(unscaled, decimal_positions)`: the value is `unscaled / 10^scale`.
    FixedPoint(i64, u32),
    /// COMP-3 packed decimal, as the unpacked digit string plus sign.
    Packed { digits: String, negative: bool },
    Group(Vec<(String, DecodedValue)>),
    /// `FILLER` items, or items with no recognizable PIC.
    Skipped,
}

/// Slices `buf[item.offset..item.offset+storage_length]` and converts it
/// per the item's PIC/USAGE. Group items recurse into their children;
/// `FILLER` items and items missing from `buf` are skipped.
pub fn decode_field(tree: &LayoutTree, item: &DataItem, buf: &[u8]) -> DecodedValue {
    if item.is_filler {
        return DecodedValue::Skipped;
    }

    if item.is_group() {
        let children = item
            .children
            .iter()
            .filter_map(|name| tree.items.get(name))
            .map(|child| (child.name.clone(), decode_field(tree, child, buf)))
            .collect();
        return DecodedValue::Group(children);
    }

    let Some(pic) = &item.pic else {
        return DecodedValue::Skipped;
    };

    let start = item.offset as usize;
    let end = start + item.storage_length as usize;
    let Some(slice) = buf.get(start..end.min(buf.len())) else {
        return DecodedValue::Skipped;
    };

    match pic.kind {
        FieldKind::Alphanumeric => DecodedValue::Text(String::from_utf8_lossy(slice).into_owned()),
        FieldKind::Numeric | FieldKind::SignedNumeric => {
            let text = String::from_utf8_lossy(slice);
            convert_display_numeric(&text, pic.decimal_positions)
        }
        FieldKind::Comp3 => decode_packed(slice),
        FieldKind::Comp => decode_binary(slice, pic.decimal_positions),
        FieldKind::Group | FieldKind::Filler | FieldKind::Unknown => {
            DecodedValue::Text(String::from_utf8_lossy(slice).into_owned())
        }
    }
}

/// DISPLAY-format numeric: optional leading/trailing sign, digits, and an
/// implicit decimal point `decimal_positions` digits from the right.
fn convert_display_numeric(text: &str, decimal_positions: u32) -> DecodedValue {
    let cleaned = text.trim();
    if cleaned.is_empty() {
        return if decimal_positions > 0 {
            DecodedValue::FixedPoint(0, decimal_positions)
        } else {
            DecodedValue::Integer(0)
        };
    }

    let negative = cleaned.starts_with('-') || cleaned.ends_with('-');
    let digits: String = cleaned.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return DecodedValue::Skipped;
    }

    let magnitude: i64 = digits.trim_start_matches('0').parse().unwrap_or(0);
    let value = if negative { -magnitude } else { magnitude };

    if decimal_positions > 0 {
        DecodedValue::FixedPoint(value, decimal_positions)
    } else {
        DecodedValue::Integer(value)
    }
}

/// COMP-3: each nibble is a BCD digit except the last, which holds the
/// sign (`C`/`F` positive, `D` negative).
fn decode_packed(bytes: &[u8]) -> DecodedValue {
    let mut digits = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        digits.push(nibble_to_digit(byte >> 4));
        digits.push(nibble_to_digit(byte & 0x0F));
    }
    let sign_nibble = bytes.last().map(|b| b & 0x0F).unwrap_or(0xC);
    let negative = sign_nibble == 0xD;
    // Drop the trailing sign nibble's placeholder digit.
    digits.pop();
    DecodedValue::Packed { digits, negative }
}

fn nibble_to_digit(nibble: u8) -> char {
    match nibble {
        0..=9 => (b'0' + nibble) as char,
        _ => '?',
    }
}

/// Big-endian binary COMP field.
fn decode_binary(bytes: &[u8], decimal_positions: u32) -> DecodedValue {
    let mut value: i64 = 0;
    for &byte in bytes {
        value = (value << 8) | byte as i64;
    }
    if decimal_positions > 0 {
        DecodedValue::FixedPoint(value, decimal_positions)
    } else {
        DecodedValue::Integer(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offsets::assign_offsets;
    use crate::parser::build_layout;

    #[test]
    fn alphanumeric_field_decodes_as_text() {
        let mut tree = build_layout(
            [
                (1, "DATA DIVISION."),
                (2, "WORKING-STORAGE SECTION."),
                (3, "01  WS-NAME PIC X(5)."),
            ]
            .into_iter(),
        );
        assign_offsets(&mut tree);
        let item = tree.get("WS-NAME").unwrap();
        let decoded = decode_field(&tree, item, b"HELLO");
        assert_eq!(decoded, DecodedValue::Text("HELLO".to_string()));
    }

    #[test]
    fn numeric_display_with_decimal_positions_is_fixed_point() {
        let mut tree = build_layout(
            [
                (1, "DATA DIVISION."),
                (2, "WORKING-STORAGE SECTION."),
                (3, "01  WS-AMOUNT PIC 9(5)V99."),
            ]
            .into_iter(),
        );
        assign_offsets(&mut tree);
        let item = tree.get("WS-AMOUNT").unwrap();
        let decoded = decode_field(&tree, item, b"0012345");
        assert_eq!(decoded, DecodedValue::FixedPoint(12345, 2));
    }

    #[test]
    fn group_decodes_children_in_order() {
        let mut tree = build_layout(
            [
                (1, "DATA DIVISION."),
                (2, "WORKING-STORAGE SECTION."),
                (3, "01  WS-REC."),
                (4, "05  WS-A PIC X(2)."),
                (5, "05  WS-B PIC X(3)."),
            ]
            .into_iter(),
        );
        assign_offsets(&mut tree);
        let item = tree.get("WS-REC").unwrap();
        let decoded = decode_field(&tree, item, b"ABCDE");
        match decoded {
            DecodedValue::Group(fields) => {
                assert_eq!(fields[0], ("WS-A".to_string(), DecodedValue::Text("AB".to_string())));
                assert_eq!(fields[1], ("WS-B".to_string(), DecodedValue::Text("CDE".to_string())));
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn comp3_unpacks_digits_and_sign() {
        // 12345 packed as COMP-3: 0x01 0x23 0x45 0x0C (positive sign).
        let decoded = decode_packed(&[0x01, 0x23, 0x45, 0x0C]);
        assert_eq!(
            decoded,
            DecodedValue::Packed {
                digits: "0123450".to_string(),
                negative: false,
            }
        );
    }
}
