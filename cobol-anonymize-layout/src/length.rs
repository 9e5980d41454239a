//! Storage-length calculation, ported from `calculate_comp_length`.

use cobol_anonymize_core::pic::UsageKind;

use crate::model::PicInfo;

/// Storage length in bytes for one elementary item's PIC/USAGE pair.
///
/// `BINARY`/`COMP`/`COMP-4`/`COMP-5`: bucketed by digit count (1/2/3/4/8
/// bytes). `COMP-3`/`PACKED-DECIMAL`: `(digits + 2) / 2`, the trailing
/// nibble holding the sign. Anything else (`DISPLAY` or unrecognized):
/// one byte per digit/character position.
pub fn storage_length(pic: &PicInfo) -> u32 {
    let digits = pic.display_length as u32;
    match pic.usage {
        UsageKind::Comp | UsageKind::Comp4 | UsageKind::Comp5 | UsageKind::Binary => {
            if digits <= 2 {
                1
            } else if digits <= 4 {
                2
            } else if digits <= 6 {
                3
            } else if digits <= 9 {
                4
            } else {
                8
            }
        }
        UsageKind::Comp3 | UsageKind::PackedDecimal => (digits + 2) / 2,
        _ => digits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cobol_anonymize_core::pic::UsageKind;

    fn pic(display_length: usize, usage: UsageKind) -> PicInfo {
        PicInfo {
            raw: String::new(),
            kind: crate::model::FieldKind::Numeric,
            display_length,
            storage_length: 0,
            decimal_positions: 0,
            is_signed: false,
            usage,
        }
    }

    #[test]
    fn binary_buckets_by_digit_count() {
        assert_eq!(storage_length(&pic(2, UsageKind::Comp)), 1);
        assert_eq!(storage_length(&pic(4, UsageKind::Comp)), 2);
        assert_eq!(storage_length(&pic(6, UsageKind::Comp)), 3);
        assert_eq!(storage_length(&pic(9, UsageKind::Comp)), 4);
        assert_eq!(storage_length(&pic(10, UsageKind::Comp)), 8);
    }

    #[test]
    fn comp3_is_half_digits_rounded_up_plus_sign_nibble() {
        assert_eq!(storage_length(&pic(5, UsageKind::Comp3)), 3);
        assert_eq!(storage_length(&pic(7, UsageKind::Comp3)), 4);
    }

    #[test]
    fn display_is_one_byte_per_digit() {
        assert_eq!(storage_length(&pic(10, UsageKind::Display)), 10);
    }
}
