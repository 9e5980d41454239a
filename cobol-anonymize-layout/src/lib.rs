//! Record layout decoder: folds a file's DATA DIVISION into a field tree
//! with assigned byte offsets, then decodes raw record bytes against it.
//! Does not execute COBOL; this is read-only structural decoding for
//! inspection and reporting.

mod decode;
mod length;
mod model;
mod offsets;
mod parser;

pub use decode::{decode_field, DecodedValue};
pub use length::storage_length;
pub use model::{DataItem, FieldKind, LayoutTree, PicInfo};
pub use offsets::assign_offsets;
pub use parser::build_layout;
