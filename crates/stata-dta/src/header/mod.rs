//! Header, map and descriptor emission.
//!
//! This module writes everything that precedes the observation data:
//! - Header record (raw 10-byte record, or the tagged `<header>` block)
//! - Section map (tagged layout only)
//! - Descriptors (type list, names, sort list, formats, value-label names)
//! - Variable labels and the expansion-field terminator
//!
//! Every emitter takes the [`SessionContext`] and streams straight into the
//! sink, so the same code both writes a section and measures it for the map.

pub mod datetime;
pub mod descriptor;
pub mod labels;
pub mod map;
pub mod record;

use std::io::{self, Write};

use crate::context::SessionContext;

// Re-export commonly used items
pub use datetime::{TIME_STAMP_FORMAT, TIME_STAMP_TEXT_LEN, format_dta_timestamp};
pub use descriptor::{
    emit_descriptors, emit_fmtlist, emit_lbllist, emit_srtlist, emit_typlist, emit_varlist,
};
pub use labels::{emit_expansion_fields, emit_variable_labels};
pub use map::{MAP_ENTRIES, MAP_LEN, SectionMap, emit_map};
pub use record::{
    HeaderInfo, RAW_HEADER_LEN, build_raw_header, emit_data_label, emit_header, emit_time_stamp,
};

/// Write a start or end marker; a no-op outside the tagged layout.
pub(crate) fn write_tag<W: Write>(writer: &mut W, ctx: &SessionContext, tag: &str) -> io::Result<()> {
    if ctx.tagged {
        writer.write_all(tag.as_bytes())?;
    }
    Ok(())
}

/// Copy `value` into a zero-filled field, truncating on overflow.
///
/// A value that fills the field is not null-terminated.
pub fn put_fixed(field: &mut [u8], value: &[u8]) {
    let len = value.len().min(field.len());
    field[..len].copy_from_slice(&value[..len]);
    field[len..].fill(0);
}

/// Build a block of `entries.len()` fixed-width fields.
pub(crate) fn fixed_block<'a>(
    entries: impl ExactSizeIterator<Item = &'a [u8]>,
    width: usize,
) -> Vec<u8> {
    let mut block = vec![0u8; entries.len() * width];
    for (field, value) in block.chunks_exact_mut(width).zip(entries) {
        put_fixed(field, value);
    }
    block
}

/// Longest prefix of `value` that fits in `max` bytes.
pub(crate) fn truncate_bytes(value: &str, max: usize) -> &[u8] {
    let bytes = value.as_bytes();
    &bytes[..bytes.len().min(max)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_fixed() {
        let mut field = [0xFFu8; 6];
        put_fixed(&mut field, b"abc");
        assert_eq!(&field, b"abc\0\0\0");

        put_fixed(&mut field, b"abcdefgh");
        assert_eq!(&field, b"abcdef");
    }

    #[test]
    fn test_fixed_block() {
        let names = ["a", "longname"];
        let block = fixed_block(names.iter().map(|n| n.as_bytes()), 4);
        assert_eq!(block, b"a\0\0\0long");
        assert!(fixed_block(std::iter::empty::<&[u8]>(), 4).is_empty());
    }

    #[test]
    fn test_truncate_bytes() {
        assert_eq!(truncate_bytes("hello", 3), b"hel");
        assert_eq!(truncate_bytes("hi", 3), b"hi");
    }
}
