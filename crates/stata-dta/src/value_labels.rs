//! Value-label table emission.
//!
//! Release 104 uses the legacy table: a 2-byte length, the set name and one
//! 8-byte label per entry. Later releases use the modern table:
//!
//! | Field     | Size        | Description                          |
//! |-----------|-------------|--------------------------------------|
//! | len       | 4           | `8 + 8n + txtlen`                    |
//! | labname   | name + 3    | Set name, null padded                |
//! | n         | 4           | Entry count                          |
//! | txtlen    | 4           | Size of the text blob                |
//! | off       | 4n          | Offset of each label in the blob     |
//! | val       | 4n          | Key of each label                    |
//! | txt       | txtlen      | Null-terminated labels               |
//!
//! An empty set stops after the two zero count fields.

use std::io::{self, Write};

use crate::context::SessionContext;
use crate::error::{DtaError, Result};
use crate::header::{put_fixed, write_tag};
use crate::types::LabelSet;

/// Width of one label in the legacy table.
pub const LEGACY_LABEL_LEN: usize = 8;

/// Write every label set, wrapped in `<value_labels>` in the tagged layout.
pub fn emit_value_labels<W: Write>(
    writer: &mut W,
    ctx: &SessionContext,
    label_sets: &[LabelSet],
) -> Result<()> {
    write_tag(writer, ctx, "<value_labels>")?;
    for label_set in label_sets {
        if ctx.value_label_table_len_len == 2 {
            emit_legacy_table(writer, ctx, label_set)?;
        } else {
            emit_table(writer, ctx, label_set)?;
        }
    }
    write_tag(writer, ctx, "</value_labels>")?;
    Ok(())
}

fn table_name(ctx: &SessionContext, label_set: &LabelSet) -> Vec<u8> {
    let mut labname =
        vec![0u8; ctx.value_label_table_labname_len + ctx.value_label_table_padding_len];
    put_fixed(
        &mut labname[..ctx.value_label_table_labname_len],
        label_set.name.as_bytes(),
    );
    labname
}

/// Legacy table. Keys are not written: readers of this release take them
/// from the entry position.
fn emit_legacy_table<W: Write>(
    writer: &mut W,
    ctx: &SessionContext,
    label_set: &LabelSet,
) -> Result<()> {
    let table_len = i16::try_from(LEGACY_LABEL_LEN * label_set.len())
        .map_err(|_| too_large(label_set))?;
    ctx.byte_order.write_i16(writer, table_len)?;
    writer.write_all(&table_name(ctx, label_set))?;

    let mut field = [0u8; LEGACY_LABEL_LEN];
    for value_label in &label_set.labels {
        put_fixed(&mut field, value_label.label.as_bytes());
        writer.write_all(&field)?;
    }
    Ok(())
}

fn emit_table<W: Write>(writer: &mut W, ctx: &SessionContext, label_set: &LabelSet) -> Result<()> {
    let order = ctx.byte_order;
    let n = i32::try_from(label_set.len()).map_err(|_| too_large(label_set))?;
    let txtlen = i32::try_from(label_set.text_len()).map_err(|_| too_large(label_set))?;
    let table_len = 8i32
        .checked_add(n.checked_mul(8).ok_or_else(|| too_large(label_set))?)
        .and_then(|len| len.checked_add(txtlen))
        .ok_or_else(|| too_large(label_set))?;

    write_tag(writer, ctx, "<lbl>")?;
    order.write_i32(writer, table_len)?;
    writer.write_all(&table_name(ctx, label_set))?;

    if txtlen == 0 {
        order.write_i32(writer, 0)?;
        order.write_i32(writer, 0)?;
        write_tag(writer, ctx, "</lbl>")?;
        return Ok(());
    }

    let mut txt = Vec::with_capacity(label_set.text_len());
    let mut offsets = Vec::with_capacity(label_set.len());
    for value_label in &label_set.labels {
        offsets.push(txt.len() as i32);
        txt.extend_from_slice(value_label.label.as_bytes());
        txt.push(0);
    }

    order.write_i32(writer, n)?;
    order.write_i32(writer, txtlen)?;
    for offset in offsets {
        order.write_i32(writer, offset)?;
    }
    for value_label in &label_set.labels {
        order.write_i32(writer, value_label.key)?;
    }
    writer.write_all(&txt)?;

    write_tag(writer, ctx, "</lbl>")?;
    Ok(())
}

fn too_large(label_set: &LabelSet) -> DtaError {
    DtaError::Write(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("value label set '{}' is too large", label_set.name),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::ByteOrder;
    use crate::types::DtaVersion;

    fn ctx(version: u16) -> SessionContext {
        SessionContext::new(DtaVersion::new(version).unwrap(), ByteOrder::Lsf, 1, 0).unwrap()
    }

    fn i32_at(buf: &[u8], offset: usize) -> i32 {
        i32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_modern_table() {
        let set = LabelSet::new("grade")
            .with_label(1, "low")
            .with_label(2, "medium")
            .with_label(9, "high");
        let mut out = Vec::new();
        emit_value_labels(&mut out, &ctx(114), std::slice::from_ref(&set)).unwrap();

        let txtlen = 4 + 7 + 5;
        assert_eq!(i32_at(&out, 0), 8 + 8 * 3 + txtlen);
        assert_eq!(&out[4..10], b"grade\0");
        assert!(out[9..40].iter().all(|&b| b == 0));

        let body = 4 + 33 + 3;
        assert_eq!(i32_at(&out, body), 3);
        assert_eq!(i32_at(&out, body + 4), txtlen);
        assert_eq!(i32_at(&out, body + 8), 0);
        assert_eq!(i32_at(&out, body + 12), 4);
        assert_eq!(i32_at(&out, body + 16), 11);
        assert_eq!(i32_at(&out, body + 20), 1);
        assert_eq!(i32_at(&out, body + 24), 2);
        assert_eq!(i32_at(&out, body + 28), 9);
        assert_eq!(&out[body + 32..], b"low\0medium\0high\0");
    }

    #[test]
    fn test_empty_set() {
        let set = LabelSet::new("empty");
        let mut out = Vec::new();
        emit_value_labels(&mut out, &ctx(114), &[set]).unwrap();
        assert_eq!(out.len(), 4 + 36 + 8);
        assert_eq!(i32_at(&out, 0), 8);
        assert_eq!(i32_at(&out, 40), 0);
        assert_eq!(i32_at(&out, 44), 0);
    }

    #[test]
    fn test_tagged_wrapping() {
        let sets = [
            LabelSet::new("a").with_label(0, "no"),
            LabelSet::new("b"),
        ];
        let mut out = Vec::new();
        emit_value_labels(&mut out, &ctx(118), &sets).unwrap();
        assert!(out.starts_with(b"<value_labels><lbl>"));
        assert!(out.ends_with(b"</lbl></value_labels>"));
        let lbl_count = out.windows(5).filter(|w| w == b"<lbl>").count();
        assert_eq!(lbl_count, 2);

        // 118 set names are 129 bytes plus padding
        let first = 14 + 5;
        assert_eq!(i32_at(&out, first), 8 + 8 + 3);
        assert_eq!(&out[first + 4..first + 6], b"a\0");
        assert_eq!(i32_at(&out, first + 4 + 132), 1);
    }

    #[test]
    fn test_no_sets_tagged() {
        let mut out = Vec::new();
        emit_value_labels(&mut out, &ctx(117), &[]).unwrap();
        assert_eq!(out, b"<value_labels></value_labels>");

        let mut out = Vec::new();
        emit_value_labels(&mut out, &ctx(113), &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_legacy_table_has_no_keys() {
        let set = LabelSet::new("sex")
            .with_label(100, "male")
            .with_label(200, "female-long-label");
        let mut out = Vec::new();
        emit_value_labels(&mut out, &ctx(104), &[set]).unwrap();

        assert_eq!(out.len(), 2 + 14 + 16);
        assert_eq!(i16::from_le_bytes([out[0], out[1]]), 16);
        assert_eq!(&out[2..6], b"sex\0");
        assert!(out[5..16].iter().all(|&b| b == 0));
        assert_eq!(&out[16..24], b"male\0\0\0\0");
        assert_eq!(&out[24..32], b"female-l");
        // neither key appears anywhere in the table
        assert!(!out.windows(4).any(|w| w == 100i32.to_le_bytes()));
        assert!(!out.windows(4).any(|w| w == 200i32.to_le_bytes()));
    }

    #[test]
    fn test_legacy_table_too_large() {
        let mut set = LabelSet::new("big");
        for key in 0..5000 {
            set.add_label(key, "x");
        }
        let mut out = Vec::new();
        assert!(matches!(
            emit_value_labels(&mut out, &ctx(104), &[set]),
            Err(DtaError::Write(_))
        ));
    }
}
