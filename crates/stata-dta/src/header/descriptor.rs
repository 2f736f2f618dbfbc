//! Descriptor block emission.
//!
//! Five blocks follow the header, one entry per variable (the sort list has
//! one extra terminator entry). Each block is wrapped in its own element in
//! the tagged layout.

use std::io::Write;

use super::{fixed_block, write_tag};
use crate::context::SessionContext;
use crate::error::Result;
use crate::types::DtaVariable;

/// Write the type list (`<variable_types>`).
pub fn emit_typlist<W: Write>(
    writer: &mut W,
    ctx: &SessionContext,
    variables: &[DtaVariable],
) -> Result<()> {
    write_tag(writer, ctx, "<variable_types>")?;
    for variable in variables {
        let code = ctx.profile.typecode(variable);
        if ctx.typlist_entry_len == 2 {
            ctx.byte_order.write_u16(writer, code)?;
        } else {
            writer.write_all(&[code as u8])?;
        }
    }
    write_tag(writer, ctx, "</variable_types>")?;
    Ok(())
}

/// Write the variable names (`<varnames>`).
pub fn emit_varlist<W: Write>(
    writer: &mut W,
    ctx: &SessionContext,
    variables: &[DtaVariable],
) -> Result<()> {
    write_tag(writer, ctx, "<varnames>")?;
    let block = fixed_block(
        variables.iter().map(|v| v.name.as_bytes()),
        ctx.variable_name_len,
    );
    writer.write_all(&block)?;
    write_tag(writer, ctx, "</varnames>")?;
    Ok(())
}

/// Write the sort list (`<sortlist>`).
///
/// Sort order is never recorded, so the list is all zeros.
pub fn emit_srtlist<W: Write>(writer: &mut W, ctx: &SessionContext) -> Result<()> {
    write_tag(writer, ctx, "<sortlist>")?;
    writer.write_all(&vec![0u8; ctx.srtlist_len()])?;
    write_tag(writer, ctx, "</sortlist>")?;
    Ok(())
}

/// Write the display formats (`<formats>`).
pub fn emit_fmtlist<W: Write>(
    writer: &mut W,
    ctx: &SessionContext,
    variables: &[DtaVariable],
) -> Result<()> {
    write_tag(writer, ctx, "<formats>")?;
    let formats: Vec<String> = variables.iter().map(DtaVariable::display_format).collect();
    let block = fixed_block(formats.iter().map(|f| f.as_bytes()), ctx.fmtlist_entry_len);
    writer.write_all(&block)?;
    write_tag(writer, ctx, "</formats>")?;
    Ok(())
}

/// Write the value-label set names (`<value_label_names>`).
pub fn emit_lbllist<W: Write>(
    writer: &mut W,
    ctx: &SessionContext,
    variables: &[DtaVariable],
) -> Result<()> {
    write_tag(writer, ctx, "<value_label_names>")?;
    let block = fixed_block(
        variables
            .iter()
            .map(|v| v.label_set.as_deref().unwrap_or("").as_bytes()),
        ctx.lbllist_entry_len,
    );
    writer.write_all(&block)?;
    write_tag(writer, ctx, "</value_label_names>")?;
    Ok(())
}

/// Write all five descriptor blocks in file order.
pub fn emit_descriptors<W: Write>(
    writer: &mut W,
    ctx: &SessionContext,
    variables: &[DtaVariable],
) -> Result<()> {
    emit_typlist(writer, ctx, variables)?;
    emit_varlist(writer, ctx, variables)?;
    emit_srtlist(writer, ctx)?;
    emit_fmtlist(writer, ctx, variables)?;
    emit_lbllist(writer, ctx, variables)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::ByteOrder;
    use crate::types::{Alignment, DtaVersion};

    fn ctx(version: u16, nvar: usize) -> SessionContext {
        SessionContext::new(DtaVersion::new(version).unwrap(), ByteOrder::Lsf, nvar, 0).unwrap()
    }

    fn variables() -> Vec<DtaVariable> {
        vec![
            DtaVariable::byte("flag"),
            DtaVariable::double("income").with_format("%10.2f"),
            DtaVariable::string("name", 12).with_alignment(Alignment::Left),
        ]
    }

    #[test]
    fn test_typlist_raw() {
        let mut out = Vec::new();
        emit_typlist(&mut out, &ctx(114, 3), &variables()).unwrap();
        assert_eq!(out, [0xFB, 0xFF, 12]);

        let mut out = Vec::new();
        emit_typlist(&mut out, &ctx(108, 3), &variables()).unwrap();
        assert_eq!(out, [b'b', b'd', 12 + 0x7F]);
    }

    #[test]
    fn test_typlist_tagged() {
        let mut out = Vec::new();
        emit_typlist(&mut out, &ctx(117, 3), &variables()).unwrap();
        let mut expected = b"<variable_types>".to_vec();
        expected.extend_from_slice(&[0xFA, 0xFF, 0xF6, 0xFF, 12, 0]);
        expected.extend_from_slice(b"</variable_types>");
        assert_eq!(out, expected);
    }

    #[test]
    fn test_varlist_truncates_names() {
        let vars = vec![DtaVariable::int16("averyverylongname"), DtaVariable::int16("x")];
        let mut out = Vec::new();
        emit_varlist(&mut out, &ctx(105, 2), &vars).unwrap();
        assert_eq!(out.len(), 18);
        assert_eq!(&out[..9], b"averyvery");
        assert_eq!(&out[9..18], b"x\0\0\0\0\0\0\0\0");
    }

    #[test]
    fn test_srtlist_is_zero() {
        let mut out = Vec::new();
        emit_srtlist(&mut out, &ctx(114, 3)).unwrap();
        assert_eq!(out, [0u8; 8]);

        let mut out = Vec::new();
        emit_srtlist(&mut out, &ctx(118, 3)).unwrap();
        assert_eq!(out, b"<sortlist>\0\0\0\0\0\0\0\0</sortlist>");
    }

    #[test]
    fn test_fmtlist_defaults() {
        let mut out = Vec::new();
        emit_fmtlist(&mut out, &ctx(114, 3), &variables()).unwrap();
        assert_eq!(out.len(), 3 * 49);
        assert_eq!(&out[..6], b"%8.0g\0");
        assert_eq!(&out[49..56], b"%10.2f\0");
        assert_eq!(&out[98..103], b"%-9s\0");
    }

    #[test]
    fn test_fmtlist_old_width() {
        let vars = vec![DtaVariable::int32("n")];
        let mut out = Vec::new();
        emit_fmtlist(&mut out, &ctx(104, 1), &vars).unwrap();
        assert_eq!(out, b"%12.0g\0");
    }

    #[test]
    fn test_lbllist() {
        let vars = vec![
            DtaVariable::byte("married").with_label_set("yesno"),
            DtaVariable::byte("other"),
        ];
        let mut out = Vec::new();
        emit_lbllist(&mut out, &ctx(110, 2), &vars).unwrap();
        assert_eq!(out.len(), 66);
        assert_eq!(&out[..6], b"yesno\0");
        assert!(out[33..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_descriptors_size() {
        let ctx = ctx(114, 3);
        let mut out = Vec::new();
        emit_descriptors(&mut out, &ctx, &variables()).unwrap();
        assert_eq!(out.len(), 3 + 3 * 33 + 8 + 3 * 49 + 3 * 33);
    }
}
