//! Variable labels and expansion fields.

use std::io::Write;

use super::{fixed_block, write_tag};
use crate::context::SessionContext;
use crate::error::Result;
use crate::types::DtaVariable;

/// Write one fixed-width label per variable (`<variable_labels>`).
pub fn emit_variable_labels<W: Write>(
    writer: &mut W,
    ctx: &SessionContext,
    variables: &[DtaVariable],
) -> Result<()> {
    write_tag(writer, ctx, "<variable_labels>")?;
    let block = fixed_block(
        variables
            .iter()
            .map(|v| v.label.as_deref().unwrap_or("").as_bytes()),
        ctx.variable_labels_entry_len,
    );
    writer.write_all(&block)?;
    write_tag(writer, ctx, "</variable_labels>")?;
    Ok(())
}

/// Write the expansion-field terminator.
///
/// Raw files end the list with a zero record: a type byte followed by a
/// 2-byte (105-109) or 4-byte (110+) length. Release 104 has no expansion
/// fields. Tagged files write an empty `<characteristics>` block instead.
pub fn emit_expansion_fields<W: Write>(writer: &mut W, ctx: &SessionContext) -> Result<()> {
    if ctx.tagged {
        writer.write_all(b"<characteristics></characteristics>")?;
        return Ok(());
    }
    match ctx.expansion_len_len {
        2 => writer.write_all(&[0u8; 3])?,
        4 => writer.write_all(&[0u8; 5])?,
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::ByteOrder;
    use crate::types::DtaVersion;

    fn ctx(version: u16, nvar: usize) -> SessionContext {
        SessionContext::new(DtaVersion::new(version).unwrap(), ByteOrder::Lsf, nvar, 0).unwrap()
    }

    #[test]
    fn test_variable_labels() {
        let vars = vec![
            DtaVariable::double("income").with_label("Household income"),
            DtaVariable::byte("flag"),
        ];
        let mut out = Vec::new();
        emit_variable_labels(&mut out, &ctx(107, 2), &vars).unwrap();
        assert_eq!(out.len(), 64);
        assert_eq!(&out[..17], b"Household income\0");
        assert!(out[32..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_variable_labels_truncated() {
        let vars = vec![DtaVariable::double("x").with_label("y".repeat(100))];
        let mut out = Vec::new();
        emit_variable_labels(&mut out, &ctx(114, 1), &vars).unwrap();
        assert_eq!(out.len(), 81);
        assert!(out.iter().all(|&b| b == b'y'));
    }

    #[test]
    fn test_variable_labels_tagged() {
        let vars = vec![DtaVariable::double("x").with_label("X")];
        let mut out = Vec::new();
        emit_variable_labels(&mut out, &ctx(118, 1), &vars).unwrap();
        assert!(out.starts_with(b"<variable_labels>X\0"));
        assert!(out.ends_with(b"</variable_labels>"));
        assert_eq!(out.len(), 17 + 321 + 18);
    }

    #[test]
    fn test_expansion_fields() {
        let cases = [(104, 0), (105, 3), (109, 3), (110, 5), (116, 5)];
        for (version, len) in cases {
            let mut out = Vec::new();
            emit_expansion_fields(&mut out, &ctx(version, 1)).unwrap();
            assert_eq!(out.len(), len, "version {version}");
            assert!(out.iter().all(|&b| b == 0));
        }

        let mut out = Vec::new();
        emit_expansion_fields(&mut out, &ctx(117, 1)).unwrap();
        assert_eq!(out, b"<characteristics></characteristics>");
    }
}
