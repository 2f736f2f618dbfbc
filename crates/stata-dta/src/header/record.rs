//! Header record emission.
//!
//! Raw files (releases before 117) start with a fixed 10-byte record:
//!
//! | Offset | Length | Field     | Description                     |
//! |--------|--------|-----------|---------------------------------|
//! | 0      | 1      | ds_format | Release number                  |
//! | 1      | 1      | byteorder | 1 = HILO (MSF), 2 = LOHI (LSF)  |
//! | 2      | 1      | filetype  | Always 1                        |
//! | 3      | 1      | unused    | Always 0                        |
//! | 4-5    | 2      | nvar      | Variable count                  |
//! | 6-9    | 4      | nobs      | Observation count               |
//!
//! followed by the data label and (from 105 on) the time stamp. Tagged files
//! wrap the same information in `<header>` elements.

use std::io::Write;

use chrono::NaiveDateTime;

use super::datetime::format_dta_timestamp;
use super::{put_fixed, truncate_bytes, write_tag};
use crate::context::SessionContext;
use crate::error::Result;

/// Raw header record length.
pub const RAW_HEADER_LEN: usize = 10;

const FILETYPE: u8 = 0x01;

/// File-level header text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Data label (may be empty).
    pub label: String,
    /// Formatted time stamp.
    pub timestamp: String,
}

impl HeaderInfo {
    pub fn new(label: impl Into<String>, timestamp: &NaiveDateTime) -> Self {
        Self {
            label: label.into(),
            timestamp: format_dta_timestamp(timestamp),
        }
    }
}

/// Build the 10-byte raw header record.
#[must_use]
pub fn build_raw_header(ctx: &SessionContext) -> [u8; RAW_HEADER_LEN] {
    let mut record = [0u8; RAW_HEADER_LEN];
    record[0] = ctx.version.get() as u8;
    record[1] = ctx.byte_order.header_code();
    record[2] = FILETYPE;
    // record[3] is unused
    ctx.byte_order.put_u16(&mut record[4..6], ctx.nvar as u16);
    ctx.byte_order.put_u32(&mut record[6..10], ctx.nobs as u32);
    record
}

/// Write the header: the raw record or the tagged `<header>` block.
///
/// The tagged form also opens the `<stata_dta>` root element.
pub fn emit_header<W: Write>(writer: &mut W, ctx: &SessionContext, info: &HeaderInfo) -> Result<()> {
    if !ctx.tagged {
        writer.write_all(&build_raw_header(ctx))?;
        emit_data_label(writer, ctx, &info.label)?;
        emit_time_stamp(writer, ctx, &info.timestamp)?;
        return Ok(());
    }

    let order = ctx.byte_order;
    write_tag(writer, ctx, "<stata_dta>")?;
    write_tag(writer, ctx, "<header>")?;
    write!(writer, "<release>{}</release>", ctx.version)?;
    write!(writer, "<byteorder>{}</byteorder>", order.tag())?;

    write_tag(writer, ctx, "<K>")?;
    order.write_u16(writer, ctx.nvar as u16)?;
    write_tag(writer, ctx, "</K>")?;

    write_tag(writer, ctx, "<N>")?;
    if ctx.nobs_len == 8 {
        order.write_u64(writer, ctx.nobs)?;
    } else {
        order.write_u32(writer, ctx.nobs as u32)?;
    }
    write_tag(writer, ctx, "</N>")?;

    emit_data_label(writer, ctx, &info.label)?;
    emit_time_stamp(writer, ctx, &info.timestamp)?;
    write_tag(writer, ctx, "</header>")?;
    Ok(())
}

/// Write the data label.
///
/// Length-prefixed when the version has a label length field, otherwise a
/// fixed null-terminated field. Either way at most `data_label_len - 1`
/// bytes of text are kept.
pub fn emit_data_label<W: Write>(writer: &mut W, ctx: &SessionContext, label: &str) -> Result<()> {
    write_tag(writer, ctx, "<label>")?;

    let text = truncate_bytes(label, ctx.data_label_len - 1);
    match ctx.data_label_len_len {
        0 => {
            let mut field = vec![0u8; ctx.data_label_len];
            put_fixed(&mut field, text);
            writer.write_all(&field)?;
        }
        1 => {
            writer.write_all(&[text.len() as u8])?;
            writer.write_all(text)?;
        }
        _ => {
            ctx.byte_order.write_u16(writer, text.len() as u16)?;
            writer.write_all(text)?;
        }
    }

    write_tag(writer, ctx, "</label>")?;
    Ok(())
}

/// Write the time stamp; nothing for releases without one.
pub fn emit_time_stamp<W: Write>(writer: &mut W, ctx: &SessionContext, timestamp: &str) -> Result<()> {
    if ctx.time_stamp_len == 0 {
        return Ok(());
    }

    let text = truncate_bytes(timestamp, ctx.time_stamp_len - 1);
    if ctx.tagged {
        write_tag(writer, ctx, "<timestamp>")?;
        writer.write_all(&[text.len() as u8])?;
        writer.write_all(text)?;
        write_tag(writer, ctx, "</timestamp>")?;
    } else {
        let mut field = vec![0u8; ctx.time_stamp_len];
        put_fixed(&mut field, text);
        writer.write_all(&field)?;
    }
    Ok(())
}
