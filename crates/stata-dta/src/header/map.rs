//! Section map of the tagged layout.
//!
//! The map holds 14 absolute byte offsets, in file order:
//!
//! | Entry | Points at              |
//! |-------|------------------------|
//! | 0     | `<stata_dta>`          |
//! | 1     | `<map>`                |
//! | 2     | `<variable_types>`     |
//! | 3     | `<varnames>`           |
//! | 4     | `<sortlist>`           |
//! | 5     | `<formats>`            |
//! | 6     | `<value_label_names>`  |
//! | 7     | `<variable_labels>`    |
//! | 8     | `<characteristics>`    |
//! | 9     | `<data>`               |
//! | 10    | `<strls>`              |
//! | 11    | `<value_labels>`       |
//! | 12    | `</stata_dta>`         |
//! | 13    | end of file            |

use std::io::{self, Write};

use super::write_tag;
use crate::context::SessionContext;
use crate::error::{DtaError, Result};

/// Number of offsets in the map.
pub const MAP_ENTRIES: usize = 14;

/// Encoded size of the `<map>` block.
pub const MAP_LEN: usize = "<map>".len() + MAP_ENTRIES * 8 + "</map>".len();

/// Section offsets of one tagged file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionMap {
    offsets: [u64; MAP_ENTRIES],
}

impl SectionMap {
    /// Build the map from the encoded length of each section, in file order.
    ///
    /// The first section starts at offset 0 and includes the `<stata_dta>`
    /// opening tag together with the header.
    #[must_use]
    pub fn from_lengths(lengths: [u64; MAP_ENTRIES - 1]) -> Self {
        let mut offsets = [0u64; MAP_ENTRIES];
        for (i, len) in lengths.iter().enumerate() {
            offsets[i + 1] = offsets[i] + len;
        }
        Self { offsets }
    }

    #[must_use]
    pub fn offsets(&self) -> &[u64; MAP_ENTRIES] {
        &self.offsets
    }

    /// Total file length.
    #[must_use]
    pub fn file_len(&self) -> u64 {
        self.offsets[MAP_ENTRIES - 1]
    }
}

/// Write the `<map>` block; a no-op outside the tagged layout.
pub fn emit_map<W: Write>(
    writer: &mut W,
    ctx: &SessionContext,
    map: Option<&SectionMap>,
) -> Result<()> {
    if !ctx.tagged {
        return Ok(());
    }
    let map = map.ok_or_else(|| {
        DtaError::Write(io::Error::other("section map not computed for tagged file"))
    })?;

    write_tag(writer, ctx, "<map>")?;
    for &offset in map.offsets() {
        ctx.byte_order.write_u64(writer, offset)?;
    }
    write_tag(writer, ctx, "</map>")?;
    Ok(())
}
