//! Version profile table.
//!
//! Each release family maps variables to its own type codes and caps string
//! widths differently. A profile is selected once per session and carries the
//! family's behaviour as plain function pointers.
//!
//! | Family  | Versions | Numeric type codes          | String type code | String max |
//! |---------|----------|-----------------------------|------------------|------------|
//! | old     | 104-110  | `b` `i` `l` `f` `d`         | width + 0x7F     | 128        |
//! | 111     | 111-116  | 0xFB-0xFF                   | width            | 244        |
//! | 117     | 117-118  | 0xFFFA-0xFFF6               | width            | 2045       |

use crate::bits::ByteOrder;
use crate::encode;
use crate::error::Result;
use crate::types::{DtaType, DtaVariable, DtaVersion};

/// Maximum string width for releases 104-110.
pub const OLD_MAX_WIDTH: usize = 128;
/// Maximum string width for releases 111-116.
pub const V111_MAX_WIDTH: usize = 244;
/// Maximum string width for releases 117-118.
pub const V117_MAX_WIDTH: usize = 2045;

const OLD_TYPE_CODE_BYTE: u16 = b'b' as u16;
const OLD_TYPE_CODE_INT16: u16 = b'i' as u16;
const OLD_TYPE_CODE_INT32: u16 = b'l' as u16;
const OLD_TYPE_CODE_FLOAT: u16 = b'f' as u16;
const OLD_TYPE_CODE_DOUBLE: u16 = b'd' as u16;
const OLD_STRING_TYPE_BASE: u16 = 0x7F;

const V111_TYPE_CODE_BYTE: u16 = 0xFB;
const V111_TYPE_CODE_INT16: u16 = 0xFC;
const V111_TYPE_CODE_INT32: u16 = 0xFD;
const V111_TYPE_CODE_FLOAT: u16 = 0xFE;
const V111_TYPE_CODE_DOUBLE: u16 = 0xFF;

const V117_TYPE_CODE_BYTE: u16 = 0xFFFA;
const V117_TYPE_CODE_INT16: u16 = 0xFFF9;
const V117_TYPE_CODE_INT32: u16 = 0xFFF8;
const V117_TYPE_CODE_FLOAT: u16 = 0xFFF7;
const V117_TYPE_CODE_DOUBLE: u16 = 0xFFF6;

/// Release family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionFamily {
    /// Releases 104-110.
    Old,
    /// Releases 111-116.
    V111,
    /// Releases 117-118 (tagged layout).
    V117,
}

impl VersionFamily {
    /// Profile for this family.
    #[must_use]
    pub fn profile(self) -> &'static VersionProfile {
        match self {
            Self::Old => &OLD_PROFILE,
            Self::V111 => &V111_PROFILE,
            Self::V117 => &V117_PROFILE,
        }
    }

    /// Short display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::V111 => "111",
            Self::V117 => "117",
        }
    }
}

impl std::fmt::Display for VersionFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a variable to its on-disk type code.
pub type TypecodeFn = fn(&DtaVariable) -> u16;
/// Resolves the storage width of a variable from its type and requested width.
pub type VariableWidthFn = fn(DtaType, usize) -> usize;
/// Writes a string cell.
pub type WriteStringFn = fn(&mut [u8], &DtaVariable, Option<&str>) -> Result<()>;
/// Writes the system missing value of a variable's type.
pub type WriteMissingFn = fn(&mut [u8], &DtaVariable, ByteOrder) -> Result<()>;

/// Per-family behaviour.
#[derive(Debug, Clone, Copy)]
pub struct VersionProfile {
    pub family: VersionFamily,
    pub max_string_width: usize,
    pub typecode: TypecodeFn,
    pub variable_width: VariableWidthFn,
    pub write_string: WriteStringFn,
    pub write_missing: WriteMissingFn,
}

static OLD_PROFILE: VersionProfile = VersionProfile {
    family: VersionFamily::Old,
    max_string_width: OLD_MAX_WIDTH,
    typecode: old_typecode,
    variable_width: variable_width::<OLD_MAX_WIDTH>,
    write_string: write_string::<OLD_MAX_WIDTH>,
    write_missing: write_missing::<OLD_MAX_WIDTH>,
};

static V111_PROFILE: VersionProfile = VersionProfile {
    family: VersionFamily::V111,
    max_string_width: V111_MAX_WIDTH,
    typecode: v111_typecode,
    variable_width: variable_width::<V111_MAX_WIDTH>,
    write_string: write_string::<V111_MAX_WIDTH>,
    write_missing: write_missing::<V111_MAX_WIDTH>,
};

static V117_PROFILE: VersionProfile = VersionProfile {
    family: VersionFamily::V117,
    max_string_width: V117_MAX_WIDTH,
    typecode: v117_typecode,
    variable_width: variable_width::<V117_MAX_WIDTH>,
    write_string: write_string::<V117_MAX_WIDTH>,
    write_missing: write_missing::<V117_MAX_WIDTH>,
};

/// Select the profile for a validated version.
#[must_use]
pub fn profile_for(version: DtaVersion) -> &'static VersionProfile {
    version.family().profile()
}

impl VersionProfile {
    /// Type code of a variable.
    #[must_use]
    pub fn typecode(&self, variable: &DtaVariable) -> u16 {
        (self.typecode)(variable)
    }

    /// Storage width of a variable in an observation.
    #[must_use]
    pub fn storage_width(&self, variable: &DtaVariable) -> usize {
        (self.variable_width)(variable.data_type, variable.storage_width)
    }
}

/// Numeric types have fixed widths; strings are capped at `MAX`, and 0 means `MAX`.
fn variable_width<const MAX: usize>(data_type: DtaType, width: usize) -> usize {
    match data_type.numeric_width() {
        Some(numeric) => numeric,
        None if width == 0 || width > MAX => MAX,
        None => width,
    }
}

fn write_string<const MAX: usize>(
    buf: &mut [u8],
    variable: &DtaVariable,
    value: Option<&str>,
) -> Result<()> {
    encode::write_string(buf, variable, value, MAX)
}

fn write_missing<const MAX: usize>(
    buf: &mut [u8],
    variable: &DtaVariable,
    order: ByteOrder,
) -> Result<()> {
    if variable.data_type == DtaType::String {
        return encode::write_string(buf, variable, None, MAX);
    }
    encode::write_numeric_missing(buf, variable, order)
}

fn old_typecode(variable: &DtaVariable) -> u16 {
    match variable.data_type {
        DtaType::Byte => OLD_TYPE_CODE_BYTE,
        DtaType::Int16 => OLD_TYPE_CODE_INT16,
        DtaType::Int32 => OLD_TYPE_CODE_INT32,
        DtaType::Float => OLD_TYPE_CODE_FLOAT,
        DtaType::Double => OLD_TYPE_CODE_DOUBLE,
        DtaType::String => {
            let width = variable_width::<OLD_MAX_WIDTH>(DtaType::String, variable.storage_width);
            width as u16 + OLD_STRING_TYPE_BASE
        }
    }
}

fn v111_typecode(variable: &DtaVariable) -> u16 {
    match variable.data_type {
        DtaType::Byte => V111_TYPE_CODE_BYTE,
        DtaType::Int16 => V111_TYPE_CODE_INT16,
        DtaType::Int32 => V111_TYPE_CODE_INT32,
        DtaType::Float => V111_TYPE_CODE_FLOAT,
        DtaType::Double => V111_TYPE_CODE_DOUBLE,
        DtaType::String => {
            variable_width::<V111_MAX_WIDTH>(DtaType::String, variable.storage_width) as u16
        }
    }
}

fn v117_typecode(variable: &DtaVariable) -> u16 {
    match variable.data_type {
        DtaType::Byte => V117_TYPE_CODE_BYTE,
        DtaType::Int16 => V117_TYPE_CODE_INT16,
        DtaType::Int32 => V117_TYPE_CODE_INT32,
        DtaType::Float => V117_TYPE_CODE_FLOAT,
        DtaType::Double => V117_TYPE_CODE_DOUBLE,
        DtaType::String => {
            variable_width::<V117_MAX_WIDTH>(DtaType::String, variable.storage_width) as u16
        }
    }
}
