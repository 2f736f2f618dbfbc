//! Byte-order and integer representation helpers.
//!
//! Cell values are laid out in host order and swapped when the file byte
//! order differs; header and table fields are streamed through
//! [`byteorder`] in the file's byte order.

use std::io::{self, Write};

use byteorder::{BigEndian, ByteOrder as EndianOrder, LittleEndian, WriteBytesExt};

/// Convert a ones-complement byte to twos-complement.
#[must_use]
pub const fn ones_to_twos_complement1(num: i8) -> i8 {
    if num < 0 { num + 1 } else { num }
}

/// Convert a ones-complement 16-bit integer to twos-complement.
#[must_use]
pub const fn ones_to_twos_complement2(num: i16) -> i16 {
    if num < 0 { num + 1 } else { num }
}

/// Convert a ones-complement 32-bit integer to twos-complement.
#[must_use]
pub const fn ones_to_twos_complement4(num: i32) -> i32 {
    if num < 0 { num + 1 } else { num }
}

/// Convert a twos-complement byte to ones-complement.
#[must_use]
pub const fn twos_to_ones_complement1(num: i8) -> i8 {
    if num < 0 { num.wrapping_sub(1) } else { num }
}

/// Convert a twos-complement 16-bit integer to ones-complement.
#[must_use]
pub const fn twos_to_ones_complement2(num: i16) -> i16 {
    if num < 0 { num.wrapping_sub(1) } else { num }
}

/// Convert a twos-complement 32-bit integer to ones-complement.
#[must_use]
pub const fn twos_to_ones_complement4(num: i32) -> i32 {
    if num < 0 { num.wrapping_sub(1) } else { num }
}

#[must_use]
pub const fn byteswap2(num: u16) -> u16 {
    ((num & 0xFF00) >> 8) | ((num & 0x00FF) << 8)
}

#[must_use]
pub const fn byteswap4(num: u32) -> u32 {
    let num = ((num & 0xFFFF_0000) >> 16) | ((num & 0x0000_FFFF) << 16);
    ((num & 0xFF00_FF00) >> 8) | ((num & 0x00FF_00FF) << 8)
}

#[must_use]
pub const fn byteswap8(num: u64) -> u64 {
    let num = ((num & 0xFFFF_FFFF_0000_0000) >> 32) | ((num & 0x0000_0000_FFFF_FFFF) << 32);
    let num = ((num & 0xFFFF_0000_FFFF_0000) >> 16) | ((num & 0x0000_FFFF_0000_FFFF) << 16);
    ((num & 0xFF00_FF00_FF00_FF00) >> 8) | ((num & 0x00FF_00FF_00FF_00FF) << 8)
}

#[must_use]
pub fn byteswap_f32(num: f32) -> f32 {
    f32::from_bits(byteswap4(num.to_bits()))
}

#[must_use]
pub fn byteswap_f64(num: f64) -> f64 {
    f64::from_bits(byteswap8(num.to_bits()))
}

/// Whether the host stores integers least significant byte first.
#[must_use]
pub const fn machine_is_little_endian() -> bool {
    cfg!(target_endian = "little")
}

/// Byte order of a DTA file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ByteOrder {
    /// Most significant byte first (big endian, `HILO`).
    Msf,
    /// Least significant byte first (little endian, `LOHI`).
    Lsf,
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

impl ByteOrder {
    /// The host byte order.
    #[must_use]
    pub const fn native() -> Self {
        if machine_is_little_endian() {
            Self::Lsf
        } else {
            Self::Msf
        }
    }

    /// Byte-order code stored in the raw header record.
    #[must_use]
    pub const fn header_code(self) -> u8 {
        match self {
            Self::Msf => 0x01,
            Self::Lsf => 0x02,
        }
    }

    /// Text stored in the tagged `<byteorder>` element.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Msf => "MSF",
            Self::Lsf => "LSF",
        }
    }

    /// Whether values laid out in host order must be swapped for this order.
    #[must_use]
    pub const fn needs_swap(self) -> bool {
        machine_is_little_endian() != matches!(self, Self::Lsf)
    }

    pub fn write_u16<W: Write>(self, writer: &mut W, value: u16) -> io::Result<()> {
        match self {
            Self::Msf => writer.write_u16::<BigEndian>(value),
            Self::Lsf => writer.write_u16::<LittleEndian>(value),
        }
    }

    pub fn write_i16<W: Write>(self, writer: &mut W, value: i16) -> io::Result<()> {
        match self {
            Self::Msf => writer.write_i16::<BigEndian>(value),
            Self::Lsf => writer.write_i16::<LittleEndian>(value),
        }
    }

    pub fn write_i32<W: Write>(self, writer: &mut W, value: i32) -> io::Result<()> {
        match self {
            Self::Msf => writer.write_i32::<BigEndian>(value),
            Self::Lsf => writer.write_i32::<LittleEndian>(value),
        }
    }

    pub fn write_u32<W: Write>(self, writer: &mut W, value: u32) -> io::Result<()> {
        match self {
            Self::Msf => writer.write_u32::<BigEndian>(value),
            Self::Lsf => writer.write_u32::<LittleEndian>(value),
        }
    }

    pub fn write_u64<W: Write>(self, writer: &mut W, value: u64) -> io::Result<()> {
        match self {
            Self::Msf => writer.write_u64::<BigEndian>(value),
            Self::Lsf => writer.write_u64::<LittleEndian>(value),
        }
    }

    /// Decode a 16-bit field (test and inspection helper).
    #[must_use]
    pub fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            Self::Msf => BigEndian::read_u16(buf),
            Self::Lsf => LittleEndian::read_u16(buf),
        }
    }

    /// Decode a 32-bit field (test and inspection helper).
    #[must_use]
    pub fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            Self::Msf => BigEndian::read_u32(buf),
            Self::Lsf => LittleEndian::read_u32(buf),
        }
    }

    /// Decode a 64-bit field (test and inspection helper).
    #[must_use]
    pub fn read_u64(self, buf: &[u8]) -> u64 {
        match self {
            Self::Msf => BigEndian::read_u64(buf),
            Self::Lsf => LittleEndian::read_u64(buf),
        }
    }

    pub(crate) fn put_u16(self, buf: &mut [u8], value: u16) {
        let value = if self.needs_swap() { byteswap2(value) } else { value };
        buf[..2].copy_from_slice(&value.to_ne_bytes());
    }

    pub(crate) fn put_u32(self, buf: &mut [u8], value: u32) {
        let value = if self.needs_swap() { byteswap4(value) } else { value };
        buf[..4].copy_from_slice(&value.to_ne_bytes());
    }

    pub(crate) fn put_u64(self, buf: &mut [u8], value: u64) {
        let value = if self.needs_swap() { byteswap8(value) } else { value };
        buf[..8].copy_from_slice(&value.to_ne_bytes());
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
