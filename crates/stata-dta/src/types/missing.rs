//! Missing value codes.
//!
//! Stata reserves the top of every numeric type's range: one system missing
//! value (`.`) followed by 26 tagged missing values (`.a` through `.z`).

/// Sentinel bit patterns and the largest storable value per numeric type.
pub mod sentinel {
    pub const BYTE_MAX: i8 = 100;
    pub const BYTE_MISSING: i8 = 101;
    pub const BYTE_MISSING_A: i8 = BYTE_MISSING + 1;

    pub const INT16_MAX: i16 = 32_740;
    pub const INT16_MISSING: i16 = 32_741;
    pub const INT16_MISSING_A: i16 = INT16_MISSING + 1;

    pub const INT32_MAX: i32 = 2_147_483_620;
    pub const INT32_MISSING: i32 = 2_147_483_621;
    pub const INT32_MISSING_A: i32 = INT32_MISSING + 1;

    pub const FLOAT_MAX_BITS: u32 = 0x7EFF_FFFF;
    pub const FLOAT_MISSING_BITS: u32 = 0x7F00_0000;
    pub const FLOAT_MISSING_A_BITS: u32 = FLOAT_MISSING_BITS + 0x0800;
    /// Shift applied to the tag offset for floats.
    pub const FLOAT_TAG_SHIFT: u32 = 11;

    pub const DOUBLE_MAX_BITS: u64 = 0x7FDF_FFFF_FFFF_FFFF;
    pub const DOUBLE_MISSING_BITS: u64 = 0x7FE0_0000_0000_0000;
    pub const DOUBLE_MISSING_A_BITS: u64 = DOUBLE_MISSING_BITS + (1 << 40);
    /// Shift applied to the tag offset for doubles.
    pub const DOUBLE_TAG_SHIFT: u32 = 40;
}

/// A missing value code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingValue {
    /// System missing (`.`), or an empty string for string variables.
    #[default]
    System,
    /// Tagged missing (`.a` through `.z`).
    Tagged(char),
}

impl MissingValue {
    /// Offset of a tag letter from `a`, or `None` outside `a`-`z`.
    #[must_use]
    pub fn tag_offset(tag: char) -> Option<u8> {
        if tag.is_ascii_lowercase() {
            Some(tag as u8 - b'a')
        } else {
            None
        }
    }

    /// Whether this is a tagged missing value.
    #[must_use]
    pub const fn is_tagged(self) -> bool {
        matches!(self, Self::Tagged(_))
    }
}

impl std::fmt::Display for MissingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => f.write_str("."),
            Self::Tagged(tag) => write!(f, ".{tag}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::sentinel::{
        BYTE_MAX, BYTE_MISSING, DOUBLE_MAX_BITS, DOUBLE_MISSING_A_BITS, DOUBLE_MISSING_BITS,
        FLOAT_MAX_BITS, FLOAT_MISSING_A_BITS, FLOAT_MISSING_BITS,
    };
    use super::*;

    #[test]
    fn test_tag_offset() {
        assert_eq!(MissingValue::tag_offset('a'), Some(0));
        assert_eq!(MissingValue::tag_offset('z'), Some(25));
        assert_eq!(MissingValue::tag_offset('A'), None);
        assert_eq!(MissingValue::tag_offset('{'), None);
        assert_eq!(MissingValue::tag_offset('é'), None);
    }

    #[test]
    fn test_sentinel_layout() {
        assert_eq!(BYTE_MISSING, BYTE_MAX + 1);
        assert_eq!(FLOAT_MISSING_A_BITS, 0x7F00_0800);
        assert_eq!(DOUBLE_MISSING_A_BITS, 0x7FE0_0100_0000_0000);
        assert!(f32::from_bits(FLOAT_MAX_BITS) < f32::from_bits(FLOAT_MISSING_BITS));
        assert!(f64::from_bits(DOUBLE_MAX_BITS) < f64::from_bits(DOUBLE_MISSING_BITS));
    }

    #[test]
    fn test_display() {
        assert_eq!(MissingValue::System.to_string(), ".");
        assert_eq!(MissingValue::Tagged('q').to_string(), ".q");
    }
}
