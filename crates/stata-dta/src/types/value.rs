//! Cell values.

use super::{DtaType, MissingValue};

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum DtaValue {
    Byte(i8),
    Int16(i16),
    Int32(i32),
    Float(f32),
    Double(f64),
    /// String value; `None` is written as an empty field.
    String(Option<String>),
    /// Missing value of the variable's own type.
    Missing(MissingValue),
}

impl DtaValue {
    /// Create a string value.
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(Some(value.into()))
    }

    /// Create a system missing value.
    #[must_use]
    pub const fn missing() -> Self {
        Self::Missing(MissingValue::System)
    }

    /// Create a tagged missing value (`.a` through `.z`).
    #[must_use]
    pub const fn tagged_missing(tag: char) -> Self {
        Self::Missing(MissingValue::Tagged(tag))
    }

    /// Storage type implied by the value, or `None` for missing values.
    #[must_use]
    pub const fn value_type(&self) -> Option<DtaType> {
        match self {
            Self::Byte(_) => Some(DtaType::Byte),
            Self::Int16(_) => Some(DtaType::Int16),
            Self::Int32(_) => Some(DtaType::Int32),
            Self::Float(_) => Some(DtaType::Float),
            Self::Double(_) => Some(DtaType::Double),
            Self::String(_) => Some(DtaType::String),
            Self::Missing(_) => None,
        }
    }

    /// Check if the value is missing.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing(_) => true,
            Self::String(value) => value.as_deref().is_none_or(str::is_empty),
            Self::Float(value) => value.is_nan(),
            Self::Double(value) => value.is_nan(),
            _ => false,
        }
    }
}

impl From<i8> for DtaValue {
    fn from(value: i8) -> Self {
        Self::Byte(value)
    }
}

impl From<i16> for DtaValue {
    fn from(value: i16) -> Self {
        Self::Int16(value)
    }
}

impl From<i32> for DtaValue {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<f32> for DtaValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for DtaValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for DtaValue {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for DtaValue {
    fn from(value: String) -> Self {
        Self::String(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type() {
        assert_eq!(DtaValue::from(3i16).value_type(), Some(DtaType::Int16));
        assert_eq!(DtaValue::from("x").value_type(), Some(DtaType::String));
        assert_eq!(DtaValue::missing().value_type(), None);
    }

    #[test]
    fn test_is_missing() {
        assert!(DtaValue::missing().is_missing());
        assert!(DtaValue::tagged_missing('b').is_missing());
        assert!(DtaValue::String(None).is_missing());
        assert!(DtaValue::string("").is_missing());
        assert!(DtaValue::Double(f64::NAN).is_missing());
        assert!(!DtaValue::Double(0.0).is_missing());
        assert!(!DtaValue::string("a").is_missing());
    }
}
