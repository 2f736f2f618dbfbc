//! Error types for DTA write operations.

use thiserror::Error;

use crate::types::DtaType;
use crate::writer::Phase;

/// Errors that can occur while writing DTA files.
#[derive(Debug, Error)]
pub enum DtaError {
    /// Cell value does not match the variable's declared type.
    #[error("type mismatch for variable '{name}': expected {expected}, got {actual}")]
    ValueTypeMismatch {
        name: String,
        expected: DtaType,
        actual: DtaType,
    },

    /// Value falls into the reserved missing-value region, or the missing tag is not `a`-`z`.
    #[error("value out of range for variable '{name}'")]
    ValueOutOfRange { name: String },

    /// Tagged missing values requested for a string variable.
    #[error("tagged missing values are not supported for string variable '{name}'")]
    TaggedValuesNotSupported { name: String },

    /// Format version outside 104-118.
    #[error("unsupported DTA format version: {version}")]
    UnsupportedFormatVersion { version: u16 },

    /// Session method called in the wrong phase.
    #[error("invalid writer phase: expected {expected}, found {actual}")]
    InvalidPhase { expected: Phase, actual: Phase },

    /// Row length mismatch.
    #[error("row length mismatch: expected {expected}, got {actual}")]
    RowLengthMismatch { expected: usize, actual: usize },

    /// Variable count does not fit the header field.
    #[error("too many variables: {count} (limit {limit})")]
    TooManyVariables { count: usize, limit: usize },

    /// Observation count does not fit the header field.
    #[error("too many observations: {count} (limit {limit})")]
    TooManyObservations { count: u64, limit: u64 },

    /// Variable references a value-label set that is not defined.
    #[error("variable '{variable}' references unknown value label set '{label_set}'")]
    UnknownLabelSet { variable: String, label_set: String },

    /// Underlying sink failure.
    #[error("write error: {0}")]
    Write(#[from] std::io::Error),
}

/// Result type alias for DTA operations.
pub type Result<T> = std::result::Result<T, DtaError>;

impl DtaError {
    /// Create a ValueTypeMismatch error.
    pub fn type_mismatch(name: impl Into<String>, expected: DtaType, actual: DtaType) -> Self {
        Self::ValueTypeMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }

    /// Create a ValueOutOfRange error.
    pub fn out_of_range(name: impl Into<String>) -> Self {
        Self::ValueOutOfRange { name: name.into() }
    }

    /// Create a TaggedValuesNotSupported error.
    pub fn tagged_not_supported(name: impl Into<String>) -> Self {
        Self::TaggedValuesNotSupported { name: name.into() }
    }

    /// Create an UnknownLabelSet error.
    pub fn unknown_label_set(variable: impl Into<String>, label_set: impl Into<String>) -> Self {
        Self::UnknownLabelSet {
            variable: variable.into(),
            label_set: label_set.into(),
        }
    }

    /// Whether this error is a data validation failure (as opposed to I/O or misuse).
    #[must_use]
    pub fn is_value_error(&self) -> bool {
        matches!(
            self,
            Self::ValueTypeMismatch { .. }
                | Self::ValueOutOfRange { .. }
                | Self::TaggedValuesNotSupported { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DtaError::out_of_range("age");
        assert_eq!(format!("{err}"), "value out of range for variable 'age'");

        let err = DtaError::UnsupportedFormatVersion { version: 119 };
        assert_eq!(format!("{err}"), "unsupported DTA format version: 119");

        let err = DtaError::type_mismatch("x", DtaType::Int16, DtaType::Double);
        assert_eq!(
            format!("{err}"),
            "type mismatch for variable 'x': expected int, got double"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "test");
        let dta_err: DtaError = io_err.into();
        assert!(matches!(dta_err, DtaError::Write(_)));
        assert!(!dta_err.is_value_error());
    }

    #[test]
    fn test_phase_error_display() {
        let err = DtaError::InvalidPhase {
            expected: Phase::DataOpen,
            actual: Phase::Uninitialized,
        };
        assert!(format!("{err}").contains("data open"));
        assert!(format!("{err}").contains("uninitialized"));
    }
}
