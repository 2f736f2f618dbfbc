//! Variable definitions.

/// Semantic storage type of a DTA variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DtaType {
    /// Signed 8-bit integer (`byte`).
    Byte,
    /// Signed 16-bit integer (`int`).
    Int16,
    /// Signed 32-bit integer (`long`).
    Int32,
    /// 32-bit IEEE float (`float`).
    Float,
    /// 64-bit IEEE float (`double`).
    Double,
    /// Fixed-width byte string (`strN`).
    String,
}

impl DtaType {
    /// Storage width in bytes for numeric types.
    #[must_use]
    pub const fn numeric_width(self) -> Option<usize> {
        match self {
            Self::Byte => Some(1),
            Self::Int16 => Some(2),
            Self::Int32 | Self::Float => Some(4),
            Self::Double => Some(8),
            Self::String => None,
        }
    }

    /// Whether this is a numeric type.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::String)
    }

    /// Display format used when a variable has none (without the leading `%`).
    #[must_use]
    pub const fn default_format(self) -> &'static str {
        match self {
            Self::Byte | Self::Int16 => "8.0g",
            Self::Int32 => "12.0g",
            Self::Float => "9.0g",
            Self::Double => "10.0g",
            Self::String => "9s",
        }
    }
}

impl std::fmt::Display for DtaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Byte => "byte",
            Self::Int16 => "int",
            Self::Int32 => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "str",
        };
        f.write_str(name)
    }
}

/// Display alignment of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Alignment {
    Left,
    Center,
    #[default]
    Right,
}

/// Variable definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DtaVariable {
    /// Variable name (truncated to the version's name field on write).
    pub name: String,
    /// Storage type.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub data_type: DtaType,
    /// Storage width in bytes. For strings, 0 selects the version maximum.
    #[cfg_attr(feature = "serde", serde(default))]
    pub storage_width: usize,
    /// Display format such as `%9.2f`.
    pub format: Option<String>,
    /// Display alignment, used when no format is given.
    #[cfg_attr(feature = "serde", serde(default))]
    pub alignment: Alignment,
    /// Variable label.
    pub label: Option<String>,
    /// Name of the value-label set attached to this variable.
    pub label_set: Option<String>,
}

impl DtaVariable {
    /// Create a variable of the given type with its natural width.
    pub fn new(name: impl Into<String>, data_type: DtaType) -> Self {
        Self {
            name: name.into(),
            data_type,
            storage_width: data_type.numeric_width().unwrap_or(0),
            format: None,
            alignment: Alignment::default(),
            label: None,
            label_set: None,
        }
    }

    pub fn byte(name: impl Into<String>) -> Self {
        Self::new(name, DtaType::Byte)
    }

    pub fn int16(name: impl Into<String>) -> Self {
        Self::new(name, DtaType::Int16)
    }

    pub fn int32(name: impl Into<String>) -> Self {
        Self::new(name, DtaType::Int32)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, DtaType::Float)
    }

    pub fn double(name: impl Into<String>) -> Self {
        Self::new(name, DtaType::Double)
    }

    /// Create a string variable with the given storage width.
    pub fn string(name: impl Into<String>, width: usize) -> Self {
        Self {
            storage_width: width,
            ..Self::new(name, DtaType::String)
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Attach a value-label set by name.
    #[must_use]
    pub fn with_label_set(mut self, label_set: impl Into<String>) -> Self {
        self.label_set = Some(label_set.into());
        self
    }

    /// Display format written to the format list.
    ///
    /// An explicit non-empty format wins; otherwise the type default is used,
    /// with a `-` flag for left alignment.
    #[must_use]
    pub fn display_format(&self) -> String {
        match self.format.as_deref() {
            Some(format) if !format.is_empty() => format.to_string(),
            _ => {
                let flag = if self.alignment == Alignment::Left { "-" } else { "" };
                format!("%{flag}{}", self.data_type.default_format())
            }
        }
    }
}
