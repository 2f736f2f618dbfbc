//! Format version and writer options.

use chrono::NaiveDateTime;

use crate::bits::ByteOrder;
use crate::error::{DtaError, Result};
use crate::profile::VersionFamily;

/// A validated DTA format version (104 through 118).
///
/// | Versions | Family | Layout | String max |
/// |----------|--------|--------|------------|
/// | 104-110  | old    | raw    | 128        |
/// | 111-116  | 111    | raw    | 244        |
/// | 117-118  | 117    | tagged | 2045       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DtaVersion(u16);

impl DtaVersion {
    /// Oldest supported release.
    pub const MIN: u16 = 104;
    /// Newest supported release.
    pub const MAX: u16 = 118;
    /// Release selected when the caller asks for version 0.
    pub const DEFAULT: u16 = 111;

    /// Validate a release number; 0 selects [`Self::DEFAULT`].
    pub fn new(version: u16) -> Result<Self> {
        let version = if version == 0 { Self::DEFAULT } else { version };
        if !(Self::MIN..=Self::MAX).contains(&version) {
            return Err(DtaError::UnsupportedFormatVersion { version });
        }
        Ok(Self(version))
    }

    /// Release number.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Version family selecting type codes and string widths.
    #[must_use]
    pub const fn family(self) -> VersionFamily {
        if self.0 >= 117 {
            VersionFamily::V117
        } else if self.0 >= 111 {
            VersionFamily::V111
        } else {
            VersionFamily::Old
        }
    }

    /// Whether this version uses the tagged (self-describing) layout.
    #[must_use]
    pub const fn is_tagged(self) -> bool {
        self.0 >= 117
    }

    /// All supported versions in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl Default for DtaVersion {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u16> for DtaVersion {
    type Error = DtaError;

    fn try_from(version: u16) -> Result<Self> {
        Self::new(version)
    }
}

impl std::fmt::Display for DtaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Options for writing DTA files.
#[derive(Debug, Clone)]
pub struct DtaWriterOptions {
    /// Requested release number; 0 selects 111. Validated when the writer is created.
    pub version: u16,
    /// Byte order of the output (default: host order).
    pub byte_order: ByteOrder,
    /// Header time stamp (default: current local time).
    pub timestamp: Option<NaiveDateTime>,
}

impl Default for DtaWriterOptions {
    fn default() -> Self {
        Self {
            version: DtaVersion::DEFAULT,
            byte_order: ByteOrder::native(),
            timestamp: None,
        }
    }
}

impl DtaWriterOptions {
    /// Create writer options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the format version.
    #[must_use]
    pub fn with_version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    /// Set the byte order.
    #[must_use]
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Set the header time stamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Get the time stamp (current time if not set).
    #[must_use]
    pub fn get_timestamp(&self) -> NaiveDateTime {
        self.timestamp
            .unwrap_or_else(|| chrono::Local::now().naive_local())
    }
}
