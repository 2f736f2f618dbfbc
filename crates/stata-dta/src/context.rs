//! Per-file session context.
//!
//! Holds the field widths derived from the format version, the byte order and
//! the declared dimensions of the file being written.

use crate::bits::ByteOrder;
use crate::error::{DtaError, Result};
use crate::profile::{VersionProfile, profile_for};
use crate::types::DtaVersion;

/// Largest variable count the 16-bit header field can carry.
pub const MAX_VARIABLES: usize = i16::MAX as usize;

/// Version-derived layout of one file.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub version: DtaVersion,
    pub byte_order: ByteOrder,
    pub nvar: usize,
    pub nobs: u64,
    /// Tagged (self-describing) layout.
    pub tagged: bool,
    pub profile: &'static VersionProfile,

    /// Bytes per type list entry (1 or 2).
    pub typlist_entry_len: usize,
    pub variable_name_len: usize,
    pub fmtlist_entry_len: usize,
    pub lbllist_entry_len: usize,
    pub variable_labels_entry_len: usize,
    pub data_label_len: usize,
    /// Width of the data label length prefix; 0 means a fixed-width field.
    pub data_label_len_len: usize,
    /// Time stamp field width; 0 means no time stamp.
    pub time_stamp_len: usize,
    /// Width of the expansion field length; 0 means no expansion fields.
    pub expansion_len_len: usize,
    /// Width of a value-label table length (2 selects the legacy scheme).
    pub value_label_table_len_len: usize,
    pub value_label_table_labname_len: usize,
    pub value_label_table_padding_len: usize,
    /// Width of the observation count in the header.
    pub nobs_len: usize,
}

impl SessionContext {
    /// Build the context for a file with `nvar` variables and `nobs` observations.
    ///
    /// Fails when the counts do not fit the version's header fields.
    pub fn new(version: DtaVersion, byte_order: ByteOrder, nvar: usize, nobs: u64) -> Result<Self> {
        let ds_format = version.get();

        if nvar > MAX_VARIABLES {
            return Err(DtaError::TooManyVariables {
                count: nvar,
                limit: MAX_VARIABLES,
            });
        }

        let nobs_len = if ds_format >= 118 { 8 } else { 4 };
        let nobs_limit = if nobs_len == 8 {
            i64::MAX as u64
        } else {
            i32::MAX as u64
        };
        if nobs > nobs_limit {
            return Err(DtaError::TooManyObservations {
                count: nobs,
                limit: nobs_limit,
            });
        }

        let fmtlist_entry_len = match ds_format {
            ..105 => 7,
            105..114 => 12,
            114..118 => 49,
            _ => 57,
        };

        let name_len = match ds_format {
            ..110 => 9,
            110..118 => 33,
            _ => 129,
        };

        let label_len = match ds_format {
            ..108 => 32,
            108..118 => 81,
            _ => 321,
        };

        let data_label_len_len = match ds_format {
            118.. => 2,
            117 => 1,
            _ => 0,
        };

        let expansion_len_len = match ds_format {
            ..105 => 0,
            105..110 => 2,
            _ => 4,
        };

        let (time_stamp_len, value_label_table_len_len, labname_len, padding_len) = match ds_format
        {
            ..105 => (0, 2, 12, 2),
            105..118 => (18, 4, 33, 3),
            _ => (18, 4, 129, 3),
        };

        Ok(Self {
            version,
            byte_order,
            nvar,
            nobs,
            tagged: version.is_tagged(),
            profile: profile_for(version),
            typlist_entry_len: if version.is_tagged() { 2 } else { 1 },
            variable_name_len: name_len,
            fmtlist_entry_len,
            lbllist_entry_len: name_len,
            variable_labels_entry_len: label_len,
            data_label_len: label_len,
            data_label_len_len,
            time_stamp_len,
            expansion_len_len,
            value_label_table_len_len,
            value_label_table_labname_len: labname_len,
            value_label_table_padding_len: padding_len,
            nobs_len,
        })
    }

    /// Sort list length in bytes.
    #[must_use]
    pub fn srtlist_len(&self) -> usize {
        (self.nvar + 1) * 2
    }

    /// Maximum string storage width.
    #[must_use]
    pub fn max_string_width(&self) -> usize {
        self.profile.max_string_width
    }
}
