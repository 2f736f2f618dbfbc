//! Header time stamp formatting.
//!
//! DTA files carry a 17-character creation stamp such as `07 Mar 2024 14:05`.

use chrono::NaiveDateTime;

/// `strftime` pattern of the header time stamp.
pub const TIME_STAMP_FORMAT: &str = "%d %b %Y %H:%M";

/// Length of a formatted time stamp, without terminator.
pub const TIME_STAMP_TEXT_LEN: usize = 17;

/// Format a datetime as a DTA time stamp (`dd Mon yyyy hh:mm`).
#[must_use]
pub fn format_dta_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(TIME_STAMP_FORMAT).to_string()
}
