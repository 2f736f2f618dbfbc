//! Stata DTA file writer.
//!
//! This crate serializes typed tabular datasets to Stata's `.dta` binary
//! format, releases 104 through 118.
//!
//! # Features
//!
//! - Raw layout for releases 104-116, tagged layout (with section map) for 117-118
//! - Per-release type codes, field widths and string limits
//! - System (`.`) and tagged (`.a`-`.z`) missing values
//! - Variable labels, display formats and value-label sets
//! - Streaming row API or whole-dataset convenience functions
//! - Optional serde support for the dataset model (with `serde` feature)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use stata_dta::{DtaDataset, DtaValue, DtaVariable, LabelSet, write_dta};
//!
//! let mut ds = DtaDataset::with_variables(vec![
//!     DtaVariable::string("name", 20).with_label("Respondent"),
//!     DtaVariable::byte("married").with_label_set("yesno"),
//!     DtaVariable::double("income"),
//! ])
//! .with_label("Household survey")
//! .with_label_set(LabelSet::new("yesno").with_label(0, "no").with_label(1, "yes"));
//!
//! ds.add_row(vec![
//!     DtaValue::string("Ada"),
//!     DtaValue::Byte(1),
//!     DtaValue::Double(52_000.0),
//! ]);
//!
//! write_dta(Path::new("survey.dta"), &ds).unwrap();
//! ```
//!
//! # Missing Values
//!
//! Every numeric type reserves the top of its range for 27 missing codes:
//!
//! ```
//! use stata_dta::{DtaValue, MissingValue};
//!
//! // System missing (.)
//! let missing = DtaValue::missing();
//!
//! // Tagged missing (.a through .z)
//! let refused = DtaValue::tagged_missing('r');
//!
//! assert!(missing.is_missing());
//! assert_eq!(refused, DtaValue::Missing(MissingValue::Tagged('r')));
//! ```
//!
//! # Streaming
//!
//! ```
//! use stata_dta::{DtaDataset, DtaValue, DtaVariable, DtaWriter, DtaWriterOptions, Phase};
//!
//! let ds = DtaDataset::with_variables(vec![DtaVariable::int32("id")]);
//! let options = DtaWriterOptions::new().with_version(118);
//!
//! let mut writer = DtaWriter::with_options(Vec::new(), options)?;
//! writer.begin_data(&ds, 2)?;
//! writer.write_row(&[DtaValue::Int32(1)])?;
//! writer.write_row(&[DtaValue::missing()])?;
//! writer.end_data()?;
//! assert_eq!(writer.phase(), Phase::Finalized);
//!
//! let bytes = writer.into_inner()?;
//! assert!(bytes.starts_with(b"<stata_dta>"));
//! # Ok::<(), stata_dta::DtaError>(())
//! ```

pub mod bits;
pub mod context;
pub mod encode;
mod error;
pub mod header;
pub mod profile;
mod types;
pub mod value_labels;
mod writer;

// Re-export error types
pub use error::{DtaError, Result};

// Re-export core types
pub use bits::ByteOrder;
pub use types::{
    Alignment, DtaDataset, DtaType, DtaValue, DtaVariable, DtaVersion, DtaWriterOptions, LabelSet,
    MissingValue, ValueLabel, sentinel,
};

// Re-export profile selection
pub use profile::{VersionFamily, VersionProfile, profile_for};

// Re-export writer functionality
pub use writer::{DtaWriter, Phase, write_dta, write_dta_with_options};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
