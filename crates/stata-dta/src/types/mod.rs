//! Core types for DTA file writing.
//!
//! This module provides the data structures describing a dataset to be
//! written: variables, value-label sets, cell values, missing-value
//! sentinels and writer options.

mod dataset;
mod missing;
mod options;
mod value;
mod variable;

pub use dataset::{DtaDataset, LabelSet, ValueLabel};
pub use missing::{MissingValue, sentinel};
pub use options::{DtaVersion, DtaWriterOptions};
pub use value::DtaValue;
pub use variable::{Alignment, DtaType, DtaVariable};
