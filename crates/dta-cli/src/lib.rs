//! CLI library components for the DTA writer.

pub mod document;
pub mod logging;
pub mod pipeline;
pub mod types;
