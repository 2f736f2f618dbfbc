//! Result types shared by the CLI commands.

use std::path::PathBuf;

use stata_dta::{ByteOrder, DtaVersion};

/// Outcome of a `write` command.
#[derive(Debug)]
pub struct WriteResult {
    pub output: PathBuf,
    pub version: DtaVersion,
    pub byte_order: ByteOrder,
    pub variables: usize,
    pub observations: u64,
    pub label_sets: usize,
    pub row_width: usize,
    pub bytes: u64,
}
