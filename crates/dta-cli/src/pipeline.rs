//! Write pipeline: dataset document to `.dta` file.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use stata_dta::{DtaWriter, DtaWriterOptions};
use tracing::{debug, info, info_span, warn};

use crate::document::DatasetDocument;
use crate::types::WriteResult;

/// Stream every row of `document` into a new file at `output`.
///
/// A partially written file is removed when any row fails.
pub fn write_document(
    document: &DatasetDocument,
    output: &Path,
    options: DtaWriterOptions,
) -> Result<WriteResult> {
    let span = info_span!("write", output = %output.display());
    let _guard = span.enter();
    let start = Instant::now();

    let mut writer = DtaWriter::create_with_options(output, options)
        .with_context(|| format!("create {}", output.display()))?;
    match stream_rows(&mut writer, document) {
        Ok((row_width, observations)) => {
            let result = WriteResult {
                output: output.to_path_buf(),
                version: writer.version(),
                byte_order: writer.options().byte_order,
                variables: document.dataset.num_variables(),
                observations,
                label_sets: document.dataset.label_sets.len(),
                row_width,
                bytes: writer.bytes_written(),
            };
            writer
                .into_inner()
                .with_context(|| format!("flush {}", output.display()))?;
            info!(
                version = %result.version,
                observations = result.observations,
                bytes = result.bytes,
                duration_ms = start.elapsed().as_millis(),
                "dta file written"
            );
            Ok(result)
        }
        Err(error) => {
            drop(writer);
            if let Err(remove_error) = fs::remove_file(output) {
                warn!(%remove_error, "could not remove partial output");
            }
            Err(error)
        }
    }
}

fn stream_rows(
    writer: &mut DtaWriter<fs::File>,
    document: &DatasetDocument,
) -> Result<(usize, u64)> {
    let nobs = document.rows.len() as u64;
    writer
        .begin_data(&document.dataset, nobs)
        .context("write file header")?;
    let row_width = writer.row_width().unwrap_or_default();
    debug!(nobs, row_width, "data section open");

    for index in 0..document.rows.len() {
        let row = document.row(index)?;
        writer
            .write_row(&row)
            .with_context(|| format!("write row {index}"))?;
    }
    let observations = writer.rows_written();
    writer.end_data().context("write value labels")?;
    Ok((row_width, observations))
}
