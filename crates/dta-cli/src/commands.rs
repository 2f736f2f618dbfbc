use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::{debug, info_span};

use dta_cli::document::DatasetDocument;
use dta_cli::pipeline::write_document;
use dta_cli::types::WriteResult;
use stata_dta::context::SessionContext;
use stata_dta::{ByteOrder, DtaVersion, DtaWriterOptions};

use crate::cli::WriteArgs;
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell};

pub fn run_write(args: &WriteArgs) -> Result<WriteResult> {
    let output = args.output_path();
    let span = info_span!("ingest", input = %args.input.display());
    let document = span.in_scope(|| DatasetDocument::from_path(&args.input))?;
    debug!(
        variables = document.dataset.num_variables(),
        rows = document.rows.len(),
        label_sets = document.dataset.label_sets.len(),
        "dataset document loaded"
    );

    let mut options = DtaWriterOptions::new()
        .with_version(args.format_version)
        .with_byte_order(args.byte_order.into());
    if let Some(timestamp) = args.timestamp {
        options = options.with_timestamp(timestamp);
    }
    write_document(&document, &output, options)
}

pub fn run_versions() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Version"),
        header_cell("Family"),
        header_cell("Layout"),
        header_cell("String max"),
        header_cell("Name"),
        header_cell("Format"),
        header_cell("Label"),
        header_cell("Obs count"),
    ]);
    apply_table_style(&mut table);
    for index in 3..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for version in DtaVersion::all() {
        let ctx = SessionContext::new(version, ByteOrder::native(), 0, 0)
            .with_context(|| format!("profile for version {version}"))?;
        let layout = if ctx.tagged {
            header_cell("tagged")
        } else {
            dim_cell("raw")
        };
        table.add_row(vec![
            header_cell(&version.to_string()),
            Cell::new(version.family()),
            layout,
            Cell::new(ctx.max_string_width()),
            Cell::new(ctx.variable_name_len),
            Cell::new(ctx.fmtlist_entry_len),
            Cell::new(ctx.variable_labels_entry_len),
            Cell::new(format!("{}-byte", ctx.nobs_len)),
        ]);
    }
    println!("{table}");
    Ok(())
}
