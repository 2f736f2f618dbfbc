//! DTA file writer.
//!
//! A [`DtaWriter`] drives one file through a fixed sequence of phases:
//! header, map, descriptors, variable labels, expansion fields, data, value
//! labels. [`DtaWriter::begin_data`] writes everything up to the opening of
//! the data section, rows are streamed with [`DtaWriter::write_row`] or
//! [`DtaWriter::write_raw_row`], and [`DtaWriter::end_data`] writes the rest.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::context::SessionContext;
use crate::encode::{encode_value, row_width};
use crate::error::{DtaError, Result};
use crate::header::{
    HeaderInfo, MAP_ENTRIES, MAP_LEN, SectionMap, emit_expansion_fields, emit_fmtlist,
    emit_header, emit_lbllist, emit_map, emit_srtlist, emit_typlist, emit_variable_labels,
    emit_varlist, write_tag,
};
use crate::types::{DtaDataset, DtaValue, DtaVariable, DtaVersion, DtaWriterOptions, LabelSet};
use crate::value_labels::emit_value_labels;

const DATA_OPEN: &str = "<data>";
const DATA_CLOSE: &str = "</data>";
const STRLS: &str = "<strls></strls>";
const ROOT_CLOSE: &str = "</stata_dta>";

/// Writer session phase.
///
/// Phases advance strictly in declaration order; [`Phase::Aborted`] is
/// entered from any phase on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Uninitialized,
    HeaderWritten,
    MapWritten,
    DescriptorsWritten,
    LabelsWritten,
    ExpansionWritten,
    DataOpen,
    DataClosed,
    ValueLabelsWritten,
    Finalized,
    Aborted,
}

impl Phase {
    /// The phase that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Uninitialized => Some(Self::HeaderWritten),
            Self::HeaderWritten => Some(Self::MapWritten),
            Self::MapWritten => Some(Self::DescriptorsWritten),
            Self::DescriptorsWritten => Some(Self::LabelsWritten),
            Self::LabelsWritten => Some(Self::ExpansionWritten),
            Self::ExpansionWritten => Some(Self::DataOpen),
            Self::DataOpen => Some(Self::DataClosed),
            Self::DataClosed => Some(Self::ValueLabelsWritten),
            Self::ValueLabelsWritten => Some(Self::Finalized),
            Self::Finalized | Self::Aborted => None,
        }
    }

    /// The phase that precedes this one, if any.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Uninitialized | Self::Aborted => None,
            Self::HeaderWritten => Some(Self::Uninitialized),
            Self::MapWritten => Some(Self::HeaderWritten),
            Self::DescriptorsWritten => Some(Self::MapWritten),
            Self::LabelsWritten => Some(Self::DescriptorsWritten),
            Self::ExpansionWritten => Some(Self::LabelsWritten),
            Self::DataOpen => Some(Self::ExpansionWritten),
            Self::DataClosed => Some(Self::DataOpen),
            Self::ValueLabelsWritten => Some(Self::DataClosed),
            Self::Finalized => Some(Self::ValueLabelsWritten),
        }
    }

    /// Move to `to`, which must directly follow the current phase.
    pub fn advance(&mut self, to: Self) -> Result<()> {
        if self.next() != Some(to) {
            return Err(DtaError::InvalidPhase {
                expected: to.previous().unwrap_or(Self::Uninitialized),
                actual: *self,
            });
        }
        *self = to;
        Ok(())
    }

    /// Whether no further calls can succeed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finalized | Self::Aborted)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::HeaderWritten => "header written",
            Self::MapWritten => "map written",
            Self::DescriptorsWritten => "descriptors written",
            Self::LabelsWritten => "labels written",
            Self::ExpansionWritten => "expansion written",
            Self::DataOpen => "data open",
            Self::DataClosed => "data closed",
            Self::ValueLabelsWritten => "value labels written",
            Self::Finalized => "finalized",
            Self::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte-counting pass-through writer.
#[derive(Debug)]
struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.count += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Encoded size of whatever `emit` writes.
fn measure(emit: impl FnOnce(&mut CountingWriter<io::Sink>) -> Result<()>) -> Result<u64> {
    let mut counter = CountingWriter::new(io::sink());
    emit(&mut counter)?;
    Ok(counter.count())
}

/// State owned by an open file, from `begin_data` until finalization.
#[derive(Debug)]
struct Session {
    ctx: SessionContext,
    variables: Vec<DtaVariable>,
    label_sets: Vec<LabelSet>,
    widths: Vec<usize>,
    row_width: usize,
    header: HeaderInfo,
    map: Option<SectionMap>,
    rows_written: u64,
    row_buf: Vec<u8>,
}

impl Session {
    fn new(
        version: DtaVersion,
        options: &DtaWriterOptions,
        dataset: &DtaDataset,
        nobs: u64,
    ) -> Result<Self> {
        let ctx = SessionContext::new(
            version,
            options.byte_order,
            dataset.num_variables(),
            nobs,
        )?;

        for variable in &dataset.variables {
            if let Some(name) = variable.label_set.as_deref()
                && dataset.label_set(name).is_none()
            {
                return Err(DtaError::unknown_label_set(&variable.name, name));
            }
        }

        let widths: Vec<usize> = dataset
            .variables
            .iter()
            .map(|v| ctx.profile.storage_width(v))
            .collect();
        let row_width = row_width(&dataset.variables, ctx.profile);

        let mut session = Self {
            header: HeaderInfo::new(dataset.file_label(), &options.get_timestamp()),
            variables: dataset.variables.clone(),
            label_sets: dataset.label_sets.clone(),
            widths,
            row_width,
            map: None,
            rows_written: 0,
            row_buf: vec![0u8; row_width],
            ctx,
        };
        if session.ctx.tagged {
            session.map = Some(session.section_map()?);
        }
        Ok(session)
    }

    /// Measure every section of a tagged file.
    fn section_map(&self) -> Result<SectionMap> {
        let ctx = &self.ctx;
        let vars = self.variables.as_slice();

        let data_len = ctx
            .nobs
            .checked_mul(self.row_width as u64)
            .and_then(|len| len.checked_add((DATA_OPEN.len() + DATA_CLOSE.len()) as u64))
            .ok_or(DtaError::TooManyObservations {
                count: ctx.nobs,
                limit: u64::MAX / (self.row_width.max(1) as u64),
            })?;

        let lengths: [u64; MAP_ENTRIES - 1] = [
            measure(|w| emit_header(w, ctx, &self.header))?,
            MAP_LEN as u64,
            measure(|w| emit_typlist(w, ctx, vars))?,
            measure(|w| emit_varlist(w, ctx, vars))?,
            measure(|w| emit_srtlist(w, ctx))?,
            measure(|w| emit_fmtlist(w, ctx, vars))?,
            measure(|w| emit_lbllist(w, ctx, vars))?,
            measure(|w| emit_variable_labels(w, ctx, vars))?,
            measure(|w| emit_expansion_fields(w, ctx))?,
            data_len,
            STRLS.len() as u64,
            measure(|w| emit_value_labels(w, ctx, &self.label_sets))?,
            ROOT_CLOSE.len() as u64,
        ];
        Ok(SectionMap::from_lengths(lengths))
    }
}

/// DTA file writer.
///
/// Writes Stata DTA files in format versions 104 through 118.
pub struct DtaWriter<W: Write> {
    writer: CountingWriter<BufWriter<W>>,
    options: DtaWriterOptions,
    version: DtaVersion,
    phase: Phase,
    session: Option<Session>,
}

impl<W: Write> DtaWriter<W> {
    /// Create a new DTA writer with default options (version 111, host byte order).
    pub fn new(writer: W) -> Self {
        Self {
            writer: CountingWriter::new(BufWriter::new(writer)),
            options: DtaWriterOptions::default(),
            version: DtaVersion::default(),
            phase: Phase::Uninitialized,
            session: None,
        }
    }

    /// Create a new DTA writer with options.
    ///
    /// Fails with [`DtaError::UnsupportedFormatVersion`] before anything is
    /// written when the requested version is outside 104-118.
    pub fn with_options(writer: W, options: DtaWriterOptions) -> Result<Self> {
        let version = DtaVersion::new(options.version)?;
        Ok(Self {
            writer: CountingWriter::new(BufWriter::new(writer)),
            options,
            version,
            phase: Phase::Uninitialized,
            session: None,
        })
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn version(&self) -> DtaVersion {
        self.version
    }

    #[must_use]
    pub fn options(&self) -> &DtaWriterOptions {
        &self.options
    }

    /// Bytes per observation, once the data section is open.
    #[must_use]
    pub fn row_width(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.row_width)
    }

    /// Rows written so far in the open data section.
    #[must_use]
    pub fn rows_written(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.rows_written)
    }

    /// Bytes handed to the sink so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.writer.count()
    }

    /// Section offsets of a tagged file, once the data section is open.
    #[must_use]
    pub fn section_map(&self) -> Option<SectionMap> {
        self.session.as_ref().and_then(|s| s.map)
    }

    /// Write the header, map, descriptors, variable labels and expansion
    /// fields, and open the data section for `nobs` observations.
    pub fn begin_data(&mut self, dataset: &DtaDataset, nobs: u64) -> Result<()> {
        self.expect_phase(Phase::Uninitialized)?;

        let result = Session::new(self.version, &self.options, dataset, nobs).and_then(|session| {
            debug!(
                version = %self.version,
                nvar = session.ctx.nvar,
                nobs,
                row_width = session.row_width,
                tagged = session.ctx.tagged,
                "opening DTA session"
            );
            self.session = Some(session);
            self.emit_preamble()
        });
        result.map_err(|err| self.abort(err))
    }

    /// Encode and write one observation.
    ///
    /// A value error leaves the session open and nothing of the row is
    /// written; sink failures abort the session.
    pub fn write_row(&mut self, row: &[DtaValue]) -> Result<()> {
        self.expect_phase(Phase::DataOpen)?;
        let phase = self.phase;
        let Some(session) = self.session.as_mut() else {
            return Err(missing_session(phase));
        };

        if row.len() != session.variables.len() {
            return Err(DtaError::RowLengthMismatch {
                expected: session.variables.len(),
                actual: row.len(),
            });
        }

        let Session {
            ctx,
            variables,
            widths,
            row_buf,
            ..
        } = session;
        let mut offset = 0;
        for ((variable, value), &width) in variables.iter().zip(row).zip(widths.iter()) {
            encode_value(
                &mut row_buf[offset..offset + width],
                variable,
                value,
                ctx.profile,
                ctx.byte_order,
            )?;
            offset += width;
        }

        let result = self.writer.write_all(&session.row_buf).map_err(DtaError::from);
        self.finish_row(result)
    }

    /// Write one observation already encoded with the [`crate::encode`]
    /// functions, in variable order.
    pub fn write_raw_row(&mut self, row: &[u8]) -> Result<()> {
        self.expect_phase(Phase::DataOpen)?;
        let phase = self.phase;
        let Some(session) = self.session.as_ref() else {
            return Err(missing_session(phase));
        };
        if row.len() != session.row_width {
            return Err(DtaError::RowLengthMismatch {
                expected: session.row_width,
                actual: row.len(),
            });
        }

        let result = self.writer.write_all(row).map_err(DtaError::from);
        self.finish_row(result)
    }

    /// Close the data section, write the value labels and finish the file.
    pub fn end_data(&mut self) -> Result<()> {
        self.expect_phase(Phase::DataOpen)?;
        let result = self.emit_trailer();
        match result {
            Ok(()) => {
                self.session = None;
                debug!(bytes = self.writer.count(), "DTA file finalized");
                Ok(())
            }
            Err(err) => Err(self.abort(err)),
        }
    }

    /// Write a whole in-memory dataset and return the sink.
    pub fn write_dataset(mut self, dataset: &DtaDataset) -> Result<W> {
        self.begin_data(dataset, dataset.num_rows() as u64)?;
        for row in &dataset.rows {
            self.write_row(row)?;
        }
        self.end_data()?;
        self.into_inner()
    }

    /// Flush and return the underlying sink.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .into_inner()
            .map_err(|err| DtaError::Write(err.into_error()))
    }

    fn expect_phase(&self, expected: Phase) -> Result<()> {
        if self.phase != expected {
            return Err(DtaError::InvalidPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    /// Drop the session and enter the terminal failure phase.
    fn abort(&mut self, err: DtaError) -> DtaError {
        warn!(phase = %self.phase, error = %err, "aborting DTA session");
        self.phase = Phase::Aborted;
        self.session = None;
        err
    }

    fn finish_row(&mut self, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => {
                if let Some(session) = self.session.as_mut() {
                    session.rows_written += 1;
                    trace!(row = session.rows_written, "row written");
                }
                Ok(())
            }
            Err(err) => Err(self.abort(err)),
        }
    }

    fn emit_preamble(&mut self) -> Result<()> {
        let Self {
            writer,
            phase,
            session,
            ..
        } = self;
        let session = session.as_ref().ok_or(DtaError::InvalidPhase {
            expected: Phase::Uninitialized,
            actual: *phase,
        })?;
        let ctx = &session.ctx;
        let vars = session.variables.as_slice();

        emit_header(writer, ctx, &session.header)?;
        phase.advance(Phase::HeaderWritten)?;
        debug!(bytes = writer.count(), "header written");

        emit_map(writer, ctx, session.map.as_ref())?;
        phase.advance(Phase::MapWritten)?;

        emit_typlist(writer, ctx, vars)?;
        emit_varlist(writer, ctx, vars)?;
        emit_srtlist(writer, ctx)?;
        emit_fmtlist(writer, ctx, vars)?;
        emit_lbllist(writer, ctx, vars)?;
        phase.advance(Phase::DescriptorsWritten)?;
        debug!(bytes = writer.count(), "descriptors written");

        emit_variable_labels(writer, ctx, vars)?;
        phase.advance(Phase::LabelsWritten)?;

        emit_expansion_fields(writer, ctx)?;
        phase.advance(Phase::ExpansionWritten)?;

        write_tag(writer, ctx, DATA_OPEN)?;
        phase.advance(Phase::DataOpen)?;
        debug!(bytes = writer.count(), "data section open");
        Ok(())
    }

    fn emit_trailer(&mut self) -> Result<()> {
        let Self {
            writer,
            phase,
            session,
            ..
        } = self;
        let session = session.as_ref().ok_or(DtaError::InvalidPhase {
            expected: Phase::DataOpen,
            actual: *phase,
        })?;
        let ctx = &session.ctx;

        if session.rows_written != ctx.nobs {
            warn!(
                declared = ctx.nobs,
                written = session.rows_written,
                "row count differs from declared observation count"
            );
        }

        write_tag(writer, ctx, DATA_CLOSE)?;
        write_tag(writer, ctx, STRLS)?;
        phase.advance(Phase::DataClosed)?;

        emit_value_labels(writer, ctx, &session.label_sets)?;
        phase.advance(Phase::ValueLabelsWritten)?;
        debug!(
            label_sets = session.label_sets.len(),
            bytes = writer.count(),
            "value labels written"
        );

        write_tag(writer, ctx, ROOT_CLOSE)?;
        writer.flush()?;
        phase.advance(Phase::Finalized)?;
        Ok(())
    }
}

impl DtaWriter<File> {
    /// Create a DTA file for writing.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }

    /// Create a DTA file with options.
    ///
    /// The version is validated before the file is created.
    pub fn create_with_options(path: &Path, options: DtaWriterOptions) -> Result<Self> {
        DtaVersion::new(options.version)?;
        let file = File::create(path)?;
        Self::with_options(file, options)
    }
}

fn missing_session(actual: Phase) -> DtaError {
    DtaError::InvalidPhase {
        expected: Phase::DataOpen,
        actual,
    }
}

/// Write a dataset to a DTA file.
///
/// This is a convenience function that creates the file and writes the dataset.
pub fn write_dta(path: &Path, dataset: &DtaDataset) -> Result<()> {
    DtaWriter::create(path)?.write_dataset(dataset)?;
    Ok(())
}

/// Write a dataset to a DTA file with options.
pub fn write_dta_with_options(
    path: &Path,
    dataset: &DtaDataset,
    options: &DtaWriterOptions,
) -> Result<()> {
    DtaWriter::create_with_options(path, options.clone())?.write_dataset(dataset)?;
    Ok(())
}
