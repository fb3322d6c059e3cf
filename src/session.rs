//! The current analysis: one roster, one saved band set, and the phase they
//! put the dashboard in.

use std::cell::Cell;
use std::io::BufWriter;
use std::path::Path;

use thiserror::Error;

use crate::categorize::categorize;
use crate::config::AppConfig;
use crate::export::{CsvSink, ExportError, ExportFormat, ExportSink, MarkdownSink};
use crate::ingest::{self, IngestError};
use crate::locale::Locale;
use crate::models::{GradeRange, GradeStats, Student};
use crate::normalize::{normalize_rows_batched, RawRecord, DEFAULT_BATCH_SIZE};
use crate::ranges::RangeSet;
use crate::roster::{self, RosterQuery};
use crate::stats::compute_stats;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("nothing to export: upload grades and save at least one band first")]
    NotReady,

    #[error("an export is already running")]
    ExportInProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Empty,
    Uploaded,
    Categorized,
}

/// Read-only snapshot handed to display code.
#[derive(Debug, Clone)]
pub struct Dashboard<'a> {
    pub students: &'a [Student],
    pub ranges: &'a [GradeRange],
    pub stats: GradeStats,
}

#[derive(Debug)]
pub struct Session {
    phase: SessionPhase,
    roster: Vec<Student>,
    ranges: RangeSet,
    stale: bool,
    recategorize_on_upload: bool,
    batch_size: usize,
    exporting: Cell<bool>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Empty,
            roster: Vec::new(),
            ranges: RangeSet::default(),
            stale: false,
            recategorize_on_upload: false,
            batch_size: DEFAULT_BATCH_SIZE,
            exporting: Cell::new(false),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bands from the config are only a starting point for the editor; they
    /// are not saved until `save_ranges` runs.
    pub fn with_config(config: &AppConfig) -> Self {
        Self {
            recategorize_on_upload: config.recategorize_on_upload,
            batch_size: config.batch_size.max(1),
            ..Self::default()
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn roster(&self) -> &[Student] {
        &self.roster
    }

    pub fn ranges(&self) -> &RangeSet {
        &self.ranges
    }

    /// True after an upload into a categorized session that was not
    /// re-categorized: the roster carries no categories until bands are saved.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.get()
    }

    /// Replaces the roster. Returns the number of students loaded.
    pub fn upload(&mut self, records: &[RawRecord]) -> usize {
        self.roster = normalize_rows_batched(records, self.batch_size);

        match self.phase {
            SessionPhase::Empty | SessionPhase::Uploaded => {
                self.phase = SessionPhase::Uploaded;
            }
            SessionPhase::Categorized if self.recategorize_on_upload => {
                self.roster = categorize(&self.roster, self.ranges.as_slice());
            }
            SessionPhase::Categorized => self.stale = true,
        }

        tracing::info!(
            students = self.roster.len(),
            phase = ?self.phase,
            stale = self.stale,
            "roster uploaded"
        );
        self.roster.len()
    }

    /// Reads and uploads a file. On any read or parse error the current
    /// roster is left as it was.
    pub fn upload_file(&mut self, path: &Path) -> Result<usize, SessionError> {
        let records = ingest::read_records(path)?;
        Ok(self.upload(&records))
    }

    pub fn save_ranges(&mut self, ranges: RangeSet) {
        for issue in ranges.diagnose() {
            tracing::warn!(%issue, "grade band issue");
        }

        self.roster = categorize(&self.roster, ranges.as_slice());
        self.ranges = ranges;
        self.phase = SessionPhase::Categorized;
        self.stale = false;

        tracing::info!(
            students = self.roster.len(),
            bands = self.ranges.len(),
            "roster categorized"
        );
    }

    /// `None` until the roster has been categorized against at least one band.
    pub fn dashboard(&self) -> Option<Dashboard<'_>> {
        let visible = self.phase == SessionPhase::Categorized
            && !self.roster.is_empty()
            && !self.ranges.is_empty();
        if !visible {
            return None;
        }

        Some(Dashboard {
            students: &self.roster,
            ranges: self.ranges.as_slice(),
            stats: compute_stats(&self.roster, self.ranges.as_slice()),
        })
    }

    pub fn view(&self, query: &RosterQuery) -> Vec<&Student> {
        roster::view(&self.roster, query)
    }

    /// Sends the roster, highest grade first, to `sink`. Only one export may
    /// run at a time; a nested call from inside a sink is refused.
    pub fn export(&self, sink: &mut dyn ExportSink) -> Result<usize, SessionError> {
        if self.dashboard().is_none() {
            return Err(SessionError::NotReady);
        }
        if self.exporting.replace(true) {
            return Err(SessionError::ExportInProgress);
        }
        let _guard = ExportGuard(&self.exporting);

        let rows = roster::export_rows(&self.roster);
        sink.write_rows(&rows)?;
        tracing::info!(rows = rows.len(), "export finished");
        Ok(rows.len())
    }

    /// Exports into a temporary file beside `path` and renames it into place
    /// only once the sink has finished, so a refused or failed export leaves
    /// any existing file at `path` untouched.
    pub fn export_to_path(
        &self,
        path: &Path,
        format: ExportFormat,
        locale: Locale,
    ) -> Result<usize, SessionError> {
        if self.dashboard().is_none() {
            return Err(SessionError::NotReady);
        }

        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let staged = tempfile::NamedTempFile::new_in(dir).map_err(ExportError::from)?;

        let file = staged.as_file();
        let written = match format {
            ExportFormat::Csv => self.export(&mut CsvSink::new(BufWriter::new(file), locale))?,
            ExportFormat::Markdown => {
                self.export(&mut MarkdownSink::new(BufWriter::new(file), locale))?
            }
        };

        staged
            .persist(path)
            .map_err(|err| ExportError::Io(err.error))?;
        Ok(written)
    }
}

struct ExportGuard<'a>(&'a Cell<bool>);

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
