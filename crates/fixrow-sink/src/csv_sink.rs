//! CSV output: one header row, then one row per record.

use crate::error::{check_widths, Result};
use fixrow_core::{OutputRecord, TabularSink};
use log::debug;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes records as CSV; nulls become `null_marker`
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    null_marker: String,
}

impl CsvSink<File> {
    /// Create (or truncate) the file at `path`, creating parent directories
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self::from_writer(File::create(path)?))
    }
}

impl<W: Write> CsvSink<W> {
    #[must_use = "sink is created but not used"]
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            null_marker: String::new(),
        }
    }

    /// Text written for null values (default: empty)
    #[must_use = "returns the sink with the null marker set"]
    pub fn with_null_marker(mut self, marker: impl Into<String>) -> Self {
        self.null_marker = marker.into();
        self
    }

    /// Flush and return the underlying writer
    ///
    /// # Errors
    /// Returns an error if buffered rows cannot be flushed.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::SinkError::Io(e.into_error()))
    }

    fn write_all(&mut self, columns: &[String], records: &[OutputRecord]) -> Result<()> {
        check_widths(columns, records)?;
        self.writer.write_record(columns)?;
        for record in records {
            self.writer.write_record(
                record
                    .values()
                    .iter()
                    .map(|v| v.as_deref().unwrap_or(&self.null_marker)),
            )?;
        }
        self.writer.flush()?;
        debug!("Wrote {} CSV row(s)", records.len());
        Ok(())
    }
}

impl<W: Write> TabularSink for CsvSink<W> {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write(&mut self, columns: &[String], records: &[OutputRecord]) -> fixrow_core::Result<()> {
        Ok(self.write_all(columns, records)?)
    }
}
