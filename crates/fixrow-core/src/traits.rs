//! Seams to the external collaborators: fragment extractors and tabular
//! sinks.

use crate::error::{FixrowError, Result};
use crate::fragment::Fragment;
use crate::types::OutputRecord;
use std::path::Path;

/// Document text extractor
///
/// Implementations deliver fragments in reading order and never reorder
/// them. Each backend (PDF, JSON dump, ...) implements this trait.
pub trait FragmentSource: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Lower-case file extensions this source reads
    fn extensions(&self) -> &'static [&'static str];

    /// Feed every fragment of an in-memory document to `visitor`
    ///
    /// # Errors
    /// Returns [`FixrowError::Extraction`] if the document cannot be parsed.
    fn visit_bytes(
        &self,
        data: &[u8],
        locator: &str,
        visitor: &mut dyn FnMut(&Fragment),
    ) -> Result<()>;

    /// Feed every fragment of the document at `locator` to `visitor`
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    fn visit(&self, locator: &Path, visitor: &mut dyn FnMut(&Fragment)) -> Result<()> {
        let name = locator.display().to_string();
        let data = std::fs::read(locator).map_err(|e| FixrowError::extraction(&name, e))?;
        self.visit_bytes(&data, &name, visitor)
    }

    /// Collect every fragment of a document
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    fn collect(&self, locator: &Path) -> Result<Vec<Fragment>> {
        let mut fragments = Vec::new();
        self.visit(locator, &mut |f| fragments.push(f.clone()))?;
        Ok(fragments)
    }

    /// Check the locator's extension against [`FragmentSource::extensions`]
    fn can_handle(&self, locator: &Path) -> bool {
        locator
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .is_some_and(|ext| self.extensions().contains(&ext.as_str()))
    }
}

/// Destination for finished records
pub trait TabularSink {
    /// Short sink name for logs
    fn name(&self) -> &'static str;

    /// Persist `records` under the header `columns` (schema order).
    ///
    /// Called once per run with every record of every document.
    ///
    /// # Errors
    /// Returns [`FixrowError::Sink`] if persistence fails.
    fn write(&mut self, columns: &[String], records: &[OutputRecord]) -> Result<()>;
}

/// Reads fragments from a JSON array of `{"text", "x", "y"}` objects,
/// the format `fixrow inspect --json` prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct JsonFragmentSource;

impl FragmentSource for JsonFragmentSource {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn visit_bytes(
        &self,
        data: &[u8],
        locator: &str,
        visitor: &mut dyn FnMut(&Fragment),
    ) -> Result<()> {
        let fragments: Vec<Fragment> =
            serde_json::from_slice(data).map_err(|e| FixrowError::extraction(locator, e))?;
        fragments.iter().for_each(|f| visitor(f));
        Ok(())
    }
}

/// Keeps everything written to it in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    pub columns: Vec<String>,
    pub records: Vec<OutputRecord>,
    /// Number of `write` calls
    pub writes: usize,
}

impl TabularSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn write(&mut self, columns: &[String], records: &[OutputRecord]) -> Result<()> {
        self.columns = columns.to_vec();
        self.records.extend_from_slice(records);
        self.writes += 1;
        Ok(())
    }
}
