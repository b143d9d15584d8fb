//! Catalog driver: one pass per document, results concatenated in catalog
//! order.

use crate::catalog::{CatalogEntry, DocumentCatalog};
use crate::composite_key::CompositeKey;
use crate::diagnostics::PassDiagnostics;
use crate::error::{FixrowError, Result};
use crate::pass::DocumentPass;
use crate::pipeline::RowPipeline;
use crate::traits::{FragmentSource, TabularSink};
use crate::types::{DocumentOutput, OutputRecord};
use log::{error, info, warn};
use rayon::prelude::*;

/// How the runner treats the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RunOptions {
    /// Skip failed documents instead of stopping
    pub continue_on_error: bool,
    /// Process documents on the rayon pool
    pub parallel: bool,
}

/// One document that produced output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub entry: CatalogEntry,
    pub diagnostics: PassDiagnostics,
}

/// One document that failed
#[derive(Debug)]
pub struct DocumentFailure {
    pub entry: CatalogEntry,
    pub error: FixrowError,
}

/// Everything a run produced
#[derive(Debug, Default)]
pub struct RunReport {
    /// Output header, schema order
    pub columns: Vec<String>,
    /// Records of every successful document, in catalog order
    pub records: Vec<OutputRecord>,
    pub documents: Vec<DocumentSummary>,
    pub failures: Vec<DocumentFailure>,
    /// Totals across successful documents
    pub diagnostics: PassDiagnostics,
    /// A failure stopped the run before the end of the catalog
    pub aborted: bool,
}

impl RunReport {
    /// Append a composite key column to the header and every record.
    ///
    /// # Errors
    /// Returns [`FixrowError::UnknownColumn`] if a key part is not a column.
    pub fn append_key(&mut self, key: &CompositeKey) -> Result<()> {
        let bound = key.bind(&self.columns)?;
        bound.append(&mut self.columns, &mut self.records);
        Ok(())
    }

    /// Hand the collected records to `sink` in a single write.
    ///
    /// # Errors
    /// Propagates the sink's error.
    pub fn write(&self, sink: &mut dyn TabularSink) -> Result<()> {
        info!(
            "Writing {} record(s) to {} sink",
            self.records.len(),
            sink.name()
        );
        sink.write(&self.columns, &self.records)
    }

    fn absorb(&mut self, entry: &CatalogEntry, output: DocumentOutput) {
        self.diagnostics.merge(&output.diagnostics);
        self.records.extend(output.records);
        self.documents.push(DocumentSummary {
            entry: entry.clone(),
            diagnostics: output.diagnostics,
        });
    }
}

/// Runs a pipeline over a catalog with one fragment source
pub struct CatalogRunner<'a> {
    pipeline: &'a RowPipeline,
    source: &'a dyn FragmentSource,
    options: RunOptions,
}

impl<'a> CatalogRunner<'a> {
    #[inline]
    #[must_use = "runner is created but not used"]
    pub fn new(pipeline: &'a RowPipeline, source: &'a dyn FragmentSource) -> Self {
        Self::with_options(pipeline, source, RunOptions::default())
    }

    #[inline]
    #[must_use = "runner is created but not used"]
    pub fn with_options(
        pipeline: &'a RowPipeline,
        source: &'a dyn FragmentSource,
        options: RunOptions,
    ) -> Self {
        Self {
            pipeline,
            source,
            options,
        }
    }

    /// Process every catalog entry.
    ///
    /// Document failures never fail the run; they are recorded in the
    /// report, and unless `continue_on_error` is set the run stops at the
    /// first one, keeping the records of the documents before it.
    pub fn run(&self, catalog: &DocumentCatalog) -> RunReport {
        let mut report = RunReport {
            columns: self.pipeline.schema().field_names(),
            ..RunReport::default()
        };

        if self.options.parallel {
            let results: Vec<Result<DocumentOutput>> = catalog
                .entries()
                .par_iter()
                .map(|entry| self.process_document(&mut self.pipeline.pass(), entry))
                .collect();
            for (entry, result) in catalog.entries().iter().zip(results) {
                if !self.record(&mut report, entry, result) {
                    break;
                }
            }
        } else {
            let mut pass = self.pipeline.pass();
            for entry in catalog.entries() {
                let result = self.process_document(&mut pass, entry);
                if !self.record(&mut report, entry, result) {
                    break;
                }
            }
        }

        info!(
            "Run finished: {} document(s), {} failure(s); {}",
            report.documents.len(),
            report.failures.len(),
            report.diagnostics
        );
        report
    }

    /// Fold one document result into the report; false stops the run
    fn record(
        &self,
        report: &mut RunReport,
        entry: &CatalogEntry,
        result: Result<DocumentOutput>,
    ) -> bool {
        match result {
            Ok(output) => {
                report.absorb(entry, output);
                true
            }
            Err(e) => {
                error!(
                    "Document {} (tag {}) failed: {e}",
                    entry.locator.display(),
                    entry.tag
                );
                report.failures.push(DocumentFailure {
                    entry: entry.clone(),
                    error: e,
                });
                if self.options.continue_on_error {
                    true
                } else {
                    report.aborted = true;
                    false
                }
            }
        }
    }

    fn process_document(
        &self,
        pass: &mut DocumentPass<'_>,
        entry: &CatalogEntry,
    ) -> Result<DocumentOutput> {
        pass.begin()?;
        info!(
            "Processing {} with tag {} ({} source)",
            entry.locator.display(),
            entry.tag,
            self.source.name()
        );

        if let Err(e) = self.source.visit(&entry.locator, &mut |f| pass.offer(f)) {
            pass.reset();
            return Err(e);
        }

        let output = pass.finish(&entry.tag);
        let diag = &output.diagnostics;
        info!(
            "{}: {} record(s) ({} recovered)",
            entry.locator.display(),
            output.records.len(),
            diag.recovered_rows
        );
        if diag.has_data_loss() {
            warn!(
                "{}: {} fragment(s) lost ({} trailing, {} in {} unrecoverable group(s))",
                entry.locator.display(),
                diag.fragments_lost(),
                diag.trailing_dropped,
                diag.unrecoverable_fragments,
                diag.unrecoverable_groups
            );
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Fragment;
    use crate::traits::MemorySink;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    /// Serves canned fragments by path; unknown paths fail
    struct CannedSource {
        docs: HashMap<PathBuf, Vec<Fragment>>,
    }

    impl FragmentSource for CannedSource {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &[]
        }

        fn visit_bytes(
            &self,
            _data: &[u8],
            locator: &str,
            _visitor: &mut dyn FnMut(&Fragment),
        ) -> Result<()> {
            Err(FixrowError::extraction(locator, "bytes unsupported"))
        }

        fn visit(&self, locator: &Path, visitor: &mut dyn FnMut(&Fragment)) -> Result<()> {
            let docs = self
                .docs
                .get(locator)
                .ok_or_else(|| FixrowError::extraction(locator.display().to_string(), "missing"))?;
            for fragment in docs {
                visitor(fragment);
            }
            Ok(())
        }
    }

    fn row(zip: &str, lot: &str, y: f64) -> Vec<Fragment> {
        vec![Fragment::new(zip, 25.0, y), Fragment::new(lot, 1143.0, y)]
    }

    fn source() -> CannedSource {
        let mut docs = HashMap::new();
        docs.insert(PathBuf::from("a.pdf"), row("10001", "1", 400.0));
        docs.insert(PathBuf::from("b.pdf"), row("10301", "2", 400.0));
        CannedSource { docs }
    }

    fn catalog(paths: &[(&str, &str)]) -> DocumentCatalog {
        DocumentCatalog::new(
            paths
                .iter()
                .map(|(tag, path)| CatalogEntry::new(*tag, *path))
                .collect(),
        )
    }

    #[test]
    fn test_sequential_run_in_catalog_order() {
        let pipeline = RowPipeline::default();
        let source = source();
        let cat = catalog(&[("1", "a.pdf"), ("5", "b.pdf")]);
        let report = CatalogRunner::new(&pipeline, &source).run(&cat);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].get(0), Some("10001"));
        assert_eq!(report.records[0].get(14), Some("1"));
        assert_eq!(report.records[1].get(0), Some("10301"));
        assert_eq!(report.records[1].get(14), Some("5"));
        assert_eq!(report.diagnostics.records_emitted, 2);
        assert!(!report.aborted);
    }

    #[test]
    fn test_failure_stops_but_keeps_prior_records() {
        let pipeline = RowPipeline::default();
        let source = source();
        let report = CatalogRunner::new(&pipeline, &source).run(&catalog(&[
            ("1", "a.pdf"),
            ("2", "missing.pdf"),
            ("5", "b.pdf"),
        ]));
        assert!(report.aborted);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].entry.tag, "2");
    }

    #[test]
    fn test_continue_on_error_skips() {
        let pipeline = RowPipeline::default();
        let source = source();
        let options = RunOptions {
            continue_on_error: true,
            parallel: false,
        };
        let report = CatalogRunner::with_options(&pipeline, &source, options).run(&catalog(&[
            ("2", "missing.pdf"),
            ("1", "a.pdf"),
            ("5", "b.pdf"),
        ]));
        assert!(!report.aborted);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.documents.len(), 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pipeline = RowPipeline::default();
        let source = source();
        let cat = catalog(&[("1", "a.pdf"), ("5", "b.pdf"), ("3", "a.pdf")]);
        let sequential = CatalogRunner::new(&pipeline, &source).run(&cat);
        let options = RunOptions {
            continue_on_error: false,
            parallel: true,
        };
        let parallel = CatalogRunner::with_options(&pipeline, &source, options).run(&cat);
        assert_eq!(sequential.records, parallel.records);
        assert_eq!(sequential.diagnostics, parallel.diagnostics);
    }

    #[test]
    fn test_report_key_and_write() {
        let pipeline = RowPipeline::default();
        let source = source();
        let mut report = CatalogRunner::new(&pipeline, &source).run(&catalog(&[("1", "a.pdf")]));
        report.append_key(&CompositeKey::bbl()).unwrap();

        let mut sink = MemorySink::default();
        report.write(&mut sink).unwrap();
        assert_eq!(sink.writes, 1);
        assert_eq!(sink.columns.len(), 16);
        // BLOCK missing -> null key
        assert_eq!(sink.records[0].get(15), None);
    }
}
