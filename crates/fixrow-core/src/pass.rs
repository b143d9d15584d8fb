//! One document's reconstruction pass.
//!
//! A pass owns the fragment buffer and the quarantine for exactly one
//! document at a time. Extractors feed it through [`DocumentPass::offer`];
//! [`DocumentPass::finish`] runs the stages and leaves the pass empty and
//! ready for the next document.

use crate::buffer::FragmentBuffer;
use crate::diagnostics::PassDiagnostics;
use crate::error::Result;
use crate::fragment::Fragment;
use crate::pipeline::RowPipeline;
use crate::resolve::Admission;
use crate::types::{DocumentOutput, Quarantine};
use log::{debug, trace};

/// Mutable state of a single document pass
#[derive(Debug)]
pub struct DocumentPass<'p> {
    pipeline: &'p RowPipeline,
    buffer: FragmentBuffer,
    quarantine: Quarantine,
    diagnostics: PassDiagnostics,
}

impl<'p> DocumentPass<'p> {
    #[inline]
    #[must_use = "pass is created but not used"]
    pub(crate) fn new(pipeline: &'p RowPipeline) -> Self {
        Self {
            pipeline,
            buffer: FragmentBuffer::new(),
            quarantine: Quarantine::new(),
            diagnostics: PassDiagnostics::default(),
        }
    }

    /// Start a new document.
    ///
    /// # Errors
    /// Returns [`crate::FixrowError::BufferNotEmpty`] when the previous
    /// document was neither finished nor reset.
    pub fn begin(&mut self) -> Result<()> {
        self.buffer.ensure_empty()?;
        self.quarantine.clear();
        self.diagnostics = PassDiagnostics::default();
        Ok(())
    }

    /// Offer one extracted fragment, in reading order
    pub fn offer(&mut self, fragment: &Fragment) {
        self.diagnostics.fragments_seen += 1;
        match self.pipeline.filter().admit(fragment) {
            Admission::Accepted(entry) => {
                self.diagnostics.fragments_accepted += 1;
                self.buffer.push(entry);
            }
            Admission::OutsideBand => self.diagnostics.rejected_band += 1,
            Admission::Empty => self.diagnostics.rejected_empty += 1,
            Admission::HeaderLabel => {
                trace!("Skipping header label {:?}", fragment.text);
                self.diagnostics.rejected_label += 1;
            }
        }
    }

    /// Fragments accepted so far and not yet segmented
    #[inline]
    #[must_use = "returns the number of buffered fragments"]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Run segmentation, classification, repair and finalization for the
    /// buffered document, tagging every row with `tag`.
    ///
    /// Records are ordered well-formed rows first, then recovered rows.
    pub fn finish(&mut self, tag: &str) -> DocumentOutput {
        let pipeline = self.pipeline;
        let entries = self.buffer.take();

        let segmentation = pipeline.segmenter().process(entries);
        self.diagnostics.trailing_dropped = segmentation.trailing_dropped;
        self.diagnostics.candidate_rows = segmentation.rows.len();

        let filler = pipeline.filler();
        let laid_out = segmentation
            .rows
            .into_iter()
            .map(|row| filler.lay_out(row, tag))
            .collect();
        let classification = pipeline.classifier().process(laid_out);
        self.diagnostics.well_formed_rows = classification.well_formed.len();
        self.diagnostics.quarantined_rows = classification.quarantine.len();
        self.quarantine = classification.quarantine;
        debug!(
            "Tag {tag}: {} candidate rows, {} well-formed, {} quarantined",
            self.diagnostics.candidate_rows,
            self.diagnostics.well_formed_rows,
            self.diagnostics.quarantined_rows
        );

        let repair = pipeline
            .repair_engine()
            .process(std::mem::take(&mut self.quarantine), tag);
        self.diagnostics.placeholders_discarded = repair.placeholders_discarded;
        self.diagnostics.recovered_rows = repair.recovered.len();
        self.diagnostics.unrecoverable_groups = repair.unrecoverable_groups;
        self.diagnostics.unrecoverable_fragments = repair.unrecoverable_fragments;

        let finalizer = pipeline.finalizer();
        let mut records = finalizer.process(classification.well_formed);
        records.extend(finalizer.process(repair.recovered));
        self.diagnostics.records_emitted = records.len();

        DocumentOutput {
            tag: tag.to_string(),
            records,
            diagnostics: std::mem::take(&mut self.diagnostics),
        }
    }

    /// Discard everything buffered, e.g. after a failed extraction
    pub fn reset(&mut self) {
        if !self.buffer.is_empty() {
            debug!("Resetting pass with {} buffered fragment(s)", self.buffer.len());
        }
        self.buffer.clear();
        self.quarantine.clear();
        self.diagnostics = PassDiagnostics::default();
    }
}

#[cfg(test)]
mod tests {
    use crate::error::FixrowError;
    use crate::fragment::Fragment;
    use crate::pipeline::RowPipeline;
    use crate::schema::ColumnSchema;

    #[test]
    fn test_begin_rejects_dirty_buffer() {
        let pipeline = RowPipeline::new(ColumnSchema::rent_stabilization());
        let mut pass = pipeline.pass();
        pass.begin().unwrap();
        pass.offer(&Fragment::new("10001", 25.0, 400.0));
        match pass.begin() {
            Err(FixrowError::BufferNotEmpty { pending }) => assert_eq!(pending, 1),
            other => panic!("expected BufferNotEmpty, got {other:?}"),
        }
    }

    #[test]
    fn test_finish_leaves_pass_reusable() {
        let pipeline = RowPipeline::new(ColumnSchema::rent_stabilization());
        let mut pass = pipeline.pass();
        pass.begin().unwrap();
        pass.offer(&Fragment::new("10001", 25.0, 400.0));
        pass.offer(&Fragment::new("45", 1143.0, 400.0));
        let out = pass.finish("5");
        assert_eq!(out.records.len(), 1);
        assert_eq!(pass.pending(), 0);
        assert!(pass.begin().is_ok());
    }

    #[test]
    fn test_reset_discards_buffer() {
        let pipeline = RowPipeline::new(ColumnSchema::rent_stabilization());
        let mut pass = pipeline.pass();
        pass.offer(&Fragment::new("10001", 25.0, 400.0));
        pass.reset();
        assert!(pass.begin().is_ok());
        let out = pass.finish("1");
        assert!(out.records.is_empty());
        assert_eq!(out.diagnostics.fragments_seen, 0);
    }

    #[test]
    fn test_offer_counts_rejections() {
        let pipeline = RowPipeline::new(ColumnSchema::rent_stabilization());
        let mut pass = pipeline.pass();
        pass.offer(&Fragment::new("x", 25.0, 10.0));
        pass.offer(&Fragment::new("ZIP", 25.0, 400.0));
        pass.offer(&Fragment::new("", 25.0, 400.0));
        pass.offer(&Fragment::new("10001", 25.0, 400.0));
        let out = pass.finish("1");
        let d = out.diagnostics;
        assert_eq!(d.fragments_seen, 4);
        assert_eq!(d.rejected_band, 1);
        assert_eq!(d.rejected_label, 1);
        assert_eq!(d.rejected_empty, 1);
        assert_eq!(d.fragments_accepted, 1);
        assert_eq!(d.trailing_dropped, 1);
    }
}
