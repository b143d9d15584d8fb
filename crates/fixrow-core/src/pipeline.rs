/// Row reconstruction pipeline
///
/// Holds the schema and configuration shared by every document and hands
/// out per-document [`DocumentPass`]es. Stages are cheap views over the
/// schema, built on demand.
///
/// Stage order:
/// - signature resolution ([`FragmentFilter`]), applied as fragments arrive
/// - segmentation ([`RowSegmenter`])
/// - layout ([`ColumnFiller`]) and classification ([`RowClassifier`])
/// - outlier repair ([`OutlierRepairEngine`]) on the quarantine
/// - finalization ([`RecordFinalizer`])
use crate::classifier::RowClassifier;
use crate::filler::ColumnFiller;
use crate::finalizer::RecordFinalizer;
use crate::fragment::Fragment;
use crate::pass::DocumentPass;
use crate::repair::OutlierRepairEngine;
use crate::resolve::{Band, FragmentFilter};
use crate::schema::ColumnSchema;
use crate::segmenter::RowSegmenter;
use crate::types::DocumentOutput;
use serde::{Deserialize, Serialize};

/// Pipeline-wide settings beyond the schema
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Vertical band of accepted content
    pub band: Band,
}

/// Pipeline orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct RowPipeline {
    schema: ColumnSchema,
    config: PipelineConfig,
}

impl RowPipeline {
    /// Pipeline with the default band
    #[inline]
    #[must_use = "pipeline is created but not used"]
    pub fn new(schema: ColumnSchema) -> Self {
        Self::with_config(schema, PipelineConfig::default())
    }

    #[inline]
    #[must_use = "pipeline is created but not used"]
    pub const fn with_config(schema: ColumnSchema, config: PipelineConfig) -> Self {
        Self { schema, config }
    }

    #[inline]
    #[must_use = "returns the schema"]
    pub const fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    #[inline]
    #[must_use = "returns the pipeline config"]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Start a fresh pass with its own buffer and quarantine
    #[inline]
    #[must_use = "pass is created but not used"]
    pub fn pass(&self) -> DocumentPass<'_> {
        DocumentPass::new(self)
    }

    /// Run one whole document through a fresh pass
    #[must_use = "document output is returned but not used"]
    pub fn process<'f>(
        &self,
        tag: &str,
        fragments: impl IntoIterator<Item = &'f Fragment>,
    ) -> DocumentOutput {
        let mut pass = self.pass();
        for fragment in fragments {
            pass.offer(fragment);
        }
        pass.finish(tag)
    }

    #[inline]
    pub(crate) fn filter(&self) -> FragmentFilter<'_> {
        FragmentFilter::new(&self.schema, self.config.band)
    }

    #[inline]
    pub(crate) fn segmenter(&self) -> RowSegmenter {
        RowSegmenter::new(self.schema.terminator_signature())
    }

    #[inline]
    pub(crate) fn filler(&self) -> ColumnFiller<'_> {
        ColumnFiller::new(&self.schema)
    }

    #[inline]
    pub(crate) fn classifier(&self) -> RowClassifier {
        RowClassifier::new(self.schema.len())
    }

    #[inline]
    pub(crate) fn repair_engine(&self) -> OutlierRepairEngine<'_> {
        OutlierRepairEngine::new(self.filler(), self.classifier())
    }

    #[inline]
    pub(crate) const fn finalizer(&self) -> RecordFinalizer {
        RecordFinalizer::new()
    }
}

impl Default for RowPipeline {
    #[inline]
    fn default() -> Self {
        Self::new(ColumnSchema::rent_stabilization())
    }
}
