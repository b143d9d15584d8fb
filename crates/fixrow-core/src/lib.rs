//! # fixrow-core - Row Reconstruction from Positioned Text
//!
//! Rebuilds fixed-width tabular records from the `(text, x, y)` fragments a
//! text extractor reads off fixed-layout documents, such as the DHCR
//! rent-stabilized building lists.
//!
//! Row boundaries are not printed in these documents. A row ends where the
//! terminator column (`LOT`) appears, and columns are recognised by the
//! exact coordinate they are printed at (their signature). A row whose
//! terminator is missing merges with the next one; such rows are
//! quarantined and regrouped by the coordinate of the printed line.
//!
//! ## Quick Start
//!
//! ```rust
//! use fixrow_core::{ColumnSchema, Fragment, RowPipeline};
//!
//! let pipeline = RowPipeline::new(ColumnSchema::rent_stabilization());
//! let fragments = vec![
//!     Fragment::new("10301", 25.0, 400.0),
//!     Fragment::new("123", 75.0, 400.0),
//!     Fragment::new("45", 1143.0, 400.0),
//! ];
//! let output = pipeline.process("5", &fragments);
//!
//! assert_eq!(output.records.len(), 1);
//! assert_eq!(output.records[0].get(0), Some("10301"));
//! assert_eq!(output.records[0].get(14), Some("5"));
//! ```
//!
//! ## Stages
//!
//! | Stage | Type | Input -> Output |
//! |-------|------|-----------------|
//! | Signature resolution | [`FragmentFilter`] | `Fragment` -> `CandidateEntry` |
//! | Segmentation | [`RowSegmenter`] | entries -> `CandidateRow`s |
//! | Layout | [`ColumnFiller`] | `CandidateRow` + tag -> `LaidOutRow` |
//! | Classification | [`RowClassifier`] | `LaidOutRow` -> `FilledRow` or quarantine |
//! | Outlier repair | [`OutlierRepairEngine`] | quarantine -> `FilledRow`s |
//! | Finalization | [`RecordFinalizer`] | `FilledRow` -> `OutputRecord` |
//!
//! A [`DocumentPass`] owns the fragment buffer and quarantine of one
//! document; [`CatalogRunner`] drives passes over a [`DocumentCatalog`].

pub mod buffer;
pub mod catalog;
pub mod classifier;
pub mod composite_key;
pub mod diagnostics;
pub mod error;
pub mod filler;
pub mod finalizer;
pub mod fragment;
pub mod pass;
pub mod pipeline;
pub mod repair;
pub mod resolve;
pub mod runner;
pub mod schema;
pub mod segmenter;
pub mod traits;
pub mod types;

pub use buffer::FragmentBuffer;
pub use catalog::{CatalogEntry, DocumentCatalog, DEFAULT_PDF_DIR};
pub use classifier::{Classification, RowClassifier};
pub use composite_key::{BoundKey, CompositeKey, KeyPart};
pub use diagnostics::PassDiagnostics;
pub use error::{FixrowError, Result};
pub use filler::ColumnFiller;
pub use finalizer::RecordFinalizer;
pub use fragment::{Axis, Coord, Fragment};
pub use pass::DocumentPass;
pub use pipeline::{PipelineConfig, RowPipeline};
pub use repair::{OutlierRepairEngine, Regrouping, RepairOutcome};
pub use resolve::{Admission, Band, FragmentFilter, DEFAULT_BAND_MAX, DEFAULT_BAND_MIN};
pub use runner::{CatalogRunner, DocumentFailure, DocumentSummary, RunOptions, RunReport};
pub use schema::{ColumnSchema, FieldSpec};
pub use segmenter::{RowSegmenter, Segmentation};
pub use traits::{FragmentSource, JsonFragmentSource, MemorySink, TabularSink};
pub use types::{
    CandidateEntry, CandidateRow, DocumentOutput, EntryOrigin, FilledEntry, FilledRow, LaidOutRow,
    OutputRecord, Quarantine, RowOrdinal,
};
