//! Signature resolution: decides which fragments enter segmentation.
//!
//! Checks, in order:
//! 1. `y` strictly inside the band (headers and footers fall outside)
//! 2. non-empty text
//! 3. text is not exactly one of the schema's field labels (reprinted headers)
//!
//! Text is compared and kept verbatim; padding is part of the value.
//!
//! Survivors carry their signature-axis coordinate as signature and their
//! row-axis coordinate for repair grouping.

use crate::fragment::Fragment;
use crate::schema::ColumnSchema;
use crate::types::CandidateEntry;
use serde::{Deserialize, Serialize};

/// Default lower band edge (exclusive)
pub const DEFAULT_BAND_MIN: f64 = 25.0;
/// Default upper band edge (exclusive)
pub const DEFAULT_BAND_MAX: f64 = 865.0;

/// Open vertical interval of accepted content
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    #[inline]
    #[must_use = "returns a new Band"]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Both edges are exclusive
    #[inline]
    #[must_use = "returns whether the coordinate is inside the band"]
    pub fn contains(&self, y: f64) -> bool {
        self.min < y && y < self.max
    }
}

impl Default for Band {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_BAND_MIN, DEFAULT_BAND_MAX)
    }
}

/// Outcome of offering one fragment to the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Accepted(CandidateEntry),
    OutsideBand,
    Empty,
    HeaderLabel,
}

/// Stateless fragment filter bound to a schema
#[derive(Debug, Clone, Copy)]
pub struct FragmentFilter<'a> {
    schema: &'a ColumnSchema,
    band: Band,
}

impl<'a> FragmentFilter<'a> {
    #[inline]
    #[must_use = "filter is created but not used"]
    pub const fn new(schema: &'a ColumnSchema, band: Band) -> Self {
        Self { schema, band }
    }

    /// Resolve one fragment
    #[must_use = "admission decides whether the fragment is kept"]
    pub fn admit(&self, fragment: &Fragment) -> Admission {
        if !self.band.contains(fragment.y) {
            return Admission::OutsideBand;
        }
        if fragment.text.is_empty() {
            return Admission::Empty;
        }
        if self.schema.is_label(&fragment.text) {
            return Admission::HeaderLabel;
        }

        let signature_axis = self.schema.signature_axis();
        Admission::Accepted(CandidateEntry {
            text: fragment.text.clone(),
            signature: fragment.coord(signature_axis),
            row_coord: fragment.coord(signature_axis.other()),
        })
    }
}
