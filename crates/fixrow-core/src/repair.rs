/// Outlier repair
///
/// Re-segments quarantined rows by row-axis affinity. When a row's
/// terminator fragment is missing, every fragment of one printed line still
/// shares the same row-axis coordinate, so grouping on that coordinate
/// recovers the boundaries the terminator scan missed.
///
/// Algorithm, for each quarantined row separately (ordinal order):
/// 1. Flatten the laid-out entries
/// 2. Drop entries without a page position (null fills, injected tag)
/// 3. Group the rest by row-axis coordinate, groups in first-seen order
/// 4. Each group becomes a candidate row and is laid out again
///
/// Groups that are still oversized after layout (duplicate or off-schema
/// signatures on one line) are not emitted; they are counted and logged.
use crate::classifier::RowClassifier;
use crate::filler::ColumnFiller;
use crate::fragment::Coord;
use crate::types::{CandidateEntry, CandidateRow, EntryOrigin, FilledRow, Quarantine};
use log::{debug, warn};
use std::collections::HashMap;

/// Recovered candidate rows before layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Regrouping {
    /// One row per row-axis group; ordinal is the quarantined source row
    pub candidates: Vec<CandidateRow>,
    pub placeholders_discarded: usize,
}

/// Rows recovered from one document's quarantine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairOutcome {
    pub recovered: Vec<FilledRow>,
    pub placeholders_discarded: usize,
    pub unrecoverable_groups: usize,
    pub unrecoverable_fragments: usize,
}

/// Outlier repair engine bound to the filler and classifier of a pass
#[derive(Debug, Clone, Copy)]
pub struct OutlierRepairEngine<'a> {
    filler: ColumnFiller<'a>,
    classifier: RowClassifier,
}

impl<'a> OutlierRepairEngine<'a> {
    #[inline]
    #[must_use = "repair engine is created but not used"]
    pub const fn new(filler: ColumnFiller<'a>, classifier: RowClassifier) -> Self {
        Self { filler, classifier }
    }

    /// Steps 1-3: regroup quarantined entries by row-axis coordinate
    #[must_use = "regrouped rows are returned but not used"]
    pub fn regroup(&self, quarantine: Quarantine) -> Regrouping {
        let mut out = Regrouping::default();

        for (ordinal, row) in quarantine {
            let mut index: HashMap<Coord, usize> = HashMap::new();
            let mut groups: Vec<Vec<CandidateEntry>> = Vec::new();

            for entry in row.entries {
                let (EntryOrigin::Extracted { row_coord }, Some(text)) = (entry.origin, entry.value)
                else {
                    out.placeholders_discarded += 1;
                    continue;
                };
                let slot = *index.entry(row_coord).or_insert_with(|| {
                    groups.push(Vec::new());
                    groups.len() - 1
                });
                groups[slot].push(CandidateEntry {
                    text,
                    signature: entry.signature,
                    row_coord,
                });
            }

            debug!("{ordinal}: regrouped into {} row(s)", groups.len());
            out.candidates.extend(
                groups
                    .into_iter()
                    .map(|entries| CandidateRow::new(ordinal, entries)),
            );
        }

        out
    }

    /// Full repair: regroup, lay out with `tag`, keep rows that now fit
    #[must_use = "repair outcome is returned but not used"]
    pub fn process(&self, quarantine: Quarantine, tag: &str) -> RepairOutcome {
        let regrouping = self.regroup(quarantine);
        let mut out = RepairOutcome {
            placeholders_discarded: regrouping.placeholders_discarded,
            ..RepairOutcome::default()
        };

        for candidate in regrouping.candidates {
            let laid_out = self.filler.lay_out(candidate, tag);
            if self.classifier.is_well_formed(&laid_out) {
                out.recovered.push(FilledRow::from_laid_out(laid_out));
            } else {
                let lost = laid_out.extracted_count();
                warn!(
                    "Unrecoverable group in {}: {} fragment(s) still oversized after repair",
                    laid_out.ordinal, lost
                );
                out.unrecoverable_groups += 1;
                out.unrecoverable_fragments += lost;
            }
        }

        out
    }
}
