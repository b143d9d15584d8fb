//! Per-pass counters.
//!
//! Every fragment that does not reach an output record is accounted for
//! here, so silent drops stay observable.

use serde::{Deserialize, Serialize};

/// Counters collected during one document pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PassDiagnostics {
    /// Fragments delivered by the extractor
    pub fragments_seen: usize,
    /// Fragments that survived signature resolution
    pub fragments_accepted: usize,
    /// Outside the vertical band (page furniture)
    pub rejected_band: usize,
    /// Reprinted column header labels
    pub rejected_label: usize,
    /// Empty text
    pub rejected_empty: usize,
    /// Fragments after the last terminator, discarded
    pub trailing_dropped: usize,
    pub candidate_rows: usize,
    pub well_formed_rows: usize,
    pub quarantined_rows: usize,
    /// Null fills and tags dropped while flattening quarantined rows
    pub placeholders_discarded: usize,
    pub recovered_rows: usize,
    /// Repair groups still oversized after layout
    pub unrecoverable_groups: usize,
    /// Extracted fragments inside unrecoverable groups
    pub unrecoverable_fragments: usize,
    pub records_emitted: usize,
}

impl PassDiagnostics {
    /// Add another pass's counters to this one
    pub fn merge(&mut self, other: &Self) {
        self.fragments_seen += other.fragments_seen;
        self.fragments_accepted += other.fragments_accepted;
        self.rejected_band += other.rejected_band;
        self.rejected_label += other.rejected_label;
        self.rejected_empty += other.rejected_empty;
        self.trailing_dropped += other.trailing_dropped;
        self.candidate_rows += other.candidate_rows;
        self.well_formed_rows += other.well_formed_rows;
        self.quarantined_rows += other.quarantined_rows;
        self.placeholders_discarded += other.placeholders_discarded;
        self.recovered_rows += other.recovered_rows;
        self.unrecoverable_groups += other.unrecoverable_groups;
        self.unrecoverable_fragments += other.unrecoverable_fragments;
        self.records_emitted += other.records_emitted;
    }

    /// Fragments rejected by signature resolution
    #[inline]
    #[must_use = "returns the rejected fragment count"]
    pub const fn fragments_rejected(&self) -> usize {
        self.rejected_band + self.rejected_label + self.rejected_empty
    }

    /// Accepted fragments that never reached an output record
    #[inline]
    #[must_use = "returns the lost fragment count"]
    pub const fn fragments_lost(&self) -> usize {
        self.trailing_dropped + self.unrecoverable_fragments
    }

    /// Whether any accepted content was discarded
    #[inline]
    #[must_use = "returns whether content was lost"]
    pub const fn has_data_loss(&self) -> bool {
        self.fragments_lost() > 0
    }
}

impl std::fmt::Display for PassDiagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} fragments ({} accepted, {} band, {} label, {} empty), \
             {} rows ({} well-formed, {} quarantined, {} recovered), \
             {} records, {} trailing dropped, {} unrecoverable groups ({} fragments)",
            self.fragments_seen,
            self.fragments_accepted,
            self.rejected_band,
            self.rejected_label,
            self.rejected_empty,
            self.candidate_rows,
            self.well_formed_rows,
            self.quarantined_rows,
            self.recovered_rows,
            self.records_emitted,
            self.trailing_dropped,
            self.unrecoverable_groups,
            self.unrecoverable_fragments,
        )
    }
}
