/// Row segmentation
///
/// Splits the flat sequence of accepted fragments into candidate rows.
///
/// Algorithm:
/// 1. Append each entry to an accumulator
/// 2. When the appended entry's signature equals the terminator signature,
///    close the accumulator as a candidate row
/// 3. Entries after the last terminator are discarded and counted
///
/// A row whose terminator fragment is missing never closes on its own; it
/// folds into the following row, which the classifier then quarantines.
use crate::fragment::Coord;
use crate::types::{CandidateEntry, CandidateRow, RowOrdinal};
use log::debug;

/// Candidate rows plus the unterminated tail that was discarded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub rows: Vec<CandidateRow>,
    pub trailing_dropped: usize,
}

/// Terminator-driven row segmenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowSegmenter {
    terminator: Coord,
}

impl RowSegmenter {
    /// Create a segmenter closing rows on `terminator`
    #[inline]
    #[must_use = "segmenter is created but not used"]
    pub const fn new(terminator: Coord) -> Self {
        Self { terminator }
    }

    /// Segment entries in reading order. Row ordinals count from zero.
    #[must_use = "segmented rows are returned but not used"]
    pub fn process(&self, entries: Vec<CandidateEntry>) -> Segmentation {
        let mut rows = Vec::new();
        let mut current = Vec::new();

        for entry in entries {
            let closes = entry.signature == self.terminator;
            current.push(entry);
            if closes {
                let ordinal = RowOrdinal(rows.len());
                rows.push(CandidateRow::new(ordinal, std::mem::take(&mut current)));
            }
        }

        if !current.is_empty() {
            debug!(
                "Dropping {} trailing fragment(s) after the last terminator",
                current.len()
            );
        }

        Segmentation {
            rows,
            trailing_dropped: current.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordered_float::OrderedFloat;

    fn seg() -> RowSegmenter {
        RowSegmenter::new(OrderedFloat(1143.0))
    }

    #[test]
    fn test_empty_input() {
        let out = seg().process(vec![]);
        assert!(out.rows.is_empty());
        assert_eq!(out.trailing_dropped, 0);
    }

    #[test]
    fn test_closes_on_terminator() {
        let entries = vec![
            CandidateEntry::new("10001", 25.0, 400.0),
            CandidateEntry::new("123", 75.0, 400.0),
            CandidateEntry::new("45", 1143.0, 400.0),
            CandidateEntry::new("10002", 25.0, 390.0),
            CandidateEntry::new("46", 1143.0, 390.0),
        ];
        let out = seg().process(entries);
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.rows[0].len(), 3);
        assert_eq!(out.rows[0].ordinal, RowOrdinal(0));
        assert_eq!(out.rows[1].len(), 2);
        assert_eq!(out.rows[1].ordinal, RowOrdinal(1));
        assert_eq!(out.trailing_dropped, 0);
    }

    #[test]
    fn test_trailing_fragments_dropped() {
        let entries = vec![
            CandidateEntry::new("45", 1143.0, 400.0),
            CandidateEntry::new("10002", 25.0, 390.0),
            CandidateEntry::new("BROADWAY", 185.0, 390.0),
        ];
        let out = seg().process(entries);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.trailing_dropped, 2);
    }

    #[test]
    fn test_no_terminator_yields_no_rows() {
        let entries = vec![CandidateEntry::new("10001", 25.0, 400.0)];
        let out = seg().process(entries);
        assert!(out.rows.is_empty());
        assert_eq!(out.trailing_dropped, 1);
    }

    #[test]
    fn test_idempotent() {
        let entries = vec![
            CandidateEntry::new("a", 25.0, 1.0),
            CandidateEntry::new("b", 1143.0, 1.0),
            CandidateEntry::new("c", 25.0, 2.0),
        ];
        assert_eq!(seg().process(entries.clone()), seg().process(entries));
    }
}
