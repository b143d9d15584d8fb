/// Shared types flowing between the reconstruction stages
///
/// Stage contracts:
/// - signature resolution: `Fragment` -> `CandidateEntry`
/// - segmentation: `CandidateEntry`s -> `CandidateRow`s
/// - layout: `CandidateRow` + tag -> `LaidOutRow`
/// - classification: `LaidOutRow` -> `FilledRow` | quarantined `LaidOutRow`
/// - finalization: `FilledRow` -> `OutputRecord`
use crate::diagnostics::PassDiagnostics;
use crate::fragment::Coord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Position of a candidate row within one document pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowOrdinal(pub usize);

impl std::fmt::Display for RowOrdinal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row #{}", self.0)
    }
}

/// An accepted fragment with its resolved signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub text: String,
    /// Coordinate along the schema's signature axis
    pub signature: Coord,
    /// Coordinate along the row axis, used by outlier repair
    pub row_coord: Coord,
}

impl CandidateEntry {
    #[inline]
    #[must_use = "returns a new CandidateEntry"]
    pub fn new(text: impl Into<String>, signature: f64, row_coord: f64) -> Self {
        Self {
            text: text.into(),
            signature: signature.into(),
            row_coord: row_coord.into(),
        }
    }
}

/// Entries between two terminator hits, in reading order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub ordinal: RowOrdinal,
    pub entries: Vec<CandidateEntry>,
}

impl CandidateRow {
    #[inline]
    #[must_use = "returns a new CandidateRow"]
    pub const fn new(ordinal: RowOrdinal, entries: Vec<CandidateEntry>) -> Self {
        Self { ordinal, entries }
    }

    #[inline]
    #[must_use = "returns the number of entries"]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use = "returns whether the row has no entries"]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a laid-out entry's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryOrigin {
    /// Page content, with the row-axis coordinate it was printed at
    Extracted { row_coord: Coord },
    /// Null fill for a field with no matching fragment
    Placeholder,
    /// Per-document tag injected at the tag slot
    Tag,
}

impl EntryOrigin {
    /// Placeholders and tags carry no page position
    #[inline]
    #[must_use = "returns whether the entry has a page position"]
    pub const fn is_positioned(&self) -> bool {
        matches!(self, Self::Extracted { .. })
    }
}

/// One value of a laid-out row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilledEntry {
    /// `None` is the null marker
    pub value: Option<String>,
    pub signature: Coord,
    pub origin: EntryOrigin,
}

impl FilledEntry {
    #[inline]
    #[must_use = "returns a new extracted entry"]
    pub fn extracted(entry: CandidateEntry) -> Self {
        Self {
            value: Some(entry.text),
            signature: entry.signature,
            origin: EntryOrigin::Extracted {
                row_coord: entry.row_coord,
            },
        }
    }

    #[inline]
    #[must_use = "returns a new placeholder entry"]
    pub const fn placeholder(signature: Coord) -> Self {
        Self {
            value: None,
            signature,
            origin: EntryOrigin::Placeholder,
        }
    }

    #[inline]
    #[must_use = "returns a new tag entry"]
    pub fn tag(value: impl Into<String>, signature: Coord) -> Self {
        Self {
            value: Some(value.into()),
            signature,
            origin: EntryOrigin::Tag,
        }
    }
}

/// A candidate row with tag and null fills added, sorted by signature.
///
/// Width is at least the schema size; anything wider holds duplicate or
/// off-schema signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaidOutRow {
    pub ordinal: RowOrdinal,
    pub entries: Vec<FilledEntry>,
}

impl LaidOutRow {
    #[inline]
    #[must_use = "returns the row width"]
    pub fn width(&self) -> usize {
        self.entries.len()
    }

    /// Number of entries with a page position
    #[must_use = "returns the number of extracted entries"]
    pub fn extracted_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.origin.is_positioned())
            .count()
    }
}

/// A laid-out row of exactly schema width, one entry per field in
/// signature order. Only the classifier constructs these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilledRow {
    ordinal: RowOrdinal,
    entries: Vec<FilledEntry>,
}

impl FilledRow {
    /// Caller guarantees the width matches the schema
    #[inline]
    pub(crate) fn from_laid_out(row: LaidOutRow) -> Self {
        Self {
            ordinal: row.ordinal,
            entries: row.entries,
        }
    }

    #[inline]
    #[must_use = "returns the row ordinal"]
    pub const fn ordinal(&self) -> RowOrdinal {
        self.ordinal
    }

    #[inline]
    #[must_use = "returns the row entries"]
    pub fn entries(&self) -> &[FilledEntry] {
        &self.entries
    }

    #[inline]
    #[must_use = "returns the row width"]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use = "returns whether the row has no entries"]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub(crate) fn into_entries(self) -> Vec<FilledEntry> {
        self.entries
    }
}

/// Oversized rows of one document pass awaiting repair
pub type Quarantine = BTreeMap<RowOrdinal, LaidOutRow>;

/// Plain field values aligned to the schema's field order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputRecord(pub Vec<Option<String>>);

impl OutputRecord {
    #[inline]
    #[must_use = "returns the record values"]
    pub fn values(&self) -> &[Option<String>] {
        &self.0
    }

    #[inline]
    #[must_use = "returns the value at the column"]
    pub fn get(&self, column: usize) -> Option<&str> {
        self.0.get(column).and_then(|v| v.as_deref())
    }

    #[inline]
    #[must_use = "returns the number of values"]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use = "returns whether the record has no values"]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of one document pass
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentOutput {
    /// Tag the pass injected into every row
    pub tag: String,
    /// Well-formed rows first, then recovered rows
    pub records: Vec<OutputRecord>,
    pub diagnostics: PassDiagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordered_float::OrderedFloat;

    #[test]
    fn test_origin_positioned() {
        let extracted = FilledEntry::extracted(CandidateEntry::new("10001", 25.0, 400.0));
        assert!(extracted.origin.is_positioned());
        assert!(!FilledEntry::placeholder(OrderedFloat(75.0)).origin.is_positioned());
        assert!(!FilledEntry::tag("5", OrderedFloat(2024.0)).origin.is_positioned());
    }

    #[test]
    fn test_extracted_keeps_row_coord() {
        let entry = FilledEntry::extracted(CandidateEntry::new("45", 1143.0, 512.25));
        assert_eq!(entry.value.as_deref(), Some("45"));
        assert_eq!(entry.signature, OrderedFloat(1143.0));
        assert_eq!(
            entry.origin,
            EntryOrigin::Extracted {
                row_coord: OrderedFloat(512.25)
            }
        );
    }

    #[test]
    fn test_laid_out_extracted_count() {
        let row = LaidOutRow {
            ordinal: RowOrdinal(0),
            entries: vec![
                FilledEntry::extracted(CandidateEntry::new("a", 1.0, 5.0)),
                FilledEntry::placeholder(OrderedFloat(2.0)),
                FilledEntry::tag("t", OrderedFloat(3.0)),
            ],
        };
        assert_eq!(row.width(), 3);
        assert_eq!(row.extracted_count(), 1);
    }

    #[test]
    fn test_output_record_get() {
        let record = OutputRecord(vec![Some("a".to_string()), None]);
        assert_eq!(record.get(0), Some("a"));
        assert_eq!(record.get(1), None);
        assert_eq!(record.get(5), None);
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"["a",null]"#);
    }

    #[test]
    fn test_row_ordinal_display() {
        assert_eq!(RowOrdinal(7).to_string(), "row #7");
    }
}
