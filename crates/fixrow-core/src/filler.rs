/// Column filling
///
/// Lays a candidate row out against the schema.
///
/// Algorithm:
/// 1. Every candidate entry is kept as an extracted value
/// 2. The tag slot always receives the document tag
/// 3. Every other field without an entry at its exact signature receives
///    a null placeholder
/// 4. The row is sorted ascending by signature (stable)
///
/// When every entry matches a distinct field, the result is exactly
/// schema-wide. Duplicate or off-schema signatures make it wider; the
/// classifier decides what happens to those rows.
use crate::fragment::Coord;
use crate::schema::ColumnSchema;
use crate::types::{CandidateRow, FilledEntry, LaidOutRow};
use std::collections::HashSet;

/// Column filler bound to a schema
#[derive(Debug, Clone, Copy)]
pub struct ColumnFiller<'a> {
    schema: &'a ColumnSchema,
}

impl<'a> ColumnFiller<'a> {
    #[inline]
    #[must_use = "filler is created but not used"]
    pub const fn new(schema: &'a ColumnSchema) -> Self {
        Self { schema }
    }

    /// Lay out one row with `tag` at the tag slot
    #[must_use = "laid-out row is returned but not used"]
    pub fn lay_out(&self, row: CandidateRow, tag: &str) -> LaidOutRow {
        let present: HashSet<Coord> = row.entries.iter().map(|e| e.signature).collect();

        let mut entries: Vec<FilledEntry> = Vec::with_capacity(row.len() + self.schema.len());
        entries.extend(row.entries.into_iter().map(FilledEntry::extracted));

        for field in self.schema.fields() {
            let signature = field.signature_coord();
            if field.tag {
                entries.push(FilledEntry::tag(tag, signature));
            } else if !present.contains(&signature) {
                entries.push(FilledEntry::placeholder(signature));
            }
        }

        entries.sort_by_key(|e| e.signature);

        LaidOutRow {
            ordinal: row.ordinal,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CandidateEntry, EntryOrigin, RowOrdinal};

    fn row(entries: Vec<CandidateEntry>) -> CandidateRow {
        CandidateRow::new(RowOrdinal(0), entries)
    }

    #[test]
    fn test_sparse_row_is_schema_wide() {
        let schema = ColumnSchema::rent_stabilization();
        let filler = ColumnFiller::new(&schema);
        let laid_out = filler.lay_out(
            row(vec![
                CandidateEntry::new("10001", 25.0, 400.0),
                CandidateEntry::new("123", 75.0, 400.0),
                CandidateEntry::new("45", 1143.0, 400.0),
            ]),
            "5",
        );

        assert_eq!(laid_out.width(), schema.len());
        let values: Vec<Option<&str>> = laid_out
            .entries
            .iter()
            .map(|e| e.value.as_deref())
            .collect();
        assert_eq!(values[0], Some("10001"));
        assert_eq!(values[1], Some("123"));
        assert_eq!(values[13], Some("45"));
        assert_eq!(values[14], Some("5"));
        assert!(values[2..13].iter().all(Option::is_none));
        assert_eq!(laid_out.entries[14].origin, EntryOrigin::Tag);
    }

    #[test]
    fn test_sorted_regardless_of_input_order() {
        let schema = ColumnSchema::rent_stabilization();
        let filler = ColumnFiller::new(&schema);
        let laid_out = filler.lay_out(
            row(vec![
                CandidateEntry::new("45", 1143.0, 400.0),
                CandidateEntry::new("10001", 25.0, 400.0),
            ]),
            "1",
        );
        assert!(laid_out
            .entries
            .windows(2)
            .all(|w| w[0].signature < w[1].signature));
    }

    #[test]
    fn test_duplicate_signature_widens_row() {
        let schema = ColumnSchema::rent_stabilization();
        let filler = ColumnFiller::new(&schema);
        let laid_out = filler.lay_out(
            row(vec![
                CandidateEntry::new("10001", 25.0, 400.0),
                CandidateEntry::new("10002", 25.0, 390.0),
                CandidateEntry::new("45", 1143.0, 390.0),
            ]),
            "1",
        );
        assert_eq!(laid_out.width(), schema.len() + 1);
        // stable: reading order kept within equal signatures
        assert_eq!(laid_out.entries[0].value.as_deref(), Some("10001"));
        assert_eq!(laid_out.entries[1].value.as_deref(), Some("10002"));
    }

    #[test]
    fn test_fragment_at_tag_signature_is_extra() {
        let schema = ColumnSchema::rent_stabilization();
        let filler = ColumnFiller::new(&schema);
        let laid_out = filler.lay_out(
            row(vec![
                CandidateEntry::new("9", 2024.0, 400.0),
                CandidateEntry::new("45", 1143.0, 400.0),
            ]),
            "1",
        );
        assert_eq!(laid_out.width(), schema.len() + 1);
    }

    #[test]
    fn test_off_schema_signature_is_extra() {
        let schema = ColumnSchema::rent_stabilization();
        let filler = ColumnFiller::new(&schema);
        let laid_out = filler.lay_out(
            row(vec![
                CandidateEntry::new("stray", 500.0, 400.0),
                CandidateEntry::new("45", 1143.0, 400.0),
            ]),
            "1",
        );
        assert_eq!(laid_out.width(), schema.len() + 1);
        assert_eq!(laid_out.extracted_count(), 2);
    }
}
