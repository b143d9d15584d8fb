/// Row classification
///
/// Partitions laid-out rows into well-formed rows (width <= schema size)
/// and oversized rows. Oversized rows are quarantined under their ordinal,
/// never dropped.
///
/// Classification looks at the laid-out width, so a row counts as
/// oversized when its fragments plus the fills it needs exceed the schema.
/// A row that lost its terminator and absorbed the next one lands here with
/// roughly `2 * schema - 1` entries.
use crate::types::{FilledRow, LaidOutRow, Quarantine};
use log::trace;

/// Output of one classification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Rows of exactly schema width, in input order
    pub well_formed: Vec<FilledRow>,
    pub quarantine: Quarantine,
}

impl Classification {
    /// Total rows classified
    #[inline]
    #[must_use = "returns the number of classified rows"]
    pub fn total(&self) -> usize {
        self.well_formed.len() + self.quarantine.len()
    }
}

/// Width-based row classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowClassifier {
    schema_len: usize,
}

impl RowClassifier {
    #[inline]
    #[must_use = "classifier is created but not used"]
    pub const fn new(schema_len: usize) -> Self {
        Self { schema_len }
    }

    /// Whether `row` fits the schema
    #[inline]
    #[must_use = "returns whether the row is well-formed"]
    pub fn is_well_formed(&self, row: &LaidOutRow) -> bool {
        row.width() <= self.schema_len
    }

    /// Partition `rows`
    #[must_use = "classification is returned but not used"]
    pub fn process(&self, rows: Vec<LaidOutRow>) -> Classification {
        let mut out = Classification::default();
        for row in rows {
            if self.is_well_formed(&row) {
                out.well_formed.push(FilledRow::from_laid_out(row));
            } else {
                trace!(
                    "Quarantining {} (width {} > {})",
                    row.ordinal,
                    row.width(),
                    self.schema_len
                );
                out.quarantine.insert(row.ordinal, row);
            }
        }
        out
    }
}
