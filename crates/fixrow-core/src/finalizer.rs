/// Record finalization: strips signatures and origins from filled rows,
/// leaving plain values in schema order.
use crate::types::{FilledRow, OutputRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RecordFinalizer;

impl RecordFinalizer {
    #[inline]
    #[must_use = "finalizer is created but not used"]
    pub const fn new() -> Self {
        Self
    }

    #[inline]
    #[must_use = "record is returned but not used"]
    pub fn finalize(&self, row: FilledRow) -> OutputRecord {
        OutputRecord(row.into_entries().into_iter().map(|e| e.value).collect())
    }

    #[must_use = "records are returned but not used"]
    pub fn process(&self, rows: impl IntoIterator<Item = FilledRow>) -> Vec<OutputRecord> {
        rows.into_iter().map(|row| self.finalize(row)).collect()
    }
}
