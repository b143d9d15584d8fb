//! Error types for tabular sinks.

use fixrow_core::FixrowError;
use thiserror::Error;

/// Error type for sink operations
#[derive(Error, Debug)]
pub enum SinkError {
    /// A record does not match the header width
    #[error("Record {index} has {found} value(s), header has {expected}")]
    WidthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Table name unusable as an identifier
    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl From<SinkError> for FixrowError {
    fn from(err: SinkError) -> Self {
        Self::Sink(err.to_string())
    }
}

/// Type alias for [`Result<T, SinkError>`].
pub type Result<T> = std::result::Result<T, SinkError>;

/// Check every record has one value per column
pub(crate) fn check_widths(
    columns: &[String],
    records: &[fixrow_core::OutputRecord],
) -> Result<()> {
    match records.iter().position(|r| r.len() != columns.len()) {
        Some(index) => Err(SinkError::WidthMismatch {
            index,
            expected: columns.len(),
            found: records[index].len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixrow_core::OutputRecord;

    #[test]
    fn test_width_mismatch_display() {
        let err = SinkError::WidthMismatch {
            index: 2,
            expected: 15,
            found: 14,
        };
        assert_eq!(err.to_string(), "Record 2 has 14 value(s), header has 15");
    }

    #[test]
    fn test_converts_to_sink_error() {
        let err: FixrowError = SinkError::InvalidTable(String::new()).into();
        match err {
            FixrowError::Sink(msg) => assert!(msg.contains("Invalid table name")),
            other => panic!("expected Sink, got {other:?}"),
        }
    }

    #[test]
    fn test_check_widths() {
        let columns = vec!["A".to_string(), "B".to_string()];
        let good = OutputRecord(vec![None, None]);
        let bad = OutputRecord(vec![None]);
        assert!(check_widths(&columns, &[good.clone()]).is_ok());
        match check_widths(&columns, &[good, bad]) {
            Err(SinkError::WidthMismatch { index, found, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(found, 1);
            }
            other => panic!("expected WidthMismatch, got {other:?}"),
        }
    }
}
