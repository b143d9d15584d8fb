//! Composite keys derived from finished records.
//!
//! Optional post-processing after finalization: a key column is appended
//! whose value concatenates several existing columns, or null when any
//! part is missing or not a valid integer.

use crate::error::{FixrowError, Result};
use crate::types::OutputRecord;
use serde::{Deserialize, Serialize};

/// One column contributing to a key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPart {
    pub column: String,
    /// Parse as an integer and use its canonical form (`"007"` -> `"7"`)
    #[serde(default)]
    pub integer: bool,
}

impl KeyPart {
    #[inline]
    #[must_use = "returns a new KeyPart"]
    pub fn text(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            integer: false,
        }
    }

    #[inline]
    #[must_use = "returns a new KeyPart"]
    pub fn integer(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            integer: true,
        }
    }
}

/// Key definition by column name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeKey {
    pub name: String,
    pub parts: Vec<KeyPart>,
}

impl CompositeKey {
    /// Borough-block-lot: tag, then BLOCK and LOT as integers
    #[must_use = "returns the BBL key definition"]
    pub fn bbl() -> Self {
        Self {
            name: "BBL".to_string(),
            parts: vec![
                KeyPart::text("BOROUGH_ID"),
                KeyPart::integer("BLOCK"),
                KeyPart::integer("LOT"),
            ],
        }
    }

    /// Bind part names to column positions.
    ///
    /// # Errors
    /// Returns [`FixrowError::UnknownColumn`] for a part not in `columns`.
    pub fn bind(&self, columns: &[String]) -> Result<BoundKey> {
        let parts = self
            .parts
            .iter()
            .map(|part| {
                columns
                    .iter()
                    .position(|c| *c == part.column)
                    .map(|idx| (idx, part.integer))
                    .ok_or_else(|| FixrowError::UnknownColumn(part.column.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BoundKey {
            name: self.name.clone(),
            parts,
        })
    }
}

/// A key bound to column positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundKey {
    name: String,
    parts: Vec<(usize, bool)>,
}

impl BoundKey {
    /// Key value for one record
    #[must_use = "returns the key value"]
    pub fn compute(&self, record: &OutputRecord) -> Option<String> {
        let mut key = String::new();
        for &(column, integer) in &self.parts {
            let raw = record.get(column)?.trim();
            if raw.is_empty() {
                return None;
            }
            if integer {
                let value: i64 = raw.parse().ok()?;
                key.push_str(&value.to_string());
            } else {
                key.push_str(raw);
            }
        }
        Some(key)
    }

    /// Append the key column to the header and every record
    pub fn append(&self, columns: &mut Vec<String>, records: &mut [OutputRecord]) {
        columns.push(self.name.clone());
        for record in records.iter_mut() {
            let value = self.compute(record);
            record.0.push(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnSchema;

    fn record_with(block: Option<&str>, lot: Option<&str>, borough: Option<&str>) -> OutputRecord {
        let mut values = vec![None; 15];
        values[12] = block.map(str::to_string);
        values[13] = lot.map(str::to_string);
        values[14] = borough.map(str::to_string);
        OutputRecord(values)
    }

    fn bbl() -> BoundKey {
        let columns = ColumnSchema::rent_stabilization().field_names();
        CompositeKey::bbl().bind(&columns).unwrap()
    }

    #[test]
    fn test_bbl_concatenates_canonical_integers() {
        let key = bbl();
        let record = record_with(Some("00123"), Some(" 45 "), Some("5"));
        assert_eq!(key.compute(&record).as_deref(), Some("512345"));
    }

    #[test]
    fn test_bbl_null_when_part_missing() {
        let key = bbl();
        assert_eq!(key.compute(&record_with(None, Some("45"), Some("5"))), None);
        assert_eq!(key.compute(&record_with(Some("1"), Some("45"), None)), None);
    }

    #[test]
    fn test_bbl_null_when_not_integer() {
        let key = bbl();
        assert_eq!(key.compute(&record_with(Some("12A"), Some("45"), Some("5"))), None);
    }

    #[test]
    fn test_bind_unknown_column() {
        let columns = vec!["A".to_string()];
        match CompositeKey::bbl().bind(&columns) {
            Err(FixrowError::UnknownColumn(name)) => assert_eq!(name, "BOROUGH_ID"),
            other => panic!("expected UnknownColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_append_adds_column() {
        let key = bbl();
        let mut columns = ColumnSchema::rent_stabilization().field_names();
        let mut records = vec![
            record_with(Some("1"), Some("2"), Some("3")),
            record_with(None, Some("2"), Some("3")),
        ];
        key.append(&mut columns, &mut records);
        assert_eq!(columns.last().map(String::as_str), Some("BBL"));
        assert_eq!(records[0].get(15), Some("312"));
        assert_eq!(records[1].len(), 16);
        assert_eq!(records[1].get(15), None);
    }
}
