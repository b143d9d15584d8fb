//! SQLite output: the table is recreated on every write.

use crate::error::{check_widths, Result, SinkError};
use fixrow_core::{OutputRecord, TabularSink};
use log::debug;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;

pub const DEFAULT_TABLE: &str = "rent_stabilized";

/// Writes records into one table; every column is `TEXT`, nulls stay `NULL`
pub struct SqliteSink {
    conn: Connection,
    table: String,
}

impl SqliteSink {
    /// Open (or create) the database at `path`
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or the table name
    /// is empty.
    pub fn open(path: &Path, table: impl Into<String>) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::with_connection(Connection::open(path)?, table)
    }

    /// # Errors
    /// Returns an error if the table name is empty.
    pub fn in_memory(table: impl Into<String>) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, table)
    }

    fn with_connection(conn: Connection, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        if table.trim().is_empty() {
            return Err(SinkError::InvalidTable(table));
        }
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Ok(Self { conn, table })
    }

    #[inline]
    #[must_use = "returns the underlying connection"]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    #[inline]
    #[must_use = "returns the table name"]
    pub fn table(&self) -> &str {
        &self.table
    }

    fn write_all(&mut self, columns: &[String], records: &[OutputRecord]) -> Result<()> {
        check_widths(columns, records)?;
        let table = quote_ident(&self.table);
        let column_defs = columns
            .iter()
            .map(|c| format!("{} TEXT", quote_ident(c)))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} ({column_defs});"
        ))?;
        {
            let mut stmt = tx.prepare(&format!("INSERT INTO {table} VALUES ({placeholders})"))?;
            for record in records {
                stmt.execute(params_from_iter(record.values().iter()))?;
            }
        }
        tx.commit()?;
        debug!("Inserted {} row(s) into {}", records.len(), self.table);
        Ok(())
    }
}

/// Double-quoted SQL identifier
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl TabularSink for SqliteSink {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn write(&mut self, columns: &[String], records: &[OutputRecord]) -> fixrow_core::Result<()> {
        Ok(self.write_all(columns, records)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["ZIP".to_string(), "LOT".to_string()]
    }

    fn count(sink: &SqliteSink) -> i64 {
        sink.connection()
            .query_row(&format!("SELECT COUNT(*) FROM {}", quote_ident(sink.table())), [], |r| {
                r.get(0)
            })
            .unwrap()
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("ZIP"), "\"ZIP\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_rows_and_nulls() {
        let mut sink = SqliteSink::in_memory(DEFAULT_TABLE).unwrap();
        let records = vec![
            OutputRecord(vec![Some("10301".into()), None]),
            OutputRecord(vec![None, Some("46".into())]),
        ];
        sink.write(&columns(), &records).unwrap();
        assert_eq!(count(&sink), 2);

        let nulls: i64 = sink
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM rent_stabilized WHERE ZIP IS NULL",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(nulls, 1);
    }

    #[test]
    fn test_rewrite_replaces_table() {
        let mut sink = SqliteSink::in_memory("t").unwrap();
        sink.write(&columns(), &[OutputRecord(vec![None, None])]).unwrap();
        sink.write(&columns(), &[]).unwrap();
        assert_eq!(count(&sink), 0);
    }

    #[test]
    fn test_empty_table_name() {
        assert!(matches!(
            SqliteSink::in_memory("  "),
            Err(SinkError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.db");
        {
            let mut sink = SqliteSink::open(&path, "units").unwrap();
            sink.write(&columns(), &[OutputRecord(vec![Some("1".into()), Some("2".into())])])
                .unwrap();
        }
        let conn = Connection::open(&path).unwrap();
        let lot: String = conn
            .query_row("SELECT LOT FROM units", [], |r| r.get(0))
            .unwrap();
        assert_eq!(lot, "2");
    }
}
