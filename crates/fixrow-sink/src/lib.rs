//! # fixrow-sink - Tabular Output
//!
//! [`fixrow_core::TabularSink`] implementations: CSV files (any
//! [`std::io::Write`]) and, with the default `sqlite` feature, a SQLite
//! table.

pub mod csv_sink;
pub mod error;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use csv_sink::CsvSink;
pub use error::{Result, SinkError};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteSink, DEFAULT_TABLE};
