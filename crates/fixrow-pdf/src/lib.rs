//! # fixrow-pdf - Positioned Text Fragments from PDF
//!
//! Implements [`fixrow_core::FragmentSource`] on top of `lopdf`: every
//! `Tj`/`TJ`/`'`/`"` show operator of every page becomes one
//! [`fixrow_core::Fragment`] positioned at the text matrix origin.
//!
//! ```rust,no_run
//! use fixrow_core::FragmentSource;
//! use fixrow_pdf::PdfFragmentSource;
//! use std::path::Path;
//!
//! let fragments = PdfFragmentSource::new()
//!     .collect(Path::new("rent-stab-pdfs/2022-DHCR-Staten-Island.pdf"))?;
//! println!("{} fragments", fragments.len());
//! # Ok::<(), fixrow_core::FixrowError>(())
//! ```

pub mod content;
pub mod decode;
pub mod error;
pub mod source;
pub mod text_state;

pub use content::walk_operations;
pub use decode::decode_pdf_string;
pub use error::{PdfError, Result};
pub use source::{PdfFragmentSource, PdfSourceOptions};
pub use text_state::{Matrix, TextState, IDENTITY_MATRIX};
