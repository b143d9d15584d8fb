//! Error types for PDF fragment extraction.

use fixrow_core::FixrowError;
use thiserror::Error;

/// Error type for PDF extraction
#[derive(Error, Debug)]
pub enum PdfError {
    /// The file is not a readable PDF
    #[error("Failed to load PDF {locator}: {source}")]
    Load {
        locator: String,
        #[source]
        source: lopdf::Error,
    },

    /// A page's content stream could not be read or parsed
    #[error("Failed to read content of page {page} in {locator}: {source}")]
    PageContent {
        locator: String,
        page: u32,
        #[source]
        source: lopdf::Error,
    },
}

impl PdfError {
    /// Document the error refers to
    #[must_use = "returns the document locator"]
    pub fn locator(&self) -> &str {
        match self {
            Self::Load { locator, .. } | Self::PageContent { locator, .. } => locator,
        }
    }
}

impl From<PdfError> for FixrowError {
    fn from(err: PdfError) -> Self {
        Self::extraction(err.locator().to_string(), &err)
    }
}

/// Type alias for [`Result<T, PdfError>`].
pub type Result<T> = std::result::Result<T, PdfError>;
