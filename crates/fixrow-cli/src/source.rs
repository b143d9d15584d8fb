//! Picks the fragment source from the document's extension.

use fixrow_core::{FixrowError, Fragment, FragmentSource, JsonFragmentSource};
use fixrow_pdf::{PdfFragmentSource, PdfSourceOptions};
use std::path::Path;

/// PDF documents through lopdf, `.json` fragment dumps as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoSource {
    pdf: PdfFragmentSource,
    json: JsonFragmentSource,
}

impl AutoSource {
    pub const fn new(options: PdfSourceOptions) -> Self {
        Self {
            pdf: PdfFragmentSource::with_options(options),
            json: JsonFragmentSource,
        }
    }

    fn backend(&self, locator: &str) -> Option<&dyn FragmentSource> {
        let path = Path::new(locator);
        if self.json.can_handle(path) {
            Some(&self.json)
        } else if self.pdf.can_handle(path) {
            Some(&self.pdf)
        } else {
            None
        }
    }
}

impl FragmentSource for AutoSource {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["pdf", "json"]
    }

    fn visit_bytes(
        &self,
        data: &[u8],
        locator: &str,
        visitor: &mut dyn FnMut(&Fragment),
    ) -> fixrow_core::Result<()> {
        let backend = self.backend(locator).ok_or_else(|| {
            FixrowError::extraction(locator, "unsupported file type (expected .pdf or .json)")
        })?;
        backend.visit_bytes(data, locator, visitor)
    }
}
