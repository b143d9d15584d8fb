//! lopdf-backed [`FragmentSource`].

use crate::content::walk_operations;
use crate::error::PdfError;
use fixrow_core::{Fragment, FragmentSource};
use lopdf::content::Content;
use lopdf::Document;
use log::{debug, trace};

/// Options for PDF extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PdfSourceOptions {
    /// Stop after this many pages (`None` = all pages)
    pub max_pages: Option<usize>,
}

/// Reads fragments from every page of a PDF, in page order and content
/// stream order within a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PdfFragmentSource {
    options: PdfSourceOptions,
}

impl PdfFragmentSource {
    #[inline]
    #[must_use = "source is created but not used"]
    pub const fn new() -> Self {
        Self {
            options: PdfSourceOptions { max_pages: None },
        }
    }

    #[inline]
    #[must_use = "source is created but not used"]
    pub const fn with_options(options: PdfSourceOptions) -> Self {
        Self { options }
    }

    /// Walk an already loaded document.
    ///
    /// # Errors
    /// Returns [`PdfError::PageContent`] for a page whose content stream
    /// cannot be read or decoded.
    pub fn walk_document(
        &self,
        doc: &Document,
        locator: &str,
        visitor: &mut dyn FnMut(&Fragment),
    ) -> crate::Result<usize> {
        let pages = doc.get_pages();
        let limit = self.options.max_pages.unwrap_or(usize::MAX);
        let mut total = 0;

        for (&page, &page_id) in pages.iter().take(limit) {
            let page_error = |source| PdfError::PageContent {
                locator: locator.to_string(),
                page,
                source,
            };
            let raw = doc.get_page_content(page_id).map_err(page_error)?;
            let content = Content::decode(&raw).map_err(page_error)?;
            let emitted = walk_operations(&content.operations, visitor);
            trace!("{locator} page {page}: {emitted} fragment(s)");
            total += emitted;
        }

        debug!(
            "{locator}: {total} fragment(s) from {} page(s)",
            pages.len().min(limit)
        );
        Ok(total)
    }
}

impl FragmentSource for PdfFragmentSource {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["pdf"]
    }

    fn visit_bytes(
        &self,
        data: &[u8],
        locator: &str,
        visitor: &mut dyn FnMut(&Fragment),
    ) -> fixrow_core::Result<()> {
        let doc = Document::load_mem(data).map_err(|source| PdfError::Load {
            locator: locator.to_string(),
            source,
        })?;
        self.walk_document(&doc, locator, visitor)?;
        Ok(())
    }
}
