//! Document catalog: ordered `(tag, locator)` pairs driving one pass each.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory of the built-in catalog, relative to the working directory
pub const DEFAULT_PDF_DIR: &str = "./rent-stab-pdfs";

const BOROUGHS: [(&str, &str); 5] = [
    ("1", "Manhattan"),
    ("2", "Bronx"),
    ("3", "Brooklyn"),
    ("4", "Queens"),
    ("5", "Staten-Island"),
];

/// One document to process
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Value injected into the tag slot of every row of this document
    pub tag: String,
    #[serde(rename = "path")]
    pub locator: PathBuf,
}

impl CatalogEntry {
    #[inline]
    #[must_use = "returns a new CatalogEntry"]
    pub fn new(tag: impl Into<String>, locator: impl Into<PathBuf>) -> Self {
        Self {
            tag: tag.into(),
            locator: locator.into(),
        }
    }
}

/// Ordered list of documents; output follows this order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentCatalog {
    entries: Vec<CatalogEntry>,
}

impl DocumentCatalog {
    #[inline]
    #[must_use = "returns a new catalog"]
    pub const fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// The five 2022 DHCR borough lists under `dir`, tagged 1-5
    #[must_use = "returns the borough catalog"]
    pub fn boroughs(dir: &Path) -> Self {
        let entries = BOROUGHS
            .iter()
            .map(|(tag, name)| CatalogEntry::new(*tag, dir.join(format!("2022-DHCR-{name}.pdf"))))
            .collect();
        Self { entries }
    }

    /// Keep only entries whose tag is in `tags`; an empty filter keeps all
    #[must_use = "returns the filtered catalog"]
    pub fn only(self, tags: &[String]) -> Self {
        if tags.is_empty() {
            return self;
        }
        Self {
            entries: self
                .entries
                .into_iter()
                .filter(|e| tags.contains(&e.tag))
                .collect(),
        }
    }

    #[inline]
    #[must_use = "returns the catalog entries"]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    #[inline]
    #[must_use = "returns the number of entries"]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use = "returns whether the catalog is empty"]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borough_catalog() {
        let catalog = DocumentCatalog::boroughs(Path::new(DEFAULT_PDF_DIR));
        assert_eq!(catalog.len(), 5);
        let first = &catalog.entries()[0];
        assert_eq!(first.tag, "1");
        assert_eq!(
            first.locator,
            Path::new("./rent-stab-pdfs/2022-DHCR-Manhattan.pdf")
        );
        assert!(catalog.entries()[4]
            .locator
            .ends_with("2022-DHCR-Staten-Island.pdf"));
    }

    #[test]
    fn test_only_filter_keeps_order() {
        let catalog = DocumentCatalog::boroughs(Path::new("pdfs"))
            .only(&["5".to_string(), "2".to_string()]);
        let tags: Vec<&str> = catalog.entries().iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["2", "5"]);
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        let catalog = DocumentCatalog::boroughs(Path::new("pdfs")).only(&[]);
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn test_entry_json_uses_path_key() {
        let entry = CatalogEntry::new("5", "a.pdf");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"tag":"5","path":"a.pdf"}"#);
    }
}
