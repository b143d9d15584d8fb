//! Per-pass accumulation of accepted fragments.

use crate::error::{FixrowError, Result};
use crate::types::CandidateEntry;

/// Accepted fragments of the document currently being read.
///
/// Owned by exactly one [`crate::pass::DocumentPass`]; drained when the
/// pass finishes and never shared between documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentBuffer {
    entries: Vec<CandidateEntry>,
}

impl FragmentBuffer {
    #[inline]
    #[must_use = "buffer is created but not used"]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check the buffer is ready for a new document.
    ///
    /// # Errors
    /// Returns [`FixrowError::BufferNotEmpty`] when fragments of a previous
    /// document are still held.
    pub fn ensure_empty(&self) -> Result<()> {
        if self.entries.is_empty() {
            Ok(())
        } else {
            Err(FixrowError::BufferNotEmpty {
                pending: self.entries.len(),
            })
        }
    }

    #[inline]
    pub fn push(&mut self, entry: CandidateEntry) {
        self.entries.push(entry);
    }

    /// Drain every buffered entry, leaving the buffer empty
    #[inline]
    #[must_use = "drained entries are returned but not used"]
    pub fn take(&mut self) -> Vec<CandidateEntry> {
        std::mem::take(&mut self.entries)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    #[must_use = "returns the number of buffered entries"]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use = "returns whether the buffer is empty"]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_empty_on_fresh_buffer() {
        assert!(FragmentBuffer::new().ensure_empty().is_ok());
    }

    #[test]
    fn test_ensure_empty_fails_with_pending() {
        let mut buffer = FragmentBuffer::new();
        buffer.push(CandidateEntry::new("a", 25.0, 100.0));
        buffer.push(CandidateEntry::new("b", 75.0, 100.0));
        match buffer.ensure_empty() {
            Err(FixrowError::BufferNotEmpty { pending }) => assert_eq!(pending, 2),
            other => panic!("expected BufferNotEmpty, got {other:?}"),
        }
    }

    #[test]
    fn test_take_drains() {
        let mut buffer = FragmentBuffer::new();
        buffer.push(CandidateEntry::new("a", 25.0, 100.0));
        let drained = buffer.take();
        assert_eq!(drained.len(), 1);
        assert!(buffer.is_empty());
        assert!(buffer.ensure_empty().is_ok());
    }

    #[test]
    fn test_clear() {
        let mut buffer = FragmentBuffer::new();
        buffer.push(CandidateEntry::new("a", 25.0, 100.0));
        buffer.clear();
        assert_eq!(buffer.len(), 0);
    }
}
