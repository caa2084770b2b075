// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page source abstraction consumed by the structure passes.

use docsplit_core::Line;
use docsplit_core::error::Result;

/// A standalone document holding a copied page range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRangeCopy {
    /// Serialised document bytes. Empty when `page_count` is zero.
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl PageRangeCopy {
    pub fn empty() -> Self {
        Self {
            bytes: Vec::new(),
            page_count: 0,
        }
    }
}

/// Read-only access to a paginated document.
///
/// Page indexes are 0-based. Implementations never mutate the underlying
/// document; copies are independent documents.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Lines on a page in reading order.
    fn lines(&self, page_index: usize) -> Result<Vec<Line>>;

    /// Page height in the same units as [`Line::y_position`].
    fn page_height(&self, page_index: usize) -> Result<f64>;

    /// Copy pages `start..=end` into a new document. An inverted range yields
    /// an empty copy.
    fn copy_page_range(&self, start: usize, end: usize) -> Result<PageRangeCopy>;

    /// Index of the last page, or `None` for an empty document.
    fn last_page(&self) -> Option<usize> {
        self.page_count().checked_sub(1)
    }
}
