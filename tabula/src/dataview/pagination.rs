//! Page arithmetic.

use std::ops::Range;

/// Number of pages for `len` rows: never less than one.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Row range shown on a zero-based page.
pub fn page_bounds(len: usize, page_size: usize, page_index: usize) -> Range<usize> {
    let start = page_index.saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

/// "Showing 11-20 of 23" information for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    /// First row shown, 1-based (0 when there are no rows)
    pub first: usize,
    /// Last row shown, 1-based
    pub last: usize,
    pub total: usize,
}

impl PageRange {
    pub fn new(bounds: Range<usize>, total: usize) -> Self {
        if bounds.is_empty() {
            return Self {
                first: 0,
                last: 0,
                total,
            };
        }
        Self {
            first: bounds.start + 1,
            last: bounds.end,
            total,
        }
    }
}

impl std::fmt::Display for PageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Showing {}-{} of {}", self.first, self.last, self.total)
    }
}
