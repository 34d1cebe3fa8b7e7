//! Pagination.
//!
//! Slices an ordered match set into a page window and reports page-count
//! metadata. Pages are numbered from zero.

use std::ops::Range;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{Result, SiftError};

/// A requested page: zero-based index and a non-zero size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    index: usize,
    size: usize,
}

impl PageRequest {
    /// Creates a page request.
    ///
    /// Fails with [`SiftError::InvalidPage`] when `size` is zero.
    pub fn new(index: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(SiftError::InvalidPage {
                reason: "page size must be at least 1",
            });
        }
        Ok(PageRequest { index, size })
    }

    /// The first page of the given size.
    pub fn first(size: usize) -> Result<Self> {
        PageRequest::new(0, size)
    }

    /// Zero-based page index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Records per page.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// The computed window over a match set of known size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// Offsets into the match set covered by the page.
    pub range: Range<usize>,
    /// Number of matches before pagination.
    pub total_size: usize,
    /// `ceil(total_size / page_size)`.
    pub total_page_count: usize,
    /// Zero-based page index.
    pub page_index: usize,
    /// Records per page.
    pub page_size: usize,
}

impl PageWindow {
    /// Computes the window for `total` matches.
    ///
    /// A page past the end is an empty window, not an error. Without a page
    /// request the whole match set is a single page.
    ///
    /// ```
    /// use sift::{PageRequest, PageWindow};
    ///
    /// let window = PageWindow::compute(25, Some(PageRequest::new(2, 10).unwrap()));
    /// assert_eq!(window.range, 20..25);
    /// assert_eq!(window.total_page_count, 3);
    ///
    /// let past_end = PageWindow::compute(25, Some(PageRequest::new(7, 10).unwrap()));
    /// assert!(past_end.range.is_empty());
    /// ```
    pub fn compute(total: usize, page: Option<PageRequest>) -> Self {
        let Some(page) = page else {
            return PageWindow {
                range: 0..total,
                total_size: total,
                total_page_count: usize::from(total > 0),
                page_index: 0,
                page_size: total,
            };
        };

        let start = page.index.saturating_mul(page.size).min(total);
        let end = start.saturating_add(page.size).min(total);
        PageWindow {
            range: start..end,
            total_size: total,
            total_page_count: total.div_ceil(page.size),
            page_index: page.index,
            page_size: page.size,
        }
    }
}

/// One page of query results.
///
/// Holds references to every match; [`data`](QueryResult::data) is a view of
/// the requested window, no records are copied.
#[derive(Debug, Clone)]
pub struct QueryResult<'a, T> {
    matches: Vec<&'a T>,
    window: PageWindow,
}

impl<'a, T> QueryResult<'a, T> {
    /// Records on the requested page.
    pub fn data(&self) -> &[&'a T] {
        &self.matches[self.window.range.clone()]
    }

    /// Consumes the result, keeping only the records on the requested page.
    pub fn into_data(mut self) -> Vec<&'a T> {
        self.matches.truncate(self.window.range.end);
        self.matches.drain(..self.window.range.start);
        self.matches
    }

    /// Number of matches before pagination.
    pub fn total_size(&self) -> usize {
        self.window.total_size
    }

    /// Number of pages at the requested page size.
    pub fn total_page_count(&self) -> usize {
        self.window.total_page_count
    }

    /// Zero-based index of this page.
    pub fn page_index(&self) -> usize {
        self.window.page_index
    }

    /// Requested page size.
    pub fn page_size(&self) -> usize {
        self.window.page_size
    }

    /// The page window.
    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    /// Returns `true` if this page holds no records.
    pub fn is_empty(&self) -> bool {
        self.window.range.is_empty()
    }
}

impl<T: Serialize> Serialize for QueryResult<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("QueryResult", 5)?;
        state.serialize_field("data", self.data())?;
        state.serialize_field("totalSize", &self.window.total_size)?;
        state.serialize_field("totalPageCount", &self.window.total_page_count)?;
        state.serialize_field("pageIndex", &self.window.page_index)?;
        state.serialize_field("pageSize", &self.window.page_size)?;
        state.end()
    }
}

/// Wraps an ordered match set in a page window.
pub fn paginate<T>(matches: Vec<&T>, page: Option<PageRequest>) -> QueryResult<'_, T> {
    let window = PageWindow::compute(matches.len(), page);
    QueryResult { matches, window }
}
