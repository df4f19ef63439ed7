//! Pagination parameters for walking a collection page by page.
//!
//! Pagination is pushed down to the backend as a limit/offset pair; this
//! module only converts a 1-indexed page number into that pair.

use serde::{Deserialize, Serialize};

/// Parameters for paginating through large result sets.
///
/// This struct specifies which page to retrieve and how many items per page.
/// Pages are 1-indexed (page 1 is the first page).
///
/// # Example
///
/// ```ignore
/// use bookcat_core::page::PaginationParams;
///
/// let params = PaginationParams::new(2, 5);
/// // Retrieves page 2 with 5 items per page
/// // Offset is (2-1) * 5 = 5
/// assert_eq!(params.offset(), 5);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PaginationParams {
    /// The page number (1-indexed).
    pub page: usize,
    /// Number of items per page.
    pub per_page: usize,
}

impl PaginationParams {
    /// Creates new pagination parameters.
    ///
    /// # Arguments
    ///
    /// * `page` - The page number (1-indexed)
    /// * `per_page` - Number of items per page
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Calculates the offset (number of items to skip) for this page.
    ///
    /// This is what backends pass through as the query's skip value.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.per_page
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: 1, per_page: 10 }
    }
}
