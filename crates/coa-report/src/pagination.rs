//! Per-section pagination.
//!
//! Every section paginates on its own: page numbers restart at 1 and the final
//! page reserves room for the footer blocks (totals, QC table, signatures,
//! legal warning). Non-final pages carry exactly `rows_per_page` rows, with one
//! exception: when filling every non-final page would leave nothing for the
//! final page, the last non-final page gives up rows so the footer never sits
//! on a page of its own. Exact multiples of `rows_per_page` fall in that band
//! too: 45 rows give `[44, 1]`, not a full page followed by a bare footer.
//!
//! ```text
//! rows  capacity  pages
//!   30   45/34    [30]
//!   50   45/34    [45, 5]
//!   40   45/34    [39, 1]
//!   45   45/34    [44, 1]
//!   90   45/34    [45, 44, 1]
//!   60   45/26    [45, 15]
//! ```

use coa_config::{AstPagination, DiseasePagination};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Row capacities of a section's pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCapacity {
    pub rows_per_page: usize,
    pub rows_on_last_page: usize,
}

impl PageCapacity {
    /// Capacities are clamped so that `1 <= rows_on_last_page <= rows_per_page`.
    pub fn new(rows_per_page: usize, rows_on_last_page: usize) -> Self {
        let rows_per_page = rows_per_page.max(1);
        Self {
            rows_per_page,
            rows_on_last_page: rows_on_last_page.clamp(1, rows_per_page),
        }
    }

    /// Capacity of a disease section, with or without the QC-reference table.
    pub fn for_disease(pagination: &DiseasePagination, has_qc_table: bool) -> Self {
        Self::new(
            pagination.rows_per_page,
            pagination.rows_on_last_page(has_qc_table),
        )
    }

    pub fn for_ast(pagination: &AstPagination) -> Self {
        Self::new(pagination.rows_per_page, pagination.rows_on_last_page)
    }
}

/// One planned page of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSlice {
    /// Zero-based page index within the section.
    pub index: usize,
    pub page_count: usize,
    /// Row range into the section's visible rows.
    pub rows: Range<usize>,
}

impl PageSlice {
    pub fn page_number(&self) -> usize {
        self.index + 1
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.page_count
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Number of pages a section of `visible_rows` rows needs.
pub fn page_count(visible_rows: usize, capacity: PageCapacity) -> usize {
    let mut pages = 1;
    let mut remaining = visible_rows;
    while remaining > capacity.rows_on_last_page {
        remaining = remaining.saturating_sub(capacity.rows_per_page);
        pages += 1;
    }
    pages
}

/// Distribute `visible_rows` rows over pages.
///
/// Zero rows still produce one (empty) page.
pub fn plan(visible_rows: usize, capacity: PageCapacity) -> Vec<PageSlice> {
    let count = page_count(visible_rows, capacity);
    let mut slices = Vec::with_capacity(count);
    let mut start = 0;

    for index in 0..count {
        let is_last = index + 1 == count;
        let len = if is_last {
            visible_rows - start
        } else {
            // Keep at least one row back for the final page.
            capacity
                .rows_per_page
                .min(visible_rows.saturating_sub(start + 1))
        };
        slices.push(PageSlice {
            index,
            page_count: count,
            rows: start..start + len,
        });
        start += len;
    }

    slices
}
