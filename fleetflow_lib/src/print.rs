//! Splitting line items into printable pages.
//!
//! An invoice or credit note prints as a run of pages with at most
//! [`DEFAULT_ITEMS_PER_PAGE`] rows each. Every page repeats the document
//! header; the totals block only goes on the last page. An empty document
//! still prints one page.

use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Partitions `items` into consecutive chunks of at most `page_size`.
///
/// Always returns at least one page; empty input yields a single empty
/// page. A `page_size` of zero is treated as one.
pub fn paginate<T: Clone>(items: &[T], page_size: usize) -> Vec<Vec<T>> {
    if items.is_empty() {
        return vec![Vec::new()];
    }
    items
        .chunks(page_size.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// One printable page, with what a renderer needs to place headers and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintPage<T> {
    /// 1-based.
    pub number: usize,
    pub total_pages: usize,
    pub items: Vec<T>,
    pub is_last: bool,
}

impl<T> PrintPage<T> {
    /// "Page 2 of 3".
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.number, self.total_pages)
    }
}

pub fn print_pages<T: Clone>(items: &[T], page_size: usize) -> Vec<PrintPage<T>> {
    let pages = paginate(items, page_size);
    let total_pages = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(i, items)| PrintPage {
            number: i + 1,
            total_pages,
            items,
            is_last: i + 1 == total_pages,
        })
        .collect()
}
