//! Fixed-size pagination over the filtered view.
//!
//! States are `1..=total_pages`; `previous` is guarded at 1, `next` at the
//! last page, and `jump_to` rejects anything outside the range.

use core::ops::Range;

use serde::Serialize;
use shortlist_core::{DomainError, DomainResult};

/// Products per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// A page size of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size)
    }

    /// Index range of the current page, clamped to `total_items`.
    pub fn page_range(&self, total_items: usize) -> Range<usize> {
        let start = (self.current_page - 1)
            .saturating_mul(self.page_size)
            .min(total_items);
        let end = start.saturating_add(self.page_size).min(total_items);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.page_range(items.len())]
    }

    /// Back to page 1 (filters changed).
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn jump_to(&mut self, page: usize, total_items: usize) -> DomainResult<()> {
        let total_pages = self.total_pages(total_items);
        if page == 0 || page > total_pages {
            return Err(DomainError::page_out_of_range(page, total_pages));
        }
        self.current_page = page;
        Ok(())
    }

    /// Returns whether the page changed.
    pub fn previous(&mut self) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Returns whether the page changed.
    pub fn next(&mut self, total_items: usize) -> bool {
        if self.current_page >= self.total_pages(total_items) {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Page-number controls for `total_items`, or `None` when everything fits
    /// on a single page.
    pub fn strip(&self, total_items: usize) -> Option<PageStrip> {
        let total_pages = self.total_pages(total_items);
        if total_pages <= 1 {
            return None;
        }

        let current = self.current_page;
        let mut buttons = Vec::with_capacity(total_pages + 2);
        buttons.push(PageButton {
            kind: PageButtonKind::Previous,
            label: "←".to_string(),
            target: current.saturating_sub(1),
            active: false,
            disabled: current == 1,
        });
        buttons.extend((1..=total_pages).map(|page| PageButton {
            kind: PageButtonKind::Number,
            label: page.to_string(),
            target: page,
            active: page == current,
            disabled: false,
        }));
        buttons.push(PageButton {
            kind: PageButtonKind::Next,
            label: "→".to_string(),
            target: current + 1,
            active: false,
            disabled: current >= total_pages,
        });

        Some(PageStrip {
            total_pages,
            current_page: current,
            buttons,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageButtonKind {
    Previous,
    Number,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageButton {
    pub kind: PageButtonKind,
    pub label: String,
    pub target: usize,
    pub active: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageStrip {
    pub total_pages: usize,
    pub current_page: usize,
    pub buttons: Vec<PageButton>,
}
