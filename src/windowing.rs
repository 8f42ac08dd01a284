//! Pagination over an ordered image list
//!
//! The page size follows the viewport size class. The stored page is always
//! clamped into range when the list shrinks; out-of-range navigation is
//! rejected rather than reported as an error.

use serde::Serialize;

use crate::types::{Image, PuzzleId, ids_of};
use crate::viewport::SizeClass;

/// Number of images shown per page for a size class.
pub const fn page_size(size_class: SizeClass) -> usize {
    match size_class {
        SizeClass::Lg => 8,
        SizeClass::Md => 6,
        SizeClass::Sm => 4,
        SizeClass::Xs => 2,
    }
}

/// `ceil(len / page_size)`; zero for an empty list.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Clamp a 1-based page into `[1, max(total_pages, 1)]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.min(total_pages.max(1)).max(1)
}

/// The slice of images on the active page
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<'a> {
    pub images: &'a [Image],
    /// Active page after clamping (1-based)
    pub page: usize,
    /// Zero when there are no images ("no results", no pagination control)
    pub total_pages: usize,
}

impl PageSlice<'_> {
    pub fn ids(&self) -> Vec<PuzzleId> {
        ids_of(self.images)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Compute the visible slice for `current_page`, clamping it into range.
pub fn visible_slice(images: &[Image], size_class: SizeClass, current_page: usize) -> PageSlice<'_> {
    let size = page_size(size_class);
    let total = total_pages(images.len(), size);
    let page = clamp_page(current_page, total);
    let start = ((page - 1) * size).min(images.len());
    let end = (start + size).min(images.len());

    PageSlice {
        images: &images[start..end],
        page,
        total_pages: total,
    }
}

/// Owner of the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pager {
    current_page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self { current_page: 1 }
    }
}

impl Pager {
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Move to `page` if it lies in `[1, total_pages]`.
    ///
    /// Returns whether the navigation was accepted; rejected navigation
    /// leaves the pager untouched.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) -> bool {
        if page == 0 || page > total_pages {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Bring the stored page back into range after the list changed.
    pub fn clamp(&mut self, total_pages: usize) -> usize {
        self.current_page = clamp_page(self.current_page, total_pages);
        self.current_page
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }
}
