use std::ops::Range;

/// Pagination arithmetic over a flat list of `total_items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageModel {
    total_items: usize,
    page_size: usize,
}

impl PageModel {
    pub(crate) fn new(total_items: usize, page_size: usize) -> Self {
        Self {
            total_items,
            page_size: page_size.max(1),
        }
    }

    pub(crate) fn page_size(&self) -> usize {
        self.page_size
    }

    pub(crate) fn total_items(&self) -> usize {
        self.total_items
    }

    pub(crate) fn page_count(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    pub(crate) fn page_start(&self, page: usize) -> usize {
        page * self.page_size
    }

    /// Number of items on `page`; 0 for pages past the end.
    pub(crate) fn page_len(&self, page: usize) -> usize {
        self.page_range(page).len()
    }

    pub(crate) fn page_range(&self, page: usize) -> Range<usize> {
        let start = self.page_start(page).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// Global index -> `(page, offset)`.
    pub(crate) fn locate(&self, index: usize) -> (usize, usize) {
        (index / self.page_size, index % self.page_size)
    }

    pub(crate) fn index_of(&self, page: usize, offset: usize) -> usize {
        page * self.page_size + offset
    }

    /// Cyclic page browsing: negative pages land on the last page, pages past
    /// the end land on the first.
    pub(crate) fn wrap_page(&self, page: isize) -> usize {
        let count = self.page_count();
        if count == 0 {
            return 0;
        }
        if page < 0 {
            count - 1
        } else if page as usize >= count {
            0
        } else {
            page as usize
        }
    }

    pub(crate) fn clamp_offset(&self, page: usize, offset: usize) -> usize {
        offset.min(self.page_len(page).saturating_sub(1))
    }
}
