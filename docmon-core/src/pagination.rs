//! Page bookkeeping for a list whose page size follows the viewport height.

/// Page index plus page size over a list of `total` items.
///
/// The page index is kept valid for the current `total` and `per_page`:
/// every setter clamps it to the last page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    per_page: usize,
    total: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new()
    }
}

impl Paginator {
    pub fn new() -> Self {
        Self {
            page: 0,
            per_page: 1,
            total: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// `ceil(total / per_page)`, never less than one.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.per_page).max(1)
    }

    pub fn last_page(&self) -> usize {
        self.page_count() - 1
    }

    /// Half-open `[start, end)` bounds of the current page.
    pub fn slice_bounds(&self) -> (usize, usize) {
        let start = (self.page * self.per_page).min(self.total);
        let end = (start + self.per_page).min(self.total);
        (start, end)
    }

    pub fn items_on_page(&self) -> usize {
        let (start, end) = self.slice_bounds();
        end - start
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.clamp_page();
    }

    /// Zero is treated as one.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.clamp_page();
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        true
    }

    pub fn next_page(&mut self) -> bool {
        if self.page >= self.last_page() {
            return false;
        }
        self.page += 1;
        true
    }

    fn clamp_page(&mut self) {
        self.page = self.page.min(self.last_page());
    }
}
