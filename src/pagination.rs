use crate::types::Page;

pub const DEFAULT_NEAR_TAIL: usize = 5;

/// Cumulative pagination state for one feed.
///
/// `page` is the next page to request. Items are kept in server order and are
/// not deduplicated across overlapping pages. The cursor trusts its caller:
/// appending after `more_available` turned false is not rejected.
#[derive(Debug, Clone)]
pub struct Cursor<T> {
    page: u32,
    total_pages: Option<u32>,
    items: Vec<T>,
    more_available: bool,
}

impl<T> Default for Cursor<T> {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: None,
            items: Vec::new(),
            more_available: true,
        }
    }
}

impl<T> Cursor<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn append_page(&mut self, page: Page<T>) {
        self.items.extend(page.items);
        self.total_pages = page.total_pages;
        self.page += 1;
        self.more_available = match self.total_pages {
            Some(total) => self.page <= total,
            None => true,
        };
    }

    /// True when `index` is within `threshold` of the tail and another page exists
    pub fn should_load_more(&self, index: usize, threshold: usize) -> bool {
        self.more_available && index >= self.items.len().saturating_sub(threshold)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn more_available(&self) -> bool {
        self.more_available
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
