//! Offset pagination helpers shared by listing queries.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Page request with explicit defaults filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Pages are 1-based; limits are clamped to `1..=MAX_PAGE_LIMIT`.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(DEFAULT_PAGE_LIMIT)
                .clamp(1, MAX_PAGE_LIMIT),
        }
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            offset: u64::from(self.page - 1) * u64::from(self.limit),
            limit: self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Offset/limit pair handed to the persistent store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u32,
}

/// Listing result returned to callers and stored in the query cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub has_more: bool,
}

impl<T> ListEnvelope<T> {
    pub fn from_window(data: Vec<T>, total: u64, window: PageWindow) -> Self {
        let seen = window.offset.saturating_add(data.len() as u64);
        Self {
            has_more: seen < total,
            data,
            total,
        }
    }

    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            has_more: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_defaults() {
        let page = PageRequest::new(None, None);
        assert_eq!(page, PageRequest { page: 1, limit: 20 });
        assert_eq!(page.window(), PageWindow { offset: 0, limit: 20 });
    }

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 1 });
        assert_eq!(PageRequest::new(Some(3), Some(500)).limit, MAX_PAGE_LIMIT);
    }

    #[test]
    fn window_offsets_by_page() {
        let window = PageRequest::new(Some(3), Some(10)).window();
        assert_eq!(window, PageWindow { offset: 20, limit: 10 });
    }

    #[test]
    fn has_more_tracks_remaining_rows() {
        let window = PageRequest::new(Some(1), Some(2)).window();
        let envelope = ListEnvelope::from_window(vec![1, 2], 3, window);
        assert!(envelope.has_more);

        let window = PageRequest::new(Some(2), Some(2)).window();
        let envelope = ListEnvelope::from_window(vec![3], 3, window);
        assert!(!envelope.has_more);
    }
}
