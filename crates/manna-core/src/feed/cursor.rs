//! Pagination cursor
//!
//! Tracks how far the feed has read into the store's ordered record set.
//! Purely arithmetic; the fetch phase machine in the feed owns the guards
//! against calling it while exhausted or mid-fetch.

/// One fetchable window `[offset, offset + limit)` of the ordered set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

/// Offset/limit cursor over the store, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    offset: usize,
    page_size: usize,
    exhausted: bool,
}

impl PageCursor {
    /// Create a cursor with a fixed page size (must be positive)
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        Self {
            offset: 0,
            page_size,
            exhausted: false,
        }
    }

    /// The window the next fetch should request.
    ///
    /// Callers must not request a window while exhausted or while a fetch
    /// is in flight.
    #[must_use]
    pub const fn next_window(&self) -> PageWindow {
        PageWindow {
            offset: self.offset,
            limit: self.page_size,
        }
    }

    /// Record a settled fetch: offset grows by the count actually received,
    /// and a short page marks the window exhausted.
    pub fn advance(&mut self, received: usize) {
        self.offset += received;
        if received < self.page_size {
            self.exhausted = true;
        }
    }

    /// Restore the initial state for a full reload
    pub fn reset(&mut self) {
        self.offset = 0;
        self.exhausted = false;
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether a fetch has returned fewer than a full page
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_initial_window_starts_at_zero() {
        let cursor = PageCursor::new(9);
        assert_eq!(
            cursor.next_window(),
            PageWindow {
                offset: 0,
                limit: 9
            }
        );
        assert!(!cursor.is_exhausted());
    }

    #[test]
    fn test_advance_moves_offset_by_received_count() {
        let mut cursor = PageCursor::new(9);
        cursor.advance(9);
        assert_eq!(cursor.offset(), 9);
        assert!(!cursor.is_exhausted());

        cursor.advance(9);
        assert_eq!(cursor.next_window().offset, 18);
    }

    #[test]
    fn test_short_page_marks_exhausted() {
        let mut cursor = PageCursor::new(9);
        cursor.advance(9);
        cursor.advance(2);
        assert_eq!(cursor.offset(), 11);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_empty_page_marks_exhausted() {
        let mut cursor = PageCursor::new(9);
        cursor.advance(0);
        assert_eq!(cursor.offset(), 0);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut cursor = PageCursor::new(9);
        cursor.advance(9);
        cursor.advance(3);
        cursor.reset();
        assert_eq!(cursor.offset(), 0);
        assert!(!cursor.is_exhausted());
        assert_eq!(cursor.page_size(), 9);
    }
}
