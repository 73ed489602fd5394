//! Scroll offset tracking
//!
//! The offset counts display lines scrolled up from the bottom of the
//! log; 0 means pinned to the newest line. Every mutation of the total
//! line count (append, eviction, re-wrap) must re-clamp the offset, or a
//! stale offset would address rows that no longer exist.

/// Scroll state in display lines from the bottom.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollPosition {
    offset: usize,
}

impl ScrollPosition {
    pub fn new() -> Self {
        Self { offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Scroll by a signed number of lines, clamped to
    /// `[0, max(0, total - 1)]`.
    pub fn scroll_by(&mut self, delta: i32, total_lines: usize) {
        let target = self.offset as i64 + delta as i64;
        let max = total_lines.saturating_sub(1) as i64;
        self.offset = target.clamp(0, max) as usize;
    }

    /// One page is half the visible row count, rounding down.
    pub fn page_size(viewport_rows: usize) -> usize {
        viewport_rows / 2
    }

    /// Jump back to the newest line.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Re-clamp after the total line count changed.
    pub fn clamp(&mut self, total_lines: usize) {
        let max = total_lines.saturating_sub(1);
        if self.offset > max {
            self.offset = max;
        }
    }

    /// Rows visible at the current offset, counted from the newest
    /// line = row 1 upward: `first..=last` inclusive.
    pub fn visible_window(&self, viewport_rows: usize) -> (usize, usize) {
        (self.offset + 1, self.offset + viewport_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_pinned_to_bottom() {
        assert_eq!(ScrollPosition::new().offset(), 0);
    }

    #[test]
    fn test_scroll_by_clamps_low() {
        let mut s = ScrollPosition::new();
        s.scroll_by(-5, 10);
        assert_eq!(s.offset(), 0);
    }

    #[test]
    fn test_scroll_by_clamps_high() {
        let mut s = ScrollPosition::new();
        s.scroll_by(100, 10);
        assert_eq!(s.offset(), 9);
    }

    #[test]
    fn test_scroll_by_on_empty_log() {
        let mut s = ScrollPosition::new();
        s.scroll_by(3, 0);
        assert_eq!(s.offset(), 0);
        s.scroll_by(-3, 0);
        assert_eq!(s.offset(), 0);
    }

    #[test]
    fn test_clamp_after_eviction() {
        let mut s = ScrollPosition::new();
        s.scroll_by(50, 100);
        assert_eq!(s.offset(), 50);
        // Eviction shrank the log under the offset.
        s.clamp(20);
        assert_eq!(s.offset(), 19);
        s.clamp(0);
        assert_eq!(s.offset(), 0);
    }

    #[test]
    fn test_page_size_rounds_down() {
        assert_eq!(ScrollPosition::page_size(25), 12);
        assert_eq!(ScrollPosition::page_size(1), 0);
    }

    #[test]
    fn test_visible_window_rows() {
        let mut s = ScrollPosition::new();
        assert_eq!(s.visible_window(10), (1, 10));
        s.scroll_by(4, 100);
        assert_eq!(s.visible_window(10), (5, 14));
    }
}
