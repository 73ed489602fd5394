//! Scrollback storage
//!
//! Bounded deque of log entries, newest first. Every entry owns its raw
//! codepoint text and a derived set of wrapped display lines; the total
//! display-line count is capped by evicting whole entries from the old
//! end. Wrapped lines never own text — they address a range of their
//! entry and are rebuilt whenever the wrap width changes.

use std::collections::VecDeque;

use log::{debug, trace};

use crate::text::wrap;

/// Default display-line cap for the log.
pub const DEFAULT_MAX_LINES: usize = 1024;

/// `draw_y` value meaning "not placed by the last layout pass".
pub const NOT_DRAWN: i32 = -1;

/// Stable identity of an entry, monotonically increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(pub u64);

/// Whether an entry came from the prompt or from program output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Input,
    Output,
}

/// One display-width-bounded segment of an entry's text.
///
/// `start`/`end` are half-open codepoint offsets into the owning entry;
/// `row` is the segment's reading-order index within the entry. `draw_y`
/// is transient: the layout pass stamps the pixel row of every visible
/// line and resets the rest to [`NOT_DRAWN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedLine {
    pub start: usize,
    pub end: usize,
    pub row: usize,
    pub draw_y: i32,
}

/// One logical line of input or output text plus its wrapped lines.
#[derive(Debug)]
pub struct Entry {
    pub id: EntryId,
    pub kind: EntryKind,
    raw: Vec<char>,
    lines: Vec<WrappedLine>,
}

impl Entry {
    fn new(id: EntryId, kind: EntryKind, raw: Vec<char>) -> Self {
        Self { id, kind, raw, lines: Vec::new() }
    }

    /// Raw text, immutable after creation.
    pub fn raw(&self) -> &[char] {
        &self.raw
    }

    pub fn lines(&self) -> &[WrappedLine] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [WrappedLine] {
        &mut self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The text a wrapped line addresses.
    pub fn line_text(&self, line: &WrappedLine) -> &[char] {
        &self.raw[line.start..line.end]
    }

    /// Rebuild the wrapped lines for a new column budget, invalidating
    /// any previously handed-out offsets and draw positions.
    pub fn rewrap(&mut self, column_width_px: i32, glyph_advance_px: i32) {
        self.lines.clear();
        for (row, (start, end)) in wrap(&self.raw, column_width_px, glyph_advance_px)
            .into_iter()
            .enumerate()
        {
            self.lines.push(WrappedLine { start, end, row, draw_y: NOT_DRAWN });
        }
    }
}

/// Ordered, bounded collection of entries (newest at the front).
pub struct ScrollbackStore {
    entries: VecDeque<Entry>,
    total_lines: usize,
    max_lines: usize,
    next_id: u64,
}

impl ScrollbackStore {
    pub fn new(max_lines: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            total_lines: 0,
            max_lines,
            next_id: 0,
        }
    }

    /// Newest-first iteration.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.entries.iter_mut()
    }

    /// Oldest-first iteration (reading order for clipboard text).
    pub fn entries_oldest_first(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current total display-line count across all entries.
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Create an entry at the front, wrap it for the given budget, then
    /// evict whole entries from the back until the line cap holds again.
    pub fn append(
        &mut self,
        kind: EntryKind,
        text: Vec<char>,
        column_width_px: i32,
        glyph_advance_px: i32,
    ) -> EntryId {
        self.next_id += 1;
        let id = EntryId(self.next_id);
        let mut entry = Entry::new(id, kind, text);
        entry.rewrap(column_width_px, glyph_advance_px);
        self.total_lines += entry.line_count();
        trace!(
            "append {:?} entry {:?}: {} wrapped line(s), total {}",
            kind,
            id,
            entry.line_count(),
            self.total_lines
        );
        self.entries.push_front(entry);
        self.evict();
        id
    }

    /// Re-wrap every entry for a new column budget and recompute the
    /// line total from scratch. O(total characters), invoked on resize.
    pub fn re_wrap(&mut self, column_width_px: i32, glyph_advance_px: i32) {
        self.total_lines = 0;
        for entry in self.entries.iter_mut() {
            entry.rewrap(column_width_px, glyph_advance_px);
            self.total_lines += entry.line_count();
        }
        self.evict();
    }

    /// Drop everything. An empty store is a valid terminal state.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_lines = 0;
    }

    /// Change the line cap and evict immediately if it shrank.
    pub fn set_max_lines(&mut self, max_lines: usize) {
        self.max_lines = max_lines;
        self.evict();
    }

    /// Evict whole entries, oldest first, while over the cap. The newest
    /// entry is never evicted, so one oversized entry may stand alone.
    fn evict(&mut self) {
        while self.total_lines > self.max_lines && self.entries.len() > 1 {
            if let Some(old) = self.entries.pop_back() {
                self.total_lines -= old.line_count();
                debug!(
                    "evicted entry {:?} ({} line(s)), total now {}",
                    old.id,
                    old.line_count(),
                    self.total_lines
                );
            }
        }
    }
}
