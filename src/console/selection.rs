//! Drag selection mapping
//!
//! Converts a rectangular drag gesture into per-row highlight rects
//! snapped to the character/line grid, and converts those rects back
//! into clipboard text by intersecting them with the laid-out wrapped
//! lines. Coordinates are viewport-relative pixels; a line participates
//! only if the last layout pass placed it (`draw_y != NOT_DRAWN`).

use crate::drawing::{snap_to_max, snap_to_min, Point, Rect};

use super::scrollback::{ScrollbackStore, NOT_DRAWN};

/// Mouse drag state, owner thread only.
///
/// `begin` anchors both endpoints so a click with no motion is a valid
/// (empty) single-row selection; motion events move only the free end.
#[derive(Debug, Default)]
pub struct SelectionState {
    start: Option<Point>,
    end: Option<Point>,
    dragging: bool,
}

impl SelectionState {
    pub fn begin(&mut self, p: Point) {
        self.start = Some(p);
        self.end = Some(p);
        self.dragging = true;
    }

    pub fn update(&mut self, p: Point) {
        if self.dragging {
            self.end = Some(p);
        }
    }

    pub fn finish(&mut self) {
        self.dragging = false;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Anchor and free end of the current selection, if any.
    pub fn range(&self) -> Option<(Point, Point)> {
        Some((self.start?, self.end?))
    }
}

/// Highlight rects for a drag from `start` to `end`.
///
/// A drag spanning at most one line height produces a single rect whose
/// horizontal bounds are the snapped min/max of both points. Taller
/// drags produce one rect per covered row: the first row keeps the upper
/// point's snapped left edge, intermediate rows span the full viewport,
/// and the last row's width is governed by the lower point's x — which
/// is the drag start when selecting upward.
pub fn selection_rects(
    start: Point,
    end: Point,
    char_width_px: i32,
    line_height_px: i32,
    viewport_width_px: i32,
) -> Vec<Rect> {
    let (top_point, bottom_point) = if end.y < start.y { (end, start) } else { (start, end) };

    let top = snap_to_min(top_point.y, line_height_px);
    let bottom = snap_to_max(bottom_point.y, line_height_px);
    let single_row = bottom_point.y - top_point.y <= line_height_px;

    if single_row {
        let left = snap_to_min(start.x.min(end.x), char_width_px);
        let right = snap_to_max(start.x.max(end.x), char_width_px);
        return vec![Rect::new(left, top, right - left, line_height_px)];
    }

    let left = snap_to_min(top_point.x, char_width_px);
    let right = snap_to_max(bottom_point.x, char_width_px);
    let rows = ((bottom - top) as f32 / line_height_px as f32).ceil() as i32;

    let mut rects = Vec::with_capacity(rows as usize);
    rects.push(Rect::new(left, top, viewport_width_px, line_height_px));
    for i in 1..rows {
        rects.push(Rect::new(
            0,
            top + i * line_height_px,
            viewport_width_px,
            line_height_px,
        ));
    }
    // The last row only reaches the lower point's column.
    if let Some(last) = rects.last_mut() {
        last.w = right;
    }
    rects
}

/// Build clipboard text for a set of highlight rects.
///
/// Entries are walked in reading order (oldest first) and each entry's
/// wrapped lines top to bottom. A line contributes the character range
/// its rect covers; consecutive contributing entries are joined with a
/// single `\n`, with no leading or trailing separator.
pub fn selected_text(store: &ScrollbackStore, rects: &[Rect], char_width_px: i32) -> String {
    let mut out = String::new();
    for entry in store.entries_oldest_first() {
        let mut entry_buf = String::new();
        for line in entry.lines() {
            if line.draw_y == NOT_DRAWN {
                continue;
            }
            for rect in rects {
                if rect.y != line.draw_y {
                    continue;
                }
                let col = (rect.x / char_width_px).max(0) as usize;
                let len = line.end - line.start;
                if col >= len {
                    continue;
                }
                let extent = col + (rect.w / char_width_px) as usize;
                let text = entry.line_text(line);
                entry_buf.extend(&text[col..extent.min(len)]);
            }
        }
        if !entry_buf.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&entry_buf);
        }
    }
    out
}
