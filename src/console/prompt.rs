//! Prompt line editing and history
//!
//! One mutable buffer (`prompt prefix + user input`) with a codepoint
//! cursor, plus an append-only submission history navigated with
//! Up/Down. The display buffer is wrapped with the same line wrapper as
//! scrollback entries so the cursor can be addressed across wrapped-line
//! boundaries.

use std::collections::VecDeque;

use log::trace;

use super::scrollback::{WrappedLine, NOT_DRAWN};
use crate::text::{encode_utf8, wrap};

/// Editable prompt state owned by the console's owner thread.
pub struct Prompt {
    prompt_text: Vec<char>,
    input: Vec<char>,
    /// Codepoint index into `input` (0..=input.len()).
    cursor: usize,
    /// Submitted lines, oldest first. A deque so iteration stays stable
    /// while new submissions are appended.
    history: VecDeque<String>,
    history_cursor: Option<usize>,
    /// In-progress input stashed when history navigation begins.
    stash: Vec<char>,
    /// Display buffer `prompt_text + input` and its wrapped lines.
    raw: Vec<char>,
    lines: Vec<WrappedLine>,
    dirty: bool,
}

impl Prompt {
    pub fn new(prompt_text: Vec<char>) -> Self {
        Self {
            prompt_text,
            input: Vec::new(),
            cursor: 0,
            history: VecDeque::new(),
            history_cursor: None,
            stash: Vec::new(),
            raw: Vec::new(),
            lines: Vec::new(),
            dirty: true,
        }
    }

    pub fn prompt_text(&self) -> &[char] {
        &self.prompt_text
    }

    pub fn input(&self) -> &[char] {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(|s| s.as_str())
    }

    pub fn set_prompt(&mut self, prompt_text: Vec<char>) {
        self.prompt_text = prompt_text;
        self.dirty = true;
    }

    /// Insert text at the cursor (typing or paste).
    pub fn insert_str(&mut self, text: &[char]) {
        if self.cursor == self.input.len() {
            self.input.extend_from_slice(text);
        } else {
            let tail = self.input.split_off(self.cursor);
            self.input.extend_from_slice(text);
            self.input.extend(tail);
        }
        self.cursor += text.len();
        self.dirty = true;
    }

    /// Delete the codepoint before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 || self.input.is_empty() {
            return;
        }
        self.input.remove(self.cursor - 1);
        self.cursor -= 1;
        self.dirty = true;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    /// Recall the previous history line, stashing the in-progress input
    /// the first time. Cursor snaps to the end of the recalled line.
    pub fn history_prev(&mut self) {
        let idx = match self.history_cursor {
            None => {
                if self.history.is_empty() {
                    return;
                }
                self.stash = std::mem::take(&mut self.input);
                self.history.len() - 1
            }
            Some(0) => return,
            Some(i) => i - 1,
        };
        self.history_cursor = Some(idx);
        self.input = self.history[idx].chars().collect();
        self.cursor = self.input.len();
        self.dirty = true;
    }

    /// Walk forward through history; past the newest line, restore the
    /// stashed in-progress input.
    pub fn history_next(&mut self) {
        let Some(idx) = self.history_cursor else { return };
        if idx + 1 < self.history.len() {
            self.history_cursor = Some(idx + 1);
            self.input = self.history[idx + 1].chars().collect();
        } else {
            self.history_cursor = None;
            self.input = std::mem::take(&mut self.stash);
        }
        self.cursor = self.input.len();
        self.dirty = true;
    }

    /// Consume the current input: append it to history, clear the
    /// buffer, and return the submitted text.
    pub fn submit(&mut self) -> String {
        let line = encode_utf8(&self.input);
        trace!("prompt submit ({} codepoints)", self.input.len());
        self.history.push_back(line.clone());
        self.input.clear();
        self.cursor = 0;
        self.history_cursor = None;
        self.stash.clear();
        self.dirty = true;
        line
    }

    /// Full display buffer: prompt prefix followed by the input.
    pub fn display_text(&self) -> Vec<char> {
        let mut text = self.prompt_text.clone();
        text.extend_from_slice(&self.input);
        text
    }

    /// Re-wrap the display buffer if anything changed since the last
    /// rebuild.
    pub fn maybe_rebuild(&mut self, column_width_px: i32, glyph_advance_px: i32) {
        if self.dirty {
            self.rebuild(column_width_px, glyph_advance_px);
        }
    }

    /// Unconditional re-wrap (viewport resize).
    pub fn rebuild(&mut self, column_width_px: i32, glyph_advance_px: i32) {
        self.raw = self.display_text();
        self.lines.clear();
        for (row, (start, end)) in wrap(&self.raw, column_width_px, glyph_advance_px)
            .into_iter()
            .enumerate()
        {
            self.lines.push(WrappedLine { start, end, row, draw_y: NOT_DRAWN });
        }
        self.dirty = false;
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

    pub fn line_text(&self, line: &WrappedLine) -> &[char] {
        &self.raw[line.start..line.end]
    }

    /// Map the cursor to (row from the bottom of the prompt entry,
    /// column within that wrapped line). Valid after a rebuild; `None`
    /// while the prompt has no wrapped lines.
    pub fn cursor_position(&self) -> Option<(usize, usize)> {
        if self.lines.is_empty() {
            return None;
        }
        let cursor_len = self.prompt_text.len() + self.cursor;
        let line = self
            .lines
            .iter()
            .find(|l| cursor_len >= l.start && cursor_len < l.end)
            .unwrap_or_else(|| &self.lines[self.lines.len() - 1]);
        let row_from_bottom = (self.lines.len() - 1) - line.row;
        let col = cursor_len.saturating_sub(line.start);
        Some((row_from_bottom, col))
    }
}
