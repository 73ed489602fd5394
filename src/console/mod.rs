//! Console core
//!
//! Owns the scrollback, prompt, scroll and selection state behind a
//! single owner thread. Foreign threads talk to it through a
//! [`ConsoleHandle`]: platform events and deferred tasks go in through
//! the dispatcher, submitted input lines come back out through the
//! rendezvous. The owner thread calls [`Console::pump`] in a loop to
//! drain both queues and refresh the layout.

pub mod prompt;
pub mod scroll;
pub mod scrollback;
pub mod selection;

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use crate::config::Config;
use crate::drawing::{Point, Rect};
use crate::event::dispatcher::{Dispatcher, Liveness};
use crate::event::rendezvous::LineRendezvous;
use crate::event::router::EventRouter;
use crate::event::{Event, EventKind, Key, Modifiers};

use prompt::Prompt;
use scroll::ScrollPosition;
use scrollback::{EntryKind, ScrollbackStore, NOT_DRAWN};
use selection::SelectionState;

/// Deferred mutation executed on the owner thread.
pub type Task = Box<dyn FnOnce(&mut Screen) + Send>;

/// All mutable console state. Only the owner thread touches it.
pub struct Screen {
    store: ScrollbackStore,
    scroll: ScrollPosition,
    prompt: Prompt,
    selection: SelectionState,
    char_width_px: i32,
    line_height_px: i32,
    viewport: Rect,
    clipboard: Option<String>,
    /// Bumped on every visible mutation; embedders redraw when it moves.
    revision: u64,
}

/// One laid-out display line, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleLine {
    pub y: i32,
    pub text: String,
}

impl Screen {
    fn new(config: &Config) -> Self {
        let char_width_px = config.font.char_width_px;
        let line_height_px = config.font.line_advance_px();
        Self {
            store: ScrollbackStore::new(config.scrollback.max_lines),
            scroll: ScrollPosition::new(),
            prompt: Prompt::new(config.prompt.text.chars().collect()),
            selection: SelectionState::default(),
            char_width_px,
            line_height_px,
            viewport: Rect::new(0, 0, 80 * char_width_px, 25 * line_height_px),
            clipboard: None,
            revision: 0,
        }
    }

    pub fn columns(&self) -> usize {
        (self.viewport.w / self.char_width_px).max(0) as usize
    }

    pub fn rows(&self) -> usize {
        (self.viewport.h / self.line_height_px).max(0) as usize
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn store(&self) -> &ScrollbackStore {
        &self.store
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    pub fn scroll(&self) -> &ScrollPosition {
        &self.scroll
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    /// Append a program-output entry. Embedded newlines stay inside the
    /// one entry and wrap into separate display lines.
    pub fn append_output(&mut self, text: &str) {
        self.store.append(
            EntryKind::Output,
            text.chars().collect(),
            self.viewport.w,
            self.char_width_px,
        );
        self.scroll.clamp(self.store.total_lines());
        self.bump();
    }

    /// Append an input-style entry: prompt prefix plus the given text,
    /// as if the user had typed and submitted it.
    pub fn append_input_line(&mut self, text: &str) {
        let mut raw = self.prompt.prompt_text().to_vec();
        raw.extend(text.chars());
        self.store.append(EntryKind::Input, raw, self.viewport.w, self.char_width_px);
        self.scroll.clamp(self.store.total_lines());
        self.bump();
    }

    /// Drop the whole log. The prompt and its history survive.
    pub fn clear(&mut self) {
        self.store.clear();
        self.scroll.reset();
        self.selection.clear();
        self.bump();
    }

    pub fn set_scrollback_limit(&mut self, max_lines: usize) {
        info!("scrollback limit set to {} line(s)", max_lines);
        self.store.set_max_lines(max_lines);
        self.scroll.clamp(self.store.total_lines());
        self.bump();
    }

    pub fn set_prompt(&mut self, text: &str) {
        self.prompt.set_prompt(text.chars().collect());
        self.bump();
    }

    /// Insert typed or pasted text at the cursor. Typing snaps the view
    /// back to the newest line.
    pub fn insert_text(&mut self, text: &str) {
        self.prompt.insert_str(&text.chars().collect::<Vec<_>>());
        self.scroll.reset();
        self.bump();
    }

    pub fn backspace(&mut self) {
        self.prompt.backspace();
        self.scroll.reset();
        self.bump();
    }

    pub fn move_cursor_left(&mut self) {
        self.prompt.move_left();
        self.bump();
    }

    pub fn move_cursor_right(&mut self) {
        self.prompt.move_right();
        self.bump();
    }

    pub fn move_cursor_home(&mut self) {
        self.prompt.move_home();
        self.bump();
    }

    pub fn move_cursor_end(&mut self) {
        self.prompt.move_end();
        self.bump();
    }

    pub fn history_prev(&mut self) {
        self.prompt.history_prev();
        self.scroll.reset();
        self.bump();
    }

    pub fn history_next(&mut self) {
        self.prompt.history_next();
        self.scroll.reset();
        self.bump();
    }

    /// Consume the prompt input: echo it into the log as an input entry
    /// and return the submitted text.
    pub fn submit_line(&mut self) -> String {
        let line = self.prompt.submit();
        self.append_input_line(&line);
        self.scroll.reset();
        self.selection.clear();
        line
    }

    /// Positive deltas scroll up, away from the newest line.
    pub fn scroll_lines(&mut self, delta: i32) {
        self.scroll.scroll_by(delta, self.store.total_lines());
        self.bump();
    }

    pub fn page_up(&mut self) {
        self.scroll_lines(ScrollPosition::page_size(self.rows()) as i32);
    }

    pub fn page_down(&mut self) {
        self.scroll_lines(-(ScrollPosition::page_size(self.rows()) as i32));
    }

    /// Adopt a new viewport and re-wrap everything for the new column
    /// budget.
    pub fn resize(&mut self, width_px: i32, height_px: i32) {
        debug!("viewport resize to {}x{} px", width_px, height_px);
        self.viewport = Rect::new(0, 0, width_px, height_px);
        self.store.re_wrap(width_px, self.char_width_px);
        self.prompt.rebuild(width_px, self.char_width_px);
        self.scroll.clamp(self.store.total_lines());
        self.selection.clear();
        self.bump();
    }

    pub fn begin_selection(&mut self, p: Point) {
        self.selection.begin(p);
        self.bump();
    }

    pub fn update_selection(&mut self, p: Point) {
        if self.selection.is_dragging() {
            self.selection.update(p);
            self.bump();
        }
    }

    pub fn end_selection(&mut self) {
        self.selection.finish();
    }

    pub fn selection_rects(&self) -> Vec<Rect> {
        match self.selection.range() {
            Some((start, end)) => selection::selection_rects(
                start,
                end,
                self.char_width_px,
                self.line_height_px,
                self.viewport.w,
            ),
            None => Vec::new(),
        }
    }

    /// Resolve the current selection against the last layout and park
    /// the covered text for the embedder to collect.
    pub fn copy_selection(&mut self) {
        let rects = self.selection_rects();
        if rects.is_empty() {
            return;
        }
        let text = selection::selected_text(&self.store, &rects, self.char_width_px);
        if !text.is_empty() {
            debug!("copied {} byte(s)", text.len());
            self.clipboard = Some(text);
            self.bump();
        }
    }

    /// Hand the parked clipboard text to the embedder, at most once.
    pub fn take_clipboard_text(&mut self) -> Option<String> {
        self.clipboard.take()
    }

    /// Stamp a pixel row onto every visible wrapped line and reset the
    /// rest to [`NOT_DRAWN`].
    ///
    /// The prompt pins to the bottom of the viewport; log lines stack
    /// above it newest-first, with the scroll offset skipping that many
    /// display lines before placement begins.
    pub fn layout(&mut self) {
        self.prompt.maybe_rebuild(self.viewport.w, self.char_width_px);
        let lh = self.line_height_px;
        let mut y = self.viewport.h - lh;

        for line in self.prompt.lines_mut().iter_mut().rev() {
            line.draw_y = if y >= 0 { y } else { NOT_DRAWN };
            y -= lh;
        }

        let (first_row, last_row) = self.scroll.visible_window(self.rows());
        let mut row = 0usize;
        for entry in self.store.entries_mut() {
            for line in entry.lines_mut().iter_mut().rev() {
                row += 1;
                if row < first_row || row > last_row || y < 0 {
                    line.draw_y = NOT_DRAWN;
                } else {
                    line.draw_y = y;
                    y -= lh;
                }
            }
        }
    }

    /// Every placed line after the last layout, top to bottom.
    pub fn visible_lines(&self) -> Vec<VisibleLine> {
        let mut lines = Vec::new();
        for entry in self.store.entries() {
            for line in entry.lines() {
                if line.draw_y != NOT_DRAWN {
                    lines.push(VisibleLine {
                        y: line.draw_y,
                        text: entry.line_text(line).iter().collect(),
                    });
                }
            }
        }
        for line in self.prompt.lines() {
            if line.draw_y != NOT_DRAWN {
                lines.push(VisibleLine {
                    y: line.draw_y,
                    text: self.prompt.line_text(line).iter().collect(),
                });
            }
        }
        lines.sort_by_key(|l| l.y);
        lines
    }
}

struct Shared {
    dispatcher: Dispatcher<Event, Task>,
    rendezvous: LineRendezvous,
}

/// The console core, owned by exactly one thread.
pub struct Console {
    screen: Screen,
    router: EventRouter<Screen>,
    shared: Arc<Shared>,
    laid_out_revision: u64,
}

impl Console {
    pub fn new(config: &Config) -> Self {
        let shared = Arc::new(Shared {
            dispatcher: Dispatcher::new(),
            rendezvous: LineRendezvous::new(),
        });
        let mut console = Self {
            screen: Screen::new(config),
            router: EventRouter::new(),
            shared,
            laid_out_revision: 0,
        };
        console.connect_handlers();
        console.screen.layout();
        console
    }

    fn connect_handlers(&mut self) {
        let shared = Arc::clone(&self.shared);
        self.router.connect(EventKind::Key, move |screen: &mut Screen, event| {
            let Event::Key { key, mods } = event else { return };
            match key {
                Key::Return => {
                    let line = screen.submit_line();
                    shared.rendezvous.push(line);
                }
                Key::Backspace => screen.backspace(),
                Key::Tab => screen.insert_text("\t"),
                Key::Left => screen.move_cursor_left(),
                Key::Right => screen.move_cursor_right(),
                Key::Home => screen.move_cursor_home(),
                Key::End => screen.move_cursor_end(),
                Key::Up => screen.history_prev(),
                Key::Down => screen.history_next(),
                Key::PageUp => screen.page_up(),
                Key::PageDown => screen.page_down(),
                Key::Char(c) => {
                    if mods.contains(Modifiers::CTRL) && *c == 'c' {
                        screen.copy_selection();
                    }
                }
            }
        });
        self.router.connect(EventKind::Text, |screen: &mut Screen, event| {
            if let Event::Text(text) = event {
                screen.insert_text(text);
            }
        });
        self.router.connect(EventKind::MouseButtonDown, |screen: &mut Screen, event| {
            if let Event::MouseButtonDown { x, y } = event {
                screen.begin_selection(Point::new(*x, *y));
            }
        });
        self.router.connect(EventKind::MouseMotion, |screen: &mut Screen, event| {
            if let Event::MouseMotion { x, y } = event {
                screen.update_selection(Point::new(*x, *y));
            }
        });
        self.router.connect(EventKind::MouseButtonUp, |screen: &mut Screen, event| {
            if let Event::MouseButtonUp { x, y } = event {
                screen.update_selection(Point::new(*x, *y));
                screen.end_selection();
            }
        });
        self.router.connect(EventKind::Wheel, |screen: &mut Screen, event| {
            if let Event::Wheel { delta } = event {
                screen.scroll_lines(*delta);
            }
        });
        self.router.connect(EventKind::Resized, |screen: &mut Screen, event| {
            if let Event::Resized { width_px, height_px } = event {
                screen.resize(*width_px, *height_px);
            }
        });
    }

    /// A cloneable handle for foreign threads.
    pub fn handle(&self) -> ConsoleHandle {
        ConsoleHandle { shared: Arc::clone(&self.shared) }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// One owner-loop cycle: wait for queued work (up to `timeout`),
    /// drain events then tasks, and refresh the layout if anything
    /// visible changed.
    ///
    /// Returns false exactly once shutdown has been observed; the
    /// rendezvous is closed and the dispatcher parked before that, so
    /// every blocked consumer sees the EOF sentinel.
    pub fn pump(&mut self, timeout: Duration) -> bool {
        self.shared.dispatcher.wait_for_work(timeout);
        if self.shared.dispatcher.state() != Liveness::Active {
            info!("console shutting down");
            self.shared.rendezvous.shutdown();
            self.shared.dispatcher.set_inactive();
            return false;
        }
        while let Some(event) = self.shared.dispatcher.pop_event() {
            self.router.dispatch(&mut self.screen, &event);
        }
        while let Some(task) = self.shared.dispatcher.pop_task() {
            task(&mut self.screen);
        }
        if self.screen.revision != self.laid_out_revision {
            self.screen.layout();
            self.laid_out_revision = self.screen.revision;
        }
        true
    }
}

/// Thread-safe handle to a running console.
///
/// Everything here is fire-and-forget except
/// [`get_line_blocking`](Self::get_line_blocking): mutations are queued
/// and applied by the owner's next pump; pushes after shutdown are
/// dropped.
#[derive(Clone)]
pub struct ConsoleHandle {
    shared: Arc<Shared>,
}

impl ConsoleHandle {
    /// Forward a platform event to the owner thread.
    pub fn push_event(&self, event: Event) {
        self.shared.dispatcher.push_event(event);
    }

    pub fn append_output(&self, text: impl Into<String>) {
        let text = text.into();
        self.shared
            .dispatcher
            .push_task(Box::new(move |screen| screen.append_output(&text)));
    }

    /// Append raw program output, decoded lossily as UTF-8.
    pub fn append_output_bytes(&self, bytes: Vec<u8>) {
        let text = crate::text::encode_utf8(&crate::text::decode_utf8(&bytes));
        self.append_output(text);
    }

    /// Append a line styled as user input (prompt prefix included),
    /// without touching the prompt buffer or the line queue.
    pub fn append_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.shared
            .dispatcher
            .push_task(Box::new(move |screen| screen.append_input_line(&text)));
    }

    pub fn set_prompt(&self, text: impl Into<String>) {
        let text = text.into();
        self.shared
            .dispatcher
            .push_task(Box::new(move |screen| screen.set_prompt(&text)));
    }

    pub fn clear(&self) {
        self.shared.dispatcher.push_task(Box::new(|screen| screen.clear()));
    }

    pub fn set_scrollback_limit(&self, max_lines: usize) {
        self.shared
            .dispatcher
            .push_task(Box::new(move |screen| screen.set_scrollback_limit(max_lines)));
    }

    /// Scroll the log; positive deltas move away from the newest line.
    pub fn scroll(&self, delta: i32) {
        self.shared
            .dispatcher
            .push_task(Box::new(move |screen| screen.scroll_lines(delta)));
    }

    /// Insert clipboard text at the prompt cursor.
    pub fn paste(&self, text: impl Into<String>) {
        self.push_event(Event::Text(text.into()));
    }

    /// Begin shutdown. Queued work is discarded, later pushes are
    /// dropped, and the owner's next pump closes the rendezvous.
    pub fn shutdown(&self) {
        self.shared.dispatcher.shutdown();
    }

    /// Block until the user submits an input line.
    ///
    /// `None` is the EOF sentinel: the console has shut down and no
    /// further lines will arrive.
    pub fn get_line_blocking(&self) -> Option<String> {
        self.shared.rendezvous.wait_get()
    }
}
