//! Events and cross-thread hand-off
//!
//! The platform layer (window system, input devices) produces [`Event`]
//! values on arbitrary threads; API callers produce deferred tasks. Both
//! are queued through the [`dispatcher`] and drained on the single owner
//! thread, which routes events to subscribers via the [`router`].
//! Submitted input lines travel the other way through the [`rendezvous`].

pub mod dispatcher;
pub mod rendezvous;
pub mod router;

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifier state attached to key events.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const CTRL  = 1 << 0;
        const SHIFT = 1 << 1;
        const ALT   = 1 << 2;
    }
}

/// Non-text keys the console reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Return,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// A key carrying a plain character, used for modifier chords
    /// (Ctrl+C copy). Unmodified text arrives as [`Event::Text`]
    /// instead.
    Char(char),
}

/// A platform event, as a plain tagged union.
///
/// Mouse coordinates are viewport-relative pixels; the embedder is
/// responsible for translating window coordinates before pushing.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Key { key: Key, mods: Modifiers },
    Text(String),
    MouseButtonDown { x: i32, y: i32 },
    MouseButtonUp { x: i32, y: i32 },
    MouseMotion { x: i32, y: i32 },
    Wheel { delta: i32 },
    Resized { width_px: i32, height_px: i32 },
}

/// Discriminant of [`Event`], used as the router's subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    Key,
    Text,
    MouseButtonDown,
    MouseButtonUp,
    MouseMotion,
    Wheel,
    Resized,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Key { .. } => EventKind::Key,
            Event::Text(_) => EventKind::Text,
            Event::MouseButtonDown { .. } => EventKind::MouseButtonDown,
            Event::MouseButtonUp { .. } => EventKind::MouseButtonUp,
            Event::MouseMotion { .. } => EventKind::MouseMotion,
            Event::Wheel { .. } => EventKind::Wheel,
            Event::Resized { .. } => EventKind::Resized,
        }
    }
}
