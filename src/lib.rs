//! ocon - scrollable line console core
//!
//! A text console overlay engine: a bounded scrollback log with
//! pixel-budget line wrapping, an editable prompt with history, grid
//! snapped drag selection, and a thread-safe front door for events and
//! blocking line reads.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 Owner Thread                    │
//! ├─────────────────────────────────────────────────┤
//! │  pump() → drain events/tasks → Screen → layout  │
//! │     ↑                               │           │
//! │  Dispatcher (events, tasks)    Rendezvous       │
//! │     ↑                               ↓           │
//! │  ConsoleHandle (any thread)   get_line_blocking │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! The [`Console`] and its [`Screen`](console::Screen) belong to one
//! owner thread. Other threads hold a [`ConsoleHandle`]: platform events
//! and deferred mutations go in through its dispatcher and are applied
//! on the owner's next [`Console::pump`]; submitted input lines come
//! back out through [`ConsoleHandle::get_line_blocking`].

pub mod config;
pub mod console;
pub mod drawing;
pub mod event;
pub mod text;

pub use config::Config;
pub use console::{Console, ConsoleHandle, VisibleLine};
pub use event::{Event, Key, Modifiers};
