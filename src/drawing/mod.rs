//! Pixel-space primitives
//!
//! Shared geometry types used by selection mapping and visible-line
//! layout. All coordinates are viewport-relative pixels.

pub mod geometry;

pub use geometry::{snap_to_max, snap_to_min, Point, Rect};
