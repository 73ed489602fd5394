//! Text handling
//!
//! Codepoint decoding and display-width line wrapping. Entries store
//! their text as a flat codepoint sequence; all column arithmetic in the
//! crate counts codepoints with a fixed glyph advance (no grapheme
//! clustering, no variable-width glyphs).

pub mod decode;
pub mod wrap;

pub use decode::{decode_utf8, encode_utf8};
pub use wrap::wrap;
