//! Display-width line wrapping
//!
//! Splits a codepoint sequence into segments that fit a pixel column
//! budget, preferring to break after the most recent whitespace and
//! falling back to a hard break inside long words. Newlines and carriage
//! returns terminate a segment and are not carried into any segment.

use log::trace;

/// A wrapped segment as a half-open codepoint range `[start, end)`.
pub type Segment = (usize, usize);

/// Wrap `text` into segments no wider than `column_width_px`.
///
/// `glyph_advance_px` is the fixed horizontal advance of one glyph.
/// Segment rules, in scan order per codepoint:
///
/// - `\n` / `\r`: close the current segment before the break character
///   (if non-empty) and resume after it. The break character itself is
///   dropped.
/// - space / tab: remember the position as a wrap candidate. Whitespace
///   itself never triggers a wrap, so a run of spaces may overhang the
///   column budget.
/// - any other codepoint that would meet or exceed the budget: break
///   after the remembered whitespace if there is one (the whitespace
///   stays at the end of the closed segment), otherwise hard-break after
///   the current codepoint.
///
/// The remembered whitespace is a true tri-state (`Option`), so a break
/// candidate at index 0 is honored like any other.
///
/// Concatenating all segments reproduces `text` minus the `\n`/`\r`
/// characters. Empty input yields no segments.
pub fn wrap(text: &[char], column_width_px: i32, glyph_advance_px: i32) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut start: usize = 0;
    let mut last_space: Option<usize> = None;

    for (i, &ch) in text.iter().enumerate() {
        if ch == '\n' || ch == '\r' {
            if i > start {
                segments.push((start, i));
            }
            start = i + 1;
            last_space = None;
        } else if ch == ' ' || ch == '\t' {
            last_space = Some(i);
        } else if (i - start + 1) as i32 * glyph_advance_px >= column_width_px {
            match last_space {
                Some(sp) => {
                    // Word wrap: the space stays with the closed segment.
                    segments.push((start, sp + 1));
                    start = sp + 1;
                    last_space = None;
                }
                None => {
                    // Hard break inside a long word.
                    segments.push((start, i + 1));
                    start = i + 1;
                }
            }
        }
    }

    if start < text.len() {
        segments.push((start, text.len()));
    }

    trace!(
        "wrap: {} codepoints -> {} segments (width={}px advance={}px)",
        text.len(),
        segments.len(),
        column_width_px,
        glyph_advance_px
    );
    segments
}
