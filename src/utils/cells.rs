//! Terminal cell width helpers.
//!
//! Byte length is not column count: wide code points (CJK, most emoji)
//! occupy two cells, combining marks and ANSI escape sequences occupy none.
//! Every width computation in the crate goes through this module so that
//! multi-bar frames line up.
//!
//! # Examples
//!
//! ```rust
//! use pbar::utils::{cell_count, strip_string};
//!
//! assert_eq!(cell_count("\x1b[31mred\x1b[0m"), 3);
//! assert_eq!(cell_count("日本"), 4);
//! assert_eq!(strip_string("hello world", 5), "hello");
//! ```

use console::AnsiCodeIterator;
use unicode_width::UnicodeWidthChar;

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Number of terminal columns `s` occupies.
pub fn cell_count(s: &str) -> usize {
    AnsiCodeIterator::new(s)
        .filter(|(_, is_ansi)| !is_ansi)
        .flat_map(|(text, _)| text.chars())
        .map(char_width)
        .sum()
}

/// Truncate `s` to at most `max_width` columns.
///
/// Strings that already fit are returned unchanged. Otherwise the result
/// is exactly `max_width` columns wide: a wide character that would
/// straddle the limit is dropped and the gap is filled with spaces. Escape
/// sequences are never split and are all kept, including those past the
/// cut, so colour resets still apply.
pub fn strip_string(s: &str, max_width: usize) -> String {
    if cell_count(s) <= max_width {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut left = max_width;
    let mut reached = false;
    for (piece, is_ansi) in AnsiCodeIterator::new(s) {
        if is_ansi {
            out.push_str(piece);
            continue;
        }
        for c in piece.chars() {
            let w = char_width(c);
            if !reached && w <= left {
                left -= w;
                out.push(c);
            } else {
                reached = true;
            }
        }
    }
    out.push_str(&" ".repeat(left));
    out
}

/// Right-pad `s` with spaces until it is `width` columns wide.
///
/// Longer strings are returned untouched.
pub fn pad_to_width(mut s: String, width: usize) -> String {
    let current = cell_count(&s);
    if current < width {
        s.push_str(&" ".repeat(width - current));
    }
    s
}

/// Repeat `pattern` to fill exactly `width` columns.
///
/// Zero-width patterns fill with spaces.
pub fn fill_to_width(pattern: &str, width: usize) -> String {
    let unit = cell_count(pattern);
    if unit == 0 {
        return " ".repeat(width);
    }
    let repeated = pattern.repeat(width.div_ceil(unit));
    strip_string(&repeated, width)
}
