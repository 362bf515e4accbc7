//! Second rendering pass: share the leftover line width among adaptive
//! elements.

use super::Pending;
use crate::bar::State;
use crate::error::Result;
use crate::utils::{cell_count, strip_string};

/// Stand-in emitted by adaptive elements during the first pass.
pub const ADAPTIVE_PLACEHOLDER: &str = "%_ad_el_%";

/// Replace the placeholders in `text` with the rendered pending elements.
///
/// The width left over by static content is split evenly, rounding down,
/// and elements are rendered in template order. When static content alone
/// fills the line, the placeholders are dropped and the line is cut to
/// exactly `state.width()` columns.
pub fn resolve(text: String, pending: &[Pending], state: &State) -> Result<String> {
    if pending.is_empty() {
        return Ok(text);
    }
    let count = pending.len();
    let static_width =
        cell_count(&text).saturating_sub(count * cell_count(ADAPTIVE_PLACEHOLDER));
    let width = state.width();
    if width <= static_width {
        return Ok(strip_string(&text.replace(ADAPTIVE_PLACEHOLDER, ""), width));
    }

    let share = state.adaptive((width - static_width) / count);
    let mut line = text;
    for element in pending {
        let content = element.render(&share)?;
        line = line.replacen(ADAPTIVE_PLACEHOLDER, &content, 1);
    }
    Ok(line)
}
