//! Terminal size queries.

use crate::error::{Error, Result};
use console::Term;

/// Current terminal width in columns.
///
/// Queries stderr, which is where frames are drawn by default. Returns
/// [`Error::TerminalQuery`] when stderr is not attached to a terminal.
pub fn width() -> Result<usize> {
    Term::stderr()
        .size_checked()
        .map(|(_rows, cols)| cols as usize)
        .filter(|cols| *cols > 0)
        .ok_or_else(|| Error::TerminalQuery("stderr is not a terminal".into()))
}
