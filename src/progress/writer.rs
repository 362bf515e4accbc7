//! Line-overwrite writer.
//!
//! Each flush replaces the previously flushed frame in place: the cursor is
//! moved up over the old frame's rows, each row is cleared, and the new
//! frame is written.

use crate::utils::{cell_count, terminal};

use std::fmt;
use std::io::{self, Write};

/// Cursor up one row, then erase that row.
const CLEAR_LINE_UP: &[u8] = b"\x1b[1A\x1b[2K";

/// Buffers a frame and redraws it over the previous one on flush.
pub struct LiveWriter {
    out: Box<dyn Write + Send>,
    buf: Vec<u8>,
    rows: usize,
}

impl fmt::Debug for LiveWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveWriter")
            .field("buffered", &self.buf.len())
            .field("rows", &self.rows)
            .finish()
    }
}

impl LiveWriter {
    /// Create a writer drawing to `out`.
    pub fn new<W>(out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            out: Box::new(out),
            buf: Vec::new(),
            rows: 0,
        }
    }

    /// Redirect output. The next frame is drawn without clearing anything.
    pub fn set_output<W>(&mut self, out: W)
    where
        W: Write + Send + 'static,
    {
        self.out = Box::new(out);
        self.rows = 0;
    }

    /// Terminal rows the last flushed frame occupies.
    pub fn rows(&self) -> usize {
        self.rows
    }
}

/// Rows taken by the newline-terminated lines of `frame`, including
/// wrapping when the terminal width is known.
fn physical_rows(frame: &str, term_width: Option<usize>) -> usize {
    frame
        .split_terminator('\n')
        .map(|line| match term_width {
            Some(width) if width > 0 => cell_count(line).max(1).div_ceil(width),
            _ => 1,
        })
        .sum()
}

impl Write for LiveWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return self.out.flush();
        }
        let buf = std::mem::take(&mut self.buf);
        let mut frame = Vec::with_capacity(self.rows * CLEAR_LINE_UP.len() + buf.len());
        for _ in 0..self.rows {
            frame.extend_from_slice(CLEAR_LINE_UP);
        }
        frame.extend_from_slice(&buf);
        self.out.write_all(&frame)?;
        self.out.flush()?;

        let text = String::from_utf8_lossy(&buf);
        self.rows = physical_rows(&text, terminal::width().ok());
        Ok(())
    }
}
