//! Reader and writer wrappers that advance a bar by the bytes they move.
//!
//! ```rust
//! use pbar::Bar;
//! use std::io::Read;
//! use std::sync::Arc;
//!
//! let bar = Arc::new(Bar::new(11));
//! let mut reader = bar.proxy_reader("hello world".as_bytes());
//! let mut text = String::new();
//! reader.read_to_string(&mut text).unwrap();
//!
//! assert_eq!(bar.current(), 11);
//! assert!(bar.is_finished());
//! ```

use super::vars::BYTES;
use super::Bar;

use std::io::{self, Read, Write};
use std::sync::Arc;

impl Bar {
    /// Wrap `reader` so that every read advances this bar.
    ///
    /// Switches the bar to byte units.
    pub fn proxy_reader<R: Read>(self: &Arc<Self>, reader: R) -> ProxyReader<R> {
        self.set(BYTES, true);
        ProxyReader {
            inner: reader,
            bar: Arc::clone(self),
        }
    }

    /// Wrap `writer` so that every write advances this bar.
    ///
    /// Switches the bar to byte units.
    pub fn proxy_writer<W: Write>(self: &Arc<Self>, writer: W) -> ProxyWriter<W> {
        self.set(BYTES, true);
        ProxyWriter {
            inner: writer,
            bar: Arc::clone(self),
        }
    }
}

fn advance(bar: &Bar, n: usize) {
    bar.add(i64::try_from(n).unwrap_or(i64::MAX));
}

/// A [`Read`] adapter created by [`Bar::proxy_reader`].
#[derive(Debug)]
pub struct ProxyReader<R> {
    inner: R,
    bar: Arc<Bar>,
}

impl<R> ProxyReader<R> {
    pub fn bar(&self) -> &Arc<Bar> {
        &self.bar
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for ProxyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        advance(&self.bar, n);
        Ok(n)
    }
}

/// A [`Write`] adapter created by [`Bar::proxy_writer`].
#[derive(Debug)]
pub struct ProxyWriter<W> {
    inner: W,
    bar: Arc<Bar>,
}

impl<W> ProxyWriter<W> {
    pub fn bar(&self) -> &Arc<Bar> {
        &self.bar
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for ProxyWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        advance(&self.bar, n);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
