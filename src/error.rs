//! Error handling for pbar.
//!
//! Every fallible operation in the crate returns [`Result`]. Bars keep the
//! last error they hit (see [`Bar::err`](crate::Bar::err)), which is why
//! [`Error`] is `Clone`.

use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can happen when rendering progress bars.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A template failed to parse or to bind against the registry.
    ///
    /// `offset` is the byte offset into the template source where the
    /// problem was detected.
    #[error("template error at offset {offset}: {message}")]
    Configuration { offset: usize, message: String },

    /// Template execution or an element failed during a render pass.
    #[error("render error: {0}")]
    Render(String),

    /// The terminal size could not be queried.
    ///
    /// This never escapes the crate's public rendering paths: callers fall
    /// back to a default width.
    #[error("terminal width unavailable: {0}")]
    TerminalQuery(String),

    /// I/O error while writing a frame to the output sink.
    #[error("I/O error: {source}")]
    IOError {
        #[source]
        source: Arc<io::Error>,
    },
}

impl Error {
    pub(crate) fn configuration(offset: usize, message: impl Into<String>) -> Self {
        Error::Configuration {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn render(message: impl std::fmt::Display) -> Self {
        Error::Render(message.to_string())
    }

    /// Return `true` for template parse and bind failures.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// Return `true` for failures raised while rendering.
    pub fn is_render(&self) -> bool {
        matches!(self, Error::Render(_))
    }
}

impl From<io::Error> for Error {
    fn from(source: io::Error) -> Self {
        Error::IOError {
            source: Arc::new(source),
        }
    }
}

/// Result type alias for operations that can fail with a pbar error.
pub type Result<T> = std::result::Result<T, Error>;
