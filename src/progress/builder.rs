//! Builder pattern implementation for creating [`Progress`] instances.
//!
//! # Examples
//!
//! ```rust
//! use pbar::progress::ProgressBuilder;
//! use std::time::Duration;
//!
//! let progress = ProgressBuilder::new()
//!     .refresh_interval(Duration::from_millis(100))
//!     .width(80)
//!     .template(r#"{{string . "prefix"}} {{bar . }} {{percent . }}"#)
//!     .build();
//! ```
//!
//! ## Hidden Output
//!
//! ```rust
//! use pbar::progress::ProgressBuilder;
//!
//! // Bars are still rendered, the frames go nowhere.
//! let progress = ProgressBuilder::hidden().build();
//! ```

use super::{config::ProgressConfig, progress::Progress};
use crate::template::Registry;

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

/// A builder used to create a [`Progress`].
#[derive(Default)]
pub struct ProgressBuilder {
    config: ProgressConfig,
    output: Option<Box<dyn Write + Send>>,
}

impl ProgressBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        ProgressBuilder::default()
    }

    /// Convenience function to discard every frame.
    pub fn hidden() -> Self {
        ProgressBuilder::default().output(io::sink())
    }

    /// Set the time between two redraws.
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.config.refresh_interval = interval;
        self
    }

    /// Set the width of added bars. `0` follows the terminal.
    pub fn width(mut self, width: usize) -> Self {
        self.config.width = width;
        self
    }

    /// Set the template bound to added bars.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.config.template = template.into();
        self
    }

    /// Compile templates against `registry` instead of the global one.
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.config.registry = registry;
        self
    }

    /// Draw frames to `output` instead of stderr.
    pub fn output<W>(mut self, output: W) -> Self
    where
        W: Write + Send + 'static,
    {
        self.output = Some(Box::new(output));
        self
    }

    /// Create the [`Progress`] with the specified options.
    pub fn build(self) -> Progress {
        let output = self.output.unwrap_or_else(|| Box::new(io::stderr()));
        Progress::new(self.config, output)
    }
}
