//! Configuration structures and defaults for the compositor.
//!
//! # Examples
//!
//! ```rust
//! use pbar::progress::ProgressConfig;
//! use std::time::Duration;
//!
//! let config = ProgressConfig::default();
//! assert_eq!(config.refresh_interval, Duration::from_millis(200));
//! assert_eq!(config.width, 100);
//! ```

use crate::bar::{DEFAULT_TEMPLATE, DEFAULT_WIDTH};
use crate::template::Registry;

use std::sync::Arc;
use std::time::Duration;

/// Time between two frames when nothing else is configured.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(200);

/// Configuration structure for the compositor.
#[derive(Clone, Debug)]
pub struct ProgressConfig {
    /// Time between two redraws.
    pub refresh_interval: Duration,
    /// Width given to every added bar. `0` follows the terminal width.
    pub width: usize,
    /// Template bound to every added bar.
    pub template: String,
    /// Registry templates compile against.
    pub registry: Arc<Registry>,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            width: DEFAULT_WIDTH,
            template: DEFAULT_TEMPLATE.to_string(),
            registry: Registry::global(),
        }
    }
}
