//! Shared utility functions.
//!
//! This module contains the helpers the rendering engine is built on:
//!
//! - [`cells`] - terminal cell width counting, truncation and padding
//! - [`format`] - printf-style patterns used by elements
//! - [`terminal`] - terminal width detection
//!
//! # Examples
//!
//! ```rust
//! use pbar::utils::{cell_count, pad_to_width};
//!
//! let line = pad_to_width("50%".to_string(), 6);
//! assert_eq!(cell_count(&line), 6);
//! ```

pub mod cells;
pub mod format;
pub mod terminal;

// Re-export commonly used utilities
pub use cells::{cell_count, fill_to_width, pad_to_width, strip_string};
pub use format::{sprintf, FormatArg};
