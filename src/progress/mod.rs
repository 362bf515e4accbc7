//! Progress module containing the multi-bar compositor.
//!
//! This module provides the [`Progress`] compositor, which owns a set of
//! bars and redraws them together from a background task, and its builder
//! and configuration.
//!
//! # Overview
//!
//! - `builder` - [`ProgressBuilder`] for flexible configuration
//! - `config` - [`ProgressConfig`] and its defaults
//! - `progress` - the [`Progress`] compositor and its redraw loop
//! - `writer` - [`LiveWriter`], which overwrites the previous frame in place
//!
//! # Examples
//!
//! ## Custom Template and Width
//!
//! ```rust
//! use pbar::progress::ProgressBuilder;
//!
//! let progress = ProgressBuilder::new()
//!     .width(60)
//!     .template(r#"{{cycle . "⠋" "⠙" "⠹" "⠸" | cyan}} {{bar . }} {{counters . "%.3s/%s"}}"#)
//!     .build();
//! let bar = progress.add_bar(10);
//! assert_eq!(bar.width(), 60);
//! ```

pub mod builder;
pub mod config;
#[allow(clippy::module_inception)]
pub mod progress;
pub mod writer;

pub use builder::ProgressBuilder;
pub use config::{ProgressConfig, DEFAULT_REFRESH_INTERVAL};
pub use progress::{add_bar, finish_all, start, Progress};
pub use writer::LiveWriter;
