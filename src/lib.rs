//! pbar renders one or more progress bars to a terminal, each described by
//! a small text template, and keeps them refreshed from a background task
//! while any number of threads update their counters.
//!
//! # Quick Start
//!
//! ```rust
//! use pbar::progress::ProgressBuilder;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let progress = ProgressBuilder::hidden().build();
//! let bar = progress.add_bar(100);
//! bar.set("prefix", "download ");
//! progress.start();
//!
//! for _ in 0..100 {
//!     bar.inc();
//! }
//! assert!(bar.is_finished());
//!
//! progress.finish_all().await;
//! # }
//! ```
//!
//! # Templates
//!
//! Text outside `{{ }}` is printed as is. Inside, an element is called with
//! the render snapshot `.` and string arguments, and its output can be piped
//! through filters:
//!
//! ```text
//! {{string . "prefix"}}{{counters . "%s/%s"}} {{bar . "[" "=" ">" " " "]"}} {{percent . | green}}
//! ```
//!
//! Adaptive elements such as `bar` share whatever width the rest of the line
//! leaves over.
//!
//! # Module Organization
//!
//! - [`bar`] - the [`Bar`] type, render snapshots and variables
//! - [`element`] - the [`Element`] trait, built-in elements and filters
//! - [`error`] - the crate [`Error`] enum
//! - [`progress`] - the [`Progress`] compositor and its builder
//! - [`template`] - template compilation, the [`Registry`] and adaptive resolution
//! - [`utils`] - cell width, format pattern and terminal helpers

pub mod bar;
pub mod element;
pub mod error;
pub mod progress;
pub mod template;
pub mod utils;

pub use bar::{Bar, State, Value};
pub use element::{adaptive_fn, element_fn, Element};
pub use error::{Error, Result};
pub use progress::{Progress, ProgressBuilder};
pub use template::{Registry, Template};
pub use utils::{cell_count, strip_string};
