//! Progress bars.
//!
//! A [`Bar`] holds the counters producers update, the template it renders
//! with and a small variable store. Counters are atomics so any number of
//! threads can advance a bar without waiting; rendering produces one line
//! of text per call.
//!
//! # Examples
//!
//! ```rust
//! use pbar::Bar;
//!
//! let bar = Bar::new(100);
//! bar.set_width(40);
//! bar.set_template(r#"{{string . "prefix"}}{{counters . }} {{bar . }}"#).unwrap();
//! bar.set("prefix", "copy ");
//! bar.start();
//!
//! bar.add(25);
//! let line = bar.string();
//! assert!(line.starts_with("copy 25 / 100 ["));
//!
//! bar.add(75);
//! assert!(bar.is_finished());
//! ```

#[allow(clippy::module_inception)]
pub(crate) mod bar;
pub mod proxy;
pub(crate) mod render;
pub mod state;
pub mod vars;

pub use bar::{Bar, DEFAULT_TEMPLATE, DEFAULT_WIDTH};
pub use proxy::{ProxyReader, ProxyWriter};
pub use state::State;
pub use vars::{Value, Variables};
