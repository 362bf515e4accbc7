//! Template elements and filters.
//!
//! An [`Element`] is a named rendering unit called from a template with the
//! render snapshot as its first argument: `{{counters . "%s/%s"}}`. A
//! [`Filter`] is a plain string function used in pipelines or on literals:
//! `{{string . "status" | green}}`.
//!
//! Elements come in two flavours. Fixed elements return their final text
//! right away. Adaptive elements (see [`Element::is_adaptive`]) are only
//! rendered once the rest of the line is known, and are then asked to fill
//! [`State::adaptive_width`] columns.
//!
//! # Examples
//!
//! ```rust
//! use pbar::element::{element_fn, adaptive_fn};
//! use pbar::utils::fill_to_width;
//! use pbar::Registry;
//!
//! let registry = Registry::new();
//! registry.register_element(
//!     "remaining",
//!     element_fn(|state, _args| Ok((state.total() - state.value()).to_string())),
//! );
//! registry.register_element(
//!     "dots",
//!     adaptive_fn(|state, _args| Ok(fill_to_width(".", state.adaptive_width()))),
//! );
//! ```

pub mod builtin;
pub mod color;

use crate::bar::State;
use crate::error::Result;

/// A rendering unit callable from templates.
pub trait Element: Send + Sync {
    /// Produce this element's text for one render.
    ///
    /// `args` are the string arguments that follow `.` in the template,
    /// plus the piped value when the element is not first in a pipeline.
    fn render(&self, state: &State, args: &[String]) -> Result<String>;

    /// Return `true` if the element fills whatever width is left on the
    /// line after every other element rendered.
    fn is_adaptive(&self) -> bool {
        false
    }
}

/// String function usable as a pipeline stage.
pub type Filter = dyn Fn(&[String]) -> String + Send + Sync;

/// Fixed-width element backed by a closure.
pub struct ElementFn<F>(F);

impl<F> Element for ElementFn<F>
where
    F: Fn(&State, &[String]) -> Result<String> + Send + Sync,
{
    fn render(&self, state: &State, args: &[String]) -> Result<String> {
        (self.0)(state, args)
    }
}

/// Adaptive element backed by a closure.
pub struct AdaptiveElementFn<F>(F);

impl<F> Element for AdaptiveElementFn<F>
where
    F: Fn(&State, &[String]) -> Result<String> + Send + Sync,
{
    fn render(&self, state: &State, args: &[String]) -> Result<String> {
        (self.0)(state, args)
    }

    fn is_adaptive(&self) -> bool {
        true
    }
}

/// Wrap a closure as a fixed-width element.
pub fn element_fn<F>(f: F) -> ElementFn<F>
where
    F: Fn(&State, &[String]) -> Result<String> + Send + Sync,
{
    ElementFn(f)
}

/// Wrap a closure as an adaptive element.
pub fn adaptive_fn<F>(f: F) -> AdaptiveElementFn<F>
where
    F: Fn(&State, &[String]) -> Result<String> + Send + Sync,
{
    AdaptiveElementFn(f)
}

/// Argument `index`, or `default` when it is missing.
pub(crate) fn arg_or<'a>(args: &'a [String], index: usize, default: &'a str) -> &'a str {
    args.get(index).map_or(default, String::as_str)
}

/// Argument `index`, or `default` when it is missing or empty.
pub(crate) fn non_empty_arg_or<'a>(args: &'a [String], index: usize, default: &'a str) -> &'a str {
    match args.get(index) {
        Some(arg) if !arg.is_empty() => arg,
        _ => default,
    }
}
