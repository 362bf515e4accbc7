//! Immutable render snapshots.
//!
//! A [`State`] is built fresh for every render of a bar and handed to each
//! element in the bar's template. Counter values are captured once, so all
//! elements in one pass agree on what they show even while producers keep
//! updating the bar.

use super::vars::{Value, Variables, BYTES, SI_BYTES_PREFIX};
use indicatif::{BinaryBytes, DecimalBytes};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The view of a bar that elements render from.
#[derive(Debug, Clone)]
pub struct State {
    id: u64,
    total: i64,
    current: i64,
    width: usize,
    adaptive_width: Option<usize>,
    finished: bool,
    time: Instant,
    start_time: Instant,
    vars: Arc<Variables>,
}

impl State {
    /// Create a first-render snapshot with the given counters and width.
    ///
    /// Bars build their own snapshots; this constructor is for driving
    /// templates and elements directly.
    pub fn new(current: i64, total: i64, width: usize) -> Self {
        let now = Instant::now();
        Self {
            id: 1,
            total,
            current,
            width,
            adaptive_width: None,
            finished: false,
            time: now,
            start_time: now,
            vars: Arc::new(Variables::new()),
        }
    }

    /// Set the render id.
    pub fn with_id(self, id: u64) -> Self {
        Self { id, ..self }
    }

    /// Set the finished flag.
    pub fn with_finished(self, finished: bool) -> Self {
        Self { finished, ..self }
    }

    /// Set the moment the snapshot was taken.
    pub fn with_time(self, time: Instant) -> Self {
        Self { time, ..self }
    }

    /// Set the moment the bar started.
    pub fn with_start_time(self, start_time: Instant) -> Self {
        Self { start_time, ..self }
    }

    /// Attach a variable store.
    pub fn with_vars(self, vars: Arc<Variables>) -> Self {
        Self { vars, ..self }
    }

    /// Copy of this snapshot for the second, width-aware pass of an
    /// adaptive element.
    pub fn adaptive(&self, width: usize) -> Self {
        Self {
            adaptive_width: Some(width),
            ..self.clone()
        }
    }

    /// Render identifier: starts at 1, increments on every render and
    /// resets when the bar is (re)started.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Return `true` only on the first render.
    pub fn is_first(&self) -> bool {
        self.id == 1
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    /// Current counter value.
    pub fn value(&self) -> i64 {
        self.current
    }

    /// Full line width for this render.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Width allotted to an adaptive element, `0` outside resolution.
    pub fn adaptive_width(&self) -> usize {
        self.adaptive_width.unwrap_or(0)
    }

    /// Return `true` when an adaptive element is being asked for its final
    /// content.
    pub fn is_adaptive_width(&self) -> bool {
        self.adaptive_width.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// When the snapshot was taken.
    pub fn time(&self) -> Instant {
        self.time
    }

    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Time between bar start and this snapshot.
    pub fn elapsed(&self) -> Duration {
        self.time.saturating_duration_since(self.start_time)
    }

    /// Look up a variable.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    /// Boolean variable, `false` when absent or not a boolean.
    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Bool(true)))
    }

    /// Variable rendered as text, empty when absent.
    pub fn get_string(&self, key: &str) -> String {
        self.get(key).map(ToString::to_string).unwrap_or_default()
    }

    /// Format a counter value according to the bar's unit settings.
    pub fn format(&self, value: i64) -> String {
        if !self.get_bool(BYTES) {
            return value.to_string();
        }
        let sign = if value < 0 { "-" } else { "" };
        let magnitude = value.unsigned_abs();
        if self.get_bool(SI_BYTES_PREFIX) {
            format!("{sign}{}", DecimalBytes(magnitude))
        } else {
            format!("{sign}{}", BinaryBytes(magnitude))
        }
    }
}
