//! Built-in elements.
//!
//! | name       | arguments                                         |
//! |------------|---------------------------------------------------|
//! | `counters` | `[fmt_known_total] [fmt_unknown_total]`           |
//! | `bar`      | `[start] [fill] [current] [empty] [end]` adaptive |
//! | `percent`  | `[fmt]`                                           |
//! | `speed`    | `[fmt] [fmt_finished] [unknown]`                  |
//! | `rtime`    | `[fmt] [fmt_finished] [unknown]`                  |
//! | `etime`    | `[fmt]`                                           |
//! | `string`   | `key`                                             |
//! | `cycle`    | `frame...`                                        |
//!
//! Format arguments are [`sprintf`] patterns.

use super::{adaptive_fn, arg_or, element_fn, non_empty_arg_or, Element};
use crate::bar::vars::BYTES;
use crate::bar::State;
use crate::error::Result;
use crate::utils::{cell_count, fill_to_width, sprintf, strip_string};

use indicatif::HumanDuration;
use std::sync::Arc;
use std::time::Duration;

/// Width of `bar` when it is rendered outside adaptive resolution.
const STANDALONE_BAR_WIDTH: usize = 30;

/// All built-in elements with their template names.
pub fn elements() -> Vec<(&'static str, Arc<dyn Element>)> {
    vec![
        ("counters", Arc::new(element_fn(counters)) as Arc<dyn Element>),
        ("bar", Arc::new(adaptive_fn(bar)) as Arc<dyn Element>),
        ("percent", Arc::new(element_fn(percent)) as Arc<dyn Element>),
        ("speed", Arc::new(element_fn(speed)) as Arc<dyn Element>),
        ("rtime", Arc::new(element_fn(remaining_time)) as Arc<dyn Element>),
        ("etime", Arc::new(element_fn(elapsed_time)) as Arc<dyn Element>),
        ("string", Arc::new(element_fn(string)) as Arc<dyn Element>),
        ("cycle", Arc::new(element_fn(cycle)) as Arc<dyn Element>),
    ]
}

/// Current and total values, e.g. `20 / 100`.
pub fn counters(state: &State, args: &[String]) -> Result<String> {
    let pattern = if state.total() > 0 {
        non_empty_arg_or(args, 0, "%s / %s")
    } else {
        non_empty_arg_or(args, 1, "%[1]s")
    };
    sprintf(
        pattern,
        &[
            state.format(state.value()).into(),
            state.format(state.total()).into(),
        ],
    )
}

/// The bar itself, e.g. `[=====>____]`, filling the allotted width.
pub fn bar(state: &State, args: &[String]) -> Result<String> {
    let start = arg_or(args, 0, "[");
    let fill = arg_or(args, 1, "-");
    let current = arg_or(args, 2, ">");
    let empty = arg_or(args, 3, "_");
    let end = arg_or(args, 4, "]");

    let width = if state.is_adaptive_width() {
        state.adaptive_width()
    } else {
        STANDALONE_BAR_WIDTH
    };
    let borders = cell_count(start) + cell_count(end);
    if borders >= width {
        return Ok(strip_string(&format!("{start}{end}"), width));
    }
    let inner = width - borders;

    let value = state.value().unsigned_abs();
    let total = match state.total().unsigned_abs() {
        t if t != 0 && value > t => value,
        t => t,
    };
    let done = if total > 0 {
        ((value as f64 / total as f64) * inner as f64).ceil() as usize
    } else {
        0
    }
    .min(inner);

    let mut out = String::from(start);
    let current_width = cell_count(current);
    if done > 0 {
        if (state.is_finished() && value == total) || current_width == 0 {
            out.push_str(&fill_to_width(fill, done));
        } else if done > current_width {
            out.push_str(&fill_to_width(fill, done - current_width));
            out.push_str(current);
        } else {
            out.push_str(&strip_string(current, done));
        }
    }
    out.push_str(&fill_to_width(empty, inner - done));
    out.push_str(end);
    Ok(out)
}

/// Completion percentage, `0` when the total is unknown.
pub fn percent(state: &State, args: &[String]) -> Result<String> {
    let percent = if state.total() > 0 {
        state.value() as f64 / state.total() as f64 * 100.0
    } else {
        0.0
    };
    sprintf(non_empty_arg_or(args, 0, "%.02f%%"), &[percent.into()])
}

/// Average units per second since the bar started.
fn average_speed(state: &State) -> f64 {
    let secs = state.elapsed().as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    state.value() as f64 / secs
}

/// Average throughput, e.g. `12 p/s` or `1.00 MiB/s` in bytes mode.
pub fn speed(state: &State, args: &[String]) -> Result<String> {
    let default = if state.get_bool(BYTES) { "%s/s" } else { "%s p/s" };
    let speed = average_speed(state);
    if state.is_finished() {
        return sprintf(
            non_empty_arg_or(args, 1, default),
            &[state.format(speed.round() as i64).into()],
        );
    }
    if speed <= 0.0 {
        return Ok(non_empty_arg_or(args, 2, "? p/s").to_string());
    }
    sprintf(
        non_empty_arg_or(args, 0, default),
        &[state.format(speed.round() as i64).into()],
    )
}

fn whole_seconds(d: Duration) -> String {
    HumanDuration(Duration::from_secs(d.as_secs())).to_string()
}

/// Estimated time left at the average speed; elapsed time once finished.
pub fn remaining_time(state: &State, args: &[String]) -> Result<String> {
    if state.is_finished() {
        return sprintf(
            non_empty_arg_or(args, 1, "%s"),
            &[whole_seconds(state.elapsed()).into()],
        );
    }
    let speed = average_speed(state);
    if speed <= 0.0 || state.total() <= 0 {
        return Ok(non_empty_arg_or(args, 2, "?").to_string());
    }
    let remaining = (state.total() - state.value()).max(0) as f64 / speed;
    let eta = Duration::try_from_secs_f64(remaining).unwrap_or(Duration::MAX);
    sprintf(non_empty_arg_or(args, 0, "%s"), &[whole_seconds(eta).into()])
}

/// Time since the bar started.
pub fn elapsed_time(state: &State, args: &[String]) -> Result<String> {
    sprintf(
        non_empty_arg_or(args, 0, "%s"),
        &[whole_seconds(state.elapsed()).into()],
    )
}

/// A variable from the bar's store, empty when unset.
pub fn string(state: &State, args: &[String]) -> Result<String> {
    Ok(args
        .first()
        .map(|key| state.get_string(key))
        .unwrap_or_default())
}

/// One frame per render, looping over the arguments.
pub fn cycle(state: &State, args: &[String]) -> Result<String> {
    if args.is_empty() {
        return Ok(String::new());
    }
    let frame = (state.id().saturating_sub(1) % args.len() as u64) as usize;
    Ok(args[frame].clone())
}
