//! A small printf-style formatter for element format patterns.
//!
//! Elements such as `counters` and `percent` accept user supplied patterns
//! like `"%s / %s"`, `"%.3s/%s"` or `"%.02f%%"`. The supported subset is:
//!
//! - `%%` for a literal percent sign,
//! - flags `-` (left justify) and `0` (zero pad numbers),
//! - an explicit 1-based argument index `[n]`,
//! - a minimum width and a `.precision`,
//! - verbs `s`, `v`, `d` and `f`.
//!
//! Widths are measured in terminal cells. Anything else is a
//! [`Error::Render`].
//!
//! ```rust
//! use pbar::utils::format::{sprintf, FormatArg};
//!
//! let out = sprintf("%.3s/%s", &["1234".into(), "100".into()]).unwrap();
//! assert_eq!(out, "123/100");
//! ```

use super::cells::cell_count;
use crate::error::{Error, Result};
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// A value that can be substituted into a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArg {
    Str(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for FormatArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatArg::Str(s) => f.write_str(s),
            FormatArg::Int(i) => write!(f, "{i}"),
            FormatArg::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for FormatArg {
    fn from(s: &str) -> Self {
        FormatArg::Str(s.to_string())
    }
}

impl From<String> for FormatArg {
    fn from(s: String) -> Self {
        FormatArg::Str(s)
    }
}

impl From<i64> for FormatArg {
    fn from(i: i64) -> Self {
        FormatArg::Int(i)
    }
}

impl From<f64> for FormatArg {
    fn from(v: f64) -> Self {
        FormatArg::Float(v)
    }
}

#[derive(Debug, Default)]
struct Spec {
    left: bool,
    zero: bool,
    index: Option<usize>,
    width: Option<usize>,
    precision: Option<usize>,
}

fn digits(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
        chars.next();
    }
    value
}

fn parse_spec(chars: &mut Peekable<Chars<'_>>) -> Result<Spec> {
    let mut spec = Spec::default();
    while let Some(&c) = chars.peek() {
        match c {
            '-' => spec.left = true,
            '0' => spec.zero = true,
            _ => break,
        }
        chars.next();
    }
    if chars.peek() == Some(&'[') {
        chars.next();
        let index = digits(chars).filter(|i| *i > 0);
        if chars.next() != Some(']') || index.is_none() {
            return Err(Error::render("bad argument index in format pattern"));
        }
        spec.index = index;
    }
    spec.width = digits(chars);
    if chars.peek() == Some(&'.') {
        chars.next();
        spec.precision = Some(digits(chars).unwrap_or(0));
    }
    Ok(spec)
}

fn justify(body: String, spec: &Spec, numeric: bool) -> String {
    let width = match spec.width {
        Some(w) => w,
        None => return body,
    };
    let len = cell_count(&body);
    if len >= width {
        return body;
    }
    let gap = width - len;
    if spec.left {
        format!("{body}{}", " ".repeat(gap))
    } else if spec.zero && numeric {
        match body.strip_prefix('-') {
            Some(digits) => format!("-{}{digits}", "0".repeat(gap)),
            None => format!("{}{body}", "0".repeat(gap)),
        }
    } else {
        format!("{}{body}", " ".repeat(gap))
    }
}

fn render_verb(verb: char, arg: &FormatArg, spec: &Spec) -> Result<String> {
    match verb {
        's' | 'v' => {
            let text = arg.to_string();
            let text = match spec.precision {
                Some(p) => text.chars().take(p).collect(),
                None => text,
            };
            Ok(justify(text, spec, false))
        }
        'd' => match arg {
            FormatArg::Int(i) => Ok(justify(i.to_string(), spec, true)),
            other => Err(Error::render(format!("%d used with non-integer {other:?}"))),
        },
        'f' => {
            let value = match arg {
                FormatArg::Float(v) => *v,
                FormatArg::Int(i) => *i as f64,
                other => return Err(Error::render(format!("%f used with non-number {other:?}"))),
            };
            let precision = spec.precision.unwrap_or(6);
            Ok(justify(format!("{value:.precision$}"), spec, true))
        }
        other => Err(Error::render(format!("unsupported format verb %{other}"))),
    }
}

/// Substitute `args` into `pattern`.
///
/// Unused arguments are ignored so that patterns may pick a subset with
/// explicit indexes, e.g. `"%[1]s"`.
pub fn sprintf(pattern: &str, args: &[FormatArg]) -> Result<String> {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }
        let spec = parse_spec(&mut chars)?;
        let verb = chars
            .next()
            .ok_or_else(|| Error::render("format pattern ends inside a verb"))?;
        let position = spec.index.map_or(next_arg, |i| i - 1);
        next_arg = position + 1;
        let arg = args
            .get(position)
            .ok_or_else(|| Error::render(format!("missing argument for %{verb}")))?;
        out.push_str(&render_verb(verb, arg, &spec)?);
    }
    Ok(out)
}
