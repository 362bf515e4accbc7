//! Per-bar variable store.
//!
//! Producers attach values to a bar under string keys and elements read
//! them back while rendering, e.g. `{{string . "prefix"}}`. Values are a
//! small closed set of types rather than arbitrary objects.

use indicatif::HumanDuration;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Render values as binary byte sizes (`KiB`, `MiB`, ...).
pub const BYTES: &str = "bytes";

/// With [`BYTES`] set, use decimal prefixes (`kB`, `MB`, ...) instead.
pub const SI_BYTES_PREFIX: &str = "si_bytes_prefix";

/// The key/value map attached to a bar.
pub type Variables = HashMap<String, Value>;

/// A value stored in a bar's variable store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Str(String),
    Bool(bool),
    Duration(Duration),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Duration(d) => write!(f, "{}", HumanDuration(*d)),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}
