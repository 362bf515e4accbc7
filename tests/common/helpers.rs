use pbar::bar::Variables;
use pbar::element::{adaptive_fn, element_fn};
use pbar::utils::fill_to_width;
use pbar::{Bar, Registry, State, Value};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

// Common test constants
pub const TEST_WIDTH: usize = 40;
pub const CLEAR_LINE_UP: &str = "\x1b[1A\x1b[2K";

/// In-memory sink that stays readable while a compositor writes to it.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, as text.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// The last frame written, i.e. the text after the last clear sequence.
    pub fn last_frame(&self) -> String {
        let contents = self.contents();
        match contents.rfind(CLEAR_LINE_UP) {
            Some(i) => contents[i + CLEAR_LINE_UP.len()..].to_string(),
            None => contents,
        }
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// === Registry Helpers ===

/// Creates an isolated registry with the built-ins plus test elements:
///
/// - `fill` (adaptive): `#` repeated to the allotted width
/// - `status`: `done` once the bar is finished, `run` before
/// - `upper` (filter): joined arguments in upper case
/// - `join` (filter): arguments joined with commas
pub fn create_registry() -> Arc<Registry> {
    let registry = Registry::new();
    registry.register_element(
        "fill",
        adaptive_fn(|state, _args| Ok(fill_to_width("#", state.adaptive_width()))),
    );
    registry.register_element(
        "status",
        element_fn(|state, _args| {
            Ok(if state.is_finished() { "done" } else { "run" }.to_string())
        }),
    );
    registry.register_filter("upper", |args: &[String]| args.concat().to_uppercase());
    registry.register_filter("join", |args: &[String]| args.join(","));
    Arc::new(registry)
}

// === Bar Helpers ===

/// Creates a started bar with an isolated registry, a fixed width and the given template.
pub fn create_test_bar(total: i64, template: &str) -> Bar {
    let bar = Bar::with_registry(total, create_registry());
    bar.set_width(TEST_WIDTH);
    bar.set_template(template).expect("test template should compile");
    bar.start();
    bar
}

// === State Helpers ===

/// Creates a snapshot carrying the given variables.
pub fn create_test_state_with_vars(
    current: i64,
    total: i64,
    width: usize,
    vars: &[(&str, Value)],
) -> State {
    let vars: Variables = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    State::new(current, total, width).with_vars(Arc::new(vars))
}

// === Assertion Helpers ===

/// Asserts that a string occupies exactly `expected` terminal cells.
pub fn assert_cell_width(s: &str, expected: usize) {
    assert_eq!(
        pbar::cell_count(s),
        expected,
        "Cell width mismatch for {:?}",
        s
    );
}
