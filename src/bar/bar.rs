use super::vars::{Value, Variables};
use super::State;
use crate::error::{Error, Result};
use crate::template::{Registry, Template};
use crate::utils::terminal;

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Template bound to bars that were never given one.
///
/// `Prefix 20 / 100 [-->______] 20.00% 1 p/s Suffix`
pub const DEFAULT_TEMPLATE: &str = r#"{{string . "prefix"}}{{counters . }} {{bar . }} {{percent . }} {{speed . }}{{string . "suffix"}}"#;

/// Line width used when no width is set and the terminal cannot be queried.
pub const DEFAULT_WIDTH: usize = 100;

/// Everything guarded by the configuration lock.
#[derive(Default)]
pub(crate) struct Config {
    width: usize,
    max_width: usize,
    vars: Arc<Variables>,
    template: Option<Arc<Template>>,
    pub(crate) start_time: Option<Instant>,
    pub(crate) err: Option<Error>,
}

impl Config {
    pub(crate) fn template(&self) -> Option<Arc<Template>> {
        self.template.clone()
    }

    pub(crate) fn vars(&self) -> Arc<Variables> {
        Arc::clone(&self.vars)
    }
}

/// A single progress indicator.
///
/// Counter updates ([`add`](Bar::add), [`inc`](Bar::inc),
/// [`set_current`](Bar::set_current), [`set_total`](Bar::set_total)) are
/// lock-free. Once the current value reaches the total the bar latches as
/// finished and stays finished.
pub struct Bar {
    current: AtomicI64,
    total: AtomicI64,
    finished: AtomicBool,
    config: RwLock<Config>,
    /// Held for a whole render; stores the last render id.
    render_id: Mutex<u64>,
    registry: Arc<Registry>,
}

impl fmt::Debug for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bar")
            .field("current", &self.current())
            .field("total", &self.total())
            .field("finished", &self.is_finished())
            .finish()
    }
}

impl Bar {
    /// Create a bar using the process-wide [`Registry`].
    pub fn new(total: i64) -> Self {
        Self::with_registry(total, Registry::global())
    }

    /// Create a bar whose templates compile against `registry`.
    ///
    /// A total of zero or less yields a bar that is already finished.
    pub fn with_registry(total: i64, registry: Arc<Registry>) -> Self {
        let bar = Self {
            current: AtomicI64::new(0),
            total: AtomicI64::new(total),
            finished: AtomicBool::new(false),
            config: RwLock::new(Config::default()),
            render_id: Mutex::new(0),
            registry,
        };
        bar.latch(0, total);
        bar
    }

    /// Create a bar with the default template and start it.
    pub fn start_new(total: i64) -> Self {
        let bar = Self::new(total);
        bar.start();
        bar
    }

    /// Create a bar bound to `template`.
    ///
    /// A template that fails to compile is recorded on the bar, see
    /// [`set_template`](Bar::set_template).
    pub fn with_template(total: i64, template: &str) -> Self {
        let bar = Self::new(total);
        if let Err(err) = bar.set_template(template) {
            warn!("Bar template rejected: {}", err);
        }
        bar
    }

    pub(crate) fn read_config(&self) -> RwLockReadGuard<'_, Config> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write_config(&self) -> RwLockWriteGuard<'_, Config> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn lock_render(&self) -> MutexGuard<'_, u64> {
        self.render_id.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind the default template if none is set.
    pub(crate) fn configure(&self, config: &mut Config) {
        if config.template.is_some() || config.err.is_some() {
            return;
        }
        match self.registry.compile(DEFAULT_TEMPLATE) {
            Ok(template) => config.template = Some(template),
            Err(err) => config.err = Some(err),
        }
    }

    /// Start the bar.
    ///
    /// Binds the default template if needed, clears any recorded error and
    /// resets the start time and render id. Starting a finished bar does
    /// nothing beyond binding the template.
    pub fn start(&self) -> &Self {
        {
            let mut config = self.write_config();
            if self.is_finished() {
                self.configure(&mut config);
                return self;
            }
            config.err = None;
            self.configure(&mut config);
            config.start_time = Some(Instant::now());
        }
        *self.lock_render() = 0;
        debug!("Bar started with total {}", self.total());
        self
    }

    /// Mark the bar as finished. Idempotent.
    pub fn finish(&self) -> &Self {
        self.finished.store(true, Ordering::SeqCst);
        self
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Return `true` once the bar was started or rendered.
    pub fn is_started(&self) -> bool {
        self.read_config().start_time.is_some()
    }

    fn latch(&self, current: i64, total: i64) {
        if current >= total {
            self.finish();
        }
    }

    pub fn total(&self) -> i64 {
        self.total.load(Ordering::SeqCst)
    }

    pub fn set_total(&self, value: i64) -> &Self {
        self.total.store(value, Ordering::SeqCst);
        self.latch(self.current(), value);
        self
    }

    pub fn current(&self) -> i64 {
        self.current.load(Ordering::SeqCst)
    }

    pub fn set_current(&self, value: i64) -> &Self {
        self.current.store(value, Ordering::SeqCst);
        self.latch(value, self.total());
        self
    }

    /// Add `value` to the current value.
    pub fn add(&self, value: i64) -> &Self {
        let current = self
            .current
            .fetch_add(value, Ordering::SeqCst)
            .wrapping_add(value);
        self.latch(current, self.total());
        self
    }

    /// Increment the current value by one.
    pub fn inc(&self) -> &Self {
        self.add(1)
    }

    /// Store a variable for elements to read.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        let mut config = self.write_config();
        Arc::make_mut(&mut config.vars).insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read_config().vars.get(key).cloned()
    }

    /// Boolean variable, `false` when absent or of another type.
    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Bool(true)))
    }

    /// Integer variable, `0` when absent or of another type.
    pub fn get_int(&self, key: &str) -> i64 {
        match self.get(key) {
            Some(Value::Int(i)) => i,
            _ => 0,
        }
    }

    /// Any variable as text, empty when absent.
    pub fn get_string(&self, key: &str) -> String {
        self.get(key).map(|v| v.to_string()).unwrap_or_default()
    }

    /// Duration variable, zero when absent or of another type.
    pub fn get_duration(&self, key: &str) -> Duration {
        match self.get(key) {
            Some(Value::Duration(d)) => d,
            _ => Duration::ZERO,
        }
    }

    /// Set the line width. `0` means the terminal width.
    pub fn set_width(&self, width: usize) -> &Self {
        self.write_config().width = width;
        self
    }

    /// Cap the line width. `0` removes the cap.
    pub fn set_max_width(&self, max_width: usize) -> &Self {
        self.write_config().max_width = max_width;
        self
    }

    /// The line width the next render will use.
    ///
    /// The explicit width if set, else the terminal width, else
    /// [`DEFAULT_WIDTH`]; then capped by the max width.
    pub fn width(&self) -> usize {
        let (width, max_width) = {
            let config = self.read_config();
            (config.width, config.max_width)
        };
        let width = if width > 0 {
            width
        } else {
            terminal::width().unwrap_or_else(|err| {
                trace!("{}, using default width {}", err, DEFAULT_WIDTH);
                DEFAULT_WIDTH
            })
        };
        if max_width > 0 && width > max_width {
            max_width
        } else {
            width
        }
    }

    /// When the bar was started, or first rendered.
    pub fn start_time(&self) -> Option<Instant> {
        self.read_config().start_time
    }

    /// Format a value according to the bar's unit settings.
    pub fn format(&self, value: i64) -> String {
        let vars = self.read_config().vars();
        State::new(0, 0, 0).with_vars(vars).format(value)
    }

    /// Compile and bind a template.
    ///
    /// On failure the error is also recorded on the bar, and renders yield
    /// nothing until a valid template is set or the bar is restarted.
    pub fn set_template(&self, source: &str) -> Result<()> {
        self.bind_template(self.registry.compile(source))
    }

    /// Like [`set_template`](Bar::set_template), but compiles `source`
    /// again so elements registered since it was first cached are used.
    pub fn reload_template(&self, source: &str) -> Result<()> {
        self.bind_template(self.registry.recompile(source))
    }

    fn bind_template(&self, compiled: Result<Arc<Template>>) -> Result<()> {
        let mut config = self.write_config();
        match compiled {
            Ok(template) => {
                config.template = Some(template);
                config.err = None;
                Ok(())
            }
            Err(err) => {
                config.template = None;
                config.err = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Record an error on the bar.
    pub fn set_err(&self, err: Error) -> &Self {
        self.write_config().err = Some(err);
        self
    }

    /// The last recorded error, if any.
    pub fn err(&self) -> Option<Error> {
        self.read_config().err.clone()
    }
}
