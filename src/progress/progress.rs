//! The multi-bar compositor.
//!
//! A [`Progress`] owns an ordered list of bars and, once started, one
//! background task that redraws all of them every refresh interval.
//! [`finish_all`](Progress::finish_all) stops that task and waits until a
//! final frame, with every bar finished, has been written.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pbar::progress::ProgressBuilder;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let progress = ProgressBuilder::new().build();
//! let first = progress.add_bar(100);
//! let second = progress.add_bar(250);
//! progress.start();
//!
//! let worker = std::thread::spawn(move || {
//!     for _ in 0..100 {
//!         first.inc();
//!     }
//! });
//! second.add(250);
//! worker.join().unwrap();
//!
//! progress.finish_all().await;
//! # }
//! ```

use super::builder::ProgressBuilder;
use super::config::ProgressConfig;
use super::writer::LiveWriter;
use crate::bar::Bar;
use crate::error::Error;

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, trace, warn};

type Bars = Arc<RwLock<Vec<Arc<Bar>>>>;

static GLOBAL: OnceLock<Arc<Progress>> = OnceLock::new();

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle on the running redraw task.
struct RedrawTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Container that periodically redraws a set of bars.
pub struct Progress {
    config: ProgressConfig,
    interval: Mutex<Duration>,
    bars: Bars,
    writer: Arc<Mutex<LiveWriter>>,
    task: Mutex<Option<RedrawTask>>,
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("config", &self.config)
            .field("bars", &self.bars().len())
            .field("running", &self.is_running())
            .finish()
    }
}

impl Progress {
    /// Creates a compositor; see [`ProgressBuilder`](super::ProgressBuilder).
    pub(crate) fn new(config: ProgressConfig, output: Box<dyn Write + Send>) -> Self {
        Self {
            interval: Mutex::new(config.refresh_interval),
            config,
            bars: Arc::new(RwLock::new(Vec::new())),
            writer: Arc::new(Mutex::new(LiveWriter::new(output))),
            task: Mutex::new(None),
        }
    }

    /// The process-wide compositor, built with the default options on
    /// first use. Backs [`add_bar`], [`start`] and [`finish_all`].
    pub fn global() -> Arc<Progress> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ProgressBuilder::new().build())))
    }

    /// Create a bar with the configured width and template and append it.
    ///
    /// A template that fails to compile is recorded on the bar.
    pub fn add_bar(&self, total: i64) -> Arc<Bar> {
        let bar = Arc::new(Bar::with_registry(
            total,
            Arc::clone(&self.config.registry),
        ));
        bar.set_width(self.config.width);
        if let Err(err) = bar.set_template(&self.config.template) {
            warn!("Bar template rejected: {}", err);
        }
        self.bars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&bar));
        bar
    }

    /// The registered bars, in display order.
    pub fn bars(&self) -> Vec<Arc<Bar>> {
        self.bars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Draw subsequent frames to `output`.
    pub fn set_output<W>(&self, output: W)
    where
        W: Write + Send + 'static,
    {
        lock(&self.writer).set_output(output);
    }

    /// Change the refresh interval. Takes effect on the next
    /// [`start`](Progress::start).
    pub fn set_refresh_interval(&self, interval: Duration) {
        *lock(&self.interval) = interval;
    }

    pub fn refresh_interval(&self) -> Duration {
        *lock(&self.interval)
    }

    /// Return `true` while the redraw task is running.
    pub fn is_running(&self) -> bool {
        lock(&self.task).is_some()
    }

    /// Start every registered bar and launch the redraw task.
    ///
    /// Does nothing if already running.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn start(&self) {
        let mut task = lock(&self.task);
        if task.is_some() {
            debug!("Progress already running");
            return;
        }
        for bar in self.bars() {
            bar.start();
        }

        let interval = self.refresh_interval().max(Duration::from_millis(1));
        let (shutdown, signal) = oneshot::channel();
        let handle = tokio::spawn(redraw(
            Arc::clone(&self.bars),
            Arc::clone(&self.writer),
            interval,
            signal,
        ));
        *task = Some(RedrawTask { shutdown, handle });
        debug!("Progress started, redrawing every {:?}", interval);
    }

    /// Finish every bar and wait for the final frame to be written.
    ///
    /// Without a running redraw task the final frame is drawn directly.
    pub async fn finish_all(&self) {
        let task = lock(&self.task).take();
        match task {
            Some(RedrawTask { shutdown, handle }) => {
                // The task also shuts down when the sender is dropped.
                let _ = shutdown.send(());
                if let Err(err) = handle.await {
                    warn!("Redraw task ended abnormally: {}", err);
                }
            }
            None => {
                finish_bars(&self.bars);
                draw(&self.bars, &self.writer);
            }
        }
        debug!("Progress finished");
    }
}

/// Add a bar to the [global](Progress::global) compositor.
pub fn add_bar(total: i64) -> Arc<Bar> {
    Progress::global().add_bar(total)
}

/// Start the [global](Progress::global) compositor.
///
/// # Panics
///
/// Panics when called outside a Tokio runtime.
pub fn start() {
    Progress::global().start();
}

/// Finish every bar of the [global](Progress::global) compositor and wait
/// for its final frame.
pub async fn finish_all() {
    Progress::global().finish_all().await;
}

/// Redraw loop run by the background task.
async fn redraw(
    bars: Bars,
    writer: Arc<Mutex<LiveWriter>>,
    interval: Duration,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                finish_bars(&bars);
                draw(&bars, &writer);
                return;
            }
            _ = ticker.tick() => draw(&bars, &writer),
        }
    }
}

fn finish_bars(bars: &RwLock<Vec<Arc<Bar>>>) {
    for bar in bars.read().unwrap_or_else(PoisonError::into_inner).iter() {
        bar.finish();
    }
}

/// One line per bar; a bar that fails to render shows as an empty line.
fn compose(bars: &[Arc<Bar>]) -> String {
    let mut frame = String::new();
    for bar in bars {
        if let Ok((line, _)) = bar.render() {
            frame.push_str(&line);
        }
        frame.push('\n');
    }
    frame
}

fn draw(bars: &RwLock<Vec<Arc<Bar>>>, writer: &Mutex<LiveWriter>) {
    let frame = compose(&bars.read().unwrap_or_else(PoisonError::into_inner));
    if frame.is_empty() {
        return;
    }
    trace!("Drawing frame of {} bytes", frame.len());
    let mut writer = lock(writer);
    if let Err(err) = writer
        .write_all(frame.as_bytes())
        .and_then(|()| writer.flush())
    {
        warn!("Failed to draw progress frame: {}", Error::from(err));
    }
}
