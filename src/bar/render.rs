//! Single-bar rendering.
//!
//! One render takes the bar's render lock for its whole duration, builds a
//! fresh [`State`], runs the template, resolves adaptive elements and pads
//! the line to the bar width. Faults, including panics inside elements,
//! are recorded on the bar instead of reaching the caller.
//!
//! The first render installs a panic hook that stays silent for panics
//! raised while a bar is rendering, so they do not print over the frames
//! drawn on stderr. Every other panic goes to the previously installed
//! hook.

use super::{Bar, State};
use crate::error::{Error, Result};
use crate::template::adaptive::resolve;
use crate::utils::pad_to_width;

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use std::time::Instant;
use tracing::warn;

thread_local! {
    static RENDERING: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !RENDERING.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

impl Bar {
    /// Render the bar's line.
    ///
    /// Returns the line and the width it was padded to. A bar carrying an
    /// error returns that error without rendering; a failed render records
    /// its error on the bar.
    pub fn render(&self) -> Result<(String, usize)> {
        let mut render_id = self.lock_render();

        let (template, vars, start_time, now) = {
            let mut config = self.write_config();
            self.configure(&mut config);
            if let Some(err) = &config.err {
                return Err(err.clone());
            }
            let template = config
                .template()
                .ok_or_else(|| Error::render("bar has no template"))?;
            let now = Instant::now();
            let start_time = *config.start_time.get_or_insert(now);
            (template, config.vars(), start_time, now)
        };
        *render_id += 1;

        let width = self.width();
        let finished = self.is_finished();
        let state = State::new(self.current(), self.total(), width)
            .with_id(*render_id)
            .with_finished(finished)
            .with_time(now)
            .with_start_time(start_time)
            .with_vars(vars);

        install_quiet_hook();
        let was_rendering = RENDERING.with(|r| r.replace(true));
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let first_pass = template.execute(&state)?;
            resolve(first_pass.text, &first_pass.pending, &state)
        }));
        RENDERING.with(|r| r.set(was_rendering));
        let outcome = outcome.unwrap_or_else(|payload| {
            Err(Error::render(format!(
                "render panic: {}",
                panic_message(payload.as_ref())
            )))
        });

        match outcome {
            Ok(line) => Ok((pad_to_width(line, width), width)),
            Err(err) => {
                warn!("Bar render failed: {}", err);
                self.set_err(err.clone());
                Err(err)
            }
        }
    }

    /// The bar's current line, empty if rendering fails.
    pub fn string(&self) -> String {
        self.render().map(|(line, _)| line).unwrap_or_default()
    }
}

impl std::fmt::Display for Bar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.string())
    }
}
