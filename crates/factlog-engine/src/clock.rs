//! Wall-clock capture for log entries.
//!
//! The watcher samples the clock once per tick. [`SystemClock`] formats the
//! local time with `chrono`; [`ManualClock`] returns whatever it was last set
//! to and is meant for tests.

use std::cell::RefCell;

/// Default `chrono` format for the real-time column.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the human-readable capture time.
pub trait Clock {
    fn wall_clock(&self) -> String;
}

/// The local system time.
#[derive(Debug, Clone)]
pub struct SystemClock {
    format: String,
}

impl SystemClock {
    /// A clock using a custom `chrono` format string.
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::with_format(DEFAULT_TIME_FORMAT)
    }
}

impl Clock for SystemClock {
    fn wall_clock(&self) -> String {
        chrono::Local::now().format(&self.format).to_string()
    }
}

/// A clock that only changes when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: RefCell<String>,
}

impl ManualClock {
    pub fn new(now: impl Into<String>) -> Self {
        Self {
            now: RefCell::new(now.into()),
        }
    }

    pub fn set(&self, now: impl Into<String>) {
        *self.now.borrow_mut() = now.into();
    }
}

impl Clock for ManualClock {
    fn wall_clock(&self) -> String {
        self.now.borrow().clone()
    }
}
