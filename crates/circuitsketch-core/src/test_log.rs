//! Capturing logger for tests.
//!
//! Records are kept per thread so tests running in parallel do not see
//! each other's warnings.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::cell::RefCell;
use std::sync::Once;

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Handle onto the current thread's captured records.
pub struct Capture;

impl Capture {
    /// Captured warning messages, oldest first.
    pub fn warnings(&self) -> Vec<String> {
        self.at(Level::Warn)
    }

    /// Captured error messages, oldest first.
    pub fn errors(&self) -> Vec<String> {
        self.at(Level::Error)
    }

    fn at(&self, level: Level) -> Vec<String> {
        RECORDS.with(|r| {
            r.borrow()
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, m)| m.clone())
                .collect()
        })
    }
}

/// Install the capturing logger (once per process) and clear this thread's
/// buffer.
pub fn capture() -> Capture {
    INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|r| r.borrow_mut().clear());
    Capture
}
