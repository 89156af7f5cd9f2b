// Test-only logger: records every log line emitted on the current thread

use std::cell::RefCell;

use log::{Level, LevelFilter, Log, Metadata, Record};

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED.with(|captured| {
            captured
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Run `f` and return its result with the log lines it emitted
///
/// Lines are kept per thread, so parallel tests do not see each other's output.
pub fn capture_logs<T, F: FnOnce() -> T>(f: F) -> (T, Vec<(Level, String)>) {
    // Already installed by an earlier test is fine
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Trace);

    CAPTURED.with(|captured| captured.borrow_mut().clear());
    let result = f();
    let logs = CAPTURED.with(|captured| captured.borrow_mut().drain(..).collect());

    (result, logs)
}
