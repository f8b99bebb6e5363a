//! Minimal stderr logger
//!
//! Generated artifacts may go to stdout, so diagnostics never do.

use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the logger. Repeated calls only adjust the level.
pub fn init(level: LevelFilter) {
    // A logger is already set when called twice in one process
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
