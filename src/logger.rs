//! Diagnostics go to stderr so stdout only ever carries the JSON documents.

use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};
use std::io::{self, Write};

pub struct StderrLogger {
    max_level: LevelFilter,
}

impl StderrLogger {
    /// `verbose` turns on the loader and vectorizer debug lines.
    pub fn new(verbose: bool) -> Self {
        let max_level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        };
        Self { max_level }
    }

    pub fn max_level(&self) -> LevelFilter {
        self.max_level
    }

    pub fn format(record: &Record) -> String {
        format!(
            "[{:<5} {}] {}",
            record.level(),
            record.target(),
            record.args()
        )
    }

    /// Installs as the process-wide logger. Fails if one is already set.
    pub fn install(self) -> Result<()> {
        let level = self.max_level;
        log::set_boxed_logger(Box::new(self)).context("Failed to install logger")?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}", Self::format(record));
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}
