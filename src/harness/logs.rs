//! Synthetic log entry generation.
//!
//! Each entry is a single `tracing` event. Messages carry the severity name
//! and position (`"WARN log entry 3 of 10: ..."`) so a downstream pipeline can
//! check both level parsing and message parsing against the same record.

use std::fmt;

use crate::harness::random::RandomSource;

/// Number of severity classes drawn from when generating entries.
const SEVERITY_CLASSES: u64 = Severity::ALL.len() as u64;

/// Upper bound (exclusive) of the random value attached to DEBUG entries.
const DEBUG_VALUE_BOUND: u64 = 1000;

/// Log severity, ordered by increasing importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
}

impl Severity {
    /// Every generated severity, indexed by draw. ERROR is reserved for the
    /// error simulation path and never generated.
    pub const ALL: [Severity; 4] = [Self::Trace, Self::Debug, Self::Info, Self::Warn];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
        }
    }

    pub fn as_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many entries of each severity a generation run emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelTally {
    pub trace: u64,
    pub debug: u64,
    pub info: u64,
    pub warn: u64,
}

impl LevelTally {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Trace => self.trace += 1,
            Severity::Debug => self.debug += 1,
            Severity::Info => self.info += 1,
            Severity::Warn => self.warn += 1,
        }
    }

    pub fn get(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Trace => self.trace,
            Severity::Debug => self.debug,
            Severity::Info => self.info,
            Severity::Warn => self.warn,
        }
    }

    pub fn total(&self) -> u64 {
        self.trace + self.debug + self.info + self.warn
    }
}

/// Emit one synthetic entry. `index` is 1-based.
///
/// DEBUG entries draw a fresh value from `rng`; other severities draw nothing.
pub fn emit_entry(severity: Severity, index: u64, total: u64, rng: &dyn RandomSource) {
    match severity {
        Severity::Trace => {
            tracing::trace!(entry = index, total, "TRACE log entry {index} of {total}");
        }
        Severity::Debug => {
            let value = rng.below(DEBUG_VALUE_BOUND);
            tracing::debug!(
                entry = index,
                total,
                value,
                "DEBUG log entry {index} of {total}: Random value = {value}"
            );
        }
        Severity::Info => {
            tracing::info!(
                entry = index,
                total,
                "INFO log entry {index} of {total}: Operation completed successfully"
            );
        }
        Severity::Warn => {
            tracing::warn!(
                entry = index,
                total,
                "WARN log entry {index} of {total}: Potential issue detected"
            );
        }
    }
}

/// Emit `count` entries with uniformly drawn severities.
pub fn generate(count: u64, rng: &dyn RandomSource) -> LevelTally {
    let mut tally = LevelTally::default();
    for index in 1..=count {
        let severity = Severity::ALL[rng.below(SEVERITY_CLASSES) as usize];
        emit_entry(severity, index, count, rng);
        tally.record(severity);
    }
    tally
}
