use std::collections::BTreeMap;
use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use serde::Serialize;

/// Exit code recorded for jobs whose command could not be executed at all.
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// Raw `wait(2)` status word of a terminated job.
///
/// The high byte carries the exit code, the low byte the terminating signal
/// (plus the core-dump bit). A signal death therefore reports exit code 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    raw: i32,
}

impl ExitOutcome {
    pub fn from_raw(raw: i32) -> Self {
        Self { raw }
    }

    pub fn from_status(status: ExitStatus) -> Self {
        Self::from_raw(status.into_raw())
    }

    pub fn exited(code: i32) -> Self {
        Self::from_raw((code & 0xff) << 8)
    }

    pub fn killed_by(signal: i32) -> Self {
        Self::from_raw(signal & 0x7f)
    }

    pub fn spawn_failure() -> Self {
        Self::exited(SPAWN_FAILURE_CODE)
    }

    pub fn raw(&self) -> i32 {
        self.raw
    }

    pub fn code(&self) -> i32 {
        (self.raw >> 8) & 0xff
    }

    pub fn was_signaled(&self) -> bool {
        self.raw & 0xff != 0
    }

    pub fn signal(&self) -> Option<i32> {
        match self.raw & 0x7f {
            0 => None,
            sig => Some(sig),
        }
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.signal() {
            Some(sig) => write!(f, "killed by signal {}", sig),
            None => write!(f, "exit code {}", self.code()),
        }
    }
}

/// Histogram of exit codes for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExitStats {
    histogram: BTreeMap<i32, usize>,
    total: usize,
}

impl ExitStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: ExitOutcome) {
        *self.histogram.entry(outcome.code()).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn count(&self, code: i32) -> usize {
        self.histogram.get(&code).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn histogram(&self) -> &BTreeMap<i32, usize> {
        &self.histogram
    }
}

impl fmt::Display for ExitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (code, count) in &self.histogram {
            writeln!(f, "exit code {}: {} job(s)", code, count)?;
        }
        write!(f, "total number of jobs: {}", self.total)
    }
}
