use std::path::PathBuf;
use std::time::Duration;

/// Default number of concurrently running jobs.
pub const DEFAULT_CAPACITY: usize = 30;

/// Token replaced by the argument in every command template token.
pub const DEFAULT_PLACEHOLDER: &str = "{}";

/// Settings for a single pool run.
///
/// A `timeout_secs` of zero disables the timeout escalation entirely.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Maximum number of live child processes
    pub capacity: usize,
    /// Per-job wall-clock budget in seconds, 0 means unlimited
    pub timeout_secs: u64,
    /// Where `.out`/`.err`/`.status` files go; `None` discards job output
    pub output_dir: Option<PathBuf>,
    /// Period of the display refresh and timeout evaluation tick
    pub tick_interval: Duration,
    /// Placeholder substituted in the command template
    pub placeholder: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            timeout_secs: 0,
            output_dir: None,
            tick_interval: Duration::from_secs(1),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl RunConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }
}

/// How an already existing output directory is treated before a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipePolicy {
    /// Ask on the terminal before deleting anything
    Prompt,
    /// Delete the directory's files without asking
    Force,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_config_default() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.capacity, 30);
        assert_eq!(cfg.timeout_secs, 0);
        assert!(cfg.output_dir.is_none());
        assert_eq!(cfg.tick_interval, Duration::from_secs(1));
        assert_eq!(cfg.placeholder, "{}");
    }

    #[test]
    fn run_config_new_clamps_zero_capacity() {
        let cfg = RunConfig::new(0);
        assert_eq!(cfg.capacity, 1);
    }

    #[test]
    fn run_config_builders() {
        let cfg = RunConfig::new(4)
            .with_timeout(10)
            .with_output_dir("/tmp/out")
            .with_tick_interval(Duration::from_millis(200));
        assert_eq!(cfg.capacity, 4);
        assert_eq!(cfg.timeout_secs, 10);
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(cfg.tick_interval, Duration::from_millis(200));
    }
}
