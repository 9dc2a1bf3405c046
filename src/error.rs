use std::path::PathBuf;

use nix::sys::signal::Signal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PxargsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read argument file {}: {source}", .path.display())]
    ArgsFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Output directory {}: {reason}", .path.display())]
    OutputDir { path: PathBuf, reason: String },

    #[error("Aborted: {0}")]
    Aborted(String),

    #[error("Failed to poll child process {pid}: {source}")]
    Wait { pid: u32, source: std::io::Error },

    #[error("No slot can be freed: every slot is reserved but no job is running")]
    Exhausted,

    #[error("Failed to register signal listener: {0}")]
    Signal(std::io::Error),

    #[error("Interrupted by {0}")]
    Interrupted(Signal),

    #[error("Terminal display error: {0}")]
    Terminal(std::io::Error),

    #[error("At least one of out, err and status has to be selected")]
    NothingSelected,
}

impl PxargsError {
    /// Process exit status reported by the command-line front end.
    pub fn exit_code(&self) -> u8 {
        match self {
            PxargsError::ArgsFile { .. } | PxargsError::OutputDir { .. } | PxargsError::Aborted(_) => 3,
            PxargsError::Terminal(_) => 4,
            // Shell convention: 128 + signal number.
            PxargsError::Interrupted(sig) => 128u8.saturating_add(*sig as i32 as u8),
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, PxargsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupted_exit_codes() {
        assert_eq!(PxargsError::Interrupted(Signal::SIGINT).exit_code(), 130);
        assert_eq!(PxargsError::Interrupted(Signal::SIGTERM).exit_code(), 143);
        assert_eq!(
            PxargsError::Interrupted(Signal::SIGINT).to_string(),
            "Interrupted by SIGINT"
        );
    }

    #[test]
    fn configuration_errors_exit_with_three() {
        let err = PxargsError::OutputDir {
            path: PathBuf::from("/tmp/x"),
            reason: "not a directory".to_string(),
        };
        assert_eq!(err.exit_code(), 3);
        assert_eq!(PxargsError::Aborted("declined".into()).exit_code(), 3);
        assert_eq!(PxargsError::Exhausted.exit_code(), 1);
    }
}
