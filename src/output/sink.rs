use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::scheduler::ExitOutcome;

pub const KILLED_LIST: &str = "killed_list";
pub const ABNORMAL_LIST: &str = "abnormal_list";

/// Only the tail of an output file is scanned for the status line.
const TAIL_BYTES: u64 = 4096;

/// Per-job result files inside an optional output directory.
///
/// Without a directory every stream goes to the null device and nothing is
/// recorded on disk.
#[derive(Debug, Clone, Default)]
pub struct ResultFileSink {
    dir: Option<PathBuf>,
}

impl ResultFileSink {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn discard() -> Self {
        Self { dir: None }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// `<dir>/<argument>.<ext>`, if an output directory is configured.
    pub fn path_for(&self, argument: &str, ext: &str) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.{}", argument, ext)))
    }

    /// Fresh (truncated) stdout and stderr targets for a job.
    pub fn streams(&self, argument: &str) -> io::Result<(Stdio, Stdio)> {
        match (self.path_for(argument, "out"), self.path_for(argument, "err")) {
            (Some(out), Some(err)) => {
                let out = File::create(out)?;
                let err = File::create(err)?;
                Ok((Stdio::from(out), Stdio::from(err)))
            }
            _ => Ok((Stdio::null(), Stdio::null())),
        }
    }

    /// Leave the reason a job never started in its `.err` file.
    pub fn note_spawn_error(&self, argument: &str, error: &io::Error) {
        let Some(path) = self.path_for(argument, "err") else {
            return;
        };
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut file| writeln!(file, "pxargs: error before execution: {}", error));
        if let Err(e) = written {
            tracing::warn!(path = %path.display(), error = %e, "Failed to record spawn error");
        }
    }

    /// Write the `.status` file and the list memberships of a reaped job.
    pub fn record(&self, argument: &str, outcome: ExitOutcome) -> io::Result<()> {
        let Some(dir) = self.dir.as_deref() else {
            return Ok(());
        };

        fs::write(
            dir.join(format!("{}.status", argument)),
            outcome.code().to_string(),
        )?;
        if outcome.was_signaled() {
            append_line(&dir.join(KILLED_LIST), argument)?;
        }
        if outcome.code() != 0 {
            append_line(&dir.join(ABNORMAL_LIST), argument)?;
        }
        Ok(())
    }

    /// Last non-empty line the job printed, preferring stderr over stdout.
    pub fn last_line(&self, argument: &str) -> Option<String> {
        ["err", "out"]
            .iter()
            .filter_map(|ext| self.path_for(argument, ext))
            .find_map(|path| tail_line(&path))
    }
}

fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}

fn tail_line(path: &Path) -> Option<String> {
    let mut file = File::open(path).ok()?;
    let len = file.metadata().ok()?.len();
    file.seek(SeekFrom::Start(len.saturating_sub(TAIL_BYTES))).ok()?;

    let mut buf = Vec::new();
    file.read_to_end(&mut buf).ok()?;
    let text = String::from_utf8_lossy(&buf);
    let last = text.lines().last()?.trim();
    if last.is_empty() {
        None
    } else {
        Some(last.to_string())
    }
}
