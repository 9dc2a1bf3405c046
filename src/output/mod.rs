//! Job output on disk.
//!
//! - [`ResultFileSink`]: per-job `.out`/`.err`/`.status` files plus the
//!   run-wide `killed_list` and `abnormal_list`
//! - [`collect_results`]: post-run read-back of those files
//! - [`prepare_output_dir`]: create or wipe the directory before a run

pub mod readback;
pub mod sink;

pub use readback::{collect_results, Collected, Selection};
pub use sink::{ResultFileSink, ABNORMAL_LIST, KILLED_LIST};

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::config::WipePolicy;
use crate::error::{PxargsError, Result};

/// Make `path` an empty-of-files directory ready for a run.
///
/// An existing directory only has its regular files removed, and only after
/// `confirm` agrees unless the policy is [`WipePolicy::Force`]. Confirmation
/// is impossible when the argument list itself is read from stdin.
pub fn prepare_output_dir<F>(
    path: &Path,
    policy: WipePolicy,
    args_from_stdin: bool,
    confirm: F,
) -> Result<()>
where
    F: FnOnce(&Path) -> io::Result<bool>,
{
    if !path.exists() {
        fs::create_dir_all(path)?;
        tracing::debug!(path = %path.display(), "Output directory created");
        return Ok(());
    }

    if !path.is_dir() {
        return Err(PxargsError::OutputDir {
            path: path.to_path_buf(),
            reason: "exists and is not a directory, won't continue".to_string(),
        });
    }

    if policy == WipePolicy::Prompt {
        if args_from_stdin {
            return Err(PxargsError::Aborted(format!(
                "you must specify --noprompt (-y) if no --args (-a) is given; \
                 doing so will destroy folder {}",
                path.display()
            )));
        }
        if !confirm(path)? {
            return Err(PxargsError::Aborted(format!(
                "{} left untouched",
                path.display()
            )));
        }
    }

    let mut removed = 0usize;
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    tracing::debug!(path = %path.display(), removed, "Output directory wiped");
    Ok(())
}

/// Ask on stdout/stdin whether an existing directory may be wiped.
pub fn confirm_on_terminal(path: &Path) -> io::Result<bool> {
    let mut stdout = io::stdout();
    write!(
        stdout,
        "{} exists. Continue will destroy everything in it. Are you sure? (y/n) ",
        path.display()
    )?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested/out");
        prepare_output_dir(&dir, WipePolicy::Prompt, true, |_| Ok(false)).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn rejects_plain_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file");
        fs::write(&file, "x").unwrap();
        let err = prepare_output_dir(&file, WipePolicy::Force, false, |_| Ok(true)).unwrap_err();
        assert!(matches!(err, PxargsError::OutputDir { .. }));
    }

    #[test]
    fn force_wipes_files_but_keeps_subdirectories() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("old.out"), "x").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();

        prepare_output_dir(tmp.path(), WipePolicy::Force, true, |_| Ok(false)).unwrap();

        assert!(!tmp.path().join("old.out").exists());
        assert!(tmp.path().join("sub").is_dir());
    }

    #[test]
    fn prompt_with_stdin_arguments_aborts() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("keep"), "x").unwrap();

        let err = prepare_output_dir(tmp.path(), WipePolicy::Prompt, true, |_| Ok(true)).unwrap_err();

        assert!(matches!(err, PxargsError::Aborted(_)));
        assert!(tmp.path().join("keep").exists());
    }

    #[test]
    fn declined_prompt_aborts() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("keep"), "x").unwrap();

        let err =
            prepare_output_dir(tmp.path(), WipePolicy::Prompt, false, |_| Ok(false)).unwrap_err();

        assert!(matches!(err, PxargsError::Aborted(_)));
        assert!(tmp.path().join("keep").exists());
    }

    #[test]
    fn accepted_prompt_wipes() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("old"), "x").unwrap();

        prepare_output_dir(tmp.path(), WipePolicy::Prompt, false, |_| Ok(true)).unwrap();

        assert!(!tmp.path().join("old").exists());
    }
}
