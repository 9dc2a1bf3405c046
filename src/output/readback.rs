use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{PxargsError, Result};

/// Which result files to read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub out: bool,
    pub err: bool,
    pub status: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            out: true,
            err: false,
            status: false,
        }
    }
}

impl Selection {
    pub fn all() -> Self {
        Self {
            out: true,
            err: true,
            status: true,
        }
    }

    fn is_empty(&self) -> bool {
        !(self.out || self.err || self.status)
    }
}

/// Result files of a finished run, keyed by argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    pub out: HashMap<String, String>,
    pub err: HashMap<String, String>,
    pub status: HashMap<String, i32>,
}

/// Read back the selected result files for `arguments` from `dir`.
///
/// Missing or unreadable files are left out of the maps, and so are status
/// files that do not hold an integer.
pub fn collect_results<S: AsRef<str>>(
    dir: &Path,
    arguments: &[S],
    selection: Selection,
) -> Result<Collected> {
    if selection.is_empty() {
        return Err(PxargsError::NothingSelected);
    }

    let mut collected = Collected::default();
    for argument in arguments {
        let argument = argument.as_ref();
        let read = |ext: &str| {
            fs::read(dir.join(format!("{}.{}", argument, ext)))
                .ok()
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        };

        if selection.out {
            if let Some(text) = read("out") {
                collected.out.insert(argument.to_string(), text);
            }
        }
        if selection.err {
            if let Some(text) = read("err") {
                collected.err.insert(argument.to_string(), text);
            }
        }
        if selection.status {
            if let Some(code) = read("status").and_then(|text| text.trim().parse().ok()) {
                collected.status.insert(argument.to_string(), code);
            }
        }
    }

    Ok(collected)
}
