//! Argument list reader.
//!
//! One argument per non-blank line. A line starting with `#` is not an
//! argument; it annotates the entry right above it (first annotation wins).

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use rand::seq::SliceRandom;

use crate::error::{PxargsError, Result};
use crate::scheduler::Job;

const ANNOTATION_MARKER: char = '#';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgEntry {
    pub argument: String,
    pub annotation: String,
}

impl ArgEntry {
    pub fn new(argument: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            annotation: annotation.into(),
        }
    }
}

/// Parse the line-oriented argument source.
pub fn read_entries<R: BufRead>(reader: R) -> io::Result<Vec<ArgEntry>> {
    let mut entries: Vec<ArgEntry> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.starts_with(ANNOTATION_MARKER) {
            if let Some(last) = entries.last_mut() {
                if last.annotation.is_empty() {
                    last.annotation = line[ANNOTATION_MARKER.len_utf8()..].trim().to_string();
                }
            }
            continue;
        }

        let argument = line.trim();
        if !argument.is_empty() {
            entries.push(ArgEntry::new(argument, ""));
        }
    }

    Ok(entries)
}

/// Load jobs from `path`, or from stdin when no path is given.
pub fn load_jobs(path: Option<&Path>, randomize: bool) -> Result<Vec<Job>> {
    let mut entries = match path {
        Some(path) => {
            let file = File::open(path).map_err(|source| PxargsError::ArgsFile {
                path: path.to_path_buf(),
                source,
            })?;
            read_entries(BufReader::new(file)).map_err(|source| PxargsError::ArgsFile {
                path: path.to_path_buf(),
                source,
            })?
        }
        None => read_entries(io::stdin().lock())?,
    };

    if randomize {
        entries.shuffle(&mut rand::thread_rng());
    }

    tracing::debug!(count = entries.len(), randomize, "Argument list loaded");
    Ok(Job::from_entries(entries))
}
