use crate::args::ArgEntry;

/// One unit of work: the argument substituted into the command template,
/// the free-form annotation shown on the slot line, and the submission index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub argument: String,
    pub annotation: String,
    pub seq: usize,
}

impl Job {
    pub fn new(seq: usize, argument: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            annotation: String::new(),
            seq,
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    /// Number the entries in submission order.
    pub fn from_entries(entries: Vec<ArgEntry>) -> Vec<Job> {
        entries
            .into_iter()
            .enumerate()
            .map(|(seq, entry)| Job {
                argument: entry.argument,
                annotation: entry.annotation,
                seq,
            })
            .collect()
    }
}
