use std::fmt::{self, Display, Formatter};

use crate::config::DEFAULT_PLACEHOLDER;

/// Command line with a placeholder for the per-job argument.
///
/// Every occurrence of the placeholder in every token is replaced verbatim;
/// tokens are never re-split, so an argument containing spaces stays a
/// single argv entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    tokens: Vec<String>,
    placeholder: String,
}

impl CommandTemplate {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// The argv for one argument.
    pub fn render(&self, argument: &str) -> Vec<String> {
        self.tokens
            .iter()
            .map(|token| token.replace(&self.placeholder, argument))
            .collect()
    }
}

impl Display for CommandTemplate {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}
