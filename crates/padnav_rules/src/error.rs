//! Rule loading errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a rule set.
///
/// Any error rejects the whole set; the table never holds a partial load.
#[derive(Debug, Error)]
pub enum RulesError {
    /// Rule file could not be read.
    #[error("failed to read rules from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rule text was not valid YAML or contained an invalid pattern.
    #[error("invalid rule set: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A shortcut rule had an empty key name.
    #[error("rule {index} ('{pattern}') declares a shortcut with an empty key")]
    EmptyShortcutKey { index: usize, pattern: String },
}
