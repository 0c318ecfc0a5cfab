//! Pattern and path parse errors.

use thiserror::Error;

/// Errors raised while parsing a path or compiling a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Input contained no segments at all.
    #[error("empty pattern: at least one segment is required")]
    Empty,

    /// A separator was followed by nothing.
    #[error("empty segment at position {position}")]
    EmptySegment { position: usize },

    /// A segment had no `name:type` separator.
    #[error("segment '{token}' is missing the ':' between name and type")]
    MissingTypeSeparator { token: String },

    /// A `[content]` suffix was opened but never closed.
    #[error("segment '{token}' has an unterminated '[content]' tag")]
    UnterminatedContent { token: String },

    /// A `#instance` suffix was not a number.
    #[error("segment '{token}' has an invalid '#instance' suffix")]
    InvalidInstance { token: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_token() {
        let err = PatternError::MissingTypeSeparator {
            token: "Button".into(),
        };
        assert!(err.to_string().contains("Button"));

        let err = PatternError::EmptySegment { position: 2 };
        assert!(err.to_string().contains('2'));
    }
}
