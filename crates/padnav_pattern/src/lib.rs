//! Hierarchical path patterns for padnav.
//!
//! Every tracked UI element is addressed by a [`HierarchicalPath`]: the
//! ordered `name:Type` segments from a tracked ancestor down to the element.
//! Rules select elements with a [`Pattern`] written in the same notation,
//! plus two depth wildcards.
//!
//! # Notation
//!
//! ```text
//! MainWindow:Window > ** > Save:Button
//! *** > :ListBoxItem[Inbox]
//! ```
//!
//! - Segments are separated by `>`.
//! - `**` matches zero or more segments, `***` matches one or more.
//! - `*` may replace the name or the type of an exact segment.
//! - A bracketed `[content]` must match the element's content literally.
//!   Inside it, `\` escapes `]` and itself; a `>` needs no escape.
//! - Paths may carry a `#instance` suffix, which patterns never compare.
//!
//! # Example
//!
//! ```
//! use padnav_pattern::{matches, HierarchicalPath, Pattern};
//!
//! let pattern: Pattern = "A:B > **".parse().unwrap();
//! let path: HierarchicalPath = "A:B > C:D".parse().unwrap();
//! assert!(matches(&path, &pattern));
//! ```

mod error;
mod matcher;
mod path;
mod pattern;

pub use error::PatternError;
pub use matcher::matches;
pub use path::{HierarchicalPath, PathSegment};
pub use pattern::{DepthMode, Pattern, PatternSegment, TextMatcher};

/// Separator token between segments, in both paths and patterns.
pub const SEGMENT_SEPARATOR: char = '>';

/// Token for a zero-or-more depth wildcard.
pub const ZERO_OR_MORE_TOKEN: &str = "**";

/// Token for a one-or-more depth wildcard.
pub const ONE_OR_MORE_TOKEN: &str = "***";

/// Token for "any name" / "any type" inside an exact segment.
pub const ANY_TOKEN: &str = "*";

/// Escape character inside `[content]` tags.
pub const CONTENT_ESCAPE: char = '\\';

/// Split segment tokens on separators outside `[content]` tags.
pub(crate) fn split_segments(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_content = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            CONTENT_ESCAPE if in_content => escaped = true,
            '[' if !in_content => in_content = true,
            ']' if in_content => in_content = false,
            SEGMENT_SEPARATOR if !in_content => {
                tokens.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    tokens.push(&text[start..]);
    tokens
}

/// Write a `[content]` tag, escaping `]` and the escape character.
pub(crate) fn write_content(f: &mut std::fmt::Formatter<'_>, content: &str) -> std::fmt::Result {
    use std::fmt::Write;
    f.write_char('[')?;
    for c in content.chars() {
        if c == ']' || c == CONTENT_ESCAPE {
            f.write_char(CONTENT_ESCAPE)?;
        }
        f.write_char(c)?;
    }
    f.write_char(']')
}

/// Case-insensitive comparison without allocating.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_ignore_case_handles_unicode() {
        assert!(eq_ignore_case("Öffnen", "öFFNEN"));
        assert!(!eq_ignore_case("Save", "Saved"));
    }

    #[test]
    fn split_ignores_separators_inside_content() {
        assert_eq!(
            split_segments("A:B > Next:Button[Next >] > C:D"),
            vec!["A:B ", " Next:Button[Next >] ", " C:D"]
        );
        assert_eq!(split_segments(r"A:B[x\] > y] > C:D"), vec![r"A:B[x\] > y] ", " C:D"]);
    }
}
