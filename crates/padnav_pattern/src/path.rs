//! Hierarchical element paths.

use crate::{
    eq_ignore_case, split_segments, write_content, PatternError, CONTENT_ESCAPE, SEGMENT_SEPARATOR,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One `name:Type[content]#instance` step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathSegment {
    /// Element name (automation id or human name). May be empty.
    pub name: String,
    /// Element type name.
    pub type_name: String,
    /// Literal content tag, e.g. a button caption.
    pub content: Option<String>,
    /// Opaque sibling instance tag for anonymous elements.
    pub instance: Option<u32>,
}

impl PathSegment {
    /// Create a segment with no content or instance tag.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            content: None,
            instance: None,
        }
    }

    /// Attach a content tag.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Attach an instance tag.
    pub fn with_instance(mut self, instance: u32) -> Self {
        self.instance = Some(instance);
        self
    }

    /// Same element step: name and type case-insensitive, tags exact.
    pub fn same_step(&self, other: &PathSegment) -> bool {
        eq_ignore_case(&self.name, &other.name)
            && eq_ignore_case(&self.type_name, &other.type_name)
            && self.content == other.content
            && self.instance == other.instance
    }

    /// Parse a single segment token (already trimmed).
    pub(crate) fn parse_token(token: &str) -> Result<Self, PatternError> {
        let (name, rest) = token
            .split_once(':')
            .ok_or_else(|| PatternError::MissingTypeSeparator {
                token: token.to_string(),
            })?;

        let (type_part, content, tail) = match rest.find('[') {
            Some(open) => {
                let (content, tail) = read_content(&rest[open + 1..]).ok_or_else(|| {
                    PatternError::UnterminatedContent {
                        token: token.to_string(),
                    }
                })?;
                (&rest[..open], Some(content), tail)
            }
            None => match rest.rfind('#') {
                Some(hash) => (&rest[..hash], None, &rest[hash..]),
                None => (rest, None, ""),
            },
        };

        let instance = match tail.trim() {
            "" => None,
            suffix => {
                let digits =
                    suffix
                        .strip_prefix('#')
                        .ok_or_else(|| PatternError::InvalidInstance {
                            token: token.to_string(),
                        })?;
                Some(
                    digits
                        .parse::<u32>()
                        .map_err(|_| PatternError::InvalidInstance {
                            token: token.to_string(),
                        })?,
                )
            }
        };

        Ok(Self {
            name: name.trim().to_string(),
            type_name: type_part.trim().to_string(),
            content,
            instance,
        })
    }
}

/// Unescape a content tag body up to its closing `]`. Returns the content
/// and the text after the bracket.
fn read_content(body: &str) -> Option<(String, &str)> {
    let mut content = String::new();
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if escaped {
            content.push(c);
            escaped = false;
            continue;
        }
        match c {
            CONTENT_ESCAPE => escaped = true,
            ']' => return Some((content, &body[i + 1..])),
            _ => content.push(c),
        }
    }
    None
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.type_name)?;
        if let Some(content) = &self.content {
            write_content(f, content)?;
        }
        if let Some(instance) = self.instance {
            write!(f, "#{}", instance)?;
        }
        Ok(())
    }
}

/// Ordered segments from a tracked ancestor down to an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HierarchicalPath {
    segments: Vec<PathSegment>,
}

impl HierarchicalPath {
    /// Create an empty path.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Create a path from segments.
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Parse `a:B > c:D` text.
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Self::new());
        }
        let segments = split_segments(trimmed)
            .into_iter()
            .enumerate()
            .map(|(position, token)| {
                let token = token.trim();
                if token.is_empty() {
                    return Err(PatternError::EmptySegment { position });
                }
                PathSegment::parse_token(token)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Return a new path with `segment` appended.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    /// Append a segment in place.
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Borrow the segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Last segment, i.e. the element itself.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when `prefix` equals the leading segments of this path.
    pub fn starts_with(&self, prefix: &HierarchicalPath) -> bool {
        prefix.len() <= self.len()
            && prefix
                .segments
                .iter()
                .zip(&self.segments)
                .all(|(a, b)| a.same_step(b))
    }
}

impl fmt::Display for HierarchicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", SEGMENT_SEPARATOR)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for HierarchicalPath {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HierarchicalPath {
    type Error = PatternError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HierarchicalPath> for String {
    fn from(path: HierarchicalPath) -> Self {
        path.to_string()
    }
}

impl FromIterator<PathSegment> for HierarchicalPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_segments() {
        let path = HierarchicalPath::parse("Main:Window > Save:Button").unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.segments()[0], PathSegment::new("Main", "Window"));
        assert_eq!(path.last().unwrap().name, "Save");
    }

    #[test]
    fn parse_content_and_instance() {
        let path = HierarchicalPath::parse(":ListBoxItem[Inbox]#3").unwrap();
        let seg = &path.segments()[0];
        assert_eq!(seg.name, "");
        assert_eq!(seg.type_name, "ListBoxItem");
        assert_eq!(seg.content.as_deref(), Some("Inbox"));
        assert_eq!(seg.instance, Some(3));
    }

    #[test]
    fn parse_instance_without_content() {
        let path = HierarchicalPath::parse(":Button#2").unwrap();
        assert_eq!(path.segments()[0].instance, Some(2));
        assert_eq!(path.segments()[0].content, None);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            HierarchicalPath::parse("Button"),
            Err(PatternError::MissingTypeSeparator { .. })
        ));
        assert!(matches!(
            HierarchicalPath::parse("A:B > > C:D"),
            Err(PatternError::EmptySegment { position: 1 })
        ));
        assert!(matches!(
            HierarchicalPath::parse("A:B[oops"),
            Err(PatternError::UnterminatedContent { .. })
        ));
        assert!(matches!(
            HierarchicalPath::parse("A:B#x"),
            Err(PatternError::InvalidInstance { .. })
        ));
    }

    #[test]
    fn empty_text_is_empty_path() {
        assert!(HierarchicalPath::parse("  ").unwrap().is_empty());
    }

    #[test]
    fn display_round_trips_text() {
        let text = "Main:Window > :Button[OK]#1";
        let path = HierarchicalPath::parse(text).unwrap();
        assert_eq!(path.to_string(), text);
    }

    #[test]
    fn starts_with_is_case_insensitive_on_names() {
        let path = HierarchicalPath::parse("Main:Window > Toolbar:ToolBar > Save:Button").unwrap();
        let prefix = HierarchicalPath::parse("main:window > toolbar:toolbar").unwrap();
        assert!(path.starts_with(&prefix));
        assert!(path.starts_with(&path));
        assert!(!prefix.starts_with(&path));
    }

    #[test]
    fn child_appends_without_mutating() {
        let parent = HierarchicalPath::parse("Main:Window").unwrap();
        let child = parent.child(PathSegment::new("Ok", "Button"));
        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
    }

    #[test]
    fn serde_uses_text_form() {
        let path = HierarchicalPath::parse("A:B > C:D").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"A:B > C:D\"");
        let back: HierarchicalPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn captions_with_separators_round_trip() {
        let path = HierarchicalPath::new()
            .child(PathSegment::new("Wizard", "Window"))
            .child(PathSegment::new("", "Button").with_content("Next >").with_instance(0))
            .child(PathSegment::new("", "Text").with_content(r"C:\temp [1]"));
        let text = path.to_string();
        assert_eq!(
            text,
            r"Wizard:Window > :Button[Next >]#0 > :Text[C:\\temp [1\]]"
        );
        assert_eq!(HierarchicalPath::parse(&text).unwrap(), path);

        let json = serde_json::to_string(&path).unwrap();
        let back: HierarchicalPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
