//! Compiled patterns.

use crate::path::PathSegment;
use crate::{
    eq_ignore_case, split_segments, write_content, PatternError, ANY_TOKEN, ONE_OR_MORE_TOKEN,
    SEGMENT_SEPARATOR, ZERO_OR_MORE_TOKEN,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How many path segments a pattern segment may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepthMode {
    /// Exactly one segment at this position.
    Exact,
    /// Zero or more segments (`**`).
    ZeroOrMore,
    /// One or more segments (`***`).
    OneOrMore,
}

/// Matcher for the name or type half of a segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextMatcher {
    /// `*`
    Any,
    /// Case-insensitive literal.
    Literal(String),
}

impl TextMatcher {
    fn parse(text: &str) -> Self {
        if text == ANY_TOKEN {
            TextMatcher::Any
        } else {
            TextMatcher::Literal(text.to_string())
        }
    }

    /// Test a candidate string.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            TextMatcher::Any => true,
            TextMatcher::Literal(literal) => eq_ignore_case(literal, candidate),
        }
    }
}

impl fmt::Display for TextMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextMatcher::Any => f.write_str(ANY_TOKEN),
            TextMatcher::Literal(literal) => f.write_str(literal),
        }
    }
}

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternSegment {
    pub name: TextMatcher,
    pub type_name: TextMatcher,
    /// Required literal content, compared exactly.
    pub content: Option<String>,
    pub depth: DepthMode,
}

impl PatternSegment {
    /// Exact segment from name and type text (`*` allowed for either).
    pub fn exact(name: &str, type_name: &str) -> Self {
        Self {
            name: TextMatcher::parse(name),
            type_name: TextMatcher::parse(type_name),
            content: None,
            depth: DepthMode::Exact,
        }
    }

    /// Depth wildcard segment.
    pub fn wildcard(depth: DepthMode) -> Self {
        Self {
            name: TextMatcher::Any,
            type_name: TextMatcher::Any,
            content: None,
            depth,
        }
    }

    /// Require a literal content tag.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Test one path segment against this (exact) segment.
    ///
    /// Content and instance tags of the path are ignored unless this segment
    /// carries its own content.
    pub fn matches_segment(&self, segment: &PathSegment) -> bool {
        if !self.name.matches(&segment.name) || !self.type_name.matches(&segment.type_name) {
            return false;
        }
        match &self.content {
            Some(required) => segment.content.as_deref() == Some(required.as_str()),
            None => true,
        }
    }

    fn parse_token(token: &str) -> Result<Self, PatternError> {
        match token {
            ZERO_OR_MORE_TOKEN => Ok(Self::wildcard(DepthMode::ZeroOrMore)),
            ONE_OR_MORE_TOKEN => Ok(Self::wildcard(DepthMode::OneOrMore)),
            _ => {
                let parsed = PathSegment::parse_token(token)?;
                Ok(Self {
                    name: TextMatcher::parse(&parsed.name),
                    type_name: TextMatcher::parse(&parsed.type_name),
                    content: parsed.content,
                    depth: DepthMode::Exact,
                })
            }
        }
    }
}

impl fmt::Display for PatternSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.depth {
            DepthMode::ZeroOrMore => f.write_str(ZERO_OR_MORE_TOKEN),
            DepthMode::OneOrMore => f.write_str(ONE_OR_MORE_TOKEN),
            DepthMode::Exact => {
                write!(f, "{}:{}", self.name, self.type_name)?;
                if let Some(content) = &self.content {
                    write_content(f, content)?;
                }
                Ok(())
            }
        }
    }
}

/// A compiled, non-empty path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern {
    segments: Vec<PatternSegment>,
}

impl Pattern {
    /// Compile pattern text.
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(PatternError::Empty);
        }
        let segments = split_segments(trimmed)
            .into_iter()
            .enumerate()
            .map(|(position, token)| {
                let token = token.trim();
                if token.is_empty() {
                    return Err(PatternError::EmptySegment { position });
                }
                PatternSegment::parse_token(token)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_segments(segments)
    }

    /// Build from already-compiled segments.
    pub fn from_segments(segments: Vec<PatternSegment>) -> Result<Self, PatternError> {
        if segments.is_empty() {
            return Err(PatternError::Empty);
        }
        Ok(Self { segments })
    }

    /// Borrow the compiled segments (never empty).
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// Test a path against this pattern.
    pub fn matches(&self, path: &crate::HierarchicalPath) -> bool {
        crate::matches(path, self)
    }
}

impl fmt::Display for Pattern {
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

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Pattern {
    type Error = PatternError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.to_string()
    }
}
