//! Anchored backtracking matcher.
//!
//! The search explores the same alternatives as a plain recursive
//! backtracker, in the same order, but remembers the outcome of every
//! `(pattern index, path index)` state so no state is solved twice. That
//! bounds the work at `O(|pattern| × |path|)` for any mix of wildcards.

use crate::path::{HierarchicalPath, PathSegment};
use crate::pattern::{DepthMode, Pattern, PatternSegment};

/// Test whether the whole `path` is matched by `pattern`.
pub fn matches(path: &HierarchicalPath, pattern: &Pattern) -> bool {
    Search::new(pattern.segments(), path.segments()).run()
}

struct Search<'a> {
    pattern: &'a [PatternSegment],
    path: &'a [PathSegment],
    /// Outcome of `anchored(pi, si)`.
    anchored_memo: Vec<Option<bool>>,
    /// Outcome of `wildcard(pi, si)`.
    wildcard_memo: Vec<Option<bool>>,
}

impl<'a> Search<'a> {
    fn new(pattern: &'a [PatternSegment], path: &'a [PathSegment]) -> Self {
        let states = (pattern.len() + 1) * (path.len() + 1);
        Self {
            pattern,
            path,
            anchored_memo: vec![None; states],
            wildcard_memo: vec![None; states],
        }
    }

    fn run(&mut self) -> bool {
        self.anchored(0, 0)
    }

    fn slot(&self, pi: usize, si: usize) -> usize {
        pi * (self.path.len() + 1) + si
    }

    /// Match `pattern[pi..]` against `path[si..]`.
    fn anchored(&mut self, pi: usize, si: usize) -> bool {
        if pi == self.pattern.len() {
            return si == self.path.len();
        }
        if si == self.path.len() {
            return self.pattern[pi..]
                .iter()
                .all(|seg| seg.depth == DepthMode::ZeroOrMore);
        }

        let slot = self.slot(pi, si);
        if let Some(known) = self.anchored_memo[slot] {
            return known;
        }

        let pattern = self.pattern;
        let path = self.path;
        let segment = &pattern[pi];
        let outcome = match segment.depth {
            DepthMode::Exact => segment.matches_segment(&path[si]) && self.anchored(pi + 1, si + 1),
            DepthMode::ZeroOrMore => self.wildcard(pi, si),
            // The first segment is consumed unconditionally.
            DepthMode::OneOrMore => self.wildcard(pi, si + 1),
        };

        self.anchored_memo[slot] = Some(outcome);
        outcome
    }

    /// Wildcard at `pi` has already satisfied its minimum; `si` is the next
    /// unconsumed path position.
    ///
    /// Alternatives, in order: absorb `path[si]` and stay on this wildcard,
    /// skip `path[si]` and move to the next pattern segment, or move to the
    /// next pattern segment without consuming anything.
    fn wildcard(&mut self, pi: usize, si: usize) -> bool {
        let slot = self.slot(pi, si);
        if let Some(known) = self.wildcard_memo[slot] {
            return known;
        }

        let outcome = (si < self.path.len()
            && (self.wildcard(pi, si + 1) || self.anchored(pi + 1, si + 1)))
            || self.anchored(pi + 1, si);

        self.wildcard_memo[slot] = Some(outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn check(path: &str, pattern: &str) -> bool {
        let path = HierarchicalPath::parse(path).unwrap();
        let pattern = Pattern::parse(pattern).unwrap();
        matches(&path, &pattern)
    }

    #[test]
    fn trailing_zero_or_more() {
        let p = "A:B > **";
        assert!(check("A:B", p));
        assert!(check("A:B > C:D", p));
        assert!(check("A:B > C:D > E:F", p));
        assert!(!check("X:Y", p));
    }

    #[test]
    fn leading_one_or_more_requires_an_ancestor() {
        let p = "*** > L:M";
        assert!(!check("L:M", p));
        assert!(check("K:J > L:M", p));
        assert!(check("A:B > K:J > L:M", p));
    }

    #[test]
    fn exact_pattern_is_anchored_at_both_ends() {
        assert!(check("A:B > C:D", "A:B > C:D"));
        assert!(!check("A:B > C:D > E:F", "A:B > C:D"));
        assert!(!check("Z:Z > A:B > C:D", "A:B > C:D"));
    }

    #[test]
    fn inner_wildcard_bridges_any_depth() {
        let p = "Main:Window > ** > Save:Button";
        assert!(check("Main:Window > Save:Button", p));
        assert!(check("Main:Window > Bar:ToolBar > Save:Button", p));
        assert!(check(
            "Main:Window > a:Grid > b:StackPanel > c:Border > Save:Button",
            p
        ));
        assert!(!check("Main:Window > Bar:ToolBar > Open:Button", p));
    }

    #[test]
    fn inner_one_or_more_needs_a_gap() {
        let p = "Main:Window > *** > Save:Button";
        assert!(!check("Main:Window > Save:Button", p));
        assert!(check("Main:Window > Bar:ToolBar > Save:Button", p));
    }

    #[test]
    fn exhausted_path_only_accepts_zero_or_more_tail() {
        assert!(check("A:B", "A:B > ** > **"));
        assert!(!check("A:B", "A:B > ***"));
        assert!(!check("A:B", "A:B > C:D"));
    }

    #[test]
    fn field_wildcards_and_case() {
        assert!(check("Save:Button", "*:button"));
        assert!(check("Save:Button", "SAVE:*"));
        assert!(!check("Save:Button", "Open:*"));
    }

    #[test]
    fn content_only_compared_when_pattern_has_it() {
        assert!(check(":Button[OK]#2", "*:Button"));
        assert!(check(":Button[OK]#2", "*:Button[OK]"));
        assert!(!check(":Button[Cancel]", "*:Button[OK]"));
    }

    #[test]
    fn many_wildcards_stay_fast() {
        let pattern = vec!["**"; 24].join(" > ") + " > Z:Z";
        let path = vec!["A:A"; 40].join(" > ");
        assert!(!check(&path, &pattern));
    }

    fn segment_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["A:B", "C:D", "E:F", "*:B", "A:*"]).prop_map(String::from)
    }

    fn pattern_token_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            segment_strategy(),
            Just("**".to_string()),
            Just("***".to_string()),
        ]
    }

    proptest! {
        #[test]
        fn matching_is_deterministic(
            path in prop::collection::vec(segment_strategy(), 1..8),
            pattern in prop::collection::vec(pattern_token_strategy(), 1..6),
        ) {
            let path = HierarchicalPath::parse(&path.join(" > ")).unwrap();
            let pattern = Pattern::parse(&pattern.join(" > ")).unwrap();
            let first = matches(&path, &pattern);
            let second = matches(&path, &pattern);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn zero_or_more_alone_matches_everything(
            path in prop::collection::vec(segment_strategy(), 0..8),
        ) {
            let path = HierarchicalPath::parse(&path.join(" > ")).unwrap();
            let pattern = Pattern::parse("**").unwrap();
            prop_assert!(matches(&path, &pattern));
        }

        #[test]
        fn one_or_more_alone_rejects_only_empty(
            path in prop::collection::vec(segment_strategy(), 0..8),
        ) {
            let path = HierarchicalPath::parse(&path.join(" > ")).unwrap();
            let pattern = Pattern::parse("***").unwrap();
            prop_assert_eq!(matches(&path, &pattern), !path.is_empty());
        }
    }
}
