//! The classification table.

use crate::rule::{Classification, ClassificationRule, RuleSet};
use padnav_pattern::{HierarchicalPath, Pattern};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Ordered rules and exclusions, queried by element path.
///
/// Multiple matching rules do not merge: the first rule in load order that
/// matches a path decides its tagging.
#[derive(Debug, Clone, Default)]
pub struct ClassificationTable {
    rules: Vec<ClassificationRule>,
    exclusions: Vec<Pattern>,
}

impl ClassificationTable {
    /// Build a table from a loaded rule set.
    pub fn new(set: RuleSet) -> Self {
        Self::from_parts(set.rules, set.exclusions)
    }

    /// Build a table from rules and exclusions in load order.
    pub fn from_parts(rules: Vec<ClassificationRule>, exclusions: Vec<Pattern>) -> Self {
        let mut seen: HashMap<String, usize> = HashMap::new();
        for (index, rule) in rules.iter().enumerate() {
            if let Some(shortcut) = &rule.shortcut {
                let key = shortcut.key.to_ascii_lowercase();
                if let Some(first) = seen.get(&key) {
                    warn!(
                        key = %shortcut.key,
                        first_rule = first,
                        shadowed_rule = index,
                        "shortcut key bound twice; the earlier rule wins"
                    );
                } else {
                    seen.insert(key, index);
                }
            }
        }
        debug!(
            rules = rules.len(),
            exclusions = exclusions.len(),
            "classification table built"
        );
        Self { rules, exclusions }
    }

    /// Rules in load order.
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Exclusion patterns in load order.
    pub fn exclusions(&self) -> &[Pattern] {
        &self.exclusions
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// A path matched by any rule is never excluded. Only unclassified paths
    /// consult the exclusion list.
    pub fn is_excluded(&self, path: &HierarchicalPath) -> bool {
        if self.rules.iter().any(|rule| rule.pattern.matches(path)) {
            return false;
        }
        self.exclusions.iter().any(|pattern| pattern.matches(path))
    }

    /// Tagging from the first matching rule.
    pub fn classify(&self, path: &HierarchicalPath) -> Option<Classification> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.pattern.matches(path))
            .map(|(index, rule)| Classification::from_rule(index, rule))
    }

    /// Page of the first matching rule that names one.
    pub fn find_page_for_element(&self, path: &HierarchicalPath) -> Option<&str> {
        self.rules
            .iter()
            .filter(|rule| rule.page.is_some())
            .find(|rule| rule.pattern.matches(path))
            .and_then(|rule| rule.page.as_deref())
    }

    /// First rule whose shortcut is bound to `key`.
    pub fn find_shortcut(&self, key: &str) -> Option<&ClassificationRule> {
        self.rules.iter().find(|rule| {
            rule.shortcut
                .as_ref()
                .is_some_and(|shortcut| shortcut.is_bound_to(key))
        })
    }

    /// Every rule matching `path`, in load order.
    pub fn find_classifications_for_path(
        &self,
        path: &HierarchicalPath,
    ) -> Vec<&ClassificationRule> {
        self.rules
            .iter()
            .filter(|rule| rule.pattern.matches(path))
            .collect()
    }

    /// Rules that carry a shortcut, in load order.
    pub fn shortcuts(&self) -> impl Iterator<Item = &ClassificationRule> {
        self.rules.iter().filter(|rule| rule.shortcut.is_some())
    }
}

impl From<RuleSet> for ClassificationTable {
    fn from(set: RuleSet) -> Self {
        Self::new(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Role, Shortcut};
    use pretty_assertions::assert_eq;

    fn pattern(text: &str) -> Pattern {
        Pattern::parse(text).unwrap()
    }

    fn path(text: &str) -> HierarchicalPath {
        HierarchicalPath::parse(text).unwrap()
    }

    #[test]
    fn classification_overrides_exclusion() {
        let table = ClassificationTable::from_parts(
            vec![ClassificationRule::new(pattern("** > Zoom:Slider")).with_role(Role::Leaf)],
            vec![pattern("** > *:Slider")],
        );
        assert!(!table.is_excluded(&path("Main:Window > Zoom:Slider")));
        assert!(table.is_excluded(&path("Main:Window > Volume:Slider")));
        assert!(!table.is_excluded(&path("Main:Window > Ok:Button")));
    }

    #[test]
    fn first_match_wins() {
        let table = ClassificationTable::from_parts(
            vec![
                ClassificationRule::new(pattern("** > Save:Button")).with_role(Role::Leaf),
                ClassificationRule::new(pattern("** > *:Button"))
                    .with_role(Role::Group)
                    .modal()
                    .with_page("Toolbar"),
            ],
            vec![],
        );
        let hit = table.classify(&path("Main:Window > Save:Button")).unwrap();
        assert_eq!(hit.rule_index, 0);
        assert_eq!(hit.role, Role::Leaf);
        assert!(!hit.modal);
        assert_eq!(hit.page, None);

        let other = table.classify(&path("Main:Window > Open:Button")).unwrap();
        assert_eq!(other.rule_index, 1);
        assert!(other.modal);

        assert!(table.classify(&path("Main:Window > Name:TextBox")).is_none());
    }

    #[test]
    fn page_lookup_skips_rules_without_page() {
        let table = ClassificationTable::from_parts(
            vec![
                ClassificationRule::new(pattern("** > Save:Button")).with_role(Role::Leaf),
                ClassificationRule::new(pattern("Main:Window > **")).with_page("Main"),
            ],
            vec![],
        );
        assert_eq!(
            table.find_page_for_element(&path("Main:Window > Save:Button")),
            Some("Main")
        );
        assert_eq!(table.find_page_for_element(&path("Other:Window")), None);
    }

    #[test]
    fn shortcut_lookup_prefers_first_binding() {
        let table = ClassificationTable::from_parts(
            vec![
                ClassificationRule::new(pattern("** > Save:Button"))
                    .with_shortcut(Shortcut::new("X").with_title("Save")),
                ClassificationRule::new(pattern("** > Open:Button"))
                    .with_shortcut(Shortcut::new("x").with_title("Open")),
            ],
            vec![],
        );
        let rule = table.find_shortcut("X").unwrap();
        assert_eq!(
            rule.shortcut.as_ref().unwrap().title.as_deref(),
            Some("Save")
        );
        assert!(table.find_shortcut("Y").is_none());
        assert_eq!(table.shortcuts().count(), 2);
    }

    #[test]
    fn all_classifications_in_order() {
        let table = ClassificationTable::from_parts(
            vec![
                ClassificationRule::new(pattern("** > *:Button")),
                ClassificationRule::new(pattern("** > Cancel:*")),
                ClassificationRule::new(pattern("** > Ok:Button")),
            ],
            vec![],
        );
        let found = table.find_classifications_for_path(&path("Dlg:Window > Ok:Button"));
        let patterns: Vec<String> = found.iter().map(|r| r.pattern.to_string()).collect();
        assert_eq!(patterns, vec!["** > *:Button", "** > Ok:Button"]);
    }

    #[test]
    fn empty_table_excludes_nothing() {
        let table = ClassificationTable::default();
        assert!(table.is_empty());
        assert!(!table.is_excluded(&path("A:B")));
        assert!(table.classify(&path("A:B")).is_none());
    }
}
