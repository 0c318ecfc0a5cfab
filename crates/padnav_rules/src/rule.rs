//! Rule data model.

use crate::RulesError;
use padnav_pattern::Pattern;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Navigation role assigned by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Rule does not decide the role; the type taxonomy does.
    #[default]
    Undefined,
    /// Directly focusable control.
    Leaf,
    /// Container of other nodes.
    Group,
}

/// What a shortcut acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutTarget {
    /// Focus and invoke the matched element.
    #[default]
    Element,
    /// Move focus into the matched group.
    Group,
}

/// Confirmation required before a shortcut runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub message: String,
}

/// Button binding attached to a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    /// Input key name, compared case-insensitively.
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    /// Focus the target but do not invoke it.
    #[serde(default)]
    pub no_auto_click: bool,
    #[serde(default)]
    pub target: ShortcutTarget,
    #[serde(default)]
    pub confirmation: Option<Confirmation>,
}

impl Shortcut {
    /// Create a shortcut with defaults for everything but the key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: None,
            icon: None,
            no_auto_click: false,
            target: ShortcutTarget::Element,
            confirmation: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_target(mut self, target: ShortcutTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_confirmation(mut self, message: impl Into<String>) -> Self {
        self.confirmation = Some(Confirmation {
            message: message.into(),
        });
        self
    }

    pub fn without_auto_click(mut self) -> Self {
        self.no_auto_click = true;
        self
    }

    /// Key names compare case-insensitively.
    pub fn is_bound_to(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

/// One ordered classification rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub pattern: Pattern,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub modal: bool,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub shortcut: Option<Shortcut>,
}

impl ClassificationRule {
    /// Rule with no tagging beyond "this path is classified".
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            role: Role::Undefined,
            modal: false,
            page: None,
            shortcut: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn modal(mut self) -> Self {
        self.modal = true;
        self
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_shortcut(mut self, shortcut: Shortcut) -> Self {
        self.shortcut = Some(shortcut);
        self
    }
}

/// Tagging applied to one element path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Index of the rule that produced this tagging.
    pub rule_index: usize,
    pub role: Role,
    pub modal: bool,
    pub page: Option<String>,
    pub shortcut: Option<Shortcut>,
}

impl Classification {
    pub(crate) fn from_rule(rule_index: usize, rule: &ClassificationRule) -> Self {
        Self {
            rule_index,
            role: rule.role,
            modal: rule.modal,
            page: rule.page.clone(),
            shortcut: rule.shortcut.clone(),
        }
    }
}

/// Rules and exclusions as delivered by the rule loader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub rules: Vec<ClassificationRule>,
    #[serde(default)]
    pub exclusions: Vec<Pattern>,
}

impl RuleSet {
    /// Parse a YAML rule set. Every pattern is compiled; one bad pattern
    /// rejects the whole set.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RulesError> {
        let set: RuleSet = serde_yaml::from_str(yaml)?;
        set.validate()?;
        Ok(set)
    }

    /// Read and parse a YAML rule file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    fn validate(&self) -> Result<(), RulesError> {
        for (index, rule) in self.rules.iter().enumerate() {
            if let Some(shortcut) = &rule.shortcut {
                if shortcut.key.trim().is_empty() {
                    return Err(RulesError::EmptyShortcutKey {
                        index,
                        pattern: rule.pattern.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn yaml_defaults_fill_optional_fields() {
        let yaml = r#"
rules:
  - pattern: "** > Ok:Button"
"#;
        let set = RuleSet::from_yaml_str(yaml).unwrap();
        assert_eq!(set.rules.len(), 1);
        let rule = &set.rules[0];
        assert_eq!(rule.role, Role::Undefined);
        assert!(!rule.modal);
        assert_eq!(rule.page, None);
        assert_eq!(rule.shortcut, None);
        assert!(set.exclusions.is_empty());
    }

    #[test]
    fn yaml_full_rule() {
        let yaml = r#"
rules:
  - pattern: "Main:Window > ** > Delete:Button"
    role: leaf
    page: Editor
    shortcut:
      key: Y
      title: Delete
      icon: trash
      no_auto_click: true
      target: element
      confirmation:
        message: "Really delete?"
  - pattern: "** > Font:ComboBox"
    role: group
    modal: true
exclusions:
  - "** > *:ScrollBar"
"#;
        let set = RuleSet::from_yaml_str(yaml).unwrap();
        let delete = &set.rules[0];
        let shortcut = delete.shortcut.as_ref().unwrap();
        assert_eq!(shortcut.key, "Y");
        assert_eq!(shortcut.icon.as_deref(), Some("trash"));
        assert!(shortcut.no_auto_click);
        assert_eq!(
            shortcut.confirmation,
            Some(Confirmation {
                message: "Really delete?".into()
            })
        );
        assert_eq!(set.rules[1].role, Role::Group);
        assert!(set.rules[1].modal);
        assert_eq!(set.exclusions[0].to_string(), "** > *:ScrollBar");
    }

    #[test]
    fn bad_pattern_rejects_whole_set() {
        let yaml = r#"
rules:
  - pattern: "** > Ok:Button"
  - pattern: "NoColon"
"#;
        assert!(matches!(
            RuleSet::from_yaml_str(yaml),
            Err(RulesError::Parse(_))
        ));
    }

    #[test]
    fn empty_shortcut_key_is_rejected() {
        let yaml = r#"
rules:
  - pattern: "** > Ok:Button"
    shortcut: { key: "  " }
"#;
        assert!(matches!(
            RuleSet::from_yaml_str(yaml),
            Err(RulesError::EmptyShortcutKey { index: 0, .. })
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.yaml");
        std::fs::write(&path, "rules:\n  - pattern: \"** > A:B\"\n").unwrap();
        let set = RuleSet::load(&path).unwrap();
        assert_eq!(set.rules.len(), 1);

        let missing = RuleSet::load(dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(RulesError::Io { .. })));
    }

    #[test]
    fn shortcut_key_is_case_insensitive() {
        let shortcut = Shortcut::new("X");
        assert!(shortcut.is_bound_to("x"));
        assert!(!shortcut.is_bound_to("Y"));
    }
}
