//! Classification rules for padnav.
//!
//! A [`ClassificationTable`] holds an ordered list of
//! [`ClassificationRule`]s plus exclusion patterns. The tree synchronizer
//! asks it two questions for every element path it visits:
//!
//! 1. Is this path excluded? A path matched by any rule is never excluded,
//!    whatever the exclusion list says.
//! 2. How is it tagged? The first matching rule in load order wins.
//!
//! Rule sets are plain serde data, so hosts can keep them in YAML:
//!
//! ```
//! use padnav_rules::{ClassificationTable, Role, RuleSet};
//! use padnav_pattern::HierarchicalPath;
//!
//! let yaml = r#"
//! rules:
//!   - pattern: "** > Save:Button"
//!     role: leaf
//!     shortcut: { key: X, title: Save }
//! exclusions:
//!   - "** > *:ScrollBar"
//! "#;
//! let table = ClassificationTable::new(RuleSet::from_yaml_str(yaml).unwrap());
//! let path: HierarchicalPath = "Main:Window > Save:Button".parse().unwrap();
//! assert_eq!(table.classify(&path).unwrap().role, Role::Leaf);
//! assert!(table.find_shortcut("x").is_some());
//! ```

mod error;
mod rule;
mod table;

pub use error::RulesError;
pub use rule::{
    Classification, ClassificationRule, Confirmation, Role, RuleSet, Shortcut, ShortcutTarget,
};
pub use table::ClassificationTable;
