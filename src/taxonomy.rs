//! Built-in type taxonomy.
//!
//! Resolves a toolkit type name to a capability tag once, when a node is
//! created or updated. Classification rules override it; the heuristic in
//! the synchronizer covers types it does not list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role resolved for one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedRole {
    Leaf,
    Group,
    /// Structural element: not tracked, children are walked.
    Ignored,
}

const DEFAULT_LEAF_TYPES: &[&str] = &[
    "Button",
    "RepeatButton",
    "ToggleButton",
    "CheckBox",
    "RadioButton",
    "TextBox",
    "PasswordBox",
    "Slider",
    "NumericUpDown",
    "DatePicker",
    "Hyperlink",
    "ListBoxItem",
    "ListViewItem",
    "ComboBoxItem",
    "TabItem",
    "MenuItem",
];

const DEFAULT_GROUP_TYPES: &[&str] = &[
    "Window",
    "Popup",
    "ComboBox",
    "Expander",
    "TreeView",
    "TreeViewItem",
    "ListBox",
    "ListView",
    "TabControl",
    "Menu",
    "ContextMenu",
    "ToolBar",
    "GroupBox",
];

const DEFAULT_IGNORED_TYPES: &[&str] = &[
    "Border",
    "Grid",
    "StackPanel",
    "DockPanel",
    "WrapPanel",
    "Canvas",
    "Panel",
    "ScrollViewer",
    "ContentPresenter",
    "ItemsPresenter",
    "AdornerDecorator",
    "Decorator",
    "TextBlock",
    "Label",
    "Image",
    "Rectangle",
    "Separator",
];

/// Lists of leaf, group and structural type names (case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TaxonomyLists", into = "TaxonomyLists")]
pub struct TypeTaxonomy {
    leaf: BTreeSet<String>,
    group: BTreeSet<String>,
    ignored: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct TaxonomyLists {
    leaf_types: Vec<String>,
    group_types: Vec<String>,
    ignored_types: Vec<String>,
}

impl From<TaxonomyLists> for TypeTaxonomy {
    fn from(lists: TaxonomyLists) -> Self {
        let mut taxonomy = TypeTaxonomy::empty();
        lists.leaf_types.iter().for_each(|t| taxonomy.add_leaf(t));
        lists.group_types.iter().for_each(|t| taxonomy.add_group(t));
        lists.ignored_types.iter().for_each(|t| taxonomy.add_ignored(t));
        taxonomy
    }
}

impl From<TypeTaxonomy> for TaxonomyLists {
    fn from(taxonomy: TypeTaxonomy) -> Self {
        Self {
            leaf_types: taxonomy.leaf.into_iter().collect(),
            group_types: taxonomy.group.into_iter().collect(),
            ignored_types: taxonomy.ignored.into_iter().collect(),
        }
    }
}

impl Default for TypeTaxonomy {
    fn default() -> Self {
        let mut taxonomy = Self::empty();
        DEFAULT_LEAF_TYPES.iter().for_each(|t| taxonomy.add_leaf(t));
        DEFAULT_GROUP_TYPES.iter().for_each(|t| taxonomy.add_group(t));
        DEFAULT_IGNORED_TYPES
            .iter()
            .for_each(|t| taxonomy.add_ignored(t));
        taxonomy
    }
}

impl TypeTaxonomy {
    /// Taxonomy that knows no types.
    pub fn empty() -> Self {
        Self {
            leaf: BTreeSet::new(),
            group: BTreeSet::new(),
            ignored: BTreeSet::new(),
        }
    }

    /// Register a leaf type. A type lives in exactly one list; the last
    /// registration wins.
    pub fn add_leaf(&mut self, type_name: &str) {
        let key = Self::key(type_name);
        self.group.remove(&key);
        self.ignored.remove(&key);
        self.leaf.insert(key);
    }

    pub fn add_group(&mut self, type_name: &str) {
        let key = Self::key(type_name);
        self.leaf.remove(&key);
        self.ignored.remove(&key);
        self.group.insert(key);
    }

    pub fn add_ignored(&mut self, type_name: &str) {
        let key = Self::key(type_name);
        self.leaf.remove(&key);
        self.group.remove(&key);
        self.ignored.insert(key);
    }

    /// Role for a type, `None` when the taxonomy does not list it.
    pub fn resolve(&self, type_name: &str) -> Option<ResolvedRole> {
        let key = Self::key(type_name);
        if self.leaf.contains(&key) {
            Some(ResolvedRole::Leaf)
        } else if self.group.contains(&key) {
            Some(ResolvedRole::Group)
        } else if self.ignored.contains(&key) {
            Some(ResolvedRole::Ignored)
        } else {
            None
        }
    }

    fn key(type_name: &str) -> String {
        type_name.to_lowercase()
    }
}
