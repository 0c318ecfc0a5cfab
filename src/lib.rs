//! Directional navigation over a live UI element tree.
//!
//! padnav lets a D-pad and a handful of buttons drive an application built
//! for mouse and keyboard. The host toolkit is reached only through the
//! [`ElementTree`] trait; everything else lives in an [`Engine`] value:
//!
//! - [`sync`] mirrors the live tree into a generation-checked node arena,
//!   tagging elements with the rules of a [`ClassificationTable`].
//! - [`modal`] tracks open modal groups and interactive controls as a
//!   stack of nested scopes.
//! - [`navigator`] scores candidates to pick the next node in a direction.
//!
//! # Example
//!
//! ```
//! use padnav::memtree::{ElementSpec, MemoryTree};
//! use padnav::{ClassificationTable, Direction, Engine};
//!
//! let mut tree = MemoryTree::new();
//! let main = tree.add_root(ElementSpec::new("Main", "Window"));
//! tree.add_child(main, ElementSpec::new("A", "Button").bounds(0.0, 0.0, 10.0, 10.0));
//! tree.add_child(main, ElementSpec::new("B", "Button").bounds(100.0, 0.0, 10.0, 10.0));
//!
//! let mut engine = Engine::with_defaults(tree, ClassificationTable::default());
//! engine.register_root(main, None);
//! engine.run_pending();
//!
//! assert!(engine.move_focus(Direction::Right)); // nothing focused: top-left
//! assert!(engine.move_focus(Direction::Right));
//! assert_eq!(engine.focused_node().unwrap().identity().to_string(), "B");
//! ```

pub mod adapter;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod geom;
pub mod input;
pub mod memtree;
pub mod modal;
pub mod navigator;
pub mod node;
pub mod sync;
pub mod taxonomy;
pub mod telemetry;

pub use adapter::{ControlValue, ElementInfo, ElementTree, SurfaceId};
pub use config::EngineConfig;
pub use engine::{Engine, ShortcutOutcome};
pub use error::{AdapterError, ConfigError, Fault};
pub use event::{Effects, NavEvent, RootChange};
pub use geom::{Direction, Rect, Vec2};
pub use input::{Button, InputConfig, InputProcessor, NavCommand};
pub use modal::{CloseOutcome, ContextKind, ModalContext, ModalContextStack, MAX_CONTEXT_DEPTH};
pub use navigator::{DirectionalNavigator, ScoringConfig};
pub use node::{NavNode, NodeArena, NodeFlags, NodeId, NodeIdentity, NodeRole, RootId};
pub use sync::{RootPhase, SyncReport, TreeSynchronizer};
pub use taxonomy::{ResolvedRole, TypeTaxonomy};

pub use padnav_pattern::{HierarchicalPath, Pattern, PatternError};
pub use padnav_rules::{ClassificationTable, RuleSet, RulesError};
