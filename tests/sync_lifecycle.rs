//! Tree synchronization, classification and shortcuts over the settings demo.

use padnav::memtree::{ElementSpec, MemoryTree, TreeFixture};
use padnav::{
    ClassificationTable, ControlValue, Direction, Effects, Engine, NavCommand, NavEvent,
    NodeRole, RuleSet, ShortcutOutcome,
};
use pretty_assertions::assert_eq;

const TREE: &str = include_str!("../demos/settings_tree.yaml");
const RULES: &str = include_str!("../demos/settings_rules.yaml");

fn settings() -> Engine<MemoryTree> {
    let fixture = TreeFixture::from_yaml_str(TREE).expect("fixture parses");
    let (tree, roots) = MemoryTree::from_fixture(&fixture);
    let table = ClassificationTable::new(RuleSet::from_yaml_str(RULES).expect("rules parse"));
    let mut engine = Engine::with_defaults(tree, table);
    for root in roots {
        engine.register_root(root, None);
    }
    engine.run_pending();
    engine
}

fn focused_name(engine: &Engine<MemoryTree>) -> Option<String> {
    engine.focused_node().map(|node| node.identity().to_string())
}

fn names(engine: &Engine<MemoryTree>) -> Vec<String> {
    let mut names: Vec<String> = engine
        .all_nodes()
        .map(|(_, node)| node.identity().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn demo_tree_is_tracked_without_excluded_scrollbar() {
    let engine = settings();
    assert_eq!(
        names(&engine),
        vec![
            "Advanced", "Cancel", "Export", "General", "Mute", "Ok", "Reset", "Settings",
            "Theme", "Volume"
        ]
    );
    let theme = engine
        .all_nodes()
        .find(|(_, node)| node.identity().to_string() == "Theme")
        .map(|(_, node)| node)
        .unwrap();
    assert_eq!(theme.role(), NodeRole::Group);
    assert!(theme.is_modal());
    assert!(theme.is_dual_role());
    assert!(theme.is_navigable());
}

#[test]
fn resync_of_an_unchanged_tree_changes_nothing() {
    let mut engine = settings();
    let root = engine.synchronizer().roots().next().unwrap();
    let before = names(&engine);
    engine.drain_events();

    let report = engine.sync_now(root).unwrap();
    assert_eq!((report.added, report.removed), (0, 0));
    assert_eq!(names(&engine), before);
    assert!(engine.drain_events().is_empty());
}

#[test]
fn removed_element_drops_its_node_and_focus() {
    let mut engine = settings();
    engine.move_focus(Direction::Down);
    assert_eq!(focused_name(&engine).as_deref(), Some("Volume"));
    let volume = engine.focused().unwrap();
    engine.drain_events();

    let element = engine.adapter().find("Volume").unwrap();
    engine.adapter_mut().kill(element);
    assert!(engine.notify_layout_changed(&element).is_some());
    engine.run_pending();

    assert!(engine.node(volume).is_none());
    assert_eq!(engine.focused(), None);
    let events = engine.drain_events();
    assert!(events.contains(&NavEvent::NodeRemoved(volume)));
    assert!(events.contains(&NavEvent::FocusChanged {
        old: Some(volume),
        new: None
    }));
}

#[test]
fn unreadable_layout_panel_keeps_focus_and_follows_its_layout() {
    let mut tree = MemoryTree::new();
    let main = tree.add_root(ElementSpec::new("Main", "Window").bounds(0.0, 0.0, 400.0, 200.0));
    let grid = tree.add_child(main, ElementSpec::new("", "Grid"));
    tree.add_child(grid, ElementSpec::new("Save", "Button").bounds(0.0, 0.0, 80.0, 20.0));
    tree.add_child(grid, ElementSpec::new("Load", "Button").bounds(100.0, 0.0, 80.0, 20.0));
    let mut engine = Engine::with_defaults(tree, ClassificationTable::default());
    let root = engine.register_root(main, None);
    engine.run_pending();

    let save_el = engine.adapter().find("Save").unwrap();
    let save = engine.synchronizer().node_for_element(&save_el).unwrap();
    engine.focus(save).unwrap();
    let before = names(&engine);
    engine.drain_events();

    engine.adapter_mut().fail_describe(grid, true);
    engine.sync_now(root);
    assert_eq!(names(&engine), before);
    assert_eq!(engine.focused(), Some(save));
    assert!(engine.drain_events().is_empty());

    engine.adapter_mut().fail_describe(grid, false);
    engine
        .adapter_mut()
        .add_child(grid, ElementSpec::new("Export", "Button").bounds(200.0, 0.0, 80.0, 20.0));
    assert_eq!(engine.notify_layout_changed(&grid), Some(root));
    engine.run_pending();
    assert!(engine.move_focus(Direction::Right));
    assert!(engine.move_focus(Direction::Right));
    assert_eq!(focused_name(&engine).as_deref(), Some("Export"));
}

#[test]
fn pages_follow_focus() {
    let mut engine = settings();
    engine.move_focus(Direction::Down);
    assert_eq!(engine.current_page(), Some("General"));

    assert!(engine.move_focus(Direction::Right));
    assert_eq!(focused_name(&engine).as_deref(), Some("Reset"));
    assert_eq!(engine.current_page(), Some("Advanced"));
}

#[test]
fn combo_popup_opens_as_a_modal_scope() {
    let mut engine = settings();
    engine.move_focus(Direction::Down);
    engine.move_focus(Direction::Down);
    engine.move_focus(Direction::Down);
    assert_eq!(focused_name(&engine).as_deref(), Some("Theme"));
    let theme = engine.focused().unwrap();

    let effects = engine.execute(NavCommand::Activate);
    assert!(effects.contains(Effects::SYNC_REQUESTED));
    engine.run_pending();
    assert_eq!(engine.stack().depth(), 1);
    assert_eq!(engine.synchronizer().roots().count(), 2);
    assert_eq!(focused_name(&engine).as_deref(), Some("Light"));
    assert!(engine.is_descendant_of(engine.focused().unwrap(), theme));

    assert!(engine.move_focus(Direction::Down));
    assert_eq!(focused_name(&engine).as_deref(), Some("Dark"));
    assert!(!engine.move_focus(Direction::Right));

    engine.execute(NavCommand::ExitScope);
    engine.run_pending();
    assert_eq!(engine.stack().depth(), 0);
    assert_eq!(engine.focused(), Some(theme));
    assert_eq!(engine.synchronizer().roots().count(), 1);
    assert!(!names(&engine).contains(&"Light".to_string()));
}

#[test]
fn toggles_are_invoked_not_adjusted() {
    let mut engine = settings();
    engine.move_focus(Direction::Down);
    engine.move_focus(Direction::Down);
    assert_eq!(focused_name(&engine).as_deref(), Some("Mute"));

    let effects = engine.execute(NavCommand::Activate);
    assert!(effects.contains(Effects::ACTIVATED));
    assert!(!engine.stack().in_interaction_mode());
    let mute = engine.adapter().find("Mute").unwrap();
    assert_eq!(engine.adapter().value(mute), Some(&ControlValue::Toggle(true)));
}

#[test]
fn group_shortcut_focuses_first_child() {
    let mut engine = settings();
    let outcome = engine.invoke_shortcut("rb");
    let reset = engine.adapter().find("Reset").unwrap();
    let reset = engine.synchronizer().node_for_element(&reset).unwrap();
    assert_eq!(outcome, ShortcutOutcome::Focused(reset));
    assert!(engine.adapter().invocations().is_empty());
}

#[test]
fn confirmed_shortcut_runs_after_accept() {
    let mut engine = settings();
    let effects = engine.execute(NavCommand::Shortcut("Y".into()));
    assert_eq!(effects, Effects::CONFIRMATION_REQUIRED);
    assert_eq!(engine.pending_shortcut(), Some("Y"));

    let outcome = engine.confirm_shortcut();
    let reset = engine.adapter().find("Reset").unwrap();
    let reset_node = engine.synchronizer().node_for_element(&reset).unwrap();
    assert_eq!(outcome, ShortcutOutcome::Invoked(reset_node));
    assert_eq!(engine.adapter().invocations(), &[reset]);
    assert_eq!(engine.focused(), Some(reset_node));
}

#[test]
fn element_shortcut_and_unknown_key() {
    let mut engine = settings();
    let ok = engine.adapter().find("Ok").unwrap();
    let ok_node = engine.synchronizer().node_for_element(&ok).unwrap();
    assert_eq!(engine.invoke_shortcut("X"), ShortcutOutcome::Invoked(ok_node));
    assert_eq!(engine.node(ok_node).unwrap().shortcut_key(), Some("X"));
    assert_eq!(engine.invoke_shortcut("Menu"), ShortcutOutcome::NotFound);
}

#[test]
fn classified_path_survives_a_matching_exclusion() {
    let mut tree = MemoryTree::new();
    let main = tree.add_root(ElementSpec::new("Main", "Window"));
    tree.add_child(main, ElementSpec::new("Save", "Button").bounds(0.0, 0.0, 10.0, 10.0));
    tree.add_child(main, ElementSpec::new("Load", "Button").bounds(20.0, 0.0, 10.0, 10.0));
    let rules = RuleSet::from_yaml_str(
        r#"
rules:
  - pattern: "** > Save:Button"
    role: leaf
exclusions:
  - "** > *:Button"
"#,
    )
    .unwrap();
    let mut engine = Engine::with_defaults(tree, ClassificationTable::new(rules));
    engine.register_root(main, None);
    engine.run_pending();

    let mut tracked = names(&engine);
    tracked.retain(|name| name != "Main");
    assert_eq!(tracked, vec!["Save".to_string()]);
}

#[test]
fn swapping_rules_reclassifies_tracked_nodes() {
    let mut engine = settings();
    let export = engine
        .all_nodes()
        .find(|(_, node)| node.identity().to_string() == "Export")
        .map(|(id, _)| id)
        .unwrap();
    assert_eq!(engine.node(export).unwrap().shortcut_key(), None);
    assert_eq!(engine.node(export).unwrap().page(), Some("Advanced"));

    let rules = RuleSet::from_yaml_str(
        "rules:\n  - pattern: \"** > Export:Button\"\n    shortcut:\n      key: Menu\n",
    )
    .unwrap();
    engine.set_table(ClassificationTable::new(rules));
    engine.run_pending();
    assert_eq!(engine.node(export).unwrap().shortcut_key(), Some("Menu"));
    assert_eq!(engine.node(export).unwrap().page(), None);
}
