//! The navigation engine.
//!
//! [`Engine`] owns every piece of navigation state: the node arena (through
//! the synchronizer), the context stack, the rule table and the adapter. It
//! is a plain value driven from the host's UI thread: call
//! [`Engine::run_pending`] when the UI is idle and [`Engine::execute`] for
//! each command.

use crate::adapter::ElementTree;
use crate::config::EngineConfig;
use crate::error::{AdapterError, Fault};
use crate::event::{Effects, NavEvent};
use crate::geom::Direction;
use crate::input::NavCommand;
use crate::modal::{CloseOutcome, ContextKind, ModalContextStack};
use crate::navigator::DirectionalNavigator;
use crate::node::{NavNode, NodeArena, NodeFlags, NodeId, RootId};
use crate::sync::{SyncReport, TreeSynchronizer};
use padnav_pattern::HierarchicalPath;
use padnav_rules::{ClassificationTable, ShortcutTarget};
use tracing::{debug, info, warn};

/// Result of a shortcut request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutOutcome {
    /// The target was focused and invoked.
    Invoked(NodeId),
    /// The target (or the first node of a target group) was focused only.
    Focused(NodeId),
    /// The shortcut waits for `Activate` to confirm or `ExitScope` to cancel.
    ConfirmationRequired { key: String, message: String },
    /// No rule or no tracked node in scope matched.
    NotFound,
}

/// Directional navigation engine over one host toolkit.
#[derive(Debug)]
pub struct Engine<T: ElementTree> {
    adapter: T,
    table: ClassificationTable,
    sync: TreeSynchronizer<T::Element>,
    stack: ModalContextStack,
    navigator: DirectionalNavigator,
    events: Vec<NavEvent>,
    /// Node currently carrying the `FOCUSED` flag.
    focus_flag: Option<NodeId>,
    pending_shortcut: Option<String>,
    config: EngineConfig,
}

impl<T: ElementTree> Engine<T> {
    pub fn new(adapter: T, table: ClassificationTable, config: EngineConfig) -> Self {
        Self {
            sync: TreeSynchronizer::new(config.taxonomy.clone(), config.max_sync_passes),
            stack: ModalContextStack::with_max_depth(config.max_context_depth),
            navigator: DirectionalNavigator::new(config.scoring.clone()),
            adapter,
            table,
            events: Vec::new(),
            focus_flag: None,
            pending_shortcut: None,
            config,
        }
    }

    pub fn with_defaults(adapter: T, table: ClassificationTable) -> Self {
        Self::new(adapter, table, EngineConfig::default())
    }

    pub fn adapter(&self) -> &T {
        &self.adapter
    }

    /// Mutable access for hosts that drive the toolkit directly. Call
    /// [`Engine::notify_layout_changed`] afterwards.
    pub fn adapter_mut(&mut self) -> &mut T {
        &mut self.adapter
    }

    pub fn table(&self) -> &ClassificationTable {
        &self.table
    }

    /// Swap the rule table and schedule a sync of every root.
    pub fn set_table(&mut self, table: ClassificationTable) {
        self.table = table;
        let roots: Vec<RootId> = self.sync.roots().collect();
        for root in roots {
            self.sync.request_sync(root);
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stack(&self) -> &ModalContextStack {
        &self.stack
    }

    pub fn synchronizer(&self) -> &TreeSynchronizer<T::Element> {
        &self.sync
    }

    pub fn arena(&self) -> &NodeArena<T::Element> {
        self.sync.arena()
    }

    // =========================================================================
    // ROOTS AND SYNC
    // =========================================================================

    pub fn register_root(&mut self, element: T::Element, owner: Option<NodeId>) -> RootId {
        let root = self.sync.register_root(element, owner);
        self.absorb_sync_events();
        root
    }

    pub fn retire_root(&mut self, root: RootId) -> bool {
        let retired = self.sync.retire_root(root);
        self.absorb_sync_events();
        retired
    }

    pub fn request_sync(&mut self, root: RootId) -> bool {
        self.sync.request_sync(root)
    }

    pub fn notify_layout_changed(&mut self, element: &T::Element) -> Option<RootId> {
        self.sync.notify_layout_changed(element)
    }

    /// Idle hook: run pending syncs and apply their lifecycle events.
    pub fn run_pending(&mut self) -> usize {
        let executed = self.sync.run_pending(&self.adapter, &self.table);
        self.absorb_sync_events();
        executed
    }

    /// Sync one root right away.
    pub fn sync_now(&mut self, root: RootId) -> Option<SyncReport> {
        let report = self.sync.sync_root(&self.adapter, &self.table, root);
        self.absorb_sync_events();
        report
    }

    /// Feed synchronizer events to the context stack, then forward them.
    fn absorb_sync_events(&mut self) -> Effects {
        let mut effects = Effects::NONE;
        for event in self.sync.drain_events() {
            match &event {
                NavEvent::ModalGroupOpened(node) => effects |= self.push_modal(*node),
                NavEvent::ModalGroupClosed(node) => match self.stack.on_modal_closed(*node) {
                    CloseOutcome::Popped | CloseOutcome::RemovedOutOfOrder { .. } => {
                        effects |= Effects::SCOPE_POPPED
                    }
                    CloseOutcome::NotFound => debug!(%node, "closed modal had no scope"),
                },
                NavEvent::NodeRemoved(node) => {
                    if self.stack.forget(*node) > 0 {
                        effects |= Effects::SCOPE_POPPED;
                    }
                }
                _ => {}
            }
            self.events.push(event);
        }
        if effects.contains(Effects::SCOPE_POPPED) {
            effects |= self.adopt_open_modals();
        }
        effects | self.reconcile_focus()
    }

    fn push_modal(&mut self, node: NodeId) -> Effects {
        match self.stack.on_modal_opened(node, self.sync.arena()) {
            Ok(_) => Effects::SCOPE_PUSHED,
            Err(fault) if fault.is_protocol_violation() => {
                warn!(%node, %fault, "modal scope rejected");
                Effects::NONE
            }
            Err(fault) => {
                debug!(%node, %fault, "modal scope not pushed");
                Effects::NONE
            }
        }
    }

    /// Push modals that are still open but missing from the stack, e.g. one
    /// rejected while an unrelated scope was active. Shallowest first.
    fn adopt_open_modals(&mut self) -> Effects {
        let arena = self.sync.arena();
        let stacked = self.stack.breadcrumbs();
        let mut waiting: Vec<(usize, NodeId)> = arena
            .iter()
            .filter(|(id, node)| node.is_open_modal() && !stacked.contains(id))
            .map(|(id, _)| (arena.depth(id), id))
            .collect();
        waiting.sort();

        let mut effects = Effects::NONE;
        for (_, node) in waiting {
            if self.stack.on_modal_opened(node, self.sync.arena()).is_ok() {
                info!(%node, "open modal adopted");
                effects |= Effects::SCOPE_PUSHED;
            }
        }
        effects
    }

    /// Make the `FOCUSED` flag and `FocusChanged` events follow the stack.
    ///
    /// A scope without a live focus gets its top-left node.
    fn reconcile_focus(&mut self) -> Effects {
        let target = {
            let arena = self.sync.arena();
            let current = self
                .stack
                .focused()
                .filter(|id| self.stack.is_in_active_scope(*id, arena));
            match current {
                Some(id) => Some(id),
                None if self.stack.active_scope().is_some() => {
                    self.navigator
                        .initial_target(&self.adapter, arena, &self.stack)
                }
                None => None,
            }
        };
        if self.stack.focused() != target {
            self.stack.set_focused(target);
        }
        if target == self.focus_flag {
            return Effects::NONE;
        }

        let old = self.focus_flag;
        if let Some(node) = old.and_then(|id| self.sync.arena_mut().get_mut(id)) {
            node.flags.remove(NodeFlags::FOCUSED);
        }
        if let Some(node) = target.and_then(|id| self.sync.arena_mut().get_mut(id)) {
            node.flags.insert(NodeFlags::FOCUSED);
        }
        self.focus_flag = target;
        debug!(?old, new = ?target, "focus changed");
        self.events.push(NavEvent::FocusChanged { old, new: target });
        Effects::FOCUS_CHANGED
    }

    // =========================================================================
    // FOCUS
    // =========================================================================

    /// Focused node, if it is still tracked.
    pub fn focused(&self) -> Option<NodeId> {
        self.stack
            .focused()
            .filter(|id| self.sync.arena().contains(*id))
    }

    pub fn focused_node(&self) -> Option<&NavNode<T::Element>> {
        self.focused().and_then(|id| self.sync.node(id))
    }

    /// Focus a node of the active scope directly.
    pub fn focus(&mut self, node: NodeId) -> Result<(), Fault> {
        if !self.sync.arena().contains(node) {
            return Err(Fault::NodeNotFound(node));
        }
        if let Some(scope) = self.stack.active_scope() {
            if !self.stack.is_in_active_scope(node, self.sync.arena()) {
                return Err(Fault::NotInScope { node, scope });
            }
        }
        self.stack.set_focused(Some(node));
        self.reconcile_focus();
        Ok(())
    }

    /// Move focus in `direction`. With no focus, focuses the top-left node
    /// of the active scope.
    pub fn move_focus(&mut self, direction: Direction) -> bool {
        !self.move_effects(direction).is_empty()
    }

    fn move_effects(&mut self, direction: Direction) -> Effects {
        let arena = self.sync.arena();
        let target = match self.focused() {
            None => self
                .navigator
                .initial_target(&self.adapter, arena, &self.stack),
            Some(current) => {
                self.navigator
                    .find_target(&self.adapter, arena, &self.stack, current, direction)
            }
        };
        let Some(target) = target else {
            debug!(?direction, "no candidate in direction");
            return Effects::NONE;
        };
        self.stack.set_focused(Some(target));
        self.reconcile_focus()
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Leave the top context: revert an interactive control, or ask the
    /// toolkit to close the modal.
    pub fn exit_scope(&mut self) -> bool {
        !self.exit_scope_effects().is_empty()
    }

    fn exit_scope_effects(&mut self) -> Effects {
        let top = self.stack.top();
        match (top.kind, top.scope) {
            (ContextKind::InteractiveControl, _) => match self.leave_interaction(true) {
                Ok(effects) => effects,
                Err(fault) => {
                    warn!(
                        %fault,
                        recoverable = fault.is_recoverable(),
                        "failed to revert control value"
                    );
                    Effects::SCOPE_POPPED
                }
            },
            (ContextKind::Modal, Some(scope)) => {
                let Some((element, root)) = self
                    .sync
                    .node(scope)
                    .map(|node| (node.element.clone(), node.root))
                else {
                    self.stack.forget(scope);
                    return Effects::SCOPE_POPPED | self.reconcile_focus();
                };
                if let Err(err) = self.adapter.close(&element) {
                    warn!(%scope, error = %err, "toolkit refused to close modal");
                    return Effects::NONE;
                }
                info!(%scope, "modal close requested");
                self.sync.request_sync(root);
                Effects::SYNC_REQUESTED
            }
            _ => Effects::NONE,
        }
    }

    /// Activate the focused node.
    ///
    /// Adjustable controls enter interaction mode; activating the control
    /// being adjusted commits its value. Everything else is invoked.
    pub fn activate_focused(&mut self) -> bool {
        !self.activate_effects().is_empty()
    }

    fn activate_effects(&mut self) -> Effects {
        let Some(focused) = self.focused() else {
            return Effects::NONE;
        };
        if self.stack.interaction_control() == Some(focused) {
            return match self.leave_interaction(false) {
                Ok(effects) => effects,
                Err(fault) => {
                    warn!(%fault, recoverable = fault.is_recoverable(), "commit failed");
                    Effects::NONE
                }
            };
        }
        let Some((element, root)) = self
            .sync
            .node(focused)
            .map(|node| (node.element.clone(), node.root))
        else {
            return Effects::NONE;
        };

        if let Some(value) = self
            .adapter
            .read_value(&element)
            .filter(|value| value.is_adjustable())
        {
            return match self
                .stack
                .enter_interaction_mode(focused, value, self.sync.arena())
            {
                Ok(true) => Effects::SCOPE_PUSHED | self.reconcile_focus(),
                Ok(false) => Effects::NONE,
                Err(fault) => {
                    warn!(
                        %focused,
                        %fault,
                        recoverable = fault.is_recoverable(),
                        "cannot enter interaction mode"
                    );
                    Effects::NONE
                }
            };
        }

        match self.adapter.invoke(&element) {
            Ok(()) => {
                info!(node = %focused, "invoked");
                self.sync.request_sync(root);
                Effects::ACTIVATED | Effects::SYNC_REQUESTED
            }
            Err(err) => {
                warn!(node = %focused, error = %err, "invoke failed");
                Effects::NONE
            }
        }
    }

    /// Start adjusting `node`'s value. Returns false if it already is.
    pub fn enter_interaction_mode(&mut self, node: NodeId) -> Result<bool, Fault> {
        let element = self.element_of(node)?;
        let value = self
            .adapter
            .read_value(&element)
            .ok_or(Fault::Adapter(AdapterError::Unsupported("read_value")))?;
        let entered = self
            .stack
            .enter_interaction_mode(node, value, self.sync.arena())?;
        if entered {
            self.reconcile_focus();
        }
        Ok(entered)
    }

    /// Stop adjusting. With `revert`, the value captured on entry is
    /// written back.
    pub fn exit_interaction_mode(&mut self, revert: bool) -> Result<(), Fault> {
        self.leave_interaction(revert).map(|_| ())
    }

    fn leave_interaction(&mut self, revert: bool) -> Result<Effects, Fault> {
        let context = self.stack.exit_interaction_mode()?;
        let mut effects = Effects::SCOPE_POPPED | self.reconcile_focus();
        if revert {
            if let (Some(control), Some(original)) = (context.scope, context.original_value) {
                let element = self.element_of(control)?;
                self.adapter.write_value(&element, &original)?;
                debug!(%control, ?original, "value reverted");
                effects |= Effects::VALUE_REVERTED;
            }
        }
        Ok(effects)
    }

    fn step_effects(&mut self, control: NodeId, direction: Direction) -> Effects {
        let Ok(element) = self.element_of(control) else {
            return Effects::NONE;
        };
        match self.adapter.step_value(&element, direction) {
            Ok(true) => Effects::VALUE_CHANGED,
            Ok(false) => Effects::NONE,
            Err(err) => {
                warn!(%control, error = %err, "step failed");
                Effects::NONE
            }
        }
    }

    fn element_of(&self, node: NodeId) -> Result<T::Element, Fault> {
        self.sync
            .node(node)
            .map(|n| n.element.clone())
            .ok_or(Fault::NodeNotFound(node))
    }

    // =========================================================================
    // SHORTCUTS
    // =========================================================================

    /// Run the shortcut bound to `key`.
    pub fn invoke_shortcut(&mut self, key: &str) -> ShortcutOutcome {
        self.shortcut_effects(key).0
    }

    /// Run the shortcut waiting for confirmation.
    pub fn confirm_shortcut(&mut self) -> ShortcutOutcome {
        match self.pending_shortcut.take() {
            Some(key) => self.run_shortcut(&key).0,
            None => ShortcutOutcome::NotFound,
        }
    }

    /// Drop the shortcut waiting for confirmation.
    pub fn cancel_shortcut(&mut self) -> bool {
        let cancelled = self.pending_shortcut.take();
        if let Some(key) = &cancelled {
            info!(%key, "shortcut cancelled");
        }
        cancelled.is_some()
    }

    pub fn pending_shortcut(&self) -> Option<&str> {
        self.pending_shortcut.as_deref()
    }

    fn shortcut_effects(&mut self, key: &str) -> (ShortcutOutcome, Effects) {
        let Some(shortcut) = self
            .table
            .find_shortcut(key)
            .and_then(|rule| rule.shortcut.as_ref())
        else {
            debug!(%key, "no shortcut bound");
            return (ShortcutOutcome::NotFound, Effects::NONE);
        };
        if let Some(confirmation) = &shortcut.confirmation {
            let outcome = ShortcutOutcome::ConfirmationRequired {
                key: shortcut.key.clone(),
                message: confirmation.message.clone(),
            };
            self.pending_shortcut = Some(shortcut.key.clone());
            return (outcome, Effects::CONFIRMATION_REQUIRED);
        }
        self.run_shortcut(key)
    }

    fn run_shortcut(&mut self, key: &str) -> (ShortcutOutcome, Effects) {
        let Some(rule) = self.table.find_shortcut(key) else {
            return (ShortcutOutcome::NotFound, Effects::NONE);
        };
        let Some(shortcut) = rule.shortcut.clone() else {
            return (ShortcutOutcome::NotFound, Effects::NONE);
        };
        let arena = self.sync.arena();
        let target = arena
            .iter()
            .find(|(id, node)| {
                self.stack.is_in_active_scope(*id, arena) && rule.pattern.matches(&node.path)
            })
            .map(|(id, _)| id);
        let Some(target) = target else {
            debug!(%key, "shortcut target not tracked in scope");
            return (ShortcutOutcome::NotFound, Effects::NONE);
        };

        match shortcut.target {
            ShortcutTarget::Group => {
                let first = self
                    .navigator
                    .candidates(&self.adapter, arena, &self.stack, None)
                    .into_iter()
                    .filter(|c| arena.is_self_or_descendant(c.id, target))
                    .min_by(|a, b| {
                        (a.bounds.y, a.bounds.x)
                            .partial_cmp(&(b.bounds.y, b.bounds.x))
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .map(|c| c.id);
                match first {
                    Some(node) => {
                        self.stack.set_focused(Some(node));
                        (ShortcutOutcome::Focused(node), self.reconcile_focus())
                    }
                    None => (ShortcutOutcome::NotFound, Effects::NONE),
                }
            }
            ShortcutTarget::Element => {
                let (navigable, element, root) = match arena.get(target) {
                    Some(node) => (node.is_navigable(), node.element.clone(), node.root),
                    None => return (ShortcutOutcome::NotFound, Effects::NONE),
                };
                let mut effects = Effects::NONE;
                if navigable {
                    self.stack.set_focused(Some(target));
                    effects |= self.reconcile_focus();
                }
                if shortcut.no_auto_click {
                    return (ShortcutOutcome::Focused(target), effects);
                }
                match self.adapter.invoke(&element) {
                    Ok(()) => {
                        info!(%key, node = %target, "shortcut invoked");
                        self.sync.request_sync(root);
                        (
                            ShortcutOutcome::Invoked(target),
                            effects | Effects::ACTIVATED | Effects::SYNC_REQUESTED,
                        )
                    }
                    Err(err) => {
                        warn!(%key, node = %target, error = %err, "shortcut invoke failed");
                        (ShortcutOutcome::Focused(target), effects)
                    }
                }
            }
        }
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Run one input command.
    pub fn execute(&mut self, command: NavCommand) -> Effects {
        match command {
            NavCommand::Move(direction) => match self.stack.interaction_control() {
                Some(control) => self.step_effects(control, direction),
                None => self.move_effects(direction),
            },
            NavCommand::Activate => {
                if let Some(key) = self.pending_shortcut.take() {
                    self.run_shortcut(&key).1
                } else {
                    self.activate_effects()
                }
            }
            NavCommand::ExitScope => {
                if self.cancel_shortcut() {
                    Effects::NONE
                } else {
                    self.exit_scope_effects()
                }
            }
            NavCommand::Shortcut(key) => self.shortcut_effects(&key).1,
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Take queued lifecycle and focus events.
    pub fn drain_events(&mut self) -> Vec<NavEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn all_nodes(&self) -> impl Iterator<Item = (NodeId, &NavNode<T::Element>)> {
        self.sync.arena().iter()
    }

    pub fn node(&self, id: NodeId) -> Option<&NavNode<T::Element>> {
        self.sync.node(id)
    }

    /// Nodes whose path starts with `prefix`, in arena order.
    pub fn nodes_under_path(&self, prefix: &HierarchicalPath) -> Vec<NodeId> {
        self.sync
            .arena()
            .iter()
            .filter(|(_, node)| node.path.starts_with(prefix))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.sync.arena().is_descendant_of(node, ancestor)
    }

    /// Page of the focused node.
    pub fn current_page(&self) -> Option<&str> {
        self.focused_node().and_then(|node| node.page())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ControlValue;
    use crate::memtree::{ElementSpec, MemoryTree};
    use padnav_rules::{ClassificationRule, Role, RuleSet, Shortcut};

    fn table(rules: Vec<ClassificationRule>) -> ClassificationTable {
        ClassificationTable::new(RuleSet {
            rules,
            exclusions: Vec::new(),
        })
    }

    fn id_of(engine: &Engine<MemoryTree>, name: &str) -> NodeId {
        let element = engine.adapter().find(name).unwrap();
        engine.synchronizer().node_for_element(&element).unwrap()
    }

    #[test]
    fn first_move_focuses_top_left() {
        let mut tree = MemoryTree::new();
        let main = tree.add_root(ElementSpec::new("Main", "Window"));
        tree.add_child(main, ElementSpec::new("B", "Button").bounds(100.0, 0.0, 10.0, 10.0));
        tree.add_child(main, ElementSpec::new("A", "Button").bounds(0.0, 0.0, 10.0, 10.0));

        let mut engine = Engine::with_defaults(tree, ClassificationTable::default());
        engine.register_root(main, None);
        engine.run_pending();
        assert_eq!(engine.focused(), None);

        assert!(engine.move_focus(Direction::Down));
        let a = id_of(&engine, "A");
        assert_eq!(engine.focused(), Some(a));
        assert!(engine.node(a).unwrap().is_focused());

        let events = engine.drain_events();
        assert_eq!(
            events.last(),
            Some(&NavEvent::FocusChanged {
                old: None,
                new: Some(a)
            })
        );
    }

    #[test]
    fn opening_modal_scopes_navigation() {
        let mut tree = MemoryTree::new();
        let main = tree.add_root(ElementSpec::new("Main", "Window"));
        let combo = tree.add_child(
            main,
            ElementSpec::new("Combo", "ComboBox")
                .expanded(false)
                .bounds(0.0, 0.0, 100.0, 20.0),
        );
        tree.add_child(combo, ElementSpec::new("One", "ComboBoxItem").bounds(0.0, 20.0, 100.0, 20.0));
        tree.add_child(combo, ElementSpec::new("Two", "ComboBoxItem").bounds(0.0, 40.0, 100.0, 20.0));
        tree.add_child(main, ElementSpec::new("Ok", "Button").bounds(200.0, 0.0, 50.0, 20.0));

        let rules = vec![ClassificationRule::new("** > Combo:ComboBox".parse().unwrap())
            .with_role(Role::Group)
            .modal()];
        let mut engine = Engine::with_defaults(tree, table(rules));
        engine.register_root(main, None);
        engine.run_pending();

        engine.move_focus(Direction::Right);
        let combo_id = id_of(&engine, "Combo");
        assert_eq!(engine.focused(), Some(combo_id));

        let effects = engine.execute(NavCommand::Activate);
        assert!(effects.contains(Effects::ACTIVATED));
        engine.run_pending();
        assert_eq!(engine.stack().depth(), 1);
        let one = id_of(&engine, "One");
        assert_eq!(engine.focused(), Some(one));

        // Ok lies outside the open combo
        assert!(!engine.move_focus(Direction::Right));
        assert!(engine.move_focus(Direction::Down));
        assert_eq!(engine.focused(), Some(id_of(&engine, "Two")));

        assert!(engine.exit_scope());
        engine.run_pending();
        assert_eq!(engine.stack().depth(), 0);
        assert_eq!(engine.focused(), Some(combo_id));
    }

    #[test]
    fn interaction_mode_steps_and_reverts() {
        let mut tree = MemoryTree::new();
        let main = tree.add_root(ElementSpec::new("Main", "Window"));
        let slider = tree.add_child(
            main,
            ElementSpec::new("Volume", "Slider")
                .bounds(0.0, 0.0, 100.0, 20.0)
                .value(ControlValue::Number(5.0)),
        );
        let mut engine = Engine::with_defaults(tree, ClassificationTable::default());
        engine.register_root(main, None);
        engine.run_pending();
        engine.move_focus(Direction::Down);

        let effects = engine.execute(NavCommand::Activate);
        assert!(effects.contains(Effects::SCOPE_PUSHED));
        assert!(engine.stack().in_interaction_mode());

        assert_eq!(
            engine.execute(NavCommand::Move(Direction::Right)),
            Effects::VALUE_CHANGED
        );
        assert_eq!(engine.adapter().value(slider), Some(&ControlValue::Number(6.0)));

        let effects = engine.execute(NavCommand::ExitScope);
        assert!(effects.contains(Effects::VALUE_REVERTED));
        assert_eq!(engine.adapter().value(slider), Some(&ControlValue::Number(5.0)));
        assert!(!engine.stack().in_interaction_mode());
    }

    #[test]
    fn activate_commits_interaction() {
        let mut tree = MemoryTree::new();
        let main = tree.add_root(ElementSpec::new("Main", "Window"));
        let slider = tree.add_child(
            main,
            ElementSpec::new("Volume", "Slider")
                .bounds(0.0, 0.0, 100.0, 20.0)
                .value(ControlValue::Number(5.0)),
        );
        let mut engine = Engine::with_defaults(tree, ClassificationTable::default());
        engine.register_root(main, None);
        engine.run_pending();
        engine.move_focus(Direction::Down);

        engine.execute(NavCommand::Activate);
        engine.execute(NavCommand::Move(Direction::Left));
        let effects = engine.execute(NavCommand::Activate);
        assert!(effects.contains(Effects::SCOPE_POPPED));
        assert!(!effects.contains(Effects::VALUE_REVERTED));
        assert_eq!(engine.adapter().value(slider), Some(&ControlValue::Number(4.0)));
    }

    #[test]
    fn confirmed_shortcut_invokes_target() {
        let mut tree = MemoryTree::new();
        let main = tree.add_root(ElementSpec::new("Main", "Window"));
        let delete = tree.add_child(main, ElementSpec::new("Delete", "Button").bounds(0.0, 0.0, 10.0, 10.0));
        let rules = vec![ClassificationRule::new("** > Delete:Button".parse().unwrap())
            .with_shortcut(Shortcut::new("Y").with_confirmation("Really delete?"))];
        let mut engine = Engine::with_defaults(tree, table(rules));
        engine.register_root(main, None);
        engine.run_pending();

        let outcome = engine.invoke_shortcut("y");
        assert_eq!(
            outcome,
            ShortcutOutcome::ConfirmationRequired {
                key: "Y".into(),
                message: "Really delete?".into()
            }
        );
        assert!(engine.adapter().invocations().is_empty());

        // ExitScope cancels
        assert_eq!(engine.execute(NavCommand::ExitScope), Effects::NONE);
        assert!(engine.pending_shortcut().is_none());

        engine.invoke_shortcut("Y");
        let effects = engine.execute(NavCommand::Activate);
        assert!(effects.contains(Effects::ACTIVATED));
        assert_eq!(engine.adapter().invocations(), &[delete]);
    }
}
