//! Tree synchronizer.
//!
//! Keeps the [`NodeArena`] in step with the live element tree. Each
//! independently rendered root is scanned depth-first on request; nodes that
//! were not revisited are pruned at the end of the pass.
//!
//! Root lifecycle: `Registered -> SyncPending -> Synced`, and back to
//! `SyncPending` whenever a sync is requested. Requests coalesce: a newer
//! ticket replaces the one already scheduled, so each root syncs at most once
//! per idle pass.

use crate::adapter::{ElementInfo, ElementTree, SurfaceId};
use crate::error::AdapterError;
use crate::event::{NavEvent, RootChange};
use crate::geom::Rect;
use crate::node::{NavNode, NodeArena, NodeFlags, NodeId, NodeIdentity, NodeRole, RootId};
use crate::taxonomy::{ResolvedRole, TypeTaxonomy};
use padnav_pattern::{HierarchicalPath, PathSegment};
use padnav_rules::{Classification, ClassificationTable, Role};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, info, warn};

/// Default bound on idle passes per `run_pending` call.
pub const DEFAULT_MAX_SYNC_PASSES: usize = 8;

/// Sync state of a registered root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootPhase {
    Registered,
    SyncPending,
    Synced,
}

#[derive(Debug, Clone)]
struct RootEntry<E> {
    element: E,
    /// Tracked node the root hangs off (popup owner).
    owner: Option<NodeId>,
    owner_root: Option<RootId>,
    /// Found by a scan rather than registered by the host.
    discovered: bool,
    node: Option<NodeId>,
    phase: RootPhase,
    surface: Option<SurfaceId>,
    last_ticket: u64,
}

/// Counters from one root sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub tracked: usize,
    pub added: usize,
    pub removed: usize,
    pub roots_discovered: usize,
}

/// Untracked element reached by the last pass of its root.
#[derive(Debug, Clone)]
struct ScannedElement {
    root: RootId,
    /// Path of a structural element whose children were lifted to its
    /// tracked parent.
    lifted: Option<HierarchicalPath>,
}

struct SyncPass<'t, E> {
    table: &'t ClassificationTable,
    root: RootId,
    surface: SurfaceId,
    visited: HashSet<NodeId>,
    seen_elements: HashSet<E>,
    seen_roots: HashSet<RootId>,
    scanned: Vec<(E, Option<HierarchicalPath>)>,
    added: usize,
}

/// Attributes read for one element during a pass.
struct Observed<E> {
    element: E,
    identity: NodeIdentity,
    type_name: String,
    path: HierarchicalPath,
    role: NodeRole,
    flags: NodeFlags,
    parent: Option<NodeId>,
    bounds: Option<Rect>,
    page: Option<String>,
    shortcut_key: Option<String>,
}

/// Discovers and retires navigation nodes from a live tree.
#[derive(Debug, Clone)]
pub struct TreeSynchronizer<E> {
    arena: NodeArena<E>,
    by_element: HashMap<E, NodeId>,
    roots: BTreeMap<RootId, RootEntry<E>>,
    root_by_element: HashMap<E, RootId>,
    scanned: HashMap<E, ScannedElement>,
    pending: BTreeMap<RootId, u64>,
    next_root: u32,
    next_ticket: u64,
    events: Vec<NavEvent>,
    taxonomy: TypeTaxonomy,
    max_sync_passes: usize,
}

impl<E> Default for TreeSynchronizer<E>
where
    E: Clone + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new(TypeTaxonomy::default(), DEFAULT_MAX_SYNC_PASSES)
    }
}

impl<E> TreeSynchronizer<E>
where
    E: Clone + Eq + Hash + Debug,
{
    pub fn new(taxonomy: TypeTaxonomy, max_sync_passes: usize) -> Self {
        Self {
            arena: NodeArena::new(),
            by_element: HashMap::new(),
            roots: BTreeMap::new(),
            root_by_element: HashMap::new(),
            scanned: HashMap::new(),
            pending: BTreeMap::new(),
            next_root: 0,
            next_ticket: 0,
            events: Vec::new(),
            taxonomy,
            max_sync_passes: max_sync_passes.max(1),
        }
    }

    pub fn arena(&self) -> &NodeArena<E> {
        &self.arena
    }

    pub(crate) fn arena_mut(&mut self) -> &mut NodeArena<E> {
        &mut self.arena
    }

    pub fn node(&self, id: NodeId) -> Option<&NavNode<E>> {
        self.arena.get(id)
    }

    /// Node currently tracking `element`.
    pub fn node_for_element(&self, element: &E) -> Option<NodeId> {
        self.by_element
            .get(element)
            .copied()
            .filter(|id| self.arena.contains(*id))
    }

    pub fn taxonomy(&self) -> &TypeTaxonomy {
        &self.taxonomy
    }

    /// Replace the taxonomy. Takes effect on the next sync of each root.
    pub fn set_taxonomy(&mut self, taxonomy: TypeTaxonomy) {
        self.taxonomy = taxonomy;
    }

    /// Registered roots in id order.
    pub fn roots(&self) -> impl Iterator<Item = RootId> + '_ {
        self.roots.keys().copied()
    }

    pub fn root_phase(&self, root: RootId) -> Option<RootPhase> {
        self.roots.get(&root).map(|entry| entry.phase)
    }

    /// Node tracking the root element itself, once synced.
    pub fn root_node(&self, root: RootId) -> Option<NodeId> {
        self.roots
            .get(&root)
            .and_then(|entry| entry.node)
            .filter(|id| self.arena.contains(*id))
    }

    /// Root a tracked node belongs to.
    pub fn root_of(&self, node: NodeId) -> Option<RootId> {
        self.arena.get(node).map(|n| n.root)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Register an independently rendered root, or return its existing id.
    ///
    /// Either way the root is scheduled for a sync.
    pub fn register_root(&mut self, element: E, owner: Option<NodeId>) -> RootId {
        self.register(element, owner, false)
    }

    /// Schedule a sync of `root`. Returns false for an unknown root.
    pub fn request_sync(&mut self, root: RootId) -> bool {
        if !self.roots.contains_key(&root) {
            return false;
        }
        self.schedule(root);
        true
    }

    /// Schedule a sync of whichever root contains `element`.
    ///
    /// The element must have been reached by an earlier pass: a root, a
    /// tracked node, or an untracked element such as a layout panel.
    pub fn notify_layout_changed(&mut self, element: &E) -> Option<RootId> {
        let root = self
            .root_by_element
            .get(element)
            .copied()
            .or_else(|| self.node_for_element(element).and_then(|id| self.root_of(id)))
            .or_else(|| self.scanned.get(element).map(|scanned| scanned.root))
            .filter(|root| self.roots.contains_key(root));
        let Some(root) = root else {
            debug!(?element, "layout change from an element no pass has reached");
            return None;
        };
        self.schedule(root);
        Some(root)
    }

    /// Idle hook: run every pending root sync once.
    ///
    /// Roots discovered while running are synced in later passes, up to the
    /// configured pass limit. Returns the number of root syncs executed.
    pub fn run_pending<T>(&mut self, adapter: &T, table: &ClassificationTable) -> usize
    where
        T: ElementTree<Element = E>,
    {
        let mut executed = 0;
        for pass in 0..self.max_sync_passes {
            if self.pending.is_empty() {
                break;
            }
            let batch: Vec<RootId> = self.pending.keys().copied().collect();
            debug!(pass, roots = batch.len(), "sync pass");
            for root in batch {
                if let Some(ticket) = self.pending.remove(&root) {
                    self.sync_scheduled(adapter, table, root, ticket);
                    executed += 1;
                }
            }
        }
        if !self.pending.is_empty() {
            warn!(
                remaining = self.pending.len(),
                max_passes = self.max_sync_passes,
                "sync pass limit reached; remaining roots stay pending"
            );
        }
        executed
    }

    /// Sync one root immediately, dropping any scheduled request for it.
    pub fn sync_root<T>(
        &mut self,
        adapter: &T,
        table: &ClassificationTable,
        root: RootId,
    ) -> Option<SyncReport>
    where
        T: ElementTree<Element = E>,
    {
        let ticket = self.pending.remove(&root).unwrap_or(self.next_ticket);
        self.sync_scheduled(adapter, table, root, ticket)
    }

    /// Remove a root, every node it tracks and every root it owns.
    pub fn retire_root(&mut self, root: RootId) -> bool {
        let Some(entry) = self.roots.remove(&root) else {
            return false;
        };
        if self.root_by_element.get(&entry.element) == Some(&root) {
            self.root_by_element.remove(&entry.element);
        }
        self.pending.remove(&root);
        self.scanned.retain(|_, scanned| scanned.root != root);

        let owned: Vec<RootId> = self
            .roots
            .iter()
            .filter(|(_, e)| e.owner_root == Some(root))
            .map(|(id, _)| *id)
            .collect();
        for child in owned {
            self.retire_root(child);
        }

        let nodes: Vec<NodeId> = self
            .arena
            .iter()
            .filter(|(_, node)| node.root == root)
            .map(|(id, _)| id)
            .collect();
        let removed = self.remove_nodes(nodes);
        info!(%root, removed, "root retired");
        self.events.push(NavEvent::RootChanged {
            root,
            change: RootChange::Retired,
        });
        true
    }

    /// Take queued events.
    pub fn drain_events(&mut self) -> Vec<NavEvent> {
        std::mem::take(&mut self.events)
    }

    fn register(&mut self, element: E, owner: Option<NodeId>, discovered: bool) -> RootId {
        let owner_root = owner.and_then(|id| self.root_of(id));
        if let Some(&root) = self.root_by_element.get(&element) {
            if let Some(entry) = self.roots.get_mut(&root) {
                entry.owner = owner;
                entry.owner_root = owner_root;
            }
            self.schedule(root);
            return root;
        }

        let root = RootId(self.next_root);
        self.next_root += 1;
        self.root_by_element.insert(element.clone(), root);
        self.roots.insert(
            root,
            RootEntry {
                element,
                owner,
                owner_root,
                discovered,
                node: None,
                phase: RootPhase::Registered,
                surface: None,
                last_ticket: 0,
            },
        );
        debug!(%root, ?owner, discovered, "root registered");
        self.events.push(NavEvent::RootChanged {
            root,
            change: RootChange::Registered,
        });
        self.schedule(root);
        root
    }

    fn schedule(&mut self, root: RootId) {
        self.next_ticket += 1;
        if let Some(superseded) = self.pending.insert(root, self.next_ticket) {
            debug!(%root, superseded, ticket = self.next_ticket, "sync request coalesced");
        }
        if let Some(entry) = self.roots.get_mut(&root) {
            entry.phase = RootPhase::SyncPending;
        }
    }

    fn sync_scheduled<T>(
        &mut self,
        adapter: &T,
        table: &ClassificationTable,
        root: RootId,
        ticket: u64,
    ) -> Option<SyncReport>
    where
        T: ElementTree<Element = E>,
    {
        let entry = self.roots.get(&root)?;
        let element = entry.element.clone();
        let owner = entry.owner.filter(|id| self.arena.contains(*id));

        if !adapter.is_alive(&element) {
            debug!(%root, "root element gone");
            self.retire_root(root);
            return None;
        }
        let info = match adapter.describe(&element) {
            Ok(info) => info,
            Err(AdapterError::ElementGone) => {
                self.retire_root(root);
                return None;
            }
            Err(err) => {
                warn!(%root, error = %err, "failed to describe root; keeping tracked nodes");
                self.finish(root, ticket, None);
                return Some(SyncReport::default());
            }
        };

        let mut pass = SyncPass {
            table,
            root,
            surface: info.surface,
            visited: HashSet::new(),
            seen_elements: HashSet::new(),
            seen_roots: HashSet::new(),
            scanned: Vec::new(),
            added: 0,
        };
        pass.seen_elements.insert(element.clone());

        let mut root_node = None;
        if info.is_presentable() {
            let parent_path = owner
                .and_then(|id| self.arena.get(id))
                .map(|node| node.path.clone())
                .unwrap_or_default();
            let path = parent_path.child(path_segment(&info, 0));
            if table.is_excluded(&path) {
                debug!(%root, %path, "root excluded");
            } else {
                let classification = table.classify(&path);
                let mut flags = NodeFlags::OPEN;
                if classification.as_ref().is_some_and(|c| c.modal) {
                    flags |= NodeFlags::MODAL;
                }
                let observed = Observed {
                    identity: node_identity(&info, 0),
                    type_name: info.type_name.clone(),
                    bounds: adapter.bounds(&element),
                    page: table.find_page_for_element(&path).map(str::to_string),
                    shortcut_key: shortcut_key(classification.as_ref()),
                    element: element.clone(),
                    path: path.clone(),
                    role: NodeRole::Group,
                    flags,
                    parent: owner,
                };
                let id = self.upsert(root, observed, &mut pass.added);
                pass.visited.insert(id);
                let mut children = Vec::new();
                self.walk_children(adapter, &mut pass, &element, id, &path, &mut children);
                if let Some(node) = self.arena.get_mut(id) {
                    node.children = children;
                }
                root_node = Some(id);
            }
        }

        let stale: Vec<NodeId> = self
            .arena
            .iter()
            .filter(|(id, node)| node.root == root && !pass.visited.contains(id))
            .map(|(id, _)| id)
            .collect();
        let removed = self.remove_nodes(stale);

        let orphaned: Vec<RootId> = self
            .roots
            .iter()
            .filter(|(id, e)| {
                e.discovered && e.owner_root == Some(root) && !pass.seen_roots.contains(id)
            })
            .map(|(id, _)| *id)
            .collect();
        for orphan in orphaned {
            self.retire_root(orphan);
        }

        self.scanned.retain(|_, scanned| scanned.root != root);
        for (element, lifted) in std::mem::take(&mut pass.scanned) {
            self.scanned.insert(element, ScannedElement { root, lifted });
        }

        if let Some(entry) = self.roots.get_mut(&root) {
            entry.surface = Some(info.surface);
        }
        self.finish(root, ticket, root_node);

        let report = SyncReport {
            tracked: pass.visited.len(),
            added: pass.added,
            removed,
            roots_discovered: pass.seen_roots.len(),
        };
        debug!(
            %root,
            ticket,
            tracked = report.tracked,
            added = report.added,
            removed = report.removed,
            "root synced"
        );
        Some(report)
    }

    fn finish(&mut self, root: RootId, ticket: u64, node: Option<NodeId>) {
        if let Some(entry) = self.roots.get_mut(&root) {
            if node.is_some() || entry.node.is_some_and(|id| !self.arena.contains(id)) {
                entry.node = node;
            }
            entry.last_ticket = ticket;
            if !self.pending.contains_key(&root) {
                entry.phase = RootPhase::Synced;
            }
        }
    }

    fn walk_children<T>(
        &mut self,
        adapter: &T,
        pass: &mut SyncPass<'_, E>,
        element: &E,
        parent: NodeId,
        parent_path: &HierarchicalPath,
        out: &mut Vec<NodeId>,
    ) where
        T: ElementTree<Element = E>,
    {
        let children = match adapter.children(element) {
            Ok(children) => children,
            Err(err) => {
                warn!(
                    root = %pass.root,
                    path = %parent_path,
                    error = %err,
                    "failed to enumerate children; keeping tracked subtree"
                );
                self.retain_under(pass, parent_path, parent, out);
                return;
            }
        };
        let mut instances: HashMap<String, u32> = HashMap::new();
        for child in children {
            self.visit(adapter, pass, child, parent, parent_path, &mut instances, out);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn visit<T>(
        &mut self,
        adapter: &T,
        pass: &mut SyncPass<'_, E>,
        element: E,
        parent: NodeId,
        parent_path: &HierarchicalPath,
        instances: &mut HashMap<String, u32>,
        out: &mut Vec<NodeId>,
    ) where
        T: ElementTree<Element = E>,
    {
        if !pass.seen_elements.insert(element.clone()) {
            warn!(root = %pass.root, ?element, "element reached twice in one pass; skipping");
            return;
        }
        let info = match adapter.describe(&element) {
            Ok(info) => info,
            Err(AdapterError::ElementGone) => return,
            Err(err) => {
                warn!(root = %pass.root, ?element, error = %err, "failed to describe element; keeping tracked subtree");
                self.retain_failed(pass, &element, parent, out);
                return;
            }
        };
        if !info.is_presentable() {
            pass.scanned.push((element, None));
            return;
        }
        if info.surface != pass.surface {
            let root = self.register(element, Some(parent), true);
            pass.seen_roots.insert(root);
            return;
        }

        let slot = instances.entry(info.type_name.to_lowercase()).or_insert(0);
        let instance = *slot;
        *slot += 1;

        let path = parent_path.child(path_segment(&info, instance));
        if pass.table.is_excluded(&path) {
            debug!(%path, "excluded");
            pass.scanned.push((element, None));
            return;
        }
        let classification = pass.table.classify(&path);
        let role = match self.resolve_role(&info, classification.as_ref()) {
            ResolvedRole::Ignored => {
                pass.scanned.push((element.clone(), Some(path.clone())));
                self.walk_children(adapter, pass, &element, parent, &path, out);
                return;
            }
            ResolvedRole::Leaf => NodeRole::Leaf,
            ResolvedRole::Group => NodeRole::Group,
        };

        let flags = node_flags(role, &info, classification.as_ref());
        let observed = Observed {
            identity: node_identity(&info, instance),
            type_name: info.type_name.clone(),
            bounds: adapter.bounds(&element),
            page: pass.table.find_page_for_element(&path).map(str::to_string),
            shortcut_key: shortcut_key(classification.as_ref()),
            element: element.clone(),
            path: path.clone(),
            role,
            flags,
            parent: Some(parent),
        };
        let id = self.upsert(pass.root, observed, &mut pass.added);
        pass.visited.insert(id);
        out.push(id);

        let mut children = Vec::new();
        if role == NodeRole::Group && flags.contains(NodeFlags::OPEN) {
            self.walk_children(adapter, pass, &element, id, &path, &mut children);
        }
        if let Some(node) = self.arena.get_mut(id) {
            node.children = children;
        }
    }

    fn resolve_role(
        &self,
        info: &ElementInfo,
        classification: Option<&Classification>,
    ) -> ResolvedRole {
        if let Some(classification) = classification {
            match classification.role {
                Role::Leaf => return ResolvedRole::Leaf,
                Role::Group => return ResolvedRole::Group,
                Role::Undefined if classification.modal => return ResolvedRole::Group,
                Role::Undefined => {}
            }
        }
        if let Some(role) = self.taxonomy.resolve(&info.type_name) {
            return role;
        }
        if info.stable_name().is_some() || info.focusable || (info.enabled && info.interactive) {
            ResolvedRole::Leaf
        } else {
            ResolvedRole::Ignored
        }
    }

    fn upsert(&mut self, root: RootId, observed: Observed<E>, added: &mut usize) -> NodeId {
        if let Some(&id) = self.by_element.get(&observed.element) {
            if let Some(node) = self.arena.get_mut(id) {
                let was_open_modal = node.is_open_modal();
                node.flags = observed.flags | (node.flags & NodeFlags::FOCUSED);
                node.identity = observed.identity;
                node.type_name = observed.type_name;
                node.path = observed.path;
                node.role = observed.role;
                node.parent = observed.parent;
                node.root = root;
                node.bounds = observed.bounds;
                node.page = observed.page;
                node.shortcut_key = observed.shortcut_key;
                let open_modal = node.is_open_modal();
                if open_modal && !was_open_modal {
                    self.events.push(NavEvent::ModalGroupOpened(id));
                } else if was_open_modal && !open_modal {
                    self.events.push(NavEvent::ModalGroupClosed(id));
                }
                return id;
            }
        }

        let node = NavNode {
            element: observed.element.clone(),
            identity: observed.identity,
            type_name: observed.type_name,
            path: observed.path,
            role: observed.role,
            flags: observed.flags,
            parent: observed.parent,
            children: Vec::new(),
            root,
            bounds: observed.bounds,
            page: observed.page,
            shortcut_key: observed.shortcut_key,
        };
        let open_modal = node.is_open_modal();
        let id = self.arena.insert(node);
        self.by_element.insert(observed.element, id);
        *added += 1;
        self.events.push(NavEvent::NodeAdded(id));
        if open_modal {
            self.events.push(NavEvent::ModalGroupOpened(id));
        }
        id
    }

    /// Keep what earlier passes tracked under an element that could not be
    /// read. Tracked elements keep their own node; structural ones keep the
    /// nodes that were lifted from them into `parent`.
    fn retain_failed(
        &mut self,
        pass: &mut SyncPass<'_, E>,
        element: &E,
        parent: NodeId,
        out: &mut Vec<NodeId>,
    ) {
        if let Some(id) = self.node_for_element(element) {
            let Some(path) = self.arena.get(id).map(|node| node.path.clone()) else {
                return;
            };
            if pass.visited.insert(id) {
                out.push(id);
            }
            self.retain_under(pass, &path, id, &mut Vec::new());
            self.carry_scanned(pass, &path);
            return;
        }
        let Some(previous) = self
            .scanned
            .get(element)
            .filter(|scanned| scanned.root == pass.root)
            .cloned()
        else {
            return;
        };
        if let Some(path) = &previous.lifted {
            self.retain_under(pass, path, parent, out);
            self.carry_scanned(pass, path);
        }
        pass.scanned.push((element.clone(), previous.lifted));
    }

    /// Keep the structural elements recorded under `path` for the next pass.
    fn carry_scanned(&self, pass: &mut SyncPass<'_, E>, path: &HierarchicalPath) {
        for (element, scanned) in &self.scanned {
            let under = scanned
                .lifted
                .as_ref()
                .is_some_and(|lifted| lifted.starts_with(path));
            if scanned.root == pass.root && under {
                pass.scanned.push((element.clone(), scanned.lifted.clone()));
            }
        }
    }

    /// Keep every tracked node of this root under `path`. Nodes directly
    /// below `parent` are reported through `out`.
    fn retain_under(
        &self,
        pass: &mut SyncPass<'_, E>,
        path: &HierarchicalPath,
        parent: NodeId,
        out: &mut Vec<NodeId>,
    ) {
        for (id, node) in self.arena.iter() {
            if id == parent || node.root != pass.root || !node.path.starts_with(path) {
                continue;
            }
            if pass.visited.insert(id) && node.parent == Some(parent) {
                out.push(id);
            }
        }
    }

    /// Remove nodes deepest first. Returns how many were removed.
    fn remove_nodes(&mut self, ids: Vec<NodeId>) -> usize {
        let mut ordered: Vec<(usize, NodeId)> = ids
            .into_iter()
            .map(|id| (self.arena.depth(id), id))
            .collect();
        ordered.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let mut removed = 0;
        for (_, id) in ordered {
            let Some(node) = self.arena.remove(id) else {
                continue;
            };
            if node.is_open_modal() {
                self.events.push(NavEvent::ModalGroupClosed(id));
            }
            if self.by_element.get(&node.element) == Some(&id) {
                self.by_element.remove(&node.element);
            }
            self.events.push(NavEvent::NodeRemoved(id));
            removed += 1;
        }
        removed
    }
}

/// Path step for an element. Anonymous elements carry their sibling
/// instance so that their paths stay distinct.
fn path_segment(info: &ElementInfo, instance: u32) -> PathSegment {
    let mut segment = PathSegment::new(info.stable_name().unwrap_or(""), info.type_name.as_str());
    segment.content = info.content.clone();
    if info.stable_name().is_none() {
        segment.instance = Some(instance);
    }
    segment
}

fn node_identity(info: &ElementInfo, instance: u32) -> NodeIdentity {
    match info.automation_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => NodeIdentity::AutomationId(id.to_string()),
        None if !info.name.is_empty() => NodeIdentity::Name(info.name.clone()),
        None => NodeIdentity::Fallback {
            type_name: info.type_name.clone(),
            instance,
        },
    }
}

fn node_flags(
    role: NodeRole,
    info: &ElementInfo,
    classification: Option<&Classification>,
) -> NodeFlags {
    let mut flags = NodeFlags::empty();
    if classification.is_some_and(|c| c.modal) {
        flags |= NodeFlags::MODAL;
    }
    if role == NodeRole::Group {
        flags |= match info.expanded {
            Some(true) => NodeFlags::DUAL_ROLE | NodeFlags::OPEN,
            Some(false) => NodeFlags::DUAL_ROLE,
            None => NodeFlags::OPEN,
        };
    }
    flags
}

fn shortcut_key(classification: Option<&Classification>) -> Option<String> {
    classification
        .and_then(|c| c.shortcut.as_ref())
        .map(|shortcut| shortcut.key.clone())
}
