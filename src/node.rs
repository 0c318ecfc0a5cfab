//! Navigation nodes and the generation-checked arena that owns them.
//!
//! A [`NodeId`] stays valid only as long as its slot generation matches.
//! Removing a node bumps the generation, so every stale id resolves to
//! `None` instead of a recycled node.

use crate::geom::Rect;
use bitflags::bitflags;
use padnav_pattern::HierarchicalPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Generation-checked handle into a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}v{}", self.index, self.generation)
    }
}

/// Identifies an independently rendered root (window content, popup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RootId(pub(crate) u32);

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root{}", self.0)
    }
}

/// Stable identity of a node: automation id, else name, else type+instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeIdentity {
    AutomationId(String),
    Name(String),
    Fallback { type_name: String, instance: u32 },
}

impl NodeIdentity {
    /// True for developer-assigned or human-assigned identities.
    pub fn is_stable(&self) -> bool {
        !matches!(self, NodeIdentity::Fallback { .. })
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeIdentity::AutomationId(id) => write!(f, "#{}", id),
            NodeIdentity::Name(name) => f.write_str(name),
            NodeIdentity::Fallback {
                type_name,
                instance,
            } => write!(f, "{}#{}", type_name, instance),
        }
    }
}

/// Capability tag, fixed when the node is created or updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    Leaf,
    Group,
}

bitflags! {
    /// Node state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        /// Classified modal: opening it pushes a scope.
        const MODAL = 1 << 0;
        /// Group with an expansion state; navigable while closed.
        const DUAL_ROLE = 1 << 1;
        /// Group is open; its children are reachable.
        const OPEN = 1 << 2;
        /// Node holds the engine focus.
        const FOCUSED = 1 << 3;
    }
}

/// One tracked navigation vertex.
///
/// `element` is a non-owning handle; check liveness through the adapter
/// before acting on it.
#[derive(Debug, Clone)]
pub struct NavNode<E> {
    pub(crate) element: E,
    pub(crate) identity: NodeIdentity,
    pub(crate) type_name: String,
    pub(crate) path: HierarchicalPath,
    pub(crate) role: NodeRole,
    pub(crate) flags: NodeFlags,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) root: RootId,
    pub(crate) bounds: Option<Rect>,
    pub(crate) page: Option<String>,
    pub(crate) shortcut_key: Option<String>,
}

impl<E> NavNode<E> {
    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn path(&self) -> &HierarchicalPath {
        &self.path
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children as of the last sync of this node's root. May contain stale
    /// ids; resolve through the arena.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn root(&self) -> RootId {
        self.root
    }

    /// Bounds cached at the last sync.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    pub fn shortcut_key(&self) -> Option<&str> {
        self.shortcut_key.as_deref()
    }

    pub fn is_modal(&self) -> bool {
        self.flags.contains(NodeFlags::MODAL)
    }

    pub fn is_dual_role(&self) -> bool {
        self.flags.contains(NodeFlags::DUAL_ROLE)
    }

    pub fn is_open(&self) -> bool {
        self.flags.contains(NodeFlags::OPEN)
    }

    pub fn is_focused(&self) -> bool {
        self.flags.contains(NodeFlags::FOCUSED)
    }

    /// Leaves always; groups only while closed.
    pub fn is_navigable(&self) -> bool {
        match self.role {
            NodeRole::Leaf => true,
            NodeRole::Group => !self.is_open(),
        }
    }

    /// Open modal group: owns a scope on the context stack.
    pub fn is_open_modal(&self) -> bool {
        self.role == NodeRole::Group && self.is_modal() && self.is_open()
    }
}

#[derive(Debug, Clone)]
struct Slot<E> {
    generation: u32,
    node: Option<NavNode<E>>,
}

/// Owner of every [`NavNode`], addressed by [`NodeId`].
#[derive(Debug, Clone)]
pub struct NodeArena<E> {
    slots: Vec<Slot<E>>,
    free: Vec<u32>,
    len: usize,
}

impl<E> Default for NodeArena<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> NodeArena<E> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn insert(&mut self, node: NavNode<E>) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId::new(index, 0)
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Option<NavNode<E>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&NavNode<E>> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut NavNode<E>> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Live nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NavNode<E>)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node
                .as_ref()
                .map(|node| (NodeId::new(index as u32, slot.generation), node))
        })
    }

    /// Live node ids in slot order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Parent chain of `id`, nearest first, excluding `id` itself.
    ///
    /// Stops at a stale link and after `len()` steps so a corrupt chain can
    /// never loop.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, E> {
        Ancestors {
            arena: self,
            next: self.get(id).and_then(|node| node.parent),
            remaining: self.len,
        }
    }

    /// Strict descendant test.
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(node).any(|id| id == ancestor)
    }

    /// `node == ancestor` or a strict descendant of it.
    pub fn is_self_or_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        (node == ancestor && self.contains(node)) || self.is_descendant_of(node, ancestor)
    }

    /// Number of live ancestors.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }
}

/// Iterator over a parent chain.
pub struct Ancestors<'a, E> {
    arena: &'a NodeArena<E>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<E> Iterator for Ancestors<'_, E> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        let node = self.arena.get(current)?;
        self.remaining -= 1;
        self.next = node.parent;
        Some(current)
    }
}
