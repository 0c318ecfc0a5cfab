//! Modal context stack.
//!
//! The bottom of the stack is the implicit root context. Modal groups push a
//! scope when they open and pop it when they close; an interactive control
//! pushes a scope while its value is being adjusted. Scopes are strictly
//! nested: every pushed scope lies inside the one below it.

use crate::adapter::ControlValue;
use crate::error::Fault;
use crate::node::{NodeArena, NodeId};
use tracing::{debug, warn};

/// Maximum number of pushed contexts.
pub const MAX_CONTEXT_DEPTH: usize = 32;

/// What pushed a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Root,
    Modal,
    InteractiveControl,
}

/// One entry of the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalContext {
    /// Scope node. `None` only for the root context.
    pub scope: Option<NodeId>,
    pub focused: Option<NodeId>,
    pub kind: ContextKind,
    /// Value captured on entering interaction mode, for revert.
    pub original_value: Option<ControlValue>,
}

impl ModalContext {
    fn root() -> Self {
        Self {
            scope: None,
            focused: None,
            kind: ContextKind::Root,
            original_value: None,
        }
    }
}

/// Result of a modal close notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The scope was on top and was popped.
    Popped,
    /// The scope was below the top and was removed in place.
    RemovedOutOfOrder { depth: usize },
    /// No context had this scope.
    NotFound,
}

/// Stack of modal and interaction contexts.
#[derive(Debug, Clone)]
pub struct ModalContextStack {
    base: ModalContext,
    frames: Vec<ModalContext>,
    max_depth: usize,
}

impl Default for ModalContextStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalContextStack {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_CONTEXT_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            base: ModalContext::root(),
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Topmost context; the root context when nothing is pushed.
    pub fn top(&self) -> &ModalContext {
        self.frames.last().unwrap_or(&self.base)
    }

    fn top_mut(&mut self) -> &mut ModalContext {
        self.frames.last_mut().unwrap_or(&mut self.base)
    }

    /// Number of pushed contexts (the root context is not counted).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Contexts from bottom to top, root context first.
    pub fn iter(&self) -> impl Iterator<Item = &ModalContext> {
        std::iter::once(&self.base).chain(self.frames.iter())
    }

    /// Scope nodes from bottom to top.
    pub fn breadcrumbs(&self) -> Vec<NodeId> {
        self.frames.iter().filter_map(|frame| frame.scope).collect()
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.top().focused
    }

    pub fn set_focused(&mut self, node: Option<NodeId>) {
        self.top_mut().focused = node;
    }

    /// Scope of the top context, `None` at the root.
    pub fn active_scope(&self) -> Option<NodeId> {
        self.top().scope
    }

    pub fn in_interaction_mode(&self) -> bool {
        self.top().kind == ContextKind::InteractiveControl
    }

    /// Control being adjusted, if any.
    pub fn interaction_control(&self) -> Option<NodeId> {
        if self.in_interaction_mode() {
            self.top().scope
        } else {
            None
        }
    }

    /// True when `node` is reachable from the top context.
    pub fn is_in_active_scope<E>(&self, node: NodeId, arena: &NodeArena<E>) -> bool {
        match self.active_scope() {
            None => arena.contains(node),
            Some(scope) => arena.is_self_or_descendant(node, scope),
        }
    }

    /// Push a modal scope.
    ///
    /// Returns the previous focus when it had to be dropped because it lies
    /// outside the new scope. Opening a scope that is already on the stack
    /// does nothing.
    pub fn on_modal_opened<E>(
        &mut self,
        node: NodeId,
        arena: &NodeArena<E>,
    ) -> Result<Option<NodeId>, Fault> {
        if self.frames.iter().any(|frame| frame.scope == Some(node)) {
            debug!(%node, "modal already on the stack");
            return Ok(None);
        }
        if !arena.contains(node) {
            return Err(Fault::NodeNotFound(node));
        }
        if let Some(scope) = self.active_scope() {
            if !arena.is_descendant_of(node, scope) {
                return Err(Fault::NotInScope { node, scope });
            }
        }
        if self.frames.len() >= self.max_depth {
            return Err(Fault::StackOverflow {
                max: self.max_depth,
            });
        }

        let previous = self.focused();
        let kept = previous.filter(|focus| arena.is_descendant_of(*focus, node));
        self.frames.push(ModalContext {
            scope: Some(node),
            focused: kept,
            kind: ContextKind::Modal,
            original_value: None,
        });
        debug!(%node, depth = self.frames.len(), "modal scope pushed");
        Ok(previous.filter(|_| kept.is_none()))
    }

    /// Pop or remove the context scoped to `node`.
    pub fn on_modal_closed(&mut self, node: NodeId) -> CloseOutcome {
        match self.frames.iter().rposition(|frame| frame.scope == Some(node)) {
            None => CloseOutcome::NotFound,
            Some(index) if index + 1 == self.frames.len() => {
                self.frames.pop();
                debug!(%node, depth = self.frames.len(), "modal scope popped");
                CloseOutcome::Popped
            }
            Some(index) => {
                self.frames.remove(index);
                warn!(
                    %node,
                    depth = index + 1,
                    top = self.frames.len(),
                    "modal closed below the top of the stack; removed in place"
                );
                CloseOutcome::RemovedOutOfOrder { depth: index + 1 }
            }
        }
    }

    /// Push an interaction context for `control`.
    ///
    /// Returns false when the control is already active.
    pub fn enter_interaction_mode<E>(
        &mut self,
        control: NodeId,
        original: ControlValue,
        arena: &NodeArena<E>,
    ) -> Result<bool, Fault> {
        if self.interaction_control() == Some(control) {
            return Ok(false);
        }
        if !arena.contains(control) {
            return Err(Fault::NodeNotFound(control));
        }
        if let Some(scope) = self.active_scope() {
            if !arena.is_self_or_descendant(control, scope) {
                return Err(Fault::NotInScope {
                    node: control,
                    scope,
                });
            }
        }
        if self.frames.len() >= self.max_depth {
            return Err(Fault::StackOverflow {
                max: self.max_depth,
            });
        }
        self.frames.push(ModalContext {
            scope: Some(control),
            focused: Some(control),
            kind: ContextKind::InteractiveControl,
            original_value: Some(original),
        });
        debug!(%control, "interaction mode entered");
        Ok(true)
    }

    /// Pop the interaction context, returning it with its captured value.
    pub fn exit_interaction_mode(&mut self) -> Result<ModalContext, Fault> {
        if !self.in_interaction_mode() {
            return Err(Fault::NotInInteractionMode);
        }
        self.frames.pop().ok_or(Fault::NotInInteractionMode)
    }

    /// Drop every reference to a removed node. Returns the number of
    /// contexts removed.
    pub fn forget(&mut self, node: NodeId) -> usize {
        let before = self.frames.len();
        self.frames.retain(|frame| frame.scope != Some(node));
        for context in std::iter::once(&mut self.base).chain(self.frames.iter_mut()) {
            if context.focused == Some(node) {
                context.focused = None;
            }
        }
        let removed = before - self.frames.len();
        if removed > 0 {
            warn!(%node, removed, "context scope disappeared without a close");
        }
        removed
    }

    /// Return to the root context.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
