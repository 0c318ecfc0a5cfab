//! Engine output protocol: lifecycle events and command effects.
//!
//! [`NavEvent`]s are queued and drained by external consumers (overlay,
//! peripheral bridge). [`Effects`] are returned directly from
//! [`Engine::execute`](crate::Engine::execute).

use crate::node::{NodeId, RootId};
use bitflags::bitflags;

/// Whether a root was added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootChange {
    Registered,
    Retired,
}

/// Lifecycle notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    /// A node started being tracked.
    NodeAdded(NodeId),

    /// A node was pruned. The id is already stale when this is drained.
    NodeRemoved(NodeId),

    /// A modal group became open.
    ModalGroupOpened(NodeId),

    /// A modal group closed or disappeared while open.
    ModalGroupClosed(NodeId),

    /// Focus moved.
    FocusChanged {
        old: Option<NodeId>,
        new: Option<NodeId>,
    },

    /// A root was registered or retired.
    RootChanged { root: RootId, change: RootChange },
}

bitflags! {
    /// Set of effects produced by one command.
    ///
    /// Effects are additive. The caller checks which are set and reacts,
    /// e.g. redrawing the focus overlay on `FOCUS_CHANGED`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Effects: u16 {
        /// No effects.
        const NONE = 0;

        /// Focus moved to another node.
        const FOCUS_CHANGED = 1 << 0;

        /// A context was pushed on the stack.
        const SCOPE_PUSHED = 1 << 1;

        /// A context was popped from the stack.
        const SCOPE_POPPED = 1 << 2;

        /// The adapter invoked an element.
        const ACTIVATED = 1 << 3;

        /// An interactive control's value was stepped.
        const VALUE_CHANGED = 1 << 4;

        /// An interactive control's value was restored.
        const VALUE_REVERTED = 1 << 5;

        /// A root sync was scheduled.
        const SYNC_REQUESTED = 1 << 6;

        /// A shortcut is waiting for confirmation.
        const CONFIRMATION_REQUIRED = 1 << 7;
    }
}

impl Default for Effects {
    fn default() -> Self {
        Effects::NONE
    }
}

impl Effects {
    /// Check if the context stack changed.
    pub fn scope_changed(&self) -> bool {
        self.intersects(Effects::SCOPE_PUSHED | Effects::SCOPE_POPPED)
    }

    /// Check if a control value changed either way.
    pub fn value_touched(&self) -> bool {
        self.intersects(Effects::VALUE_CHANGED | Effects::VALUE_REVERTED)
    }
}
