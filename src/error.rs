//! Error and fault types.
//!
//! Faults are recoverable: they explain why an operation did nothing, and
//! the engine keeps running after every one of them.

use crate::node::NodeId;
use std::path::PathBuf;
use thiserror::Error;

/// Error reported by a toolkit adapter for a single element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// The element was destroyed or detached.
    #[error("element is no longer alive")]
    ElementGone,

    /// The toolkit failed while reading or acting on the element.
    #[error("toolkit error: {0}")]
    Toolkit(String),

    /// The adapter does not implement this operation.
    #[error("operation not supported by adapter: {0}")]
    Unsupported(&'static str),
}

/// Navigation fault - a recoverable failure of one engine operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Fault {
    /// Context stack at maximum depth.
    #[error("context stack overflow: max depth {max} reached")]
    StackOverflow { max: usize },

    /// A scope was opened outside the active scope.
    #[error("node {node} is outside the active scope {scope}")]
    NotInScope { node: NodeId, scope: NodeId },

    /// Interaction-mode exit without an active interactive control.
    #[error("no interactive control is active")]
    NotInInteractionMode,

    /// Referenced node is stale or never existed.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// The adapter rejected the operation.
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

impl Fault {
    /// Host tree misbehaved in a way the stack repaired on its own.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Fault::NotInScope { .. } | Fault::StackOverflow { .. })
    }

    /// Retrying after the next sync may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Fault::NodeNotFound(_)
                | Fault::NotInInteractionMode
                | Fault::Adapter(AdapterError::ElementGone)
        )
    }
}

/// Engine configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config text was not valid YAML for `EngineConfig`.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value was out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_classification() {
        let node = NodeId::new(1, 0);
        let scope = NodeId::new(2, 0);
        assert!(Fault::NotInScope { node, scope }.is_protocol_violation());
        assert!(!Fault::NodeNotFound(node).is_protocol_violation());
        assert!(Fault::NodeNotFound(node).is_recoverable());
        assert!(Fault::Adapter(AdapterError::ElementGone).is_recoverable());
        assert!(!Fault::Adapter(AdapterError::Unsupported("close")).is_recoverable());
    }

    #[test]
    fn fault_display() {
        let fault = Fault::StackOverflow { max: 32 };
        assert!(fault.to_string().contains("32"));

        let fault: Fault = AdapterError::Toolkit("boom".into()).into();
        assert!(fault.to_string().contains("boom"));
    }
}
