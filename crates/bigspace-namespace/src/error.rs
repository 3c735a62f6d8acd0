//! Error types for the namespace engine

use thiserror::Error;

use crate::domain::{AttributeId, NodeId};

/// Errors returned by the namespace components
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NamespaceError {
    #[error("Item not found: {name}")]
    ItemNotFound { name: String },

    #[error("Node not found: {node}")]
    NodeNotFound { node: NodeId },

    #[error("Attribute {attribute} not applicable to node {node}")]
    NotApplicable { node: NodeId, attribute: AttributeId },

    #[error("Write rejected for node {node}: {reason}")]
    WriteRejected { node: NodeId, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failure reported by a single observer during fan-out
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ObserverError {
    #[error("Observer failed: {0}")]
    Failed(String),

    #[error("Observer panicked: {0}")]
    Panicked(String),
}

impl ObserverError {
    pub fn failed(message: impl Into<String>) -> Self {
        ObserverError::Failed(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = NamespaceError::NotApplicable {
            node: NodeId::string(2, "MyBigNodeManager"),
            attribute: AttributeId::Value,
        };
        assert_eq!(
            err.to_string(),
            "Attribute Value not applicable to node ns=2;s=MyBigNodeManager"
        );
    }
}
