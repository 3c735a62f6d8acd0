//! Node identifiers.
//!
//! A node is addressed by a namespace index plus an identifier. Nodes owned by
//! the virtual namespace carry string identifiers (the item name, or one of the
//! two singleton labels); standard nodes live in namespace 0 with numeric
//! identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace index reserved for the standard node set.
pub const STANDARD_NAMESPACE: u16 = 0;

/// Identifier part of a [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Identifier {
    Numeric(u32),
    String(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "i={}", n),
            Identifier::String(s) => write!(f, "s={}", s),
        }
    }
}

/// Opaque node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub namespace_index: u16,
    pub identifier: Identifier,
}

impl NodeId {
    /// Create a node id with a numeric identifier.
    pub const fn numeric(namespace_index: u16, value: u32) -> Self {
        Self {
            namespace_index,
            identifier: Identifier::Numeric(value),
        }
    }

    /// Create a node id with a string identifier.
    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: Identifier::String(value.into()),
        }
    }

    /// The string identifier, if this id has one.
    pub fn as_str(&self) -> Option<&str> {
        match &self.identifier {
            Identifier::String(s) => Some(s.as_str()),
            Identifier::Numeric(_) => None,
        }
    }

    /// Whether this id belongs to the standard namespace.
    pub fn is_standard(&self) -> bool {
        self.namespace_index == STANDARD_NAMESPACE
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns={};{}", self.namespace_index, self.identifier)
    }
}

/// Well-known standard node ids referenced by the virtual namespace.
pub mod well_known {
    use super::{NodeId, STANDARD_NAMESPACE};

    pub const DOUBLE: NodeId = NodeId::numeric(STANDARD_NAMESPACE, 11);
    pub const ORGANIZES: NodeId = NodeId::numeric(STANDARD_NAMESPACE, 35);
    pub const HAS_TYPE_DEFINITION: NodeId = NodeId::numeric(STANDARD_NAMESPACE, 40);
    pub const HAS_SUBTYPE: NodeId = NodeId::numeric(STANDARD_NAMESPACE, 45);
    pub const HAS_COMPONENT: NodeId = NodeId::numeric(STANDARD_NAMESPACE, 47);
    pub const FOLDER_TYPE: NodeId = NodeId::numeric(STANDARD_NAMESPACE, 61);
    pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId::numeric(STANDARD_NAMESPACE, 63);
    pub const OBJECTS_FOLDER: NodeId = NodeId::numeric(STANDARD_NAMESPACE, 85);
}
