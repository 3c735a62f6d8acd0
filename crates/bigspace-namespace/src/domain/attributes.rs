//! Attribute identifiers, node classification and attribute values.
//!
//! The routing decision "is this a structural or a value attribute" is made
//! once, by [`AttributeId::route`], instead of being rediscovered by each
//! caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::node_id::NodeId;
use super::status::StatusCode;

/// Category a node identifier resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeCategory {
    /// The organizational root of all items.
    Folder,
    /// The single type all items are instances of.
    Type,
    /// A value-bearing leaf.
    Item,
    /// Not owned by this namespace.
    Unknown,
}

impl NodeCategory {
    /// Node class reported for this category, `None` for `Unknown`.
    pub fn node_class(&self) -> Option<NodeClass> {
        match self {
            NodeCategory::Folder => Some(NodeClass::Object),
            NodeCategory::Type => Some(NodeClass::VariableType),
            NodeCategory::Item => Some(NodeClass::Variable),
            NodeCategory::Unknown => None,
        }
    }
}

/// Node class as exposed through the `NodeClass` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    Object,
    Variable,
    VariableType,
}

/// Readable attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeId {
    NodeId,
    NodeClass,
    BrowseName,
    DisplayName,
    Description,
    WriteMask,
    EventNotifier,
    Value,
    DataType,
    ValueRank,
    ArrayDimensions,
    AccessLevel,
    UserAccessLevel,
    Historizing,
}

/// Where an attribute is answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeRoute {
    /// Identity and classification, answered by the resolver for any owned node.
    Structural,
    /// Value-bearing, answered from the item store; items only.
    Value,
}

impl AttributeId {
    pub const ALL: [AttributeId; 14] = [
        AttributeId::NodeId,
        AttributeId::NodeClass,
        AttributeId::BrowseName,
        AttributeId::DisplayName,
        AttributeId::Description,
        AttributeId::WriteMask,
        AttributeId::EventNotifier,
        AttributeId::Value,
        AttributeId::DataType,
        AttributeId::ValueRank,
        AttributeId::ArrayDimensions,
        AttributeId::AccessLevel,
        AttributeId::UserAccessLevel,
        AttributeId::Historizing,
    ];

    pub fn route(&self) -> AttributeRoute {
        match self {
            AttributeId::NodeId
            | AttributeId::NodeClass
            | AttributeId::BrowseName
            | AttributeId::DisplayName
            | AttributeId::Description
            | AttributeId::WriteMask
            | AttributeId::EventNotifier => AttributeRoute::Structural,
            AttributeId::Value
            | AttributeId::DataType
            | AttributeId::ValueRank
            | AttributeId::ArrayDimensions
            | AttributeId::AccessLevel
            | AttributeId::UserAccessLevel
            | AttributeId::Historizing => AttributeRoute::Value,
        }
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Access level bits.
pub mod access_level {
    pub const CURRENT_READ: u8 = 0x01;
    pub const CURRENT_WRITE: u8 = 0x02;
}

/// Value rank of a scalar variable.
pub const VALUE_RANK_SCALAR: i32 = -1;

/// Name qualified by a namespace index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    pub namespace_index: u16,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }
}

/// Human readable text with an optional locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalizedText {
    pub locale: Option<String>,
    pub text: String,
}

impl LocalizedText {
    /// Text without a locale.
    pub fn invariant(text: impl Into<String>) -> Self {
        Self {
            locale: None,
            text: text.into(),
        }
    }
}

/// Attribute payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Variant {
    Boolean(bool),
    Byte(u8),
    Int32(i32),
    UInt32(u32),
    Double(f64),
    NodeId(NodeId),
    NodeClass(NodeClass),
    QualifiedName(QualifiedName),
    LocalizedText(LocalizedText),
}

/// Result of a successful attribute read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataValue {
    pub value: Variant,
    pub status: StatusCode,
    /// Time the underlying value last changed; only set for `Value`.
    pub source_timestamp: Option<DateTime<Utc>>,
    /// Time the read was served.
    pub server_timestamp: DateTime<Utc>,
}

impl DataValue {
    /// A structural attribute value: always good, no source timestamp.
    pub fn structural(value: Variant, now: DateTime<Utc>) -> Self {
        Self {
            value,
            status: StatusCode::Good,
            source_timestamp: None,
            server_timestamp: now,
        }
    }
}
