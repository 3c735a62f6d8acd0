//! Inbound Ports (Driving Ports)
//!
//! The call boundaries external collaborators use: the transport/session
//! layer reads attributes and manages subscriptions, the producer applies
//! updates.

use std::sync::Arc;

use crate::domain::{
    AttributeId, DataValue, NodeCategory, NodeId, Reference, StatusCode, SubscriptionToken,
    UpdateOutcome,
};
use crate::error::NamespaceError;
use crate::ports::outbound::Observer;

/// One entry of a bulk read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    pub node: NodeId,
    pub attribute: AttributeId,
}

impl ReadRequest {
    pub fn new(node: NodeId, attribute: AttributeId) -> Self {
        Self { node, attribute }
    }
}

/// Read/browse/write surface of one namespace.
///
/// `classify` returning [`NodeCategory::Unknown`] means "not mine", which is
/// what lets a router try other namespaces.
pub trait NodeManager: Send + Sync {
    /// Namespace index this manager serves.
    fn namespace_index(&self) -> u16;

    fn classify(&self, node: &NodeId) -> NodeCategory;

    /// Read one attribute.
    ///
    /// # Errors
    /// - `NodeNotFound` if the node is not owned by this manager
    /// - `NotApplicable` if the attribute is not defined for the node's class
    fn read_attribute(
        &self,
        node: &NodeId,
        attribute: AttributeId,
    ) -> Result<DataValue, NamespaceError>;

    /// Read many attributes; one failing entry never aborts the rest.
    fn read_attributes(&self, requests: &[ReadRequest]) -> Vec<Result<DataValue, NamespaceError>> {
        requests
            .iter()
            .map(|r| self.read_attribute(&r.node, r.attribute))
            .collect()
    }

    /// Structural references of a node, empty for nodes this manager does not own.
    fn references(&self, node: &NodeId) -> Vec<Reference>;

    /// Write a value through the attribute path.
    ///
    /// # Returns
    /// - `Ok(changed)` when the write was accepted
    /// - `Err(WriteRejected)` when the write policy refuses it
    fn write_value(
        &self,
        node: &NodeId,
        value: f64,
        status: StatusCode,
    ) -> Result<bool, NamespaceError>;
}

/// Subscription management.
pub trait SubscriptionApi: Send + Sync {
    /// Register `observer` for changes of the item `node`.
    ///
    /// # Errors
    /// `NodeNotFound` if `node` is not an item.
    fn subscribe(
        &self,
        node: &NodeId,
        observer: Arc<dyn Observer>,
    ) -> Result<SubscriptionToken, NamespaceError>;

    /// Remove a subscription. Returns `false` if it was already gone.
    fn unsubscribe(&self, token: &SubscriptionToken) -> bool;
}

/// Producer boundary: `ApplyUpdate(itemName, value, status)`.
pub trait UpdateSink: Send + Sync {
    /// Apply a write and, on a real transition, fan it out.
    ///
    /// # Errors
    /// `ItemNotFound` if `item` is unknown.
    fn apply_update(
        &self,
        item: &str,
        value: f64,
        status: StatusCode,
    ) -> Result<UpdateOutcome, NamespaceError>;
}
