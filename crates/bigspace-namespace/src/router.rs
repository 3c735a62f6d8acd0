//! Multi-namespace router
//!
//! Holds several [`NodeManager`]s and forwards each request to the first one
//! that claims the node, i.e. does not classify it as
//! [`NodeCategory::Unknown`]. A node nobody claims is `NodeNotFound`.

use std::sync::Arc;
use tracing::debug;

use crate::domain::{AttributeId, DataValue, NodeCategory, NodeId, Reference, StatusCode};
use crate::error::NamespaceError;
use crate::ports::{NodeManager, ReadRequest};

#[derive(Default)]
pub struct NamespaceRouter {
    managers: Vec<Arc<dyn NodeManager>>,
}

impl NamespaceRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a manager. Managers are consulted in registration order.
    ///
    /// # Errors
    /// `InvalidConfig` if a manager for the same namespace index is already
    /// registered.
    pub fn register(&mut self, manager: Arc<dyn NodeManager>) -> Result<(), NamespaceError> {
        let index = manager.namespace_index();
        if self.managers.iter().any(|m| m.namespace_index() == index) {
            return Err(NamespaceError::InvalidConfig(format!(
                "namespace index {} already registered",
                index
            )));
        }
        debug!(namespace_index = index, "Registered node manager");
        self.managers.push(manager);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    /// Manager owning `node`, if any.
    pub fn owner(&self, node: &NodeId) -> Option<&Arc<dyn NodeManager>> {
        self.managers
            .iter()
            .find(|m| m.classify(node) != NodeCategory::Unknown)
    }

    fn owner_or_not_found(&self, node: &NodeId) -> Result<&Arc<dyn NodeManager>, NamespaceError> {
        self.owner(node)
            .ok_or_else(|| NamespaceError::NodeNotFound { node: node.clone() })
    }

    pub fn classify(&self, node: &NodeId) -> NodeCategory {
        self.owner(node)
            .map(|m| m.classify(node))
            .unwrap_or(NodeCategory::Unknown)
    }

    pub fn read_attribute(
        &self,
        node: &NodeId,
        attribute: AttributeId,
    ) -> Result<DataValue, NamespaceError> {
        self.owner_or_not_found(node)?
            .read_attribute(node, attribute)
    }

    /// Bulk read across namespaces; each entry is routed on its own.
    pub fn read_attributes(
        &self,
        requests: &[ReadRequest],
    ) -> Vec<Result<DataValue, NamespaceError>> {
        requests
            .iter()
            .map(|r| self.read_attribute(&r.node, r.attribute))
            .collect()
    }

    pub fn references(&self, node: &NodeId) -> Result<Vec<Reference>, NamespaceError> {
        Ok(self.owner_or_not_found(node)?.references(node))
    }

    pub fn write_value(
        &self,
        node: &NodeId,
        value: f64,
        status: StatusCode,
    ) -> Result<bool, NamespaceError> {
        self.owner_or_not_found(node)?
            .write_value(node, value, status)
    }
}
