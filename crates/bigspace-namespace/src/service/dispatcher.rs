//! Attribute Dispatcher
//!
//! The single funnel for external read and write traffic. Each request is
//! classified once, then routed by [`AttributeId::route`]:
//!
//! | Route | Answered by | Valid for |
//! |-------|-------------|-----------|
//! | Structural | resolver | Folder, Type, Item |
//! | Value | item store | Item only |
//!
//! Attributes that do not apply to the node's class yield `NotApplicable`
//! rather than failing the caller's whole batch.

use std::sync::Arc;
use tracing::{debug, trace};

use crate::domain::{
    access_level, well_known, AttributeId, AttributeRoute, DataValue, NodeCategory, NodeId,
    StatusCode, Variant, WritePolicy, VALUE_RANK_SCALAR,
};
use crate::error::NamespaceError;
use crate::metrics::MetricsRecorder;
use crate::ports::UpdateSink;
use crate::service::{ItemStore, NamespaceResolver};

pub struct AttributeDispatcher {
    resolver: Arc<NamespaceResolver>,
    store: Arc<ItemStore>,
    write_policy: WritePolicy,
    metrics: Arc<dyn MetricsRecorder>,
}

impl AttributeDispatcher {
    pub fn new(
        resolver: Arc<NamespaceResolver>,
        store: Arc<ItemStore>,
        write_policy: WritePolicy,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            resolver,
            store,
            write_policy,
            metrics,
        }
    }

    pub fn write_policy(&self) -> WritePolicy {
        self.write_policy
    }

    pub fn read_attribute(
        &self,
        node: &NodeId,
        attribute: AttributeId,
    ) -> Result<DataValue, NamespaceError> {
        let result = self.route(node, attribute);
        self.metrics.record_read(result.is_ok());
        if let Err(e) = &result {
            trace!(node = %node, attribute = %attribute, error = %e, "Attribute read rejected");
        }
        result
    }

    fn route(&self, node: &NodeId, attribute: AttributeId) -> Result<DataValue, NamespaceError> {
        let category = self.resolver.classify(node);
        if category == NodeCategory::Unknown {
            return Err(NamespaceError::NodeNotFound { node: node.clone() });
        }

        match attribute.route() {
            AttributeRoute::Structural => self.read_structural(node, category, attribute),
            AttributeRoute::Value => match self.resolver.item_name(node) {
                Some(name) if category == NodeCategory::Item => {
                    self.read_value(node, name, attribute)
                }
                _ => Err(not_applicable(node, attribute)),
            },
        }
    }

    fn read_structural(
        &self,
        node: &NodeId,
        category: NodeCategory,
        attribute: AttributeId,
    ) -> Result<DataValue, NamespaceError> {
        let value = match attribute {
            AttributeId::NodeId => Variant::NodeId(node.clone()),
            AttributeId::NodeClass => category
                .node_class()
                .map(Variant::NodeClass)
                .ok_or_else(|| not_applicable(node, attribute))?,
            AttributeId::BrowseName => self
                .resolver
                .browse_name(node)
                .map(Variant::QualifiedName)
                .ok_or_else(|| not_applicable(node, attribute))?,
            AttributeId::DisplayName => self
                .resolver
                .display_name(node)
                .map(Variant::LocalizedText)
                .ok_or_else(|| not_applicable(node, attribute))?,
            AttributeId::WriteMask => Variant::UInt32(0),
            AttributeId::EventNotifier if category == NodeCategory::Folder => Variant::Byte(0),
            _ => return Err(not_applicable(node, attribute)),
        };
        Ok(DataValue::structural(value, self.store.now()))
    }

    fn read_value(
        &self,
        node: &NodeId,
        name: &str,
        attribute: AttributeId,
    ) -> Result<DataValue, NamespaceError> {
        let now = self.store.now();
        let value = match attribute {
            AttributeId::Value => {
                let snap = self.store.read(name)?;
                return Ok(DataValue {
                    value: Variant::Double(snap.value),
                    status: snap.status,
                    source_timestamp: snap.timestamp,
                    server_timestamp: now,
                });
            }
            AttributeId::DataType => Variant::NodeId(well_known::DOUBLE),
            AttributeId::ValueRank => Variant::Int32(VALUE_RANK_SCALAR),
            AttributeId::AccessLevel | AttributeId::UserAccessLevel => {
                Variant::Byte(self.access_level())
            }
            AttributeId::Historizing => Variant::Boolean(false),
            _ => return Err(not_applicable(node, attribute)),
        };
        Ok(DataValue::structural(value, now))
    }

    fn access_level(&self) -> u8 {
        if self.write_policy.is_writable() {
            access_level::CURRENT_READ | access_level::CURRENT_WRITE
        } else {
            access_level::CURRENT_READ
        }
    }

    /// Write a value to an item.
    ///
    /// Under [`WritePolicy::ReadOnly`] every write is refused. Under
    /// [`WritePolicy::Delegate`] writes to items are applied through `sink`,
    /// so observers see them like any producer update.
    ///
    /// # Returns
    /// `Ok(changed)` when accepted.
    pub fn write_value(
        &self,
        node: &NodeId,
        value: f64,
        status: StatusCode,
        sink: &dyn UpdateSink,
    ) -> Result<bool, NamespaceError> {
        let category = self.resolver.classify(node);
        if category == NodeCategory::Unknown {
            return Err(NamespaceError::NodeNotFound { node: node.clone() });
        }

        let name = match (self.write_policy, self.resolver.item_name(node)) {
            (WritePolicy::Delegate, Some(name)) if category == NodeCategory::Item => name,
            (WritePolicy::Delegate, _) => {
                return Err(self.reject(node, "node has no value"));
            }
            (WritePolicy::ReadOnly, _) => {
                return Err(self.reject(node, "namespace is read-only"));
            }
        };

        let outcome = sink.apply_update(name, value, status)?;
        debug!(node = %node, value, changed = outcome.changed, "Value written");
        Ok(outcome.changed)
    }

    fn reject(&self, node: &NodeId, reason: &str) -> NamespaceError {
        self.metrics.record_write_rejected();
        NamespaceError::WriteRejected {
            node: node.clone(),
            reason: reason.to_string(),
        }
    }
}

fn not_applicable(node: &NodeId, attribute: AttributeId) -> NamespaceError {
    NamespaceError::NotApplicable {
        node: node.clone(),
        attribute,
    }
}
