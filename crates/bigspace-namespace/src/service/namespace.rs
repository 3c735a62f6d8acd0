//! Namespace facade
//!
//! Wires the item store, resolver, dispatcher and registry together and
//! implements the inbound ports on top of them.
//!
//! ```text
//! producer ──apply_update──→ ItemStore ──(changed, queued)──→ drain ──→ SubscriptionRegistry ──→ observers
//! transport ──read_attribute──→ AttributeDispatcher ──→ NamespaceResolver / ItemStore
//! ```

use std::sync::Arc;
use tracing::{info, trace};

use crate::domain::{
    AttributeId, DataValue, FanOutReport, NamespaceConfig, NodeCategory, NodeId, Reference,
    StatusCode, SubscriptionToken, UpdateOutcome,
};
use crate::error::NamespaceError;
use crate::metrics::{MetricsRecorder, NamespaceMetrics};
use crate::ports::{NodeManager, Observer, SubscriptionApi, SystemTimeSource, TimeSource, UpdateSink};
use crate::service::item_store::Enqueued;
use crate::service::{AttributeDispatcher, ItemStore, NamespaceResolver, SubscriptionRegistry};

pub struct Namespace {
    config: NamespaceConfig,
    store: Arc<ItemStore>,
    resolver: Arc<NamespaceResolver>,
    dispatcher: AttributeDispatcher,
    registry: SubscriptionRegistry,
    metrics: Arc<NamespaceMetrics>,
}

impl Namespace {
    /// Build a namespace stamped by the system clock.
    pub fn new(config: NamespaceConfig) -> Result<Self, NamespaceError> {
        Self::with_time_source(config, Arc::new(SystemTimeSource))
    }

    pub fn with_time_source(
        config: NamespaceConfig,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, NamespaceError> {
        config.validate()?;

        let metrics = Arc::new(NamespaceMetrics::new());
        let recorder: Arc<dyn MetricsRecorder> = metrics.clone();
        let store = Arc::new(ItemStore::with_time_source(&config, clock));
        let resolver = Arc::new(NamespaceResolver::new(
            config.namespace_index,
            Arc::clone(&store),
        ));
        let dispatcher = AttributeDispatcher::new(
            Arc::clone(&resolver),
            Arc::clone(&store),
            config.write_policy,
            Arc::clone(&recorder),
        );
        let registry = SubscriptionRegistry::new(Arc::clone(&store), recorder);

        info!(
            namespace = %config.namespace_uri,
            index = config.namespace_index,
            items = store.len(),
            write_policy = ?config.write_policy,
            "Namespace created"
        );

        Ok(Self {
            config,
            store,
            resolver,
            dispatcher,
            registry,
            metrics,
        })
    }

    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn resolver(&self) -> &NamespaceResolver {
        &self.resolver
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &NamespaceMetrics {
        &self.metrics
    }

    /// Node id of the folder singleton.
    pub fn folder_id(&self) -> &NodeId {
        self.resolver.folder_id()
    }

    /// Node id of the type singleton.
    pub fn type_id(&self) -> &NodeId {
        self.resolver.type_id()
    }

    /// Node id of the item called `name` (whether or not it exists).
    pub fn item_id(&self, name: &str) -> NodeId {
        self.resolver.item_id(name)
    }

    /// Subscribe by item name instead of node id.
    pub fn subscribe_item(
        &self,
        item: &str,
        observer: Arc<dyn Observer>,
    ) -> Result<SubscriptionToken, NamespaceError> {
        self.registry.subscribe(item, observer)
    }

    /// Deliver every queued transition of `item`, oldest first. No lock is
    /// held while observers run, so they may write to any item; those
    /// writes queue and are delivered by this loop or the item's own drainer.
    fn drain(&self, item: &str) -> Result<FanOutReport, NamespaceError> {
        let mut report = FanOutReport::default();
        while let Some(snapshot) = self.store.next_pending(item)? {
            let fan_out = self.registry.notify(item, &snapshot);
            report.delivered += fan_out.delivered;
            report.failed.extend(fan_out.failed);
        }
        Ok(report)
    }
}

impl NodeManager for Namespace {
    fn namespace_index(&self) -> u16 {
        self.config.namespace_index
    }

    fn classify(&self, node: &NodeId) -> NodeCategory {
        self.resolver.classify(node)
    }

    fn read_attribute(
        &self,
        node: &NodeId,
        attribute: AttributeId,
    ) -> Result<DataValue, NamespaceError> {
        self.dispatcher.read_attribute(node, attribute)
    }

    fn references(&self, node: &NodeId) -> Vec<Reference> {
        self.resolver.references(node)
    }

    fn write_value(
        &self,
        node: &NodeId,
        value: f64,
        status: StatusCode,
    ) -> Result<bool, NamespaceError> {
        self.dispatcher.write_value(node, value, status, self)
    }
}

impl SubscriptionApi for Namespace {
    fn subscribe(
        &self,
        node: &NodeId,
        observer: Arc<dyn Observer>,
    ) -> Result<SubscriptionToken, NamespaceError> {
        let name = self
            .resolver
            .item_name(node)
            .ok_or_else(|| NamespaceError::NodeNotFound { node: node.clone() })?;
        self.registry.subscribe(name, observer)
    }

    fn unsubscribe(&self, token: &SubscriptionToken) -> bool {
        self.registry.unsubscribe(token)
    }
}

impl UpdateSink for Namespace {
    fn apply_update(
        &self,
        item: &str,
        value: f64,
        status: StatusCode,
    ) -> Result<UpdateOutcome, NamespaceError> {
        let outcome = match self.store.update_and_enqueue(item, value, status)? {
            Enqueued::Coalesced => UpdateOutcome::unchanged(),
            // Delivered by whoever is draining; counted in that caller's report.
            Enqueued::Queued => UpdateOutcome::changed(FanOutReport::default()),
            Enqueued::Drain => UpdateOutcome::changed(self.drain(item)?),
        };
        self.metrics.record_update(outcome.changed);

        trace!(item, value, changed = outcome.changed, "Update applied");
        Ok(outcome)
    }
}
