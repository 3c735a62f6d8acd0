//! # BigSpace Namespace
//!
//! A virtualized node namespace with per-item change notification fan-out.
//! Thousands of addressable items are exposed without allocating a node
//! object per item: every structural attribute and reference is computed on
//! read from a compact item store and two singleton ids.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure types, no I/O
//!   - `NodeId`, `NodeCategory`, `AttributeId`, `DataValue`
//!   - `ItemRecord`: value/status/timestamp with the coalescing rule
//!   - `NamespaceConfig` / `NamespaceConfigBuilder`
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `NodeManager`, `SubscriptionApi`: Driving ports for the transport layer
//!   - `UpdateSink`: Driving port for producers
//!   - `Observer`, `TimeSource`, `SignalSource`: Driven ports
//!
//! - **Service Layer** (`service/`):
//!   - `ItemStore`: the only place item state is mutated
//!   - `NamespaceResolver`: classification, names, references
//!   - `AttributeDispatcher`: routes reads and writes
//!   - `SubscriptionRegistry`: per-item observer sets and fan-out
//!   - `Namespace`: facade implementing the driving ports
//!
//! - **Driver Layer** (`driver/`): the periodic `TickDriver`
//!
//! - `NamespaceRouter` (`router.rs`): fronts several namespaces
//!
//! ## Data flow
//!
//! ```text
//! TickDriver ──apply_update──→ ItemStore ──(changed)──→ SubscriptionRegistry ──→ Observer
//! read_attribute ──→ AttributeDispatcher ──→ NamespaceResolver / ItemStore
//! ```
//!
//! ## Guarantees
//!
//! - A write that repeats the current value and status is coalesced: no new
//!   timestamp, no notification.
//! - Notifications for one item reach its observers in write order.
//! - A failing or panicking observer never stops delivery to the others.
//! - `references(folder)` has exactly `items + 2` entries.
//!
//! ## Usage Example
//!
//! ```
//! use std::sync::Arc;
//! use bigspace_namespace::{
//!     Namespace, NamespaceConfigBuilder, NodeManager, StatusCode, SubscriptionApi, UpdateSink,
//!     AttributeId, ItemSnapshot, ObserverError,
//! };
//!
//! let config = NamespaceConfigBuilder::new().item_count(10).build()?;
//! let ns = Namespace::new(config)?;
//!
//! let node = ns.item_id("DataItem_0003");
//! ns.subscribe(
//!     &node,
//!     Arc::new(|item: &str, snap: &ItemSnapshot| -> Result<(), ObserverError> {
//!         println!("{item} = {}", snap.value);
//!         Ok(())
//!     }),
//! )?;
//!
//! let outcome = ns.apply_update("DataItem_0003", 42.0, StatusCode::Good)?;
//! assert!(outcome.changed);
//!
//! let value = ns.read_attribute(&node, AttributeId::Value)?;
//! assert_eq!(value.status, StatusCode::Good);
//! # Ok::<(), bigspace_namespace::NamespaceError>(())
//! ```

pub mod domain;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod router;
pub mod service;

// Re-exports for convenience
pub use domain::{
    AttributeId, DataValue, FanOutReport, ItemSnapshot, NamespaceConfig, NamespaceConfigBuilder,
    NodeCategory, NodeClass, NodeId, Reference, ReferenceKind, StatusCode, SubscriptionToken,
    UpdateOutcome, Variant, WritePolicy,
};
pub use driver::{SimulationConfig, Sinusoid, TickDriver, TickReport};
pub use error::{NamespaceError, ObserverError};
pub use metrics::{MetricsRecorder, MetricsSnapshot, NamespaceMetrics, NoOpMetrics};
pub use ports::{
    NodeManager, Observer, ReadRequest, SignalSource, SubscriptionApi, TimeSource, UpdateSink,
};
pub use router::NamespaceRouter;
pub use service::{Namespace, FOLDER_NAME, TYPE_NAME};
