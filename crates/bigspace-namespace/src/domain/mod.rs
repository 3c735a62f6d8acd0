//! Domain Layer - Pure types, no I/O
//!
//! - Node identifiers and the well-known standard ids
//! - Item record with the change-coalescing rule
//! - Synthesized references
//! - Subscription tokens and fan-out reports
//! - Attribute ids, routing and values
//! - Configuration

pub mod attributes;
pub mod config;
pub mod item;
pub mod node_id;
pub mod reference;
pub mod status;
pub mod subscription;

pub use attributes::{
    access_level, AttributeId, AttributeRoute, DataValue, LocalizedText, NodeCategory, NodeClass,
    QualifiedName, Variant, VALUE_RANK_SCALAR,
};
pub use config::{NamespaceConfig, NamespaceConfigBuilder, WritePolicy, MAX_ITEMS};
pub use item::{ItemRecord, ItemSnapshot};
pub use node_id::{well_known, Identifier, NodeId, STANDARD_NAMESPACE};
pub use reference::{Reference, ReferenceKind};
pub use status::StatusCode;
pub use subscription::{FanOutReport, SubscriptionToken, UpdateOutcome};
