//! Service layer: the item store, the resolver answering structural
//! questions, attribute dispatch, observer fan-out and the facade tying
//! them together.

pub mod dispatcher;
pub mod item_store;
pub mod namespace;
pub mod registry;
pub mod resolver;

pub use dispatcher::AttributeDispatcher;
pub use item_store::ItemStore;
pub use namespace::Namespace;
pub use registry::SubscriptionRegistry;
pub use resolver::{NamespaceResolver, FOLDER_NAME, TYPE_NAME};
