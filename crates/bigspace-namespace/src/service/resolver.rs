//! Namespace Resolver
//!
//! Pure functions from a node id to its classification, names and
//! references. Nothing is cached: every answer is computed from the two
//! singleton ids and the item store's current membership.
//!
//! ```text
//!   ObjectsFolder ──Organizes──→ Folder ──HasTypeDefinition──→ FolderType
//!                                  │
//!                                  ├──HasComponent──→ DataItem_0000 ──HasTypeDefinition──→ Type
//!                                  ├──HasComponent──→ DataItem_0001 ──HasTypeDefinition──→ Type
//!                                  └── ...
//!
//!   BaseDataVariableType ──HasSubtype──→ Type
//! ```

use std::sync::Arc;

use crate::domain::{
    well_known, LocalizedText, NodeCategory, NodeId, QualifiedName, Reference, ReferenceKind,
};
use crate::service::ItemStore;

/// Label and identifier of the folder singleton.
pub const FOLDER_NAME: &str = "MyBigNodeManager";

/// Label and identifier of the type singleton.
pub const TYPE_NAME: &str = "DataItemType";

pub struct NamespaceResolver {
    namespace_index: u16,
    folder_id: NodeId,
    type_id: NodeId,
    store: Arc<ItemStore>,
}

impl NamespaceResolver {
    pub fn new(namespace_index: u16, store: Arc<ItemStore>) -> Self {
        Self {
            namespace_index,
            folder_id: NodeId::string(namespace_index, FOLDER_NAME),
            type_id: NodeId::string(namespace_index, TYPE_NAME),
            store,
        }
    }

    pub fn namespace_index(&self) -> u16 {
        self.namespace_index
    }

    pub fn folder_id(&self) -> &NodeId {
        &self.folder_id
    }

    pub fn type_id(&self) -> &NodeId {
        &self.type_id
    }

    /// Node id of the item called `name`.
    pub fn item_id(&self, name: &str) -> NodeId {
        NodeId::string(self.namespace_index, name)
    }

    pub fn classify(&self, node: &NodeId) -> NodeCategory {
        if node == &self.folder_id {
            return NodeCategory::Folder;
        }
        if node == &self.type_id {
            return NodeCategory::Type;
        }
        match self.item_name(node) {
            Some(_) => NodeCategory::Item,
            None => NodeCategory::Unknown,
        }
    }

    /// Item name behind `node`, if `node` is an item of this namespace.
    pub fn item_name<'a>(&self, node: &'a NodeId) -> Option<&'a str> {
        if node.namespace_index != self.namespace_index {
            return None;
        }
        node.as_str().filter(|name| self.store.contains(name))
    }

    fn label<'a>(&self, node: &'a NodeId) -> Option<&'a str> {
        match self.classify(node) {
            NodeCategory::Folder => Some(FOLDER_NAME),
            NodeCategory::Type => Some(TYPE_NAME),
            NodeCategory::Item => node.as_str(),
            NodeCategory::Unknown => None,
        }
    }

    pub fn browse_name(&self, node: &NodeId) -> Option<QualifiedName> {
        self.label(node)
            .map(|name| QualifiedName::new(self.namespace_index, name))
    }

    pub fn display_name(&self, node: &NodeId) -> Option<LocalizedText> {
        self.label(node).map(LocalizedText::invariant)
    }

    /// Type definition of a node: `FolderType` for the folder, the item type
    /// for items, nothing for the type itself or unknown nodes.
    pub fn type_definition(&self, node: &NodeId) -> Option<NodeId> {
        match self.classify(node) {
            NodeCategory::Folder => Some(well_known::FOLDER_TYPE),
            NodeCategory::Item => Some(self.type_id.clone()),
            NodeCategory::Type | NodeCategory::Unknown => None,
        }
    }

    /// Structural references of `node`. Empty for unknown nodes.
    pub fn references(&self, node: &NodeId) -> Vec<Reference> {
        match self.classify(node) {
            NodeCategory::Type => vec![Reference::new(
                well_known::BASE_DATA_VARIABLE_TYPE,
                self.type_id.clone(),
                ReferenceKind::HasSubtype,
            )],
            NodeCategory::Folder => self.folder_references(),
            NodeCategory::Item => vec![
                Reference::new(self.folder_id.clone(), node.clone(), ReferenceKind::HasComponent),
                Reference::new(node.clone(), self.type_id.clone(), ReferenceKind::HasTypeDefinition),
            ],
            NodeCategory::Unknown => Vec::new(),
        }
    }

    fn folder_references(&self) -> Vec<Reference> {
        let mut refs = Vec::with_capacity(self.store.len() + 2);
        refs.push(Reference::new(
            well_known::OBJECTS_FOLDER,
            self.folder_id.clone(),
            ReferenceKind::Organizes,
        ));
        refs.push(Reference::new(
            self.folder_id.clone(),
            well_known::FOLDER_TYPE,
            ReferenceKind::HasTypeDefinition,
        ));
        refs.extend(self.store.names().map(|name| {
            Reference::new(
                self.folder_id.clone(),
                self.item_id(name),
                ReferenceKind::HasComponent,
            )
        }));
        refs
    }
}
