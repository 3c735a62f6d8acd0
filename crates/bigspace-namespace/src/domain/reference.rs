//! Structural edges between nodes.
//!
//! References are synthesized on demand and never stored.

use serde::{Deserialize, Serialize};

use super::node_id::{well_known, NodeId};

/// Relation kind of a [`Reference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    Organizes,
    HasTypeDefinition,
    HasSubtype,
    HasComponent,
}

impl ReferenceKind {
    /// Standard node id of the reference type.
    pub fn type_id(&self) -> NodeId {
        match self {
            ReferenceKind::Organizes => well_known::ORGANIZES,
            ReferenceKind::HasTypeDefinition => well_known::HAS_TYPE_DEFINITION,
            ReferenceKind::HasSubtype => well_known::HAS_SUBTYPE,
            ReferenceKind::HasComponent => well_known::HAS_COMPONENT,
        }
    }
}

/// Directed, typed edge `source --kind--> target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub source: NodeId,
    pub target: NodeId,
    pub kind: ReferenceKind,
}

impl Reference {
    pub fn new(source: NodeId, target: NodeId, kind: ReferenceKind) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }

    /// Direction of this reference as seen from `viewpoint`.
    ///
    /// - `Some(false)` - `viewpoint` is the source (forward reference)
    /// - `Some(true)` - `viewpoint` is the target (inverse reference)
    /// - `None` - `viewpoint` is neither end
    pub fn is_inverse(&self, viewpoint: &NodeId) -> Option<bool> {
        if &self.source == viewpoint {
            Some(false)
        } else if &self.target == viewpoint {
            Some(true)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_inverse() {
        let folder = NodeId::string(2, "MyBigNodeManager");
        let item = NodeId::string(2, "DataItem_0000");
        let reference = Reference::new(folder.clone(), item.clone(), ReferenceKind::HasComponent);

        assert_eq!(reference.is_inverse(&folder), Some(false));
        assert_eq!(reference.is_inverse(&item), Some(true));
        assert_eq!(reference.is_inverse(&well_known::OBJECTS_FOLDER), None);
    }

    #[test]
    fn test_type_ids() {
        assert_eq!(ReferenceKind::HasComponent.type_id(), NodeId::numeric(0, 47));
        assert_eq!(ReferenceKind::Organizes.type_id(), NodeId::numeric(0, 35));
    }
}
