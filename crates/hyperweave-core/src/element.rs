//! Element types: identity plus a mutable display name

use crate::edge::HyperEdge;
use crate::identity::{ElementKey, Guid, IdentityRecord, Suid};
use crate::vertex::Vertex;
use serde::{Deserialize, Serialize};

/// Structural kind of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Vertex,
    Edge,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Edge => write!(f, "edge"),
        }
    }
}

/// Kind-specific state of an element
#[derive(Debug, Clone)]
pub enum ElementBody {
    Vertex(Vertex),
    Edge(HyperEdge),
}

/// An element of the hypergraph (a vertex or a hyperedge)
#[derive(Debug, Clone)]
pub struct Element {
    identity: IdentityRecord,

    /// Display name, independent of the label
    name: String,

    body: ElementBody,
}

impl Element {
    pub(crate) fn new(identity: IdentityRecord, name: String, body: ElementBody) -> Self {
        Self {
            identity,
            name,
            body,
        }
    }

    pub fn identity(&self) -> &IdentityRecord {
        &self.identity
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn guid(&self) -> &Guid {
        self.identity.guid()
    }

    pub fn suid(&self) -> &Suid {
        self.identity.suid()
    }

    pub fn label(&self) -> &str {
        self.identity.label()
    }

    pub fn timestamp(&self) -> i64 {
        self.identity.timestamp()
    }

    pub fn serial(&self) -> u64 {
        self.identity.serial()
    }

    pub fn parent(&self) -> Option<ElementKey> {
        self.identity.parent()
    }

    pub fn kind(&self) -> ElementKind {
        match self.body {
            ElementBody::Vertex(_) => ElementKind::Vertex,
            ElementBody::Edge(_) => ElementKind::Edge,
        }
    }

    pub fn is_vertex(&self) -> bool {
        matches!(self.body, ElementBody::Vertex(_))
    }

    pub fn is_edge(&self) -> bool {
        matches!(self.body, ElementBody::Edge(_))
    }

    pub fn as_vertex(&self) -> Option<&Vertex> {
        match &self.body {
            ElementBody::Vertex(v) => Some(v),
            ElementBody::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&HyperEdge> {
        match &self.body {
            ElementBody::Edge(e) => Some(e),
            ElementBody::Vertex(_) => None,
        }
    }

    pub(crate) fn as_vertex_mut(&mut self) -> Option<&mut Vertex> {
        match &mut self.body {
            ElementBody::Vertex(v) => Some(v),
            ElementBody::Edge(_) => None,
        }
    }

    pub(crate) fn as_edge_mut(&mut self) -> Option<&mut HyperEdge> {
        match &mut self.body {
            ElementBody::Edge(e) => Some(e),
            ElementBody::Vertex(_) => None,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ElementKey>) {
        self.identity.set_parent(parent);
    }
}

/// Data for creating a new element. All six fields are mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewElement {
    pub name: String,
    pub timestamp: i64,
    pub serial: u64,
    pub guid: Guid,
    pub suid: Suid,
    pub label: String,
}

impl NewElement {
    pub fn new(
        name: impl Into<String>,
        timestamp: i64,
        serial: u64,
        guid: Guid,
        suid: Suid,
        label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            timestamp,
            serial,
            guid,
            suid,
            label: label.into(),
        }
    }

    pub(crate) fn into_parts(self, parent: Option<ElementKey>) -> (IdentityRecord, String) {
        let identity = IdentityRecord::new(
            self.timestamp,
            self.serial,
            self.guid,
            self.suid,
            self.label,
            parent,
        );
        (identity, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str) -> NewElement {
        let guid = Guid::from_bytes(name.as_bytes().to_vec());
        NewElement::new(name, 10, 1, guid.clone(), guid, "L")
    }

    #[test]
    fn test_element_creation() {
        let (identity, name) = spec("alpha").into_parts(None);
        let element = Element::new(identity, name, ElementBody::Vertex(Vertex::default()));

        assert_eq!(element.name(), "alpha");
        assert_eq!(element.label(), "L");
        assert_eq!(element.kind(), ElementKind::Vertex);
        assert!(element.as_edge().is_none());
        assert!(element.parent().is_none());
    }

    #[test]
    fn test_rename_keeps_label() {
        let (identity, name) = spec("beta").into_parts(Some(ElementKey(0)));
        let mut element = Element::new(identity, name, ElementBody::Edge(HyperEdge::default()));

        element.set_name("gamma".to_string());
        assert_eq!(element.name(), "gamma");
        assert_eq!(element.label(), "L");
        assert_eq!(element.parent(), Some(ElementKey(0)));
        assert!(element.is_edge());
    }
}
