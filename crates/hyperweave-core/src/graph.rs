//! Hypergraph arena: element lifecycle, composition and association

use crate::config::HypergraphConfig;
use crate::edge::HyperEdge;
use crate::element::{Element, ElementBody, NewElement};
use crate::error::{Error, Result};
use crate::identity::{DigestProvider, ElementKey, Guid, IdentityProvider, IdentityRecord};
use crate::relation::{Direction, LabelNaming, Relation, RelationNaming, RelationValue};
use crate::traversal::{Ancestors, Subelements};
use crate::vertex::Vertex;
use chrono::Utc;
use std::collections::HashMap;
use ulid::Ulid;

/// Container of uniquely identified elements.
///
/// Elements live in an append-only arena addressed by [`ElementKey`]. A
/// vertex owns its children through keys and every element points back at
/// its parent through a key; hyperedges reference the elements they associate
/// through keys as well, so neither structure holds live references.
///
/// Mutation takes `&mut self` and traversals borrow `&self`, so the structure
/// cannot change under an open traversal. Callers sharing a graph across
/// threads wrap it in a lock.
pub struct Hypergraph {
    elements: Vec<Element>,
    by_guid: HashMap<Guid, ElementKey>,
    config: HypergraphConfig,
    identity: Box<dyn IdentityProvider>,
    naming: Box<dyn RelationNaming>,
}

impl std::fmt::Debug for Hypergraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hypergraph")
            .field("elements", &self.elements.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Hypergraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Hypergraph {
    pub fn new() -> Self {
        Self::with_config(HypergraphConfig::default())
    }

    pub fn with_config(config: HypergraphConfig) -> Self {
        Self {
            elements: Vec::new(),
            by_guid: HashMap::new(),
            identity: Box::new(DigestProvider::new(config.digest)),
            naming: Box::new(LabelNaming),
            config,
        }
    }

    /// Replace the identity provider used for relation and minted GUIDs
    pub fn with_identity_provider(mut self, provider: impl IdentityProvider + 'static) -> Self {
        self.identity = Box::new(provider);
        self
    }

    /// Replace the policy deriving relation labels
    pub fn with_relation_naming(mut self, naming: impl RelationNaming + 'static) -> Self {
        self.naming = Box::new(naming);
        self
    }

    pub fn config(&self) -> &HypergraphConfig {
        &self.config
    }

    pub fn identity_provider(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Element lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Construction data with the current time, the next arena serial and a
    /// fresh GUID; the SUID equals the GUID.
    pub fn mint(&self, name: impl Into<String>, label: impl Into<String>) -> NewElement {
        let label = label.into();
        let guid = self.identity.derive(&format!("{}:{}", Ulid::new(), label));
        NewElement::new(
            name,
            Utc::now().timestamp_micros(),
            self.elements.len() as u64,
            guid.clone(),
            guid,
            label,
        )
    }

    /// Create a vertex, registering it as a child of `parent` if given
    pub fn create_vertex(&mut self, spec: NewElement, parent: Option<ElementKey>) -> Result<ElementKey> {
        self.create(spec, parent, ElementBody::Vertex(Vertex::new()))
    }

    /// Create a hyperedge, registering it as a child of `parent` if given
    pub fn create_edge(&mut self, spec: NewElement, parent: Option<ElementKey>) -> Result<ElementKey> {
        self.create(spec, parent, ElementBody::Edge(HyperEdge::new()))
    }

    fn create(
        &mut self,
        spec: NewElement,
        parent: Option<ElementKey>,
        body: ElementBody,
    ) -> Result<ElementKey> {
        if let Some(parent) = parent {
            self.container(parent)?;
        }
        if self.config.unique_guids && self.by_guid.contains_key(&spec.guid) {
            return Err(Error::DuplicateGuid(spec.guid.to_string()));
        }

        let key = ElementKey(self.elements.len());
        let (identity, name) = spec.into_parts(parent);
        let element = Element::new(identity, name, body);
        tracing::debug!(
            "Creating {} {} name={} label={}",
            element.kind(),
            key,
            element.name(),
            element.label()
        );
        self.by_guid.entry(element.guid().clone()).or_insert(key);
        self.elements.push(element);

        if let Some(parent) = parent {
            self.add_element(parent, key)?;
        }
        Ok(key)
    }

    pub fn get(&self, key: ElementKey) -> Option<&Element> {
        self.elements.get(key.0)
    }

    /// Like [`Self::get`], failing with `InvalidElement` for unknown keys
    pub fn element(&self, key: ElementKey) -> Result<&Element> {
        self.get(key)
            .ok_or_else(|| Error::InvalidElement(format!("unknown element {}", key)))
    }

    pub fn lookup_guid(&self, guid: &Guid) -> Option<ElementKey> {
        self.by_guid.get(guid).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementKey, &Element)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementKey(i), e))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Change an element's display name and refresh its parent's name index
    pub fn rename(&mut self, key: ElementKey, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        let element = self.element_mut(key)?;
        let old = element.name().to_string();
        let parent = element.parent();
        element.set_name(name.clone());

        if let Some(parent) = parent {
            if let Some(vertex) = self.elements.get_mut(parent.0).and_then(Element::as_vertex_mut) {
                if vertex.contains_key(key) {
                    vertex.rename_child(&old, &name, key);
                }
            }
        }
        tracing::debug!("Renamed {} from {} to {}", key, old, name);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Composition
    // ─────────────────────────────────────────────────────────────────────────

    pub fn vertex(&self, key: ElementKey) -> Result<&Vertex> {
        self.element(key)?
            .as_vertex()
            .ok_or_else(|| Error::InvalidElement(format!("{} is not a vertex", key)))
    }

    /// Add `child` to `parent`, re-parenting it if needed.
    ///
    /// A previous parent keeps its (now stale) entry for the child; cleaning
    /// it up is left to the caller.
    pub fn add_element(&mut self, parent: ElementKey, child: ElementKey) -> Result<()> {
        self.container(parent)?;
        let element = self.element(child)?;
        if parent == child {
            return Err(Error::SelfParenting(format!("{} ({})", element.name(), child)));
        }
        let guid = element.guid().clone();
        let name = element.name().to_string();
        let previous = element.parent();

        self.container_mut(parent)?.insert_child(guid, &name, child);

        if previous != Some(parent) {
            if let Some(previous) = previous {
                tracing::debug!("Re-parenting {} from {} to {}", child, previous, parent);
            }
            self.element_mut(child)?.set_parent(Some(parent));
        }
        tracing::trace!("Added {} ({}) to {}", child, name, parent);
        Ok(())
    }

    /// Add several children in order, stopping at the first failure
    pub fn extend_elements(
        &mut self,
        parent: ElementKey,
        children: impl IntoIterator<Item = ElementKey>,
    ) -> Result<()> {
        for child in children {
            self.add_element(parent, child)?;
        }
        Ok(())
    }

    /// Update several children in order, stopping at the first failure
    pub fn update_elements(
        &mut self,
        parent: ElementKey,
        children: impl IntoIterator<Item = ElementKey>,
    ) -> Result<()> {
        for child in children {
            self.update_element(parent, child)?;
        }
        Ok(())
    }

    /// Remove `child` from `parent`, clearing its parent link if it pointed here.
    ///
    /// An absent child is `ChildNotFound`, or a no-op when the graph is
    /// configured without strict removal.
    pub fn remove_element(&mut self, parent: ElementKey, child: ElementKey) -> Result<()> {
        self.container(parent)?;
        let element = self.element(child)?;
        let guid = element.guid().clone();
        let child_parent = element.parent();

        if self.container_mut(parent)?.remove_child(&guid).is_none() {
            if self.config.strict_removal {
                return Err(Error::ChildNotFound {
                    parent: parent.to_string(),
                    child: child.to_string(),
                });
            }
            tracing::debug!("Ignoring removal of {} absent from {}", child, parent);
            return Ok(());
        }

        if child_parent == Some(parent) {
            self.element_mut(child)?.set_parent(None);
        }
        tracing::trace!("Removed {} from {}", child, parent);
        Ok(())
    }

    /// Add `child`, or replace the existing child carrying the same name.
    ///
    /// On replacement the previous child leaves the children map and the
    /// replacement is indexed under both its name and its GUID.
    pub fn update_element(&mut self, parent: ElementKey, child: ElementKey) -> Result<()> {
        let existing = self.container(parent)?;
        let element = self.element(child)?;
        if parent == child {
            return Err(Error::SelfParenting(format!("{} ({})", element.name(), child)));
        }
        let name = element.name().to_string();
        let guid = element.guid().clone();

        let Some(old) = existing.child_by_name(&name) else {
            return self.add_element(parent, child);
        };
        let old_element = self.element(old)?;
        let old_guid = old_element.guid().clone();
        let old_parent = old_element.parent();

        self.container_mut(parent)?
            .replace_named(&name, &old_guid, guid, child);

        if old != child && old_parent == Some(parent) {
            self.element_mut(old)?.set_parent(None);
        }
        self.element_mut(child)?.set_parent(Some(parent));
        tracing::debug!("Replaced {} with {} under name {} in {}", old, child, name, parent);
        Ok(())
    }

    pub fn children(&self, parent: ElementKey) -> Result<impl Iterator<Item = ElementKey> + '_> {
        Ok(self.vertex(parent)?.children())
    }

    pub fn child_by_name(&self, parent: ElementKey, name: &str) -> Result<Option<ElementKey>> {
        Ok(self.vertex(parent)?.child_by_name(name))
    }

    pub fn contains_child(&self, parent: ElementKey, child: ElementKey) -> Result<bool> {
        let guid = self.element(child)?.guid();
        Ok(self.vertex(parent)?.child(guid) == Some(child))
    }

    pub fn child_count(&self, parent: ElementKey) -> Result<usize> {
        Ok(self.vertex(parent)?.len())
    }

    /// Lazy depth-first walk of `root` and its descendants, yielding the
    /// elements accepted by `predicate`
    pub fn get_subelements<P>(&self, root: ElementKey, predicate: P) -> Result<Subelements<'_, P>>
    where
        P: FnMut(&Element) -> bool,
    {
        self.element(root)?;
        Ok(Subelements::new(self, root, predicate))
    }

    /// Parent chain of `key`, nearest first
    pub fn ancestors(&self, key: ElementKey) -> Result<Ancestors<'_>> {
        self.element(key)?;
        Ok(Ancestors::new(self, key))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attributes
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_attribute(
        &mut self,
        vertex: ElementKey,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Result<()> {
        self.vertex_mut(vertex)?.set_attribute(key, value);
        Ok(())
    }

    pub fn get_attribute(&self, vertex: ElementKey, key: &str) -> Result<&serde_json::Value> {
        self.vertex(vertex)?.attribute(key)
    }

    pub fn remove_attribute(&mut self, vertex: ElementKey, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.vertex_mut(vertex)?.remove_attribute(key))
    }

    pub fn attribute_names(&self, vertex: ElementKey) -> Result<Vec<&str>> {
        Ok(self.vertex(vertex)?.attribute_names())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Association
    // ─────────────────────────────────────────────────────────────────────────

    pub fn edge(&self, key: ElementKey) -> Result<&HyperEdge> {
        self.element(key)?
            .as_edge()
            .ok_or_else(|| Error::InvalidElement(format!("{} is not a hyperedge", key)))
    }

    /// Associate `target` with `edge`, returning the relation GUID.
    ///
    /// The GUID is the identity provider's digest of the relation label, so
    /// re-associating the same (edge label, direction, target label) replaces
    /// the earlier relation.
    pub fn associate_vertex(
        &mut self,
        edge: ElementKey,
        target: ElementKey,
        direction: Direction,
        value: impl Into<RelationValue>,
    ) -> Result<Guid> {
        let hyperedge = self.edge(edge)?;
        let edge_element = self.element(edge)?;
        let target_element = self.element(target)?;

        let label = self
            .naming
            .relation_label(edge_element, direction, target_element);
        let guid = self.identity.derive(&label);
        // TODO: derive the SUID independently once relation domains carry their own inception data
        let suid = guid.clone();
        let identity = IdentityRecord::new(
            edge_element.timestamp(),
            hyperedge.association_count() as u64,
            guid.clone(),
            suid,
            label,
            Some(edge),
        );
        tracing::debug!(
            "Associating {}",
            self.naming.relation_name(edge_element, direction, target_element)
        );

        let relation = Relation::new(identity, value.into(), target, direction);
        if let Some(replaced) = self.edge_mut(edge)?.insert_association(relation) {
            tracing::debug!("Relation {} overwrote an earlier association", replaced.label());
        }
        Ok(guid)
    }

    /// Remove every relation of `edge` targeting `target` and roll back the
    /// direction counters. Returns the number of relations removed.
    pub fn unassociate_vertex(&mut self, edge: ElementKey, target: ElementKey) -> Result<usize> {
        self.edge(edge)?;
        self.element(target)?;
        let removed = self.edge_mut(edge)?.remove_associations_to(target);
        tracing::debug!("Unassociated {} from {}: {} relation(s)", target, edge, removed.len());
        Ok(removed.len())
    }

    /// Edge-to-edge association. Operands are validated; the association
    /// itself is not supported yet.
    pub fn associate_edge(
        &mut self,
        edge: ElementKey,
        other: ElementKey,
        direction: Direction,
        value: impl Into<RelationValue>,
    ) -> Result<Guid> {
        self.edge(edge)?;
        self.edge(other)?;
        let _ = (direction, value.into());
        tracing::warn!("Rejected edge-to-edge association {} -> {}", edge, other);
        Err(Error::Unsupported("edge-to-edge association"))
    }

    /// Whether some relation of `edge` targets `element`
    pub fn element_in_edge(&self, edge: ElementKey, element: ElementKey) -> Result<bool> {
        self.element(element)?;
        Ok(self.edge(edge)?.targets(element))
    }

    pub fn all_relations(&self, edge: ElementKey) -> Result<impl Iterator<Item = &Relation> + '_> {
        Ok(self.edge(edge)?.all_relations())
    }

    pub fn out_relations(&self, edge: ElementKey) -> Result<impl Iterator<Item = &Relation> + '_> {
        Ok(self.edge(edge)?.out_relations())
    }

    pub fn in_relations(&self, edge: ElementKey) -> Result<impl Iterator<Item = &Relation> + '_> {
        Ok(self.edge(edge)?.in_relations())
    }

    pub fn out_vertices(&self, edge: ElementKey) -> Result<impl Iterator<Item = ElementKey> + '_> {
        Ok(self.edge(edge)?.out_vertices())
    }

    pub fn in_vertices(&self, edge: ElementKey) -> Result<impl Iterator<Item = ElementKey> + '_> {
        Ok(self.edge(edge)?.in_vertices())
    }

    pub fn relation(&self, edge: ElementKey, guid: &Guid) -> Result<&Relation> {
        self.edge(edge)?
            .relation(guid)
            .ok_or_else(|| Error::InvalidElement(format!("no relation {} in {}", guid, edge)))
    }

    /// Mutable access for value arithmetic and direction changes
    pub fn relation_mut(&mut self, edge: ElementKey, guid: &Guid) -> Result<&mut Relation> {
        self.edge_mut(edge)?
            .relation_mut(guid)
            .ok_or_else(|| Error::InvalidElement(format!("no relation {} in {}", guid, edge)))
    }

    pub fn edge_len(&self, edge: ElementKey) -> Result<usize> {
        Ok(self.edge(edge)?.len())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal lookups
    // ─────────────────────────────────────────────────────────────────────────

    fn element_mut(&mut self, key: ElementKey) -> Result<&mut Element> {
        self.elements
            .get_mut(key.0)
            .ok_or_else(|| Error::InvalidElement(format!("unknown element {}", key)))
    }

    fn vertex_mut(&mut self, key: ElementKey) -> Result<&mut Vertex> {
        self.element_mut(key)?
            .as_vertex_mut()
            .ok_or_else(|| Error::InvalidElement(format!("{} is not a vertex", key)))
    }

    fn edge_mut(&mut self, key: ElementKey) -> Result<&mut HyperEdge> {
        self.element_mut(key)?
            .as_edge_mut()
            .ok_or_else(|| Error::InvalidElement(format!("{} is not a hyperedge", key)))
    }

    /// A vertex usable as a parent
    fn container(&self, key: ElementKey) -> Result<&Vertex> {
        self.get(key)
            .and_then(Element::as_vertex)
            .ok_or_else(|| Error::InvalidParent(format!("{} is not a vertex", key)))
    }

    fn container_mut(&mut self, key: ElementKey) -> Result<&mut Vertex> {
        self.elements
            .get_mut(key.0)
            .and_then(Element::as_vertex_mut)
            .ok_or_else(|| Error::InvalidParent(format!("{} is not a vertex", key)))
    }
}
