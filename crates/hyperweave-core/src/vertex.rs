//! Vertex (composite container) state

use crate::error::{Error, Result};
use crate::identity::{ElementKey, Guid};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key of the secondary child index.
///
/// Children are indexed by name. Replacing a same-named child through
/// `update_element` additionally indexes the replacement under its GUID, which
/// is why the index admits both key shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKey {
    Name(String),
    Guid(Guid),
}

/// Child ownership and attribute storage of a vertex
#[derive(Debug, Clone, Default)]
pub struct Vertex {
    /// Owned children keyed by GUID
    children: HashMap<Guid, ElementKey>,

    /// Secondary index over `children`
    name_index: HashMap<IndexKey, ElementKey>,

    /// Free-form attributes, independent of children
    attributes: HashMap<String, serde_json::Value>,
}

impl Vertex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Owned children, in no particular order
    pub fn children(&self) -> impl Iterator<Item = ElementKey> + '_ {
        self.children.values().copied()
    }

    pub fn child(&self, guid: &Guid) -> Option<ElementKey> {
        self.children.get(guid).copied()
    }

    pub fn child_by_name(&self, name: &str) -> Option<ElementKey> {
        self.name_index.get(&IndexKey::Name(name.to_string())).copied()
    }

    pub fn index_entry(&self, key: &IndexKey) -> Option<ElementKey> {
        self.name_index.get(key).copied()
    }

    pub fn contains(&self, guid: &Guid) -> bool {
        self.children.contains_key(guid)
    }

    pub fn contains_key(&self, key: ElementKey) -> bool {
        self.children.values().any(|k| *k == key)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Every index entry refers to a current child.
    ///
    /// The check runs one way only: a child whose name entry was taken over
    /// by a later same-named child is still owned but no longer reachable by
    /// name, and this still reports `true`.
    pub fn is_index_consistent(&self) -> bool {
        self.name_index.values().all(|k| self.contains_key(*k))
    }

    // Attributes

    pub fn attribute(&self, key: &str) -> Result<&serde_json::Value> {
        self.attributes
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<serde_json::Value> {
        self.attributes.remove(key)
    }

    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.keys().map(String::as_str).collect()
    }

    // Child bookkeeping, driven by the owning graph

    pub(crate) fn insert_child(&mut self, guid: Guid, name: &str, key: ElementKey) {
        self.children.insert(guid, key);
        self.name_index.insert(IndexKey::Name(name.to_string()), key);
    }

    pub(crate) fn remove_child(&mut self, guid: &Guid) -> Option<ElementKey> {
        let key = self.children.remove(guid)?;
        self.name_index.retain(|_, k| *k != key);
        Some(key)
    }

    /// Swap the child registered under `name` for `key`
    pub(crate) fn replace_named(&mut self, name: &str, old_guid: &Guid, guid: Guid, key: ElementKey) {
        if let Some(old) = self.children.remove(old_guid) {
            if old != key {
                self.name_index.retain(|_, k| *k != old);
            }
        }
        self.children.insert(guid.clone(), key);
        self.name_index.insert(IndexKey::Name(name.to_string()), key);
        self.name_index.insert(IndexKey::Guid(guid), key);
    }

    pub(crate) fn rename_child(&mut self, old_name: &str, new_name: &str, key: ElementKey) {
        let old = IndexKey::Name(old_name.to_string());
        if self.name_index.get(&old) == Some(&key) {
            self.name_index.remove(&old);
        }
        self.name_index.insert(IndexKey::Name(new_name.to_string()), key);
    }
}
