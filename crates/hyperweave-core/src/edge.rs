//! Hyperedge state: relation storage and direction queries

use crate::identity::{ElementKey, Guid};
use crate::relation::{Direction, Relation};
use std::collections::HashMap;

/// Relation storage of a hyperedge.
///
/// Counters grow on every association, including ones that overwrite an
/// existing relation with the same GUID. Each GUID keeps a tally of the
/// increments made under it, and unassociation subtracts exactly that tally,
/// so the counters return to zero once every association is removed.
#[derive(Debug, Clone, Default)]
pub struct HyperEdge {
    /// Element associations keyed by relation GUID
    associations: HashMap<Guid, Relation>,

    /// Reserved for edge-to-edge relations; always empty for now
    direct: HashMap<Guid, Relation>,

    /// (in, out) increments recorded per relation GUID
    tallies: HashMap<Guid, (usize, usize)>,

    cnt_in_relations: usize,
    cnt_out_relations: usize,
}

impl HyperEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every relation of the edge: associations first, then direct relations
    pub fn all_relations(&self) -> impl Iterator<Item = &Relation> + '_ {
        self.associations.values().chain(self.direct.values())
    }

    pub fn out_relations(&self) -> impl Iterator<Item = &Relation> + '_ {
        self.all_relations().filter(|r| r.is_out())
    }

    pub fn in_relations(&self) -> impl Iterator<Item = &Relation> + '_ {
        self.all_relations().filter(|r| r.is_in())
    }

    pub fn out_vertices(&self) -> impl Iterator<Item = ElementKey> + '_ {
        self.out_relations().map(Relation::target)
    }

    pub fn in_vertices(&self) -> impl Iterator<Item = ElementKey> + '_ {
        self.in_relations().map(Relation::target)
    }

    pub fn relation(&self, guid: &Guid) -> Option<&Relation> {
        self.associations.get(guid).or_else(|| self.direct.get(guid))
    }

    pub fn relation_mut(&mut self, guid: &Guid) -> Option<&mut Relation> {
        match self.associations.get_mut(guid) {
            Some(rel) => Some(rel),
            None => self.direct.get_mut(guid),
        }
    }

    /// Whether any relation targets `key`
    pub fn targets(&self, key: ElementKey) -> bool {
        self.all_relations().any(|r| r.target() == key)
    }

    pub fn association_count(&self) -> usize {
        self.associations.len()
    }

    /// Combined size of associations and direct relations
    pub fn len(&self) -> usize {
        self.associations.len() + self.direct.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cnt_in_relations(&self) -> usize {
        self.cnt_in_relations
    }

    pub fn cnt_out_relations(&self) -> usize {
        self.cnt_out_relations
    }

    /// Store a relation, returning the one it overwrote
    pub(crate) fn insert_association(&mut self, relation: Relation) -> Option<Relation> {
        let (d_in, d_out) = match relation.direction() {
            Direction::In => (1, 0),
            Direction::Out => (0, 1),
            Direction::Undefined => (1, 1),
        };
        self.cnt_in_relations += d_in;
        self.cnt_out_relations += d_out;

        let tally = self.tallies.entry(relation.guid().clone()).or_default();
        tally.0 += d_in;
        tally.1 += d_out;

        self.associations.insert(relation.guid().clone(), relation)
    }

    /// Drop every association targeting `key`, returning the removed relations
    pub(crate) fn remove_associations_to(&mut self, key: ElementKey) -> Vec<Relation> {
        let guids: Vec<Guid> = self
            .associations
            .values()
            .filter(|r| r.target() == key)
            .map(|r| r.guid().clone())
            .collect();

        let mut removed = Vec::with_capacity(guids.len());
        for guid in guids {
            if let Some(rel) = self.associations.remove(&guid) {
                let (d_in, d_out) = self.tallies.remove(&guid).unwrap_or_default();
                self.cnt_in_relations -= d_in;
                self.cnt_out_relations -= d_out;
                removed.push(rel);
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityRecord;
    use crate::relation::RelationValue;

    fn relation(tag: u8, target: usize, direction: Direction) -> Relation {
        let guid = Guid::from_bytes(vec![tag; 4]);
        let identity = IdentityRecord::new(0, 0, guid.clone(), guid, "r", Some(ElementKey(0)));
        Relation::new(identity, RelationValue::Scalar(1.0), ElementKey(target), direction)
    }

    #[test]
    fn test_direction_queries() {
        let mut edge = HyperEdge::new();
        edge.insert_association(relation(1, 1, Direction::Out));
        edge.insert_association(relation(2, 2, Direction::In));
        edge.insert_association(relation(3, 3, Direction::Undefined));

        let mut outs: Vec<_> = edge.out_vertices().collect();
        outs.sort();
        assert_eq!(outs, vec![ElementKey(1), ElementKey(3)]);

        let mut ins: Vec<_> = edge.in_vertices().collect();
        ins.sort();
        assert_eq!(ins, vec![ElementKey(2), ElementKey(3)]);

        assert_eq!(edge.cnt_out_relations(), 2);
        assert_eq!(edge.cnt_in_relations(), 2);
        assert_eq!(edge.len(), 3);
    }

    #[test]
    fn test_overwrite_keeps_counting() {
        let mut edge = HyperEdge::new();
        assert!(edge.insert_association(relation(1, 1, Direction::Out)).is_none());
        assert!(edge.insert_association(relation(1, 1, Direction::Out)).is_some());

        assert_eq!(edge.len(), 1);
        assert_eq!(edge.cnt_out_relations(), 2);
    }

    #[test]
    fn test_remove_associations_to() {
        let mut edge = HyperEdge::new();
        edge.insert_association(relation(1, 1, Direction::Out));
        edge.insert_association(relation(2, 1, Direction::Undefined));
        edge.insert_association(relation(3, 2, Direction::In));

        let removed = edge.remove_associations_to(ElementKey(1));
        assert_eq!(removed.len(), 2);
        assert!(!edge.targets(ElementKey(1)));
        assert!(edge.targets(ElementKey(2)));
        assert_eq!(edge.cnt_out_relations(), 0);
        assert_eq!(edge.cnt_in_relations(), 1);
    }

    #[test]
    fn test_remove_rolls_back_overwrites() {
        let mut edge = HyperEdge::new();
        edge.insert_association(relation(1, 1, Direction::Out));
        edge.insert_association(relation(1, 1, Direction::Undefined));
        assert_eq!(edge.cnt_out_relations(), 2);
        assert_eq!(edge.cnt_in_relations(), 1);

        assert_eq!(edge.remove_associations_to(ElementKey(1)).len(), 1);
        assert!(edge.is_empty());
        assert_eq!(edge.cnt_out_relations(), 0);
        assert_eq!(edge.cnt_in_relations(), 0);
    }
}
