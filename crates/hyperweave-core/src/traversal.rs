//! Lazy traversals over the composition tree

use crate::element::Element;
use crate::graph::Hypergraph;
use crate::identity::{ElementKey, Guid};
use std::collections::HashSet;

/// Traversal statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    pub nodes_visited: usize,
    pub nodes_yielded: usize,
}

/// Depth-first walk of an element and everything it owns.
///
/// Children are pushed in child-map order and the most recently pushed one is
/// explored first. Each element is visited at most once (by GUID), so the
/// walk terminates even if the composition graph was forced into a cycle.
///
/// The iterator borrows the graph, so the structure cannot be mutated while a
/// traversal is open.
pub struct Subelements<'g, P> {
    graph: &'g Hypergraph,
    stack: Vec<ElementKey>,
    visited: HashSet<&'g Guid>,
    predicate: P,
    stats: TraversalStats,
}

impl<'g, P> Subelements<'g, P>
where
    P: FnMut(&Element) -> bool,
{
    pub(crate) fn new(graph: &'g Hypergraph, root: ElementKey, predicate: P) -> Self {
        Self {
            graph,
            stack: vec![root],
            visited: HashSet::new(),
            predicate,
            stats: TraversalStats::default(),
        }
    }

    pub fn stats(&self) -> TraversalStats {
        self.stats
    }
}

impl<'g, P> Iterator for Subelements<'g, P>
where
    P: FnMut(&Element) -> bool,
{
    type Item = (ElementKey, &'g Element);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(key) = self.stack.pop() {
            let Some(element) = self.graph.get(key) else {
                continue;
            };
            if !self.visited.insert(element.guid()) {
                continue;
            }
            self.stats.nodes_visited += 1;

            if let Some(vertex) = element.as_vertex() {
                self.stack.extend(vertex.children());
            }

            if (self.predicate)(element) {
                self.stats.nodes_yielded += 1;
                return Some((key, element));
            }
        }

        tracing::trace!(
            "Subelement traversal finished: visited {}, yielded {}",
            self.stats.nodes_visited,
            self.stats.nodes_yielded
        );
        None
    }
}

/// Walk of parent links from an element towards the root, excluding the
/// element itself. Stops at the first repeated element.
pub struct Ancestors<'g> {
    graph: &'g Hypergraph,
    next: Option<ElementKey>,
    visited: HashSet<ElementKey>,
}

impl<'g> Ancestors<'g> {
    pub(crate) fn new(graph: &'g Hypergraph, start: ElementKey) -> Self {
        let mut visited = HashSet::new();
        visited.insert(start);
        Self {
            graph,
            next: graph.get(start).and_then(Element::parent),
            visited,
        }
    }
}

impl<'g> Iterator for Ancestors<'g> {
    type Item = (ElementKey, &'g Element);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.next.take()?;
        if !self.visited.insert(key) {
            return None;
        }
        let element = self.graph.get(key)?;
        self.next = element.parent();
        Some((key, element))
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::Hypergraph;
    use crate::identity::ElementKey;

    /// root
    /// ├── a
    /// │   └── c
    /// └── b
    fn create_test_tree() -> (Hypergraph, [ElementKey; 4]) {
        let mut graph = Hypergraph::new();
        let root = graph.create_vertex(graph.mint("root", "V"), None).unwrap();
        let a = graph.create_vertex(graph.mint("a", "V"), Some(root)).unwrap();
        let b = graph.create_vertex(graph.mint("b", "V"), Some(root)).unwrap();
        let c = graph.create_vertex(graph.mint("c", "V"), Some(a)).unwrap();
        (graph, [root, a, b, c])
    }

    #[test]
    fn test_visits_whole_subtree() {
        let (graph, [root, a, b, c]) = create_test_tree();
        let mut keys: Vec<_> = graph
            .get_subelements(root, |_| true)
            .unwrap()
            .map(|(k, _)| k)
            .collect();

        assert_eq!(keys[0], root);
        keys.sort();
        assert_eq!(keys, vec![root, a, b, c]);
    }

    #[test]
    fn test_depth_first_order() {
        let mut graph = Hypergraph::new();
        let root = graph.create_vertex(graph.mint("root", "V"), None).unwrap();
        let mut leaf_of = std::collections::HashMap::new();
        for name in ["a", "b", "c", "d"] {
            let child = graph.create_vertex(graph.mint(name, "V"), Some(root)).unwrap();
            let leaf = graph
                .create_vertex(graph.mint(format!("{}-leaf", name), "V"), Some(child))
                .unwrap();
            leaf_of.insert(child, leaf);
        }

        // siblings come out in reverse child-map order, each subtree drained first
        let siblings: Vec<_> = graph.children(root).unwrap().collect();
        let mut expected = vec![root];
        for child in siblings.iter().rev() {
            expected.push(*child);
            expected.push(leaf_of[child]);
        }

        let keys: Vec<_> = graph
            .get_subelements(root, |_| true)
            .unwrap()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_predicate_filters_but_descends() {
        let (graph, [root, _a, _b, c]) = create_test_tree();
        let found: Vec<_> = graph
            .get_subelements(root, |e| e.name() == "c")
            .unwrap()
            .collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, c);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph = Hypergraph::new();
        let a = graph.create_vertex(graph.mint("A", "V"), None).unwrap();
        let b = graph.create_vertex(graph.mint("B", "V"), Some(a)).unwrap();
        graph.add_element(b, a).unwrap();

        let mut walk = graph.get_subelements(a, |_| true).unwrap();
        let keys: Vec<_> = walk.by_ref().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![a, b]);
        assert_eq!(walk.stats().nodes_visited, 2);
    }

    #[test]
    fn test_restartable_and_lazy() {
        let (graph, [root, ..]) = create_test_tree();
        let first = graph.get_subelements(root, |_| true).unwrap().next();
        assert_eq!(first.map(|(k, _)| k), Some(root));

        let again = graph.get_subelements(root, |_| true).unwrap().count();
        assert_eq!(again, 4);
    }

    #[test]
    fn test_ancestors() {
        let (graph, [root, a, _b, c]) = create_test_tree();
        let chain: Vec<_> = graph.ancestors(c).unwrap().map(|(k, _)| k).collect();
        assert_eq!(chain, vec![a, root]);
        assert_eq!(graph.ancestors(root).unwrap().count(), 0);
    }

    #[test]
    fn test_ancestors_stop_on_cycle() {
        let mut graph = Hypergraph::new();
        let a = graph.create_vertex(graph.mint("A", "V"), None).unwrap();
        let b = graph.create_vertex(graph.mint("B", "V"), Some(a)).unwrap();
        graph.add_element(b, a).unwrap();

        let chain: Vec<_> = graph.ancestors(b).unwrap().map(|(k, _)| k).collect();
        assert_eq!(chain, vec![a]);
    }
}
