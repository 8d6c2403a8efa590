//! Hyperweave Core - In-memory hypergraph data model
//!
//! Elements are organized two ways at once: vertices own child elements
//! (a composition tree) and hyperedges associate any number of elements
//! through directed, value-bearing relations.
//!
//! ```
//! use hyperweave_core::{Direction, Hypergraph};
//!
//! let mut graph = Hypergraph::new();
//! let root = graph.create_vertex(graph.mint("root", "V"), None).unwrap();
//! let child = graph.create_vertex(graph.mint("child", "V"), Some(root)).unwrap();
//! assert!(graph.contains_child(root, child).unwrap());
//!
//! let edge = graph.create_edge(graph.mint("e", "E"), None).unwrap();
//! graph.associate_vertex(edge, root, Direction::Out, 5.0).unwrap();
//! assert_eq!(graph.out_vertices(edge).unwrap().collect::<Vec<_>>(), vec![root]);
//! ```

pub mod config;
pub mod edge;
pub mod element;
pub mod error;
pub mod executable;
pub mod graph;
pub mod identity;
pub mod relation;
pub mod traversal;
pub mod vertex;

pub use config::{DigestAlgorithm, HypergraphConfig};
pub use edge::HyperEdge;
pub use element::{Element, ElementBody, ElementKind, NewElement};
pub use error::{Error, Result};
pub use executable::{Executable, Operate};
pub use graph::Hypergraph;
pub use identity::{DigestProvider, ElementKey, Guid, IdentityProvider, IdentityRecord, Suid};
pub use relation::{Direction, LabelNaming, Relation, RelationNaming, RelationValue};
pub use traversal::{Ancestors, Subelements, TraversalStats};
pub use vertex::{IndexKey, Vertex};
