//! Callable wrapper binding an element to a user-supplied operation

use crate::error::{Error, Result};
use crate::graph::Hypergraph;
use crate::identity::ElementKey;

/// Operation invoked when an executable element is called.
///
/// Implementors override [`Operate::operate`]; the provided body reports
/// that no operation was supplied.
pub trait Operate {
    fn operate(
        &self,
        graph: &Hypergraph,
        element: ElementKey,
        args: &[serde_json::Value],
    ) -> Result<serde_json::Value> {
        let _ = (graph, args);
        Err(Error::NotImplemented(format!("operate for {}", element)))
    }
}

/// A vertex or hyperedge paired with its operation
#[derive(Debug, Clone)]
pub struct Executable<O> {
    element: ElementKey,
    operation: O,
}

impl<O: Operate> Executable<O> {
    pub fn new(graph: &Hypergraph, element: ElementKey, operation: O) -> Result<Self> {
        graph.element(element)?;
        Ok(Self { element, operation })
    }

    pub fn element(&self) -> ElementKey {
        self.element
    }

    pub fn call(&self, graph: &Hypergraph, args: &[serde_json::Value]) -> Result<serde_json::Value> {
        tracing::trace!("Calling executable {} with {} argument(s)", self.element, args.len());
        self.operation.operate(graph, self.element, args)
    }
}
