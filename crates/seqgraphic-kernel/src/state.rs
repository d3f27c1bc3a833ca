//! The witness graph and its row/column edge maps.
//!
//! Row edges span a tree, column edges are the rest, and every column edge
//! closes a cycle through exactly the rows of its support. Handlers mutate
//! the state only after deciding that a step is graphic.

use crate::element::Element;
use crate::error::GraphicError;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;

/// Undirected graph with stable node and edge indices.
pub type WitnessGraph = StableUnGraph<(), ()>;

/// A witness graph together with the edge of every processed line.
#[derive(Debug, Clone, Default)]
pub struct WitnessState {
    pub(crate) graph: WitnessGraph,
    pub(crate) row_edges: Vec<EdgeIndex>,
    pub(crate) column_edges: Vec<EdgeIndex>,
}

/// Two edges meeting in `common`; `first_other`/`second_other` are their
/// remaining endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacency {
    pub common: NodeIndex,
    pub first_other: NodeIndex,
    pub second_other: NodeIndex,
}

impl WitnessState {
    /// Empty state with room for a matrix of the given size.
    pub fn with_capacity(num_rows: usize, num_columns: usize) -> Result<Self, GraphicError> {
        let edges = num_rows
            .checked_add(num_columns)
            .filter(|&total| total < u32::MAX as usize)
            .ok_or(GraphicError::Capacity {
                rows: num_rows,
                columns: num_columns,
            })?;
        let mut row_edges = Vec::new();
        row_edges.try_reserve_exact(num_rows)?;
        let mut column_edges = Vec::new();
        column_edges.try_reserve_exact(num_columns)?;
        Ok(Self {
            graph: WitnessGraph::with_capacity(num_rows + 1, edges),
            row_edges,
            column_edges,
        })
    }

    pub fn graph(&self) -> &WitnessGraph {
        &self.graph
    }

    pub fn row_edges(&self) -> &[EdgeIndex] {
        &self.row_edges
    }

    pub fn column_edges(&self) -> &[EdgeIndex] {
        &self.column_edges
    }

    /// Rows processed so far.
    pub fn num_rows(&self) -> usize {
        self.row_edges.len()
    }

    /// Columns processed so far.
    pub fn num_columns(&self) -> usize {
        self.column_edges.len()
    }

    /// The edge standing for an already processed element.
    pub fn edge_of(&self, element: Element) -> EdgeIndex {
        match element {
            Element::Row(r) => self.row_edges[r],
            Element::Column(c) => self.column_edges[c],
        }
    }

    pub fn endpoints(&self, edge: EdgeIndex) -> Result<(NodeIndex, NodeIndex), GraphicError> {
        self.graph
            .edge_endpoints(edge)
            .ok_or(GraphicError::MissingEdge(edge.index()))
    }

    /// Whether `first` and `second` share an endpoint, checking `first`'s
    /// endpoints in order against `second`'s.
    pub fn adjacency(
        &self,
        first: EdgeIndex,
        second: EdgeIndex,
    ) -> Result<Option<Adjacency>, GraphicError> {
        let (a0, a1) = self.endpoints(first)?;
        let (b0, b1) = self.endpoints(second)?;
        let first_nodes = [a0, a1];
        let second_nodes = [b0, b1];
        for i in 0..2 {
            for j in 0..2 {
                if first_nodes[i] == second_nodes[j] {
                    return Ok(Some(Adjacency {
                        common: first_nodes[i],
                        first_other: first_nodes[1 - i],
                        second_other: second_nodes[1 - j],
                    }));
                }
            }
        }
        Ok(None)
    }

    /// Edges incident to `node`, in incidence order.
    pub fn incident_edges(&self, node: NodeIndex) -> Vec<EdgeIndex> {
        self.graph.edges(node).map(|e| e.id()).collect()
    }

    pub(crate) fn add_node(&mut self) -> NodeIndex {
        self.graph.add_node(())
    }

    pub(crate) fn add_edge(&mut self, a: NodeIndex, b: NodeIndex) -> EdgeIndex {
        self.graph.add_edge(a, b, ())
    }

    /// Move `edge` to connect `a` and `b`, keeping its index.
    ///
    /// The removed slot is the first one the graph hands out again, so the
    /// re-added edge must come back under the same index.
    pub(crate) fn rewire_edge(
        &mut self,
        edge: EdgeIndex,
        a: NodeIndex,
        b: NodeIndex,
    ) -> Result<(), GraphicError> {
        self.graph
            .remove_edge(edge)
            .ok_or(GraphicError::MissingEdge(edge.index()))?;
        let reused = self.graph.add_edge(a, b, ());
        if reused != edge {
            return Err(GraphicError::EdgeIdentity {
                expected: edge.index(),
                actual: reused.index(),
            });
        }
        Ok(())
    }

    pub(crate) fn push_row_edge(&mut self, edge: EdgeIndex) {
        self.row_edges.push(edge);
    }

    pub(crate) fn push_column_edge(&mut self, edge: EdgeIndex) {
        self.column_edges.push(edge);
    }

    /// `(edge, u, v)` for every live edge, by edge index.
    pub fn edge_list(&self) -> Vec<(usize, usize, usize)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_indices()
            .filter_map(|e| {
                self.graph
                    .edge_endpoints(e)
                    .map(|(u, v)| (e.index(), u.index(), v.index()))
            })
            .collect();
        edges.sort_unstable();
        edges
    }
}
