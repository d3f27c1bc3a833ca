//! Final witness graphs, their digests and run reports.
//!
//! The digest identifies a witness by its canonical edge list:
//!
//! 1. one line `e<index> <u> <v> <element>` per live edge, by edge index
//! 2. witnessDigest = "g1_" followed by the unpadded lowercase base32hex of
//!    SHA-256(lines)
//!
//! Two runs that build the same graph with the same edge identities produce
//! the same digest.

use crate::element::Element;
use crate::extension::{Boundary, Obstruction};
use crate::state::{WitnessGraph, WitnessState};
use petgraph::visit::EdgeIndexable;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A graph realizing the whole sequence, with the element of every edge.
#[derive(Debug, Clone)]
pub struct Witness {
    graph: WitnessGraph,
    edge_elements: Vec<Option<Element>>,
}

/// One edge of a witness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WitnessEdge {
    pub edge: usize,
    pub u: usize,
    pub v: usize,
    pub element: Option<Element>,
}

impl Witness {
    /// Take over the state, translating row `r` to `row_elements[r]` and
    /// column `c` to `column_elements[c]`.
    pub fn from_state(
        state: WitnessState,
        row_elements: &[Element],
        column_elements: &[Element],
    ) -> Self {
        let mut edge_elements = vec![None; state.graph.edge_bound()];
        for (edge, &element) in state.row_edges.iter().zip(row_elements) {
            edge_elements[edge.index()] = Some(element);
        }
        for (edge, &element) in state.column_edges.iter().zip(column_elements) {
            edge_elements[edge.index()] = Some(element);
        }
        Self {
            graph: state.graph,
            edge_elements,
        }
    }

    pub fn graph(&self) -> &WitnessGraph {
        &self.graph
    }

    /// Caller element per `EdgeIndex::index()`.
    pub fn edge_elements(&self) -> &[Option<Element>] {
        &self.edge_elements
    }

    pub fn into_parts(self) -> (WitnessGraph, Vec<Option<Element>>) {
        (self.graph, self.edge_elements)
    }

    pub fn edges(&self) -> Vec<WitnessEdge> {
        self.graph
            .edge_indices()
            .filter_map(|e| {
                let (u, v) = self.graph.edge_endpoints(e)?;
                Some(WitnessEdge {
                    edge: e.index(),
                    u: u.index(),
                    v: v.index(),
                    element: self.edge_elements.get(e.index()).copied().flatten(),
                })
            })
            .collect()
    }

    /// Deterministic identifier of the graph and its edge labels.
    pub fn digest(&self) -> String {
        let mut edges = self.edges();
        edges.sort_by_key(|e| e.edge);
        let mut canonical = String::new();
        for e in &edges {
            let element = e.element.map_or_else(|| "-".to_owned(), |el| el.to_string());
            canonical.push_str(&format!("e{} {} {} {element}\n", e.edge, e.u, e.v));
        }
        let hash = Sha256::digest(canonical.as_bytes());
        format!("g1_{}", encode_base32hex(&hash))
    }
}

/// Lowercase RFC 4648 base32hex, unpadded: one symbol per 5-bit group,
/// the last group filled with zero bits.
fn encode_base32hex(bytes: &[u8]) -> String {
    const SYMBOLS: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";
    let total_bits = bytes.len() * 8;
    (0..total_bits)
        .step_by(5)
        .map(|start| {
            let group = (start..start + 5).fold(0usize, |acc, bit| {
                let set = bit < total_bits && bytes[bit / 8] & (0x80 >> (bit % 8)) != 0;
                (acc << 1) | usize::from(set)
            });
            char::from(SYMBOLS[group])
        })
        .collect()
}

/// The step that stopped a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepFailure {
    /// Index of the first minor that is not graphic.
    pub step: usize,
    pub boundary: Boundary,
    pub obstruction: Obstruction,
}

/// Serializable summary of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceReport {
    pub graphic: bool,
    pub minors: usize,
    pub last_graphic_minor: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<StepFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub witness_digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<WitnessEdge>>,
}
