//! Error types for seqgraphic kernel operations.

use std::collections::TryReserveError;

/// Errors that abort a run.
///
/// A step that turns out not to be graphic is *not* an error; it is reported
/// through [`crate::extension::StepVerdict`].
#[derive(Debug, thiserror::Error)]
pub enum GraphicError {
    /// The matrix has entries outside {-1, 0, 1} or ragged rows.
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),

    /// The minor boundaries do not describe a valid sequence.
    #[error("invalid minor sequence: {0}")]
    InvalidSequence(String),

    /// The first minor does not have the nonzero pattern of a wheel.
    #[error("first minor is not a wheel: {0}")]
    NotAWheel(String),

    /// A case file could not be read or decoded.
    #[error("invalid case: {0}")]
    InvalidCase(String),

    /// Run-sized buffers could not be allocated.
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// The witness graph would need more edges than the index type can address.
    #[error("capacity exceeded: {rows} rows and {columns} columns do not fit the edge index")]
    Capacity { rows: usize, columns: usize },

    /// A rewired edge did not come back under its old index.
    #[error("edge identity lost while rewiring: expected e{expected}, got e{actual}")]
    EdgeIdentity { expected: usize, actual: usize },

    /// An edge map points at an edge that is no longer in the graph.
    #[error("edge e{0} is not part of the witness graph")]
    MissingEdge(usize),

    /// Step certification found the witness inconsistent with the matrix.
    #[error(
        "witness invalid after step {step}: {} violation(s), first: {}",
        .violations.len(),
        first_description(.violations)
    )]
    Witness {
        step: usize,
        violations: Vec<Violation>,
    },
}

fn first_description(violations: &[Violation]) -> &str {
    violations
        .first()
        .map(|v| v.description.as_str())
        .unwrap_or("none")
}

/// Which witness invariant was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Invariant {
    /// Row edges form a spanning tree.
    Tree,
    /// Column edges are exactly the remaining edges.
    Cotree,
    /// Every column's tree path matches its support.
    FundamentalCycle,
}

/// A concrete violation of a witness invariant.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Violation {
    pub invariant: Invariant,
    pub description: String,
}

impl Violation {
    pub fn new(invariant: Invariant, description: impl Into<String>) -> Self {
        Self {
            invariant,
            description: description.into(),
        }
    }
}
