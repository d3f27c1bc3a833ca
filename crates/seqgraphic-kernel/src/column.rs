//! Adding a single column.

use crate::error::GraphicError;
use crate::extension::{Obstruction, StepVerdict};
use crate::state::WitnessState;
use petgraph::visit::NodeIndexable;
use tracing::trace;

/// Close the tree path formed by the row edges of `support` with a new
/// column edge.
///
/// Those row edges are a subforest of the tree, so they form a path exactly
/// when two of their nodes have degree one.
pub fn extend_column(
    state: &mut WitnessState,
    support: &[usize],
) -> Result<StepVerdict, GraphicError> {
    let mut degrees = vec![0usize; state.graph().node_bound()];
    let mut leaves = 0usize;
    for &row in support {
        let (u, v) = state.endpoints(state.row_edges()[row])?;
        for node in [u, v] {
            let degree = &mut degrees[node.index()];
            *degree += 1;
            match *degree {
                1 => leaves += 1,
                2 => leaves -= 1,
                _ => {}
            }
        }
    }
    trace!(rows = support.len(), leaves, "column path");
    if leaves != 2 {
        return Ok(StepVerdict::NotGraphic(Obstruction::NotAPath { leaves }));
    }

    let mut ends = state
        .graph()
        .node_indices()
        .filter(|node| degrees[node.index()] == 1);
    let (Some(first), Some(second)) = (ends.next(), ends.next()) else {
        return Ok(StepVerdict::NotGraphic(Obstruction::NotAPath { leaves }));
    };
    let edge = state.add_edge(first, second);
    state.push_column_edge(edge);
    Ok(StepVerdict::Graphic)
}
