//! Adding a single row.
//!
//! The column edges of the new row's support (the 1-edges) must all close
//! cycles through one common node. That node is split in two: the new row
//! edge joins the halves, and every other edge at the node is moved to
//! whichever half keeps the fundamental cycles right.
//!
//! 1. Cut vertices of the graph without 1-edges are the split candidates.
//! 2. A candidate survives only if it lies on the tree path of every 1-edge.
//! 3. Without the split node and the 1-edges, the graph falls apart into
//!    components. Each 1-edge joins two components and must cross between
//!    the halves, so the components must be two-colourable along 1-edges.
//! 4. An edge at the split node goes to the sister node when its far
//!    component has colour `true`, with the choice flipped for 1-edges.

use crate::element::Element;
use crate::error::GraphicError;
use crate::extension::{Obstruction, StepVerdict};
use crate::state::{WitnessGraph, WitnessState};
use crate::traverse::{
    edge_mask, find_articulation_points, find_bipartition, find_components, find_tree_parents,
};
use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use tracing::trace;

/// The unique node on the tree paths of all `one_edges` that separates the
/// graph once they are removed.
fn find_split_node(
    state: &WitnessState,
    one_edges: &[EdgeIndex],
    is_one: &[bool],
) -> Result<Result<NodeIndex, Obstruction>, GraphicError> {
    let graph = state.graph();
    // Number of 1-edges survived, plus one; zero for non-candidates.
    let mut rounds: Vec<usize> = find_articulation_points(graph, |e| is_one[e.index()])
        .into_iter()
        .map(usize::from)
        .collect();
    let articulation_points = rounds.iter().filter(|&&r| r > 0).count();
    trace!(articulation_points, "split candidates");
    if articulation_points == 0 {
        return Ok(Err(Obstruction::NoArticulationPoint));
    }

    let is_row = edge_mask(graph, state.row_edges().iter().copied());
    let parents = find_tree_parents(graph, |e| is_row[e.index()]);
    let mut survivors = 0;
    let mut split = None;
    for (i, &edge) in one_edges.iter().enumerate() {
        let (u, v) = state.endpoints(edge)?;
        survivors = 0;
        if let Some(path) = parents.path(u, v) {
            for node in path.nodes() {
                if rounds[node.index()] == i + 1 {
                    rounds[node.index()] += 1;
                    survivors += 1;
                    split = Some(node);
                }
            }
        }
        if survivors == 0 {
            break;
        }
    }
    trace!(survivors, ?split, "candidates on every 1-cycle");
    Ok(match (survivors, split) {
        (1, Some(node)) => Ok(node),
        _ => Err(Obstruction::AmbiguousSplit {
            candidates: survivors,
        }),
    })
}

/// Add row `row` whose processed nonzeros are the columns in `support`.
pub fn extend_row(
    state: &mut WitnessState,
    row: usize,
    support: &[usize],
) -> Result<StepVerdict, GraphicError> {
    if support.is_empty() {
        return Ok(StepVerdict::NotGraphic(Obstruction::EmptySupport {
            line: Element::Row(row),
        }));
    }
    let one_edges: Vec<EdgeIndex> = support
        .iter()
        .map(|&column| state.column_edges()[column])
        .collect();
    let is_one = edge_mask(state.graph(), one_edges.iter().copied());

    let split = match find_split_node(state, &one_edges, &is_one)? {
        Ok(split) => split,
        Err(obstruction) => return Ok(StepVerdict::NotGraphic(obstruction)),
    };

    let components = find_components(state.graph(), split, |e| is_one[e.index()]);
    let mut auxiliary = WitnessGraph::with_capacity(components.count(), one_edges.len());
    let component_nodes: Vec<NodeIndex> = (0..components.count())
        .map(|_| auxiliary.add_node(()))
        .collect();
    for &edge in &one_edges {
        let (u, v) = state.endpoints(edge)?;
        if let (Some(a), Some(b)) = (components.label(u), components.label(v)) {
            auxiliary.add_edge(component_nodes[a], component_nodes[b], ());
        }
    }
    trace!(
        ?split,
        components = components.count(),
        "auxiliary graph built"
    );
    let Some(colouring) = find_bipartition(&auxiliary) else {
        return Ok(StepVerdict::NotGraphic(Obstruction::OddCycle));
    };

    let sister = state.add_node();
    for edge in state.incident_edges(split) {
        let (u, v) = state.endpoints(edge)?;
        let far = if u == split { v } else { u };
        let side = components
            .label(far)
            .is_some_and(|c| colouring[component_nodes[c].index()]);
        if side != is_one[edge.index()] {
            state.rewire_edge(edge, far, sister)?;
        }
    }
    let new_row = state.add_edge(split, sister);
    state.push_row_edge(new_row);
    Ok(StepVerdict::Graphic)
}
