//! Steps decided by the parallel elements of the new lines alone.
//!
//! Each new line must be parallel to an already processed element, and the
//! two edges standing for those elements must share an endpoint. The new
//! lines are then placed around that common node.

use crate::element::Element;
use crate::error::GraphicError;
use crate::extension::{Obstruction, StepVerdict};
use crate::state::{Adjacency, WitnessState};
use tracing::trace;

fn adjacent_parallels(
    state: &WitnessState,
    first: Element,
    second: Element,
) -> Result<Result<Adjacency, Obstruction>, GraphicError> {
    let adjacency = state.adjacency(state.edge_of(first), state.edge_of(second))?;
    trace!(%first, %second, ?adjacency, "parallel edges");
    Ok(adjacency.ok_or(Obstruction::NotAdjacent { first, second }))
}

/// One new row and one new column.
///
/// The row's parallel edge is subdivided by a new node; the new row edge is
/// the half at the common node and the new column edge joins the new node to
/// the column side.
pub fn extend_row_and_column(
    state: &mut WitnessState,
    row_parallel: Element,
    column_parallel: Element,
) -> Result<StepVerdict, GraphicError> {
    let adjacency = match adjacent_parallels(state, row_parallel, column_parallel)? {
        Ok(adjacency) => adjacency,
        Err(obstruction) => return Ok(StepVerdict::NotGraphic(obstruction)),
    };
    let row_edge = state.edge_of(row_parallel);
    let split = state.add_node();
    state.rewire_edge(row_edge, adjacency.first_other, split)?;
    let new_row = state.add_edge(split, adjacency.common);
    let new_column = state.add_edge(split, adjacency.second_other);
    state.push_row_edge(new_row);
    state.push_column_edge(new_column);
    Ok(StepVerdict::Graphic)
}

/// Two new rows and one new column.
pub fn extend_two_rows(
    state: &mut WitnessState,
    parallels: [Element; 2],
) -> Result<StepVerdict, GraphicError> {
    let [first, second] = parallels;
    let adjacency = match adjacent_parallels(state, first, second)? {
        Ok(adjacency) => adjacency,
        Err(obstruction) => return Ok(StepVerdict::NotGraphic(obstruction)),
    };
    let mut splits = [adjacency.common; 2];
    for (i, (element, other)) in [
        (first, adjacency.first_other),
        (second, adjacency.second_other),
    ]
    .into_iter()
    .enumerate()
    {
        let edge = state.edge_of(element);
        let split = state.add_node();
        state.rewire_edge(edge, other, split)?;
        let new_row = state.add_edge(split, adjacency.common);
        state.push_row_edge(new_row);
        trace!(%element, ?split, "subdivided");
        splits[i] = split;
    }
    let new_column = state.add_edge(splits[0], splits[1]);
    state.push_column_edge(new_column);
    Ok(StepVerdict::Graphic)
}

/// One new row and two new columns.
pub fn extend_two_columns(
    state: &mut WitnessState,
    parallels: [Element; 2],
) -> Result<StepVerdict, GraphicError> {
    let [first, second] = parallels;
    let adjacency = match adjacent_parallels(state, first, second)? {
        Ok(adjacency) => adjacency,
        Err(obstruction) => return Ok(StepVerdict::NotGraphic(obstruction)),
    };
    let node = state.add_node();
    let first_column = state.add_edge(adjacency.first_other, node);
    let second_column = state.add_edge(adjacency.second_other, node);
    let new_row = state.add_edge(adjacency.common, node);
    state.push_column_edge(first_column);
    state.push_column_edge(second_column);
    state.push_row_edge(new_row);
    Ok(StepVerdict::Graphic)
}
