//! Witness graph for the first minor, which has the nonzero pattern of a
//! wheel.
//!
//! Every line of the `size × size` prefix has two nonzeros, except that one
//! row and one column may have three. Walking row → column → row around the
//! rim yields one rim node, one rim edge and one spoke per row.

use crate::error::GraphicError;
use crate::matrix::SparseMatrix;
use crate::state::WitnessState;
use petgraph::stable_graph::EdgeIndex;
use tracing::{debug, trace};

/// The unique line with three nonzeros in the prefix, if any.
fn line_with_three(
    matrix: &SparseMatrix,
    size: usize,
    kind: &str,
) -> Result<Option<usize>, GraphicError> {
    let mut found = None;
    for line in 0..size {
        match matrix.row_prefix(line, size).len() {
            2 => {}
            3 if found.is_none() => found = Some(line),
            3 => {
                return Err(GraphicError::NotAWheel(format!(
                    "{kind}s {} and {} both have three nonzeros",
                    found.map_or(0, |f| f + 1),
                    line + 1
                )));
            }
            count => {
                return Err(GraphicError::NotAWheel(format!(
                    "{kind} {} has {count} nonzeros, expected 2 or 3",
                    line + 1
                )));
            }
        }
    }
    Ok(found)
}

/// First nonzero of `line` below `size` other than the skipped partners.
fn next_partner(
    matrix: &SparseMatrix,
    line: usize,
    size: usize,
    previous: usize,
    avoid: Option<usize>,
) -> Option<usize> {
    matrix
        .row_prefix(line, size)
        .iter()
        .copied()
        .find(|&partner| partner != previous && Some(partner) != avoid)
}

/// Build the wheel for the leading `size × size` submatrix.
pub fn build_wheel(
    matrix: &SparseMatrix,
    transpose: &SparseMatrix,
    size: usize,
) -> Result<WitnessState, GraphicError> {
    if size < 3 || size > matrix.num_rows() || size > matrix.num_columns() {
        return Err(GraphicError::NotAWheel(format!(
            "size {size} does not fit a {}x{} matrix with wheels of size at least 3",
            matrix.num_rows(),
            matrix.num_columns()
        )));
    }
    let row_with_three = line_with_three(matrix, size, "row")?;
    let column_with_three = line_with_three(transpose, size, "column")?;
    if row_with_three.is_some() != column_with_three.is_some() {
        return Err(GraphicError::NotAWheel(
            "a line with three nonzeros needs a partner of the other kind".to_owned(),
        ));
    }
    debug!(size, ?row_with_three, ?column_with_three, "building wheel");

    let mut state = WitnessState::with_capacity(matrix.num_rows(), matrix.num_columns())?;
    let mut row_edges: Vec<Option<EdgeIndex>> = vec![None; size];
    let mut column_edges: Vec<Option<EdgeIndex>> = vec![None; size];

    let center = state.add_node();
    let first_rim = state.add_node();
    let mut last_rim = first_rim;
    let mut last_row = 0;
    let mut last_column = matrix.row_prefix(0, size)[0];
    let mut closed = false;

    for _ in 0..size {
        let column_avoid = column_with_three.filter(|_| Some(last_row) == row_with_three);
        let next_column = next_partner(matrix, last_row, size, last_column, column_avoid)
            .ok_or_else(|| {
                GraphicError::NotAWheel(format!("row {} has no way forward", last_row + 1))
            })?;
        let row_avoid = row_with_three.filter(|_| Some(next_column) == column_with_three);
        let next_row = next_partner(transpose, next_column, size, last_row, row_avoid)
            .ok_or_else(|| {
                GraphicError::NotAWheel(format!("column {} has no way forward", next_column + 1))
            })?;

        let next_rim = if next_row == 0 {
            first_rim
        } else {
            state.add_node()
        };
        let rim = state.add_edge(last_rim, next_rim);
        let spoke = state.add_edge(center, next_rim);
        trace!(row = last_row, column = last_column, ?rim, ?spoke, "wheel segment");

        let spoke_for_column = row_with_three
            .is_some_and(|three| last_row != three && next_row != three);
        let (row_edge, column_edge) = if spoke_for_column {
            (rim, spoke)
        } else {
            (spoke, rim)
        };
        if row_edges[last_row].replace(row_edge).is_some()
            || column_edges[last_column].replace(column_edge).is_some()
        {
            return Err(GraphicError::NotAWheel(format!(
                "walk visits row {} or column {} twice",
                last_row + 1,
                last_column + 1
            )));
        }

        last_rim = next_rim;
        last_row = next_row;
        last_column = next_column;
        if next_row == 0 {
            closed = true;
            break;
        }
    }

    let collect = |edges: Vec<Option<EdgeIndex>>, kind: &str| {
        edges
            .into_iter()
            .enumerate()
            .map(|(line, edge)| {
                edge.ok_or_else(|| {
                    GraphicError::NotAWheel(format!("{kind} {} is not on the rim walk", line + 1))
                })
            })
            .collect::<Result<Vec<_>, _>>()
    };
    if !closed {
        return Err(GraphicError::NotAWheel(format!(
            "rim walk does not close within {size} steps"
        )));
    }
    for edge in collect(row_edges, "row")? {
        state.push_row_edge(edge);
    }
    for edge in collect(column_edges, "column")? {
        state.push_column_edge(edge);
    }
    Ok(state)
}
