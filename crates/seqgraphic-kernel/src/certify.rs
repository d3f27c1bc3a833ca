//! Independent check of a witness against the processed part of the matrix.

use crate::error::{Invariant, Violation};
use crate::matrix::SparseMatrix;
use crate::state::WitnessState;
use crate::traverse::{edge_mask, find_tree_parents};
use petgraph::visit::EdgeIndexable;

/// All violations of the tree, cotree and fundamental-cycle invariants for
/// the rows and columns recorded in `state`.
///
/// `transpose` is the transpose of the full matrix; only rows below
/// `state.num_rows()` are consulted.
pub fn certify_witness(state: &WitnessState, transpose: &SparseMatrix) -> Vec<Violation> {
    let graph = state.graph();
    let mut violations = Vec::new();

    // Which line owns each edge; an edge owned twice is reported once.
    let mut owner: Vec<Option<(bool, usize)>> = vec![None; graph.edge_bound()];
    let lines = state
        .row_edges()
        .iter()
        .enumerate()
        .map(|(r, &e)| (true, r, e))
        .chain(
            state
                .column_edges()
                .iter()
                .enumerate()
                .map(|(c, &e)| (false, c, e)),
        );
    for (is_row, line, edge) in lines {
        let name = if is_row { "row" } else { "column" };
        let invariant = if is_row {
            Invariant::Tree
        } else {
            Invariant::Cotree
        };
        if graph.edge_endpoints(edge).is_none() {
            violations.push(Violation::new(
                invariant,
                format!("{name} {} maps to missing edge e{}", line + 1, edge.index()),
            ));
            continue;
        }
        if owner[edge.index()].replace((is_row, line)).is_some() {
            violations.push(Violation::new(
                Invariant::Cotree,
                format!("edge e{} belongs to more than one line", edge.index()),
            ));
        }
    }
    for edge in graph.edge_indices() {
        if owner[edge.index()].is_none() {
            violations.push(Violation::new(
                Invariant::Cotree,
                format!("edge e{} belongs to no line", edge.index()),
            ));
        }
    }

    let nodes = graph.node_count();
    if state.num_rows() + 1 != nodes {
        violations.push(Violation::new(
            Invariant::Tree,
            format!("{} row edges cannot span {nodes} nodes", state.num_rows()),
        ));
    }
    let is_row = edge_mask(graph, state.row_edges().iter().copied().filter(|&e| {
        graph.edge_endpoints(e).is_some()
    }));
    let parents = find_tree_parents(graph, |e| is_row[e.index()]);
    if parents.reached() != nodes {
        violations.push(Violation::new(
            Invariant::Tree,
            format!("row edges reach {} of {nodes} nodes", parents.reached()),
        ));
    }
    if !violations.is_empty() {
        return violations;
    }

    for (column, &edge) in state.column_edges().iter().enumerate() {
        let expected = transpose.row_prefix(column, state.num_rows());
        let Some((u, v)) = graph.edge_endpoints(edge) else {
            continue;
        };
        let Some(path) = parents.path(u, v) else {
            violations.push(Violation::new(
                Invariant::FundamentalCycle,
                format!("column {} joins disconnected nodes", column + 1),
            ));
            continue;
        };
        let mut rows: Vec<usize> = parents
            .path_edges(&path)
            .into_iter()
            .filter_map(|e| match owner[e.index()] {
                Some((true, row)) => Some(row),
                _ => None,
            })
            .collect();
        rows.sort_unstable();
        if rows != expected {
            violations.push(Violation::new(
                Invariant::FundamentalCycle,
                format!(
                    "column {} closes a cycle through rows {:?}, expected {:?}",
                    column + 1,
                    one_based(&rows),
                    one_based(expected)
                ),
            ));
        }
    }
    violations
}

fn one_based(lines: &[usize]) -> Vec<usize> {
    lines.iter().map(|l| l + 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::wheel::build_wheel;

    fn wheel() -> (WitnessState, SparseMatrix) {
        let m = SparseMatrix::from_dense(&[vec![1, 1, 0], vec![1, 1, 1], vec![0, 1, 1]]).unwrap();
        let t = m.transpose();
        (build_wheel(&m, &t, 3).unwrap(), t)
    }

    #[test]
    fn wheels_are_valid_witnesses() {
        let (state, t) = wheel();
        assert!(certify_witness(&state, &t).is_empty());

        let m = SparseMatrix::from_dense(&[vec![1, 1, 0], vec![1, 0, 1], vec![0, 1, 1]]).unwrap();
        let t = m.transpose();
        assert!(certify_witness(&build_wheel(&m, &t, 3).unwrap(), &t).is_empty());
    }

    #[test]
    fn wrong_support_breaks_fundamental_cycle() {
        let (state, _) = wheel();
        // Same wheel checked against a matrix whose c2 misses r2.
        let other = SparseMatrix::from_dense(&[vec![1, 1, 0], vec![1, 0, 1], vec![0, 1, 1]])
            .unwrap()
            .transpose();
        let violations = certify_witness(&state, &other);
        assert!(!violations.is_empty());
        assert!(violations
            .iter()
            .all(|v| v.invariant == Invariant::FundamentalCycle));
    }

    #[test]
    fn swapped_roles_break_the_tree() {
        let (mut state, t) = wheel();
        let row = state.edge_of(Element::Row(0));
        let column = state.edge_of(Element::Column(0));
        state.row_edges[0] = column;
        state.column_edges[0] = row;
        let violations = certify_witness(&state, &t);
        assert!(!violations.is_empty());
    }

    #[test]
    fn stray_edge_is_reported() {
        let (mut state, t) = wheel();
        let a = state.add_node();
        let b = state.add_node();
        state.add_edge(a, b);
        let violations = certify_witness(&state, &t);
        assert!(violations.iter().any(|v| v.invariant == Invariant::Cotree));
        assert!(violations.iter().any(|v| v.invariant == Invariant::Tree));
    }
}
