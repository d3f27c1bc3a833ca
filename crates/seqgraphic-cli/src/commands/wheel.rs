use crate::support::{exit_with, load_case_or_exit, print_edges, print_json};
use seqgraphic_kernel::{Element, Witness, build_wheel};
use serde_json::json;
use std::path::PathBuf;

pub fn run(case_path: PathBuf, json_output: bool) {
    let case = load_case_or_exit(&case_path);
    let matrix = case.matrix.to_matrix().unwrap_or_else(|e| exit_with(e));
    let sequence = case.sequence().unwrap_or_else(|e| exit_with(e));
    let size = sequence.first().rows;
    let state = build_wheel(&matrix, &matrix.transpose(), size).unwrap_or_else(|e| exit_with(e));

    let row_elements = case
        .row_elements
        .clone()
        .unwrap_or_else(|| Element::rows(size));
    let column_elements = case
        .column_elements
        .clone()
        .unwrap_or_else(|| Element::columns(size));
    let witness = Witness::from_state(state, &row_elements, &column_elements);
    let edges = witness.edges();

    if json_output {
        print_json(&json!({
            "size": size,
            "nodes": witness.graph().node_count(),
            "witnessDigest": witness.digest(),
            "edges": edges,
        }));
        return;
    }

    println!("seqgraphic wheel {}", case_path.display());
    println!("  Size: {size}");
    println!("  Nodes: {}", witness.graph().node_count());
    println!("  Witness digest: {}", witness.digest());
    println!("  Edges:");
    print_edges(&edges);
}
