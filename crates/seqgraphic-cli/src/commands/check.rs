use crate::support::{exit_with, load_case_or_exit, print_edges, print_json};
use seqgraphic_kernel::SequenceOptions;
use std::path::PathBuf;

pub fn run(case_path: PathBuf, certify: bool, json_output: bool) {
    let case = load_case_or_exit(&case_path);
    let options = SequenceOptions {
        certify_steps: certify || case.options.certify_steps,
    };
    let outcome = case.run_with(&options).unwrap_or_else(|e| exit_with(e));
    let report = outcome.report(true);

    if json_output {
        print_json(&report);
        return;
    }

    println!("seqgraphic check {}", case_path.display());
    println!("  Minors: {}", report.minors);
    println!("  Graphic: {}", if report.graphic { "yes" } else { "no" });
    println!("  Last graphic minor: {}", report.last_graphic_minor);
    if let Some(failure) = &report.failure {
        println!(
            "  Stopped at minor {} ({}): {}: {}",
            failure.step,
            failure.boundary,
            failure.obstruction.class(),
            failure.obstruction
        );
    }
    if let Some(nodes) = report.nodes {
        println!("  Nodes: {nodes}");
    }
    if let Some(digest) = &report.witness_digest {
        println!("  Witness digest: {digest}");
    }
    if let Some(edges) = &report.edges {
        println!("  Edges:");
        print_edges(edges);
    }
}
