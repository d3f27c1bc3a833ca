use crate::cli::LogLevel;
use seqgraphic_kernel::{GraphicCase, WitnessEdge};
use std::path::Path;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log to stderr so that stdout stays machine readable.
pub fn init_logging(level: Option<LogLevel>) {
    let filter = match level {
        Some(level) => EnvFilter::from_default_env().add_directive(Level::from(level).into()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn load_case_or_exit(path: &Path) -> GraphicCase {
    GraphicCase::load(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn exit_with(error: impl std::fmt::Display) -> ! {
    eprintln!("error: {error}");
    std::process::exit(1);
}

pub fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => exit_with(e),
    }
}

pub fn print_edges(edges: &[WitnessEdge]) {
    for edge in edges {
        let element = edge
            .element
            .map_or_else(|| "-".to_owned(), |element| element.to_string());
        println!("    e{:<3} {:>3} -- {:<3} {element}", edge.edge, edge.u, edge.v);
    }
}
