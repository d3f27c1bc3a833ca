//! Seqgraphic CLI: the `seqgraphic` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_logging(cli.log_level);

    match cli.command {
        Commands::Check {
            case,
            certify,
            json,
        } => commands::check::run(case, certify, json),

        Commands::Wheel { case, json } => commands::wheel::run(case, json),
    }
}
