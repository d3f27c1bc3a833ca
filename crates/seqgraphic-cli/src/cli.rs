use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "seqgraphic",
    about = "Seqgraphic: certify graphicness along a sequence of nested minors",
    version
)]
pub struct Cli {
    /// Log verbosity (default: RUST_LOG, else warn)
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a case's minor sequence and report the first non-graphic step
    Check {
        /// Path to a case JSON file
        case: PathBuf,

        /// Re-verify the witness after every step
        #[arg(long)]
        certify: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build only the wheel for the case's first minor
    Wheel {
        /// Path to a case JSON file
        case: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}
