//! CLI argument definitions using clap
//!
//! Commands:
//! - labelkit validate --input <path>
//! - labelkit resolve --labels <path> --ontology <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// labelkit - offline tools for labeling platform payloads
#[derive(Parser, Debug)]
#[command(name = "labelkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Only log errors
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a JSON array of feature schemas
    Validate {
        /// Path to the feature schema file
        #[arg(long)]
        input: PathBuf,
    },

    /// Assign schema ids to label records from an ontology
    Resolve {
        /// Path to a JSON array of label records
        #[arg(long)]
        labels: PathBuf,

        /// Path to the project's ontology JSON
        #[arg(long)]
        ontology: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
