//! CLI module for labelkit
//!
//! Provides command-line interface for:
//! - validate: check feature schema identity and format
//! - resolve: assign schema ids to label records from an ontology file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{resolve, resolve_labels, run, run_command, validate, validate_features};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, write_error, write_response};
