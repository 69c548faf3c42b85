//! merklediff CLI
//!
//! Compares two delimited files or two SQLite tables/queries with hash trees
//! and reports added, removed and changed rows.

use clap::{Parser, Subcommand, ValueEnum};
use merklediff_core::logging_facility::{self, Profile};

mod commands;
mod render;
mod report;

#[derive(Debug, Parser)]
#[command(name = "merklediff", version)]
#[command(about = "Compare keyed datasets using Merkle tree diff", long_about = None)]
struct Cli {
    /// Log output format (logs go to stderr)
    #[arg(long, value_enum, global = true, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two delimited text files
    Csv(commands::csv::CsvArgs),
    /// Compare two SQLite tables or queries
    Sqlite(commands::sqlite::SqliteArgs),
}

/// Exit code when the inputs differ
const EXIT_DIFFERENT: i32 = 1;
/// Exit code for any failure
const EXIT_ERROR: i32 = 2;

fn main() {
    let cli = Cli::parse();

    logging_facility::init(match cli.log_format {
        LogFormat::Text => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Csv(args) => commands::csv::execute(args),
        Commands::Sqlite(args) => commands::sqlite::execute(args),
    };

    match result {
        Ok(outcome) if outcome.identical || outcome.exit_zero => {}
        Ok(_) => std::process::exit(EXIT_DIFFERENT),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_ERROR);
        }
    }
}
