//! SQLite comparison command
//!
//! Compares two tables or queries, in one database or across two.

use super::{attribute, run, OutputArgs, Outcome};
use clap::Args;
use merklediff_core::core_types::ComparisonContext;
use merklediff_core::ExError;
use merklediff_sources::{SqliteConfig, SqliteSource};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct SqliteArgs {
    /// Database file holding the baseline (and the target, without --db-b)
    #[arg(long)]
    pub db: PathBuf,

    /// Separate database file for the target side
    #[arg(long)]
    pub db_b: Option<PathBuf>,

    /// Baseline table
    #[arg(long, required_unless_present = "query_a", conflicts_with = "query_a")]
    pub table_a: Option<String>,

    /// Baseline query (alternative to --table-a)
    #[arg(long)]
    pub query_a: Option<String>,

    /// Target table
    #[arg(long, required_unless_present = "query_b", conflicts_with = "query_b")]
    pub table_b: Option<String>,

    /// Target query (alternative to --table-b)
    #[arg(long)]
    pub query_b: Option<String>,

    /// Key column names
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub key: Vec<String>,

    /// WHERE clause applied to both tables
    #[arg(long = "where")]
    pub where_clause: Option<String>,

    /// ORDER BY clause applied to both tables (defaults to the key columns)
    #[arg(long)]
    pub order_by: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl SqliteArgs {
    fn side(&self, path: &Path, table: &Option<String>, query: &Option<String>) -> SqliteConfig {
        // Exclusivity is enforced again when the source opens
        let mut config = SqliteConfig::table(path, String::new());
        config.table = table.clone();
        config.query = query.clone();
        config.key_columns = self.key.clone();
        config.where_clause = self.where_clause.clone();
        config.order_by = self.order_by.clone();
        config
    }

    fn configs(&self) -> (SqliteConfig, SqliteConfig) {
        let db_b = self.db_b.as_deref().unwrap_or(self.db.as_path());
        (
            self.side(&self.db, &self.table_a, &self.query_a),
            self.side(db_b, &self.table_b, &self.query_b),
        )
    }
}

/// Execute the sqlite command
pub fn execute(args: SqliteArgs) -> Result<Outcome, ExError> {
    let (config_a, config_b) = args.configs();
    let context = ComparisonContext::new(config_a.label(), config_b.label());

    let left = SqliteSource::open(&config_a)
        .map_err(|e| attribute(&context, Some(&context.left_label), e))?;
    let right = SqliteSource::open(&config_b)
        .map_err(|e| attribute(&context, Some(&context.right_label), e))?;

    run(&context, left, right, &args.output.options())
}
