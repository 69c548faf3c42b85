//! CSV comparison command
//!
//! Usage: merklediff csv <FILE_A> <FILE_B> [--key 0,1] [--delimiter ,]

use super::{attribute, run, OutputArgs, Outcome};
use clap::Args;
use merklediff_core::core_types::ComparisonContext;
use merklediff_core::{ExError, MerkleDiffError};
use merklediff_sources::{CsvConfig, CsvSource};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CsvArgs {
    /// Baseline file
    pub file_a: PathBuf,

    /// File compared against the baseline
    pub file_b: PathBuf,

    /// Column indices forming the row key (0-indexed)
    #[arg(short, long, value_delimiter = ',', default_value = "0")]
    pub key: Vec<usize>,

    /// Field delimiter (single ASCII character)
    #[arg(short, long, default_value_t = ',')]
    pub delimiter: char,

    /// Treat the first record as data; columns are named col0, col1, ...
    #[arg(long)]
    pub no_header: bool,

    /// Both files are already ordered by key
    #[arg(long)]
    pub sorted: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl CsvArgs {
    fn config(&self) -> Result<CsvConfig, MerkleDiffError> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| MerkleDiffError::InvalidInput {
                reason: format!("delimiter '{}' is not a single ASCII character", self.delimiter),
            })?;

        Ok(CsvConfig {
            key_columns: self.key.clone(),
            delimiter,
            has_header: !self.no_header,
            is_sorted: self.sorted,
        })
    }
}

/// Execute the csv command
pub fn execute(args: CsvArgs) -> Result<Outcome, ExError> {
    let context = ComparisonContext::new(
        args.file_a.display().to_string(),
        args.file_b.display().to_string(),
    );
    let config = args.config().map_err(|e| attribute(&context, None, e))?;

    let left = CsvSource::open(&args.file_a, config.clone())
        .map_err(|e| attribute(&context, Some(&context.left_label), e))?;
    let right = CsvSource::open(&args.file_b, config)
        .map_err(|e| attribute(&context, Some(&context.right_label), e))?;

    run(&context, left, right, &args.output.options())
}
