//! Subcommands and the comparison pipeline they share

pub mod csv;
pub mod sqlite;

use crate::render::{self, OutputOptions};
use crate::report::build_report;
use clap::Args;
use merklediff_core::core_types::ComparisonContext;
use merklediff_core::{
    build_from_reader, build_from_rows, collect_rows, compare, ExError, MerkleDiffError,
    MerkleTree, Row, RowSource, Schema,
};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

/// Output flags accepted by every subcommand
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output as JSON (for pipelines)
    #[arg(short, long)]
    pub json: bool,

    /// Write results to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Limit number of changes shown (0 = no limit)
    #[arg(short, long, default_value_t = 20)]
    pub limit: usize,

    /// Only output the summary line
    #[arg(short, long)]
    pub quiet: bool,

    /// Show tree details
    #[arg(short, long)]
    pub verbose: bool,

    /// Always exit 0 when the comparison completes
    #[arg(long)]
    pub exit_zero: bool,

    /// Report raw differing key ranges instead of resolved rows
    #[arg(long)]
    pub ranges: bool,
}

impl OutputArgs {
    pub fn options(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            output: self.output.clone(),
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            exit_zero: self.exit_zero,
            ranges_only: self.ranges,
        }
    }
}

/// Result of a completed comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub identical: bool,
    pub exit_zero: bool,
}

/// One side of a comparison, after it has been read
struct Loaded {
    rows: Vec<Row>,
    schema: Schema,
}

/// Compare two opened sources and write the report
///
/// # Errors
///
/// Returns an `ExError` attributed to the failing side when a source fails,
/// or an I/O error when the report cannot be written.
pub fn run<A, B>(
    context: &ComparisonContext,
    mut left: A,
    mut right: B,
    options: &OutputOptions,
) -> Result<Outcome, ExError>
where
    A: RowSource,
    B: RowSource,
{
    let span = tracing::info_span!("comparison", comparison_id = %context.comparison_id);
    let _guard = span.enter();
    tracing::info!(
        left = %context.left_label,
        right = %context.right_label,
        ranges_only = options.ranges_only,
        "comparison started"
    );

    let identical = if options.ranges_only {
        let tree_a = stream_tree(context, &context.left_label, &mut left)?;
        let tree_b = stream_tree(context, &context.right_label, &mut right)?;
        let ranges = compare(&tree_a, &tree_b).map_err(|e| attribute(context, None, e))?;

        write_output(context, options, |out| {
            render::render_ranges(out, context, &ranges, options)
        })?;
        ranges.is_empty()
    } else {
        let side_a = load(context, &context.left_label, &mut left)?;
        let side_b = load(context, &context.right_label, &mut right)?;

        let tree_a = build_from_rows(&side_a.rows);
        let tree_b = build_from_rows(&side_b.rows);
        let ranges = compare(&tree_a, &tree_b).map_err(|e| attribute(context, None, e))?;

        // Column names come from the left side unless it reported none
        let schema = if side_a.schema.columns.is_empty() {
            &side_b.schema
        } else {
            &side_a.schema
        };
        let report = build_report(context, &side_a.rows, &side_b.rows, schema, &ranges);

        write_output(context, options, |out| {
            render::render_report(out, &report, (&tree_a, &tree_b), options)
        })?;
        report.identical
    };

    tracing::info!(identical, "comparison finished");
    Ok(Outcome {
        identical,
        exit_zero: options.exit_zero,
    })
}

/// Read every row of a source and order it by key bytes.
///
/// Report resolution looks keys up by byte order, so a source's own order
/// (numeric `ORDER BY id`, say) is not trusted even when it declares one.
fn load<S: RowSource>(
    context: &ComparisonContext,
    label: &str,
    source: &mut S,
) -> Result<Loaded, ExError> {
    let mut rows = collect_rows(source).map_err(|e| attribute(context, Some(label), e))?;
    if source.is_sorted() {
        tracing::debug!(source = label, "re-sorting declared order by key bytes");
    }
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    let schema = source.schema().clone();
    source
        .close()
        .map_err(|e| attribute(context, Some(label), e))?;

    tracing::debug!(source = label, row_count = rows.len(), "source loaded");
    Ok(Loaded { rows, schema })
}

/// Build a tree straight from the source, in source order
fn stream_tree<S: RowSource>(
    context: &ComparisonContext,
    label: &str,
    source: &mut S,
) -> Result<MerkleTree, ExError> {
    let tree = build_from_reader(source).map_err(|e| attribute(context, Some(label), e))?;
    source
        .close()
        .map_err(|e| attribute(context, Some(label), e))?;
    Ok(tree)
}

fn write_output<F>(
    context: &ComparisonContext,
    options: &OutputOptions,
    write: F,
) -> Result<(), ExError>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let result = match &options.output {
        Some(path) => {
            let mut file = File::create(path)
                .map_err(|e| attribute(context, None, MerkleDiffError::io("create output", &e)))?;
            write(&mut file).and_then(|()| file.flush())
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write(&mut lock).and_then(|()| lock.flush())
        }
    };
    result.map_err(|e| attribute(context, None, MerkleDiffError::io("write report", &e)))?;

    if let Some(path) = &options.output {
        if !options.json && !options.quiet {
            println!("Results written to: {}", path.display());
        }
    }
    Ok(())
}

/// Tag an error with the side it came from and the comparison it belongs to
pub(crate) fn attribute(
    context: &ComparisonContext,
    label: Option<&str>,
    err: MerkleDiffError,
) -> ExError {
    let ex = ExError::from(err).with_comparison_id(context.comparison_id.clone());
    match label {
        Some(label) => ex.with_source_name(label),
        None => ex,
    }
}
