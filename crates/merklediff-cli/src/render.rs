//! Text and JSON rendering of comparison results

use crate::report::{Change, Report, Summary};
use merklediff_core::core_types::ComparisonContext;
use merklediff_core::hasher::short_hex;
use merklediff_core::{DiffKind, DiffStats, KeyRange, MerkleTree, Value};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

const RULE: &str = "───────────────────────────────────────────────────────────────";

/// Output configuration collected from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    pub json: bool,
    pub output: Option<PathBuf>,
    /// Maximum changes listed in text mode; 0 lists all
    pub limit: usize,
    pub quiet: bool,
    pub verbose: bool,
    pub exit_zero: bool,
    pub ranges_only: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            json: false,
            output: None,
            limit: 20,
            quiet: false,
            verbose: false,
            exit_zero: false,
            ranges_only: false,
        }
    }
}

/// Write a resolved report
pub fn render_report(
    out: &mut dyn Write,
    report: &Report,
    trees: (&MerkleTree, &MerkleTree),
    options: &OutputOptions,
) -> io::Result<()> {
    if options.json {
        serde_json::to_writer_pretty(&mut *out, report)?;
        return writeln!(out);
    }
    if options.quiet {
        return if report.identical {
            writeln!(out, "identical")
        } else {
            writeln!(out, "{}", summary_line(&report.summary))
        };
    }

    writeln!(out)?;
    writeln!(out, "  Source A: {} ({} rows)", report.source_a, report.rows_a)?;
    writeln!(out, "  Source B: {} ({} rows)", report.source_b, report.rows_b)?;

    heading(out, "Detected Schema")?;
    for column in &report.schema {
        writeln!(out, "  {:<20} {}", column.name, column.column_type)?;
    }

    if options.verbose {
        heading(out, "Merkle Tree Details")?;
        tree_line(out, "A", trees.0)?;
        tree_line(out, "B", trees.1)?;
    }

    heading(out, "Changes")?;
    if report.identical {
        writeln!(out, "\n  Sources are identical")?;
    } else {
        let shown = match options.limit {
            0 => report.changes.len(),
            limit => limit.min(report.changes.len()),
        };
        for (i, change) in report.changes.iter().take(shown).enumerate() {
            change_block(out, i + 1, change)?;
        }
        if shown < report.changes.len() {
            writeln!(
                out,
                "\n  ... and {} more changes (use --output to write all to file)",
                report.changes.len() - shown
            )?;
        }
    }

    writeln!(out, "\n{}", RULE)?;
    writeln!(out, "  Summary: {}", summary_line(&report.summary))?;
    writeln!(out, "{}", RULE)
}

#[derive(Serialize)]
struct RangeView {
    #[serde(rename = "type")]
    kind: DiffKind,
    start: String,
    end: String,
}

#[derive(Serialize)]
struct RangesDocument<'a> {
    comparison_id: String,
    source_a: &'a str,
    source_b: &'a str,
    identical: bool,
    ranges: Vec<RangeView>,
    summary: DiffStats,
}

/// Write raw key ranges
pub fn render_ranges(
    out: &mut dyn Write,
    context: &ComparisonContext,
    ranges: &[KeyRange],
    options: &OutputOptions,
) -> io::Result<()> {
    let stats = DiffStats::from_ranges(ranges);

    if options.json {
        let document = RangesDocument {
            comparison_id: context.comparison_id.to_string(),
            source_a: &context.left_label,
            source_b: &context.right_label,
            identical: ranges.is_empty(),
            ranges: ranges
                .iter()
                .map(|r| RangeView {
                    kind: r.kind,
                    start: r.start_lossy(),
                    end: r.end_lossy(),
                })
                .collect(),
            summary: stats,
        };
        serde_json::to_writer_pretty(&mut *out, &document)?;
        return writeln!(out);
    }

    let line = format!(
        "{} ranges: {} added, {} removed, {} changed",
        stats.total(),
        stats.added,
        stats.removed,
        stats.changed
    );
    if options.quiet {
        return if ranges.is_empty() {
            writeln!(out, "identical")
        } else {
            writeln!(out, "{}", line)
        };
    }

    writeln!(out)?;
    writeln!(out, "  Source A: {}", context.left_label)?;
    writeln!(out, "  Source B: {}", context.right_label)?;
    heading(out, "Differing Key Ranges")?;
    if ranges.is_empty() {
        writeln!(out, "\n  Sources are identical")?;
    }
    for range in ranges {
        writeln!(
            out,
            "  {:<8} {:?} --> {:?}",
            range.kind.as_str().to_uppercase(),
            range.start_lossy(),
            range.end_lossy()
        )?;
    }
    writeln!(out, "\n{}", RULE)?;
    writeln!(out, "  Summary: {}", line)?;
    writeln!(out, "{}", RULE)
}

fn summary_line(summary: &Summary) -> String {
    format!(
        "{} added, {} removed, {} changed ({} total)",
        summary.added, summary.removed, summary.changed, summary.total
    )
}

fn heading(out: &mut dyn Write, title: &str) -> io::Result<()> {
    let rule = "─".repeat(title.chars().count() + 4);
    writeln!(out, "\n{}", rule)?;
    writeln!(out, "  {}", title)?;
    writeln!(out, "{}", rule)
}

fn tree_line(out: &mut dyn Write, label: &str, tree: &MerkleTree) -> io::Result<()> {
    match tree.root() {
        Some(root) => writeln!(
            out,
            "  Tree {}: {}... (keys {} --> {}, {} leaves, height {})",
            label,
            short_hex(root.hash()),
            String::from_utf8_lossy(root.start_key()),
            String::from_utf8_lossy(root.end_key()),
            tree.leaf_count(),
            tree.height()
        ),
        None => writeln!(out, "  Tree {}: (empty)", label),
    }
}

fn change_block(out: &mut dyn Write, number: usize, change: &Change) -> io::Result<()> {
    let label = change.kind.as_str().to_uppercase();
    writeln!(out, "\n| Row: {} | {} key {:?}", number, label, change.key)?;
    match change.kind {
        DiffKind::Added | DiffKind::Removed => {
            writeln!(out, "      --> [{}]", join_values(&change.values))
        }
        DiffKind::Changed => {
            for (name, field) in &change.fields {
                writeln!(
                    out,
                    "      --> {}: From {} :: To {}",
                    name, field.from, field.to
                )?;
            }
            Ok(())
        }
    }
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
