//! Rendering of ranked comparison tables and improvement summaries.
//!
//! Operations always render in a fixed order (Sign, then Verify); within an
//! operation, ring sizes iterate ascending as derived from the table, so the
//! output is deterministic regardless of input order.

use std::fmt::Write as _;

use colored::{ColoredString, Colorize};

use crate::parse::Operation;
use crate::table::BenchTable;
use crate::ReportMode;

/// Relative time reduction of a candidate versus a baseline, in percent.
/// Positive means the candidate is faster. Undefined for a zero baseline.
pub fn improvement_pct(baseline_ns: f64, candidate_ns: f64) -> Option<f64> {
    if baseline_ns == 0.0 {
        return None;
    }
    Some((baseline_ns - candidate_ns) / baseline_ns * 100.0)
}

/// Format nanoseconds with threshold-based unit selection.
pub fn format_time(ns: f64) -> String {
    if ns >= 1_000_000.0 {
        format!("{:.1} ms", ns / 1_000_000.0)
    } else if ns >= 1_000.0 {
        format!("{:.1} µs", ns / 1_000.0)
    } else {
        format!("{ns:.0} ns")
    }
}

/// Format a byte count with threshold-based unit selection.
pub fn format_memory(bytes: f64) -> String {
    if bytes >= 1_048_576.0 {
        format!("{:.1} MB", bytes / 1_048_576.0)
    } else if bytes >= 1_024.0 {
        format!("{:.1} KB", bytes / 1_024.0)
    } else {
        format!("{bytes:.0} B")
    }
}

/// Format a generic count with K/M suffixes.
pub fn format_count(count: f64) -> String {
    if count >= 1_000_000.0 {
        format!("{:.1}M", count / 1_000_000.0)
    } else if count >= 1_000.0 {
        format!("{:.1}K", count / 1_000.0)
    } else {
        format!("{count:.0}")
    }
}

pub fn render(table: &BenchTable, mode: ReportMode, baseline: &str, candidate: &str) -> String {
    match mode {
        ReportMode::Compare => render_compare(table, baseline, candidate),
        ReportMode::Full => render_full(table),
    }
}

/// Condensed baseline-vs-candidate rows with an improvement percentage.
fn render_compare(table: &BenchTable, baseline: &str, candidate: &str) -> String {
    let mut out = String::new();

    for operation in Operation::ALL {
        let sizes = table.ring_sizes(operation);
        if sizes.is_empty() {
            continue;
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", section_header(operation));
        let _ = writeln!(
            out,
            "{}",
            format!(
                "{:<6} {:<15} {:<15} {:<12}",
                "Ring", baseline, candidate, "Improvement"
            )
            .bold()
        );
        let _ = writeln!(
            out,
            "{:<6} {:<15} {:<15} {:<12}",
            "----", "---------------", "---------------", "-----------"
        );

        for size in sizes {
            let base = table.get(operation, size, baseline);
            let cand = table.get(operation, size, candidate);
            if base.is_none() && cand.is_none() {
                // Size only present for some other backend; nothing to compare.
                continue;
            }

            let size_col = format!("{size:<6}").blue();
            let base_col = match base {
                Some(rec) => format!("{:<15}", format_time(rec.ns_per_op)).normal(),
                None => format!("{:<15}", "N/A").normal(),
            };
            let cand_col = match cand {
                Some(rec) => format!("{:<15}", format_time(rec.ns_per_op)).green(),
                None => format!("{:<15}", "N/A").normal(),
            };
            let improvement_col = match (base, cand) {
                (Some(b), Some(c)) => match improvement_pct(b.ns_per_op, c.ns_per_op) {
                    Some(pct) => paint_improvement(pct),
                    None => format!("{:<12}", "N/A").normal(),
                },
                _ => format!("{:<12}", "N/A").normal(),
            };

            let _ = writeln!(out, "{size_col} {base_col} {cand_col} {improvement_col}");
        }

        out.push('\n');
    }

    out
}

/// Full per-backend listing, ranked fastest-first within each group.
fn render_full(table: &BenchTable) -> String {
    let mut out = String::new();

    for operation in Operation::ALL {
        let sizes = table.ring_sizes(operation);
        if sizes.is_empty() {
            continue;
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", section_header(operation));

        for size in sizes {
            let ranked = table.ranked(operation, size);
            if ranked.is_empty() {
                continue;
            }

            let _ = writeln!(out, "{}", format!("  Ring size {size}:").blue().bold());
            for (rank, rec) in ranked.iter().enumerate() {
                let mut row = format!(
                    "    {} {:<12} {:>10}/op",
                    tier_marker(rank),
                    rec.backend,
                    format_time(rec.ns_per_op)
                );
                if let Some(bytes) = rec.bytes_per_op {
                    let _ = write!(row, "  {}/op", format_memory(bytes));
                }
                if let Some(allocs) = rec.allocs_per_op {
                    let _ = write!(row, "  {} allocs/op", format_count(allocs as f64));
                }
                let _ = write!(row, "  ({} iters)", format_count(rec.iterations as f64));

                if rank == 0 {
                    let _ = writeln!(out, "{}", row.green());
                } else {
                    let _ = writeln!(out, "{row}");
                }
            }
        }

        out.push('\n');
    }

    out
}

fn section_header(operation: Operation) -> ColoredString {
    format!(
        "🔍 {} PERFORMANCE (Ring Signatures):",
        operation.as_str().to_uppercase()
    )
    .cyan()
    .bold()
}

/// Decorative rank marker: medals for the podium, plain ordinals after.
fn tier_marker(rank: usize) -> String {
    match rank {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        n => format!("{}.", n + 1),
    }
}

/// Phrase and color an improvement percentage. A non-positive value reads as
/// "slower" rather than carrying a minus sign.
fn paint_improvement(pct: f64) -> ColoredString {
    let text = if pct > 0.0 {
        format!("{pct:.0}% faster")
    } else {
        format!("{:.0}% slower", pct.abs())
    };
    let padded = format!("{text:<12}");
    if pct >= 50.0 {
        padded.green()
    } else if pct >= 30.0 {
        padded.yellow()
    } else {
        padded.red()
    }
}
