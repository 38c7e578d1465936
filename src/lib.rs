use clap::ValueEnum;

pub mod parse;
pub mod report;
pub mod runner;
pub mod table;

/// Report layout to render once aggregation is complete.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum ReportMode {
    /// Baseline vs. candidate comparison with improvement percentages.
    #[default]
    Compare,
    /// Ranked per-backend listing with time/memory/allocation figures.
    Full,
}

/// Errors surfaced to the driver.
///
/// Non-matching input lines are not errors; the parser skips them silently,
/// since benchmark output interleaves result lines with log lines.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Nothing on the input matched the benchmark line grammar.
    #[error("no benchmark data found")]
    NoData,

    /// The harness did not finish within the allotted time. Recoverable:
    /// the report proceeds without that backend's data.
    #[error("benchmark harness timed out after {timeout_secs}s for backend {backend}")]
    HarnessTimeout { backend: String, timeout_secs: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
