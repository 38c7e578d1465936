//! Line parser for `go test -bench` output.
//!
//! A result line looks like:
//!
//! ```text
//! BenchmarkSign2_Decred-10    795    1550968 ns/op    5013 B/op    84 allocs/op
//! ```
//!
//! Field 0 is a composite name encoding operation + ring size + backend; the
//! trailing `-10` is the GOMAXPROCS suffix and carries no meaning here.
//! Fields 1/2 are the iteration count and time per op; the memory and alloc
//! columns only appear when the harness ran with `-benchmem`.
//!
//! The harness may also announce the backend out of band with a marker line
//! (`# backend: Decred`), after which unlabeled names such as
//! `BenchmarkSign2-10` inherit the tracked backend until the next marker. A
//! backend embedded in the name always wins over the tracked one.

use once_cell::sync::Lazy;
use regex::Regex;

static LABELED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Benchmark([A-Za-z]+?)(\d+)_([A-Za-z0-9]+)-\d+$").unwrap());

static UNLABELED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Benchmark([A-Za-z]+?)(\d+)-\d+$").unwrap());

static BACKEND_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s*backend\s*[:=]\s*([A-Za-z0-9_]+)").unwrap());

/// Time-unit suffixes a result line may carry. All values are normalized to
/// nanoseconds before storage.
const TIME_UNITS: [(&str, f64); 4] = [
    ("ns/op", 1.0),
    ("µs/op", 1_000.0),
    ("us/op", 1_000.0),
    ("ms/op", 1_000_000.0),
];

/// The benchmarked action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    Sign,
    Verify,
}

impl Operation {
    /// Fixed report order: signing first, then verification.
    pub const ALL: [Operation; 2] = [Operation::Sign, Operation::Verify];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Sign => "Sign",
            Operation::Verify => "Verify",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "Sign" => Some(Operation::Sign),
            "Verify" => Some(Operation::Verify),
            _ => None,
        }
    }
}

/// One parsed benchmark measurement. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub operation: Operation,
    pub ring_size: u64,
    pub backend: String,
    /// Time per operation, normalized to nanoseconds.
    pub ns_per_op: f64,
    /// Bytes allocated per operation (`-benchmem` column).
    pub bytes_per_op: Option<f64>,
    /// Heap allocations per operation (`-benchmem` column).
    pub allocs_per_op: Option<u64>,
    pub iterations: u64,
}

/// Stateful line parser.
///
/// The only state is the backend announced by the most recent marker line,
/// threaded through the line-processing loop so unlabeled result lines can be
/// attributed.
#[derive(Debug, Default)]
pub struct LineParser {
    current_backend: Option<String>,
}

impl LineParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a tracked backend already set, as if a marker line had been
    /// seen. Used when the harness is invoked per backend and its output may
    /// omit the backend label from benchmark names.
    pub fn with_backend(backend: impl Into<String>) -> Self {
        Self {
            current_backend: Some(backend.into()),
        }
    }

    /// Feed one line of harness output.
    ///
    /// Returns a record for result lines that match the grammar. Marker lines
    /// update the tracked backend and yield nothing. Everything else — log
    /// lines, short lines, malformed numerics — is skipped without error.
    pub fn feed(&mut self, line: &str) -> Option<Record> {
        let line = line.trim();

        if let Some(cap) = BACKEND_MARKER.captures(line) {
            self.current_backend = Some(cap[1].to_string());
            return None;
        }

        if !line.starts_with("Benchmark")
            || !TIME_UNITS.iter().any(|(unit, _)| line.contains(unit))
        {
            return None;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return None;
        }

        let (operation, ring_size, labeled) = decode_name(fields[0])?;
        let backend = match labeled {
            Some(name) => name,
            None => self.current_backend.clone()?,
        };

        let iterations: u64 = fields[1].parse().ok()?;
        if iterations == 0 {
            return None;
        }

        let raw_time: f64 = fields[2].parse().ok()?;
        let factor = unit_factor(fields[3])?;
        let ns_per_op = raw_time * factor;
        if !ns_per_op.is_finite() || ns_per_op < 0.0 {
            return None;
        }

        let bytes_per_op = if fields.len() >= 6 {
            if fields[5] != "B/op" {
                return None;
            }
            Some(fields[4].parse::<f64>().ok()?)
        } else {
            None
        };

        let allocs_per_op = if fields.len() >= 8 {
            if fields[7] != "allocs/op" {
                return None;
            }
            Some(fields[6].parse::<u64>().ok()?)
        } else {
            None
        };

        Some(Record {
            operation,
            ring_size,
            backend,
            ns_per_op,
            bytes_per_op,
            allocs_per_op,
            iterations,
        })
    }
}

/// Decode a composite benchmark name into (operation, ring size, backend).
///
/// The backend is `None` for unlabeled names (`BenchmarkSign2-10`); the
/// caller resolves those against the tracked backend.
fn decode_name(name: &str) -> Option<(Operation, u64, Option<String>)> {
    if let Some(cap) = LABELED_NAME.captures(name) {
        let operation = Operation::from_token(&cap[1])?;
        let ring_size: u64 = cap[2].parse().ok()?;
        if ring_size == 0 {
            return None;
        }
        return Some((operation, ring_size, Some(cap[3].to_string())));
    }

    let cap = UNLABELED_NAME.captures(name)?;
    let operation = Operation::from_token(&cap[1])?;
    let ring_size: u64 = cap[2].parse().ok()?;
    if ring_size == 0 {
        return None;
    }
    Some((operation, ring_size, None))
}

fn unit_factor(token: &str) -> Option<f64> {
    TIME_UNITS
        .iter()
        .find(|(unit, _)| *unit == token)
        .map(|(_, factor)| *factor)
}
