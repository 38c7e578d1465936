//! Aggregation of parsed records, keyed by (operation, ring size, backend).

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::parse::{Operation, Record};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Key {
    operation: Operation,
    ring_size: u64,
    backend: String,
}

impl Key {
    fn of(record: &Record) -> Self {
        Self {
            operation: record.operation,
            ring_size: record.ring_size,
            backend: record.backend.clone(),
        }
    }
}

#[derive(Debug)]
struct Entry {
    /// Insertion sequence, so ranking ties can preserve input order.
    seq: u64,
    record: Record,
}

/// Benchmark results for one report, flat-keyed by the composite
/// (operation, ring size, backend) tuple.
///
/// Repeated inserts for the same key are last-write-wins; nothing is
/// averaged. The table is discarded after the report is printed.
#[derive(Debug, Default)]
pub struct BenchTable {
    entries: BTreeMap<Key, Entry>,
    next_seq: u64,
}

impl BenchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, overwriting any prior record at the same key.
    pub fn insert(&mut self, record: Record) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(Key::of(&record), Entry { seq, record });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Ring sizes present for an operation, ascending and deduplicated.
    pub fn ring_sizes(&self, operation: Operation) -> Vec<u64> {
        let mut sizes: Vec<u64> = self
            .entries
            .keys()
            .filter(|key| key.operation == operation)
            .map(|key| key.ring_size)
            .collect();
        sizes.dedup(); // key order already sorts sizes within an operation
        sizes
    }

    /// Records for one (operation, ring size) group, in insertion order and
    /// then stable-sorted ascending by time per op, so ties keep input order.
    pub fn ranked(&self, operation: Operation, ring_size: u64) -> Vec<&Record> {
        let mut group: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|(key, _)| key.operation == operation && key.ring_size == ring_size)
            .map(|(_, entry)| entry)
            .collect();
        group.sort_by_key(|entry| entry.seq);
        group.sort_by(|a, b| {
            a.record
                .ns_per_op
                .partial_cmp(&b.record.ns_per_op)
                .unwrap_or(Ordering::Equal)
        });
        group.into_iter().map(|entry| &entry.record).collect()
    }

    pub fn get(&self, operation: Operation, ring_size: u64, backend: &str) -> Option<&Record> {
        let key = Key {
            operation,
            ring_size,
            backend: backend.to_string(),
        };
        self.entries.get(&key).map(|entry| &entry.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(operation: Operation, ring_size: u64, backend: &str, ns: f64) -> Record {
        Record {
            operation,
            ring_size,
            backend: backend.to_string(),
            ns_per_op: ns,
            bytes_per_op: None,
            allocs_per_op: None,
            iterations: 100,
        }
    }

    #[test]
    fn test_last_write_wins() {
        let mut table = BenchTable::new();
        table.insert(record(Operation::Sign, 2, "Decred", 1000.0));
        table.insert(record(Operation::Sign, 2, "Decred", 2000.0));

        assert_eq!(table.len(), 1);
        let rec = table.get(Operation::Sign, 2, "Decred").unwrap();
        assert_eq!(rec.ns_per_op, 2000.0);
    }

    #[test]
    fn test_ring_sizes_sorted_ascending() {
        let mut table = BenchTable::new();
        table.insert(record(Operation::Sign, 32, "Decred", 1.0));
        table.insert(record(Operation::Sign, 2, "Decred", 1.0));
        table.insert(record(Operation::Sign, 8, "Ethereum", 1.0));
        table.insert(record(Operation::Verify, 4, "Decred", 1.0));

        assert_eq!(table.ring_sizes(Operation::Sign), vec![2, 8, 32]);
        assert_eq!(table.ring_sizes(Operation::Verify), vec![4]);
    }

    #[test]
    fn test_ranked_ascending_by_time() {
        let mut table = BenchTable::new();
        table.insert(record(Operation::Sign, 2, "Decred", 1_550_968.0));
        table.insert(record(Operation::Sign, 2, "Ethereum", 620_000.0));
        table.insert(record(Operation::Sign, 2, "Ed25519", 900_000.0));

        let ranked = table.ranked(Operation::Sign, 2);
        let order: Vec<&str> = ranked.iter().map(|r| r.backend.as_str()).collect();
        assert_eq!(order, vec!["Ethereum", "Ed25519", "Decred"]);
    }

    #[test]
    fn test_ranked_ties_preserve_input_order() {
        let mut table = BenchTable::new();
        table.insert(record(Operation::Verify, 4, "Zeta", 500.0));
        table.insert(record(Operation::Verify, 4, "Alpha", 500.0));

        let ranked = table.ranked(Operation::Verify, 4);
        let order: Vec<&str> = ranked.iter().map(|r| r.backend.as_str()).collect();
        assert_eq!(order, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_groups_are_isolated() {
        let mut table = BenchTable::new();
        table.insert(record(Operation::Sign, 2, "Decred", 1.0));
        table.insert(record(Operation::Verify, 2, "Decred", 1.0));
        table.insert(record(Operation::Sign, 4, "Decred", 1.0));

        assert_eq!(table.ranked(Operation::Sign, 2).len(), 1);
        assert_eq!(table.ranked(Operation::Sign, 4).len(), 1);
        assert_eq!(table.ranked(Operation::Verify, 2).len(), 1);
        assert!(table.ranked(Operation::Verify, 4).is_empty());
    }
}
