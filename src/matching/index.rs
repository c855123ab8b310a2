//! Amount-keyed candidate index

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::types::*;

/// Candidates eligible for a target, keyed by amount for O(1) exact lookup
///
/// Built from records whose amount does not exceed `ceiling`. When several
/// records share an amount only the last one in input order is indexed; the
/// others are kept in [`CandidateIndex::shadowed`] and take no part in any
/// strategy.
#[derive(Debug, Clone, Default)]
pub struct CandidateIndex {
    by_amount: HashMap<Money, Record>,
    /// Indexed records in input order
    entries: Vec<Record>,
    shadowed: Vec<Record>,
    ceiling: Money,
}

impl CandidateIndex {
    /// Filter `records` to `amount <= ceiling` and index them by amount
    pub fn build<'a, I>(records: I, ceiling: Money) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let eligible: Vec<&Record> = records
            .into_iter()
            .filter(|record| record.amount() <= ceiling)
            .collect();

        // Last write wins: remember the final position seen for each amount
        let mut last_position: HashMap<Money, usize> = HashMap::with_capacity(eligible.len());
        for (position, record) in eligible.iter().enumerate() {
            last_position.insert(record.amount(), position);
        }

        let mut entries = Vec::with_capacity(last_position.len());
        let mut shadowed = Vec::new();
        for (position, record) in eligible.into_iter().enumerate() {
            if last_position.get(&record.amount()) == Some(&position) {
                entries.push(record.clone());
            } else {
                shadowed.push(record.clone());
            }
        }

        for record in &shadowed {
            warn!(
                record_id = record.id(),
                amount = record.amount().minor_units(),
                "duplicate candidate amount; record excluded from matching"
            );
        }

        let by_amount = entries
            .iter()
            .map(|record| (record.amount(), record.clone()))
            .collect();

        debug!(
            indexed = entries.len(),
            shadowed = shadowed.len(),
            ceiling = ceiling.minor_units(),
            "built candidate index"
        );

        Self {
            by_amount,
            entries,
            shadowed,
            ceiling,
        }
    }

    /// The record whose amount equals `target`, if any
    pub fn lookup_exact(&self, target: Money) -> Option<&Record> {
        self.by_amount.get(&target)
    }

    /// Indexed records in input order
    pub fn records(&self) -> &[Record] {
        &self.entries
    }

    /// Records dropped because another record with the same amount came later
    pub fn shadowed(&self) -> &[Record] {
        &self.shadowed
    }

    pub fn ceiling(&self) -> Money {
        self.ceiling
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, amount: i64) -> Record {
        Record::new(id, "Counterparty", "17 Sep", Money::from_minor(amount), "Sales Invoice")
    }

    #[test]
    fn test_build_filters_by_ceiling() {
        let records = vec![record("a", 100), record("b", 500), record("c", 300)];
        let index = CandidateIndex::build(&records, Money::from_minor(300));

        let ids: Vec<&str> = index.records().iter().map(Record::id).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(index.lookup_exact(Money::from_minor(500)).is_none());
        assert_eq!(index.ceiling(), Money::from_minor(300));
    }

    #[test]
    fn test_lookup_exact() {
        let records = vec![record("a", 100), record("b", 200)];
        let index = CandidateIndex::build(&records, Money::from_minor(1000));

        assert_eq!(index.lookup_exact(Money::from_minor(200)).map(Record::id), Some("b"));
        assert!(index.lookup_exact(Money::from_minor(150)).is_none());
    }

    #[test]
    fn test_duplicate_amounts_last_write_wins() {
        let records = vec![
            record("first", 24900),
            record("other", 100),
            record("second", 24900),
        ];
        let index = CandidateIndex::build(&records, Money::from_minor(100_000));

        assert_eq!(
            index.lookup_exact(Money::from_minor(24900)).map(Record::id),
            Some("second")
        );
        let ids: Vec<&str> = index.records().iter().map(Record::id).collect();
        assert_eq!(ids, vec!["other", "second"]);
        assert_eq!(index.shadowed().len(), 1);
        assert_eq!(index.shadowed()[0].id(), "first");
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<Record> = Vec::new();
        let index = CandidateIndex::build(&records, Money::from_minor(100));
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }
}
