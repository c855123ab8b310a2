//! Subset-sum by dynamic programming over minor-unit sums

use crate::types::*;

const UNREACHED: u32 = u32::MAX;

/// Find a subset of `records` whose amounts sum exactly to `target`
///
/// Builds a reachability table over every sum from 0 to `target`, processing
/// records in input order and sums from high to low so each record is used at
/// most once. For every sum the table keeps the position of the record that
/// first made it reachable; walking those positions back from `target` visits
/// records in reverse input order and yields distinct records.
///
/// O(n * T) time and O(T) space, T being the target in minor units. Callers
/// must bound T before calling this.
pub fn find_subset(records: &[Record], target: Money) -> Option<Vec<Record>> {
    if target.is_zero() {
        return Some(Vec::new());
    }
    let goal = usize::try_from(target.minor_units()).ok()?;

    // reached_by[s] is the position of the record whose pass first reached s
    let mut reached_by = vec![UNREACHED; goal + 1];

    for (position, record) in records.iter().enumerate() {
        let amount = match usize::try_from(record.amount().minor_units()) {
            Ok(amount) if amount > 0 && amount <= goal => amount,
            _ => continue,
        };
        let marker = u32::try_from(position).ok()?;

        for sum in (amount..=goal).rev() {
            if reached_by[sum] == UNREACHED && is_reachable(&reached_by, sum - amount) {
                reached_by[sum] = marker;
            }
        }

        if reached_by[goal] != UNREACHED {
            break;
        }
    }

    if reached_by[goal] == UNREACHED {
        return None;
    }

    let mut subset = Vec::new();
    let mut sum = goal;
    while sum > 0 {
        let record = &records[reached_by[sum] as usize];
        subset.push(record.clone());
        sum -= record.amount().minor_units() as usize;
    }
    subset.reverse();
    Some(subset)
}

fn is_reachable(reached_by: &[u32], sum: usize) -> bool {
    sum == 0 || reached_by[sum] != UNREACHED
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(amounts: &[i64]) -> Vec<Record> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| {
                Record::new(
                    format!("r{}", i),
                    "Counterparty",
                    "1 Sep",
                    Money::from_minor(*amount),
                    "Invoice",
                )
            })
            .collect()
    }

    fn ids(subset: &[Record]) -> Vec<&str> {
        subset.iter().map(Record::id).collect()
    }

    #[test]
    fn test_pair_found_in_input_order() {
        let candidates = records(&[100, 200, 300]);
        let subset = find_subset(&candidates, Money::from_minor(300)).unwrap();
        assert_eq!(ids(&subset), vec!["r0", "r1"]);
    }

    #[test]
    fn test_unreachable_target() {
        let candidates = records(&[100, 200, 300]);
        assert!(find_subset(&candidates, Money::from_minor(150)).is_none());
        assert!(find_subset(&candidates, Money::from_minor(700)).is_none());
    }

    #[test]
    fn test_zero_target_is_empty_set() {
        assert_eq!(find_subset(&records(&[5]), Money::ZERO), Some(Vec::new()));
        assert_eq!(find_subset(&[], Money::ZERO), Some(Vec::new()));
    }

    #[test]
    fn test_never_reuses_a_record() {
        // 200 is reachable only as 100 + 100, which would need r0 twice
        let candidates = records(&[100, 250]);
        assert!(find_subset(&candidates, Money::from_minor(200)).is_none());
    }

    #[test]
    fn test_skips_zero_and_oversized_amounts() {
        let candidates = records(&[0, 1000, 40, 60]);
        let subset = find_subset(&candidates, Money::from_minor(100)).unwrap();
        assert_eq!(ids(&subset), vec!["r2", "r3"]);
    }

    #[test]
    fn test_reconstruction_sums_exactly() {
        let candidates = records(&[24900, 61850, 49500, 23400, 25000, 10860, 21699, 18125]);
        let target = Money::from_minor(10860 + 21699 + 18125);
        let subset = find_subset(&candidates, target).unwrap();
        assert_eq!(total_of(&subset), target);
    }
}
