//! Largest-first greedy accumulation

use std::cmp::Reverse;

use crate::types::*;

/// Accumulate records from the largest amount down, skipping any that would
/// overshoot, and return them only if the total lands exactly on `target`.
///
/// Fast, but can miss a subset that exists: 60 + 50 + 50 reaching 100 is
/// never found because 60 is taken first.
pub fn find_subset(records: &[Record], target: Money) -> Option<Vec<Record>> {
    if target.is_zero() {
        return Some(Vec::new());
    }

    let mut ordered: Vec<&Record> = records.iter().collect();
    // Stable, so equal amounts keep input order
    ordered.sort_by_key(|record| Reverse(record.amount()));

    let mut running = Money::ZERO;
    let mut taken = Vec::new();
    for record in ordered {
        if running == target {
            break;
        }
        match running.checked_add(record.amount()) {
            Some(next) if next <= target => {
                running = next;
                taken.push(record.clone());
            }
            _ => {}
        }
    }

    (running == target).then_some(taken)
}
