//! Subset-sum by depth-first include/exclude search

use tracing::debug;

use crate::types::*;

/// Find the smallest subset of `records` whose amounts sum exactly to `target`
///
/// Explores including then excluding each record in input order. Branches
/// that overshoot the target, cannot reach it with the records left, or can
/// no longer beat the best subset found so far are pruned. Among subsets of
/// equal size the first one found wins.
///
/// Exponential in the worst case; callers must bound the record count.
pub fn find_subset(records: &[Record], target: Money) -> Option<Vec<Record>> {
    if target.is_zero() {
        return Some(Vec::new());
    }
    if target.is_negative() {
        return None;
    }

    let amounts: Vec<i64> = records.iter().map(|r| r.amount().minor_units()).collect();

    // suffix_totals[i] is the sum of every amount from position i onwards
    let mut suffix_totals = vec![0i64; amounts.len() + 1];
    for i in (0..amounts.len()).rev() {
        suffix_totals[i] = suffix_totals[i + 1].saturating_add(amounts[i]);
    }

    let mut search = Search {
        amounts: &amounts,
        suffix_totals: &suffix_totals,
        current: Vec::new(),
        best: None,
        nodes_visited: 0,
        nodes_pruned: 0,
    };
    search.explore(0, target.minor_units());

    debug!(
        candidates = records.len(),
        nodes_visited = search.nodes_visited,
        nodes_pruned = search.nodes_pruned,
        best_len = search.best.as_ref().map(Vec::len),
        "backtracking search exhausted"
    );

    search
        .best
        .map(|positions| positions.into_iter().map(|i| records[i].clone()).collect())
}

struct Search<'a> {
    amounts: &'a [i64],
    suffix_totals: &'a [i64],
    current: Vec<usize>,
    best: Option<Vec<usize>>,
    nodes_visited: u64,
    nodes_pruned: u64,
}

impl Search<'_> {
    fn explore(&mut self, position: usize, remaining: i64) {
        self.nodes_visited += 1;

        if remaining == 0 {
            if self
                .best
                .as_ref()
                .map_or(true, |best| self.current.len() < best.len())
            {
                self.best = Some(self.current.clone());
            }
            return;
        }

        if position == self.amounts.len() {
            return;
        }
        if self.suffix_totals[position] < remaining {
            self.nodes_pruned += 1;
            return;
        }

        // Any hit from here has at least one more member
        if let Some(best) = &self.best {
            if self.current.len() + 1 >= best.len() {
                self.nodes_pruned += 1;
                return;
            }
        }

        let amount = self.amounts[position];
        if amount > 0 && amount <= remaining {
            self.current.push(position);
            self.explore(position + 1, remaining - amount);
            self.current.pop();
        }

        self.explore(position + 1, remaining);
    }
}
