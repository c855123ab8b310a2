//! Match strategies: exact lookup and the subset-sum searches behind it

pub mod backtracking;
pub mod dynamic;
pub mod exact;
pub mod greedy;
pub mod index;

pub use index::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::SearchBounds;
use crate::types::*;

/// The interchangeable matching algorithms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Single record with exactly the target amount
    Exact,
    /// Reachability table over minor-unit sums, O(n * T)
    #[default]
    DynamicProgramming,
    /// Depth-first search for the smallest subset, O(2^n)
    Backtracking,
    /// Largest-first accumulation, may miss existing subsets
    Greedy,
}

impl MatchStrategy {
    pub const ALL: [MatchStrategy; 4] = [
        MatchStrategy::Exact,
        MatchStrategy::DynamicProgramming,
        MatchStrategy::Backtracking,
        MatchStrategy::Greedy,
    ];

    /// Run this strategy alone over the indexed candidates
    ///
    /// `None` means no match. Any returned set sums exactly to `target`, and a
    /// zero target always yields the empty set. Bounds are not checked here.
    pub fn find(&self, index: &CandidateIndex, target: Money) -> Option<Vec<Record>> {
        match self {
            MatchStrategy::Exact => exact::find_exact(index, target),
            MatchStrategy::DynamicProgramming => dynamic::find_subset(index.records(), target),
            MatchStrategy::Backtracking => backtracking::find_subset(index.records(), target),
            MatchStrategy::Greedy => greedy::find_subset(index.records(), target),
        }
    }

    /// Reject inputs this strategy should not attempt under `bounds`
    pub fn check_bounds(
        &self,
        index: &CandidateIndex,
        target: Money,
        bounds: &SearchBounds,
    ) -> MatchResult<()> {
        let exceeded = match self {
            MatchStrategy::Exact => None,
            MatchStrategy::DynamicProgramming => {
                if target.minor_units() > bounds.max_dp_target_minor_units {
                    Some(format!(
                        "target_minor_units={} exceeds max={}",
                        target.minor_units(),
                        bounds.max_dp_target_minor_units
                    ))
                } else if index.len() >= u32::MAX as usize {
                    Some(format!("candidates={} exceeds max={}", index.len(), u32::MAX - 1))
                } else {
                    None
                }
            }
            MatchStrategy::Backtracking => (index.len() > bounds.max_backtracking_candidates)
                .then(|| {
                    format!(
                        "candidates={} exceeds max={}",
                        index.len(),
                        bounds.max_backtracking_candidates
                    )
                }),
            MatchStrategy::Greedy => (index.len() > bounds.max_greedy_candidates).then(|| {
                format!(
                    "candidates={} exceeds max={}",
                    index.len(),
                    bounds.max_greedy_candidates
                )
            }),
        };

        match exceeded {
            Some(detail) => {
                warn!(strategy = %self, %detail, "search bound exceeded");
                Err(MatchError::SearchBoundExceeded {
                    strategy: self.to_string(),
                    detail,
                })
            }
            None => Ok(()),
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::DynamicProgramming => "dynamic_programming",
            MatchStrategy::Backtracking => "backtracking",
            MatchStrategy::Greedy => "greedy",
        };
        f.write_str(name)
    }
}

/// A set of records found for a target, with the strategy that found it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub strategy: MatchStrategy,
    pub records: Vec<Record>,
}

impl MatchOutcome {
    pub fn total(&self) -> Money {
        total_of(&self.records)
    }
}

/// Exact lookup first, then the configured subset strategy
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    strategy: MatchStrategy,
    bounds: SearchBounds,
}

impl MatchEngine {
    /// Create an engine for a subset strategy with default bounds
    pub fn new(strategy: MatchStrategy) -> Self {
        Self {
            strategy,
            bounds: SearchBounds::default(),
        }
    }

    /// Create an engine with explicit search bounds
    pub fn with_bounds(strategy: MatchStrategy, bounds: SearchBounds) -> Self {
        Self { strategy, bounds }
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    pub fn bounds(&self) -> &SearchBounds {
        &self.bounds
    }

    /// Find records summing exactly to `target`
    ///
    /// Returns `Ok(None)` when no strategy finds a match and an error only for
    /// a negative target or input beyond the configured bounds.
    pub fn find(&self, index: &CandidateIndex, target: Money) -> MatchResult<Option<MatchOutcome>> {
        if target.is_negative() {
            return Err(MatchError::InvalidTarget(target));
        }

        if let Some(records) = exact::find_exact(index, target) {
            debug!(
                target = target.minor_units(),
                members = records.len(),
                "exact match"
            );
            return Ok(Some(MatchOutcome {
                strategy: MatchStrategy::Exact,
                records,
            }));
        }

        if self.strategy == MatchStrategy::Exact {
            return Ok(None);
        }

        self.strategy.check_bounds(index, target, &self.bounds)?;

        let started = Instant::now();
        let found = self.strategy.find(index, target);
        info!(
            strategy = %self.strategy,
            candidates = index.len(),
            target = target.minor_units(),
            matched = found.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "subset search finished"
        );

        Ok(found.map(|records| {
            debug_assert_eq!(total_of(&records), target);
            MatchOutcome {
                strategy: self.strategy,
                records,
            }
        }))
    }
}
