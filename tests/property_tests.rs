// Property-based tests for the match strategies and the selection session.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use bankrec_core::{
    total_of, CandidateIndex, EngineConfig, MatchError, MatchStrategy, Money, Record,
    SelectionSession,
};

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn record(id: &str, amount: i64) -> Record {
    Record::new(id, format!("Test{}", id), "2023-08-01", Money::from_minor(amount), "Invoice")
}

/// Small positive amounts so subsets collide often enough to be interesting.
/// Eight records keeps the brute-force oracle at 256 subsets.
fn arb_records() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(1i64..=60, 0..=8).prop_map(|amounts| {
        amounts
            .into_iter()
            .enumerate()
            .map(|(i, amount)| record(&i.to_string(), amount))
            .collect()
    })
}

/// Smallest number of records summing to `target`, by trying every subset
fn brute_force_min_size(records: &[Record], target: Money) -> Option<usize> {
    (0u32..(1 << records.len()))
        .filter(|mask| {
            let sum: Money = records
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, r)| r.amount())
                .sum();
            sum == target
        })
        .map(|mask| mask.count_ones() as usize)
        .min()
}

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn prop_strategies_agree_with_brute_force(
        records in arb_records(),
        target in 0i64..150,
    ) {
        let target = Money::from_minor(target);
        let index = CandidateIndex::build(&records, target);
        let oracle = brute_force_min_size(index.records(), target);

        for strategy in MatchStrategy::ALL {
            let found = strategy.find(&index, target);
            if let Some(subset) = &found {
                prop_assert_eq!(total_of(subset), target, "{} returned a near miss", strategy);
                prop_assert!(oracle.is_some(), "{} matched where no subset exists", strategy);
            }
            match strategy {
                MatchStrategy::DynamicProgramming => {
                    prop_assert_eq!(found.is_some(), oracle.is_some(), "dp vs oracle");
                }
                MatchStrategy::Backtracking => {
                    prop_assert_eq!(found.map(|s| s.len()), oracle, "backtracking size vs oracle");
                }
                MatchStrategy::Exact | MatchStrategy::Greedy => {}
            }
        }
    }

    #[test]
    fn prop_budget_invariant_over_toggles(
        amounts in prop::collection::vec(1i64..=300, 1..=12),
        target in 300i64..=2000,
        toggles in prop::collection::vec((any::<prop::sample::Index>(), any::<bool>()), 0..200),
    ) {
        let records: Vec<Record> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| record(&format!("r{}", i), *amount))
            .collect();
        let mut session =
            SelectionSession::new(records.clone(), Money::from_minor(target), EngineConfig::default())
                .unwrap();

        for (pick, want) in toggles {
            let candidate = pick.get(&records);
            let before = session.snapshot().clone();

            match session.toggle(candidate, want) {
                Ok(()) => {}
                Err(MatchError::InsufficientBudget { .. }) => {
                    prop_assert!(want);
                    prop_assert_eq!(session.remaining(), before.remaining());
                    prop_assert_eq!(session.selected(), before.selected());
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }

            prop_assert!(session.remaining() >= Money::ZERO);
            prop_assert_eq!(
                session.remaining(),
                session.initial_target() - total_of(session.selected())
            );
        }
    }

    #[test]
    fn prop_greedy_never_overflows(
        amounts in prop::collection::vec(any::<i64>().prop_map(|a| a.saturating_abs()), 0..=6),
        target in 1i64..=i64::MAX,
    ) {
        let records: Vec<Record> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| record(&i.to_string(), *amount))
            .collect();
        let target = Money::from_minor(target);
        let index = CandidateIndex::build(&records, target);

        if let Some(subset) = MatchStrategy::Greedy.find(&index, target) {
            prop_assert_eq!(
                subset.iter().try_fold(Money::ZERO, |sum, r| sum.checked_add(r.amount())),
                Some(target)
            );
        }
    }
}
