//! Session state snapshots and the pure transition function over them
//!
//! Every mutation goes through [`SessionState::toggle`], which keeps
//! `remaining == initial_target - total(selected)` and `remaining >= 0`. Manual
//! toggles and automatic matches share that path.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::matching::{CandidateIndex, MatchEngine, MatchStrategy};
use crate::traits::RecordValidator;
use crate::types::*;
use crate::utils::validation::validate_target;

/// Immutable snapshot of a selection session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    initial_target: Money,
    remaining: Money,
    /// Records no larger than the initial target, in source order
    candidates: Vec<Record>,
    /// Selected records in the order they were selected, unique by id
    selected: Vec<Record>,
    /// Most recent rejected event, for display
    error: Option<MatchError>,
}

/// Something the presentation layer asks the session to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Select or deselect one candidate
    Toggle { record_id: String, selected: bool },
    /// Search the unselected candidates for records summing to `target`
    AutoMatch { target: Money },
    /// Deselect everything
    ClearSelection,
    ClearError,
}

/// What an accepted event did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventOutcome {
    /// The state changed
    Applied,
    /// The event asked for the state the session was already in
    Unchanged,
    AutoMatched(AutoMatchReport),
}

/// Result of applying an automatic match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoMatchReport {
    /// Strategy that produced the proposal
    pub strategy: MatchStrategy,
    /// Records proposed by the engine, in the order they were applied
    pub proposed: Vec<Record>,
    /// Proposed records that were selected
    pub applied: Vec<Record>,
    /// Proposed records skipped because the remaining total could not cover them
    pub rejected: Vec<Record>,
}

impl AutoMatchReport {
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// The next state together with the outcome of the event that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub outcome: MatchResult<EventOutcome>,
}

impl SessionState {
    /// Start a session for `initial_target`, keeping only candidates that fit
    pub fn new(
        records: Vec<Record>,
        initial_target: Money,
        validator: &dyn RecordValidator,
    ) -> MatchResult<Self> {
        validate_target(initial_target)?;
        validator.validate_candidates(&records)?;

        let total = records.len();
        let candidates: Vec<Record> = records
            .into_iter()
            .filter(|record| record.amount() <= initial_target)
            .collect();

        info!(
            initial_target = initial_target.minor_units(),
            loaded = total,
            candidates = candidates.len(),
            "selection session started"
        );

        Ok(Self {
            initial_target,
            remaining: initial_target,
            candidates,
            selected: Vec::new(),
            error: None,
        })
    }

    pub fn initial_target(&self) -> Money {
        self.initial_target
    }

    /// The portion of the initial target not yet covered by selections
    pub fn remaining(&self) -> Money {
        self.remaining
    }

    pub fn candidates(&self) -> &[Record] {
        &self.candidates
    }

    pub fn selected(&self) -> &[Record] {
        &self.selected
    }

    pub fn error(&self) -> Option<&MatchError> {
        self.error.as_ref()
    }

    pub fn is_selected(&self, record_id: &str) -> bool {
        self.selected.iter().any(|record| record.id() == record_id)
    }

    /// Whether selecting `record` keeps the remaining total non-negative
    pub fn can_select(&self, record: &Record) -> bool {
        self.remaining
            .checked_sub(record.amount())
            .is_some_and(|left| left >= Money::ZERO)
    }

    /// Fully matched: the selections cover the initial target exactly
    pub fn is_balanced(&self) -> bool {
        self.remaining.is_zero()
    }

    fn candidate(&self, record_id: &str) -> MatchResult<&Record> {
        self.candidates
            .iter()
            .find(|record| record.id() == record_id)
            .ok_or_else(|| MatchError::UnknownRecord(record_id.to_string()))
    }

    /// Select or deselect a candidate
    ///
    /// Returns `None` when the record is already in the requested state.
    /// Rejects the change, leaving `self` untouched, if it would take the
    /// remaining total below zero.
    pub fn toggle(&self, record_id: &str, want_selected: bool) -> MatchResult<Option<Self>> {
        let record = self.candidate(record_id)?;
        if self.is_selected(record_id) == want_selected {
            return Ok(None);
        }

        let amount = record.amount();
        let remaining = if want_selected {
            self.remaining.checked_sub(amount)
        } else {
            self.remaining.checked_add(amount)
        };

        let remaining = match remaining {
            Some(remaining) if remaining >= Money::ZERO => remaining,
            _ => {
                debug!(
                    record_id,
                    remaining = self.remaining.minor_units(),
                    amount = amount.minor_units(),
                    "selection rejected"
                );
                return Err(MatchError::InsufficientBudget {
                    record_id: record_id.to_string(),
                    remaining: self.remaining,
                    amount,
                });
            }
        };

        let mut next = self.clone();
        next.remaining = remaining;
        if want_selected {
            next.selected.push(record.clone());
        } else {
            next.selected.retain(|selected| selected.id() != record_id);
        }
        Ok(Some(next))
    }

    /// Search the unselected candidates for records summing to `target` and
    /// select them one by one
    ///
    /// Each proposed record is selected only if the remaining total still
    /// covers it at that point, so a later member can be skipped after earlier
    /// ones used up the budget.
    pub fn auto_match(
        &self,
        target: Money,
        engine: &MatchEngine,
    ) -> MatchResult<(Self, AutoMatchReport)> {
        if target.is_negative() {
            return Err(MatchError::InvalidTarget(target));
        }

        let ceiling = target.min(self.remaining);
        let unselected = self
            .candidates
            .iter()
            .filter(|record| !self.is_selected(record.id()));
        let index = CandidateIndex::build(unselected, ceiling);

        let outcome = engine
            .find(&index, target)?
            .ok_or(MatchError::NoMatchFound { target })?;

        let mut next = self.clone();
        let mut applied = Vec::new();
        let mut rejected = Vec::new();
        for record in &outcome.records {
            if next.can_select(record) {
                if let Some(updated) = next.toggle(record.id(), true)? {
                    next = updated;
                }
                applied.push(record.clone());
            } else {
                rejected.push(record.clone());
            }
        }

        info!(
            strategy = %outcome.strategy,
            target = target.minor_units(),
            applied = applied.len(),
            rejected = rejected.len(),
            remaining = next.remaining.minor_units(),
            "auto match applied"
        );

        let report = AutoMatchReport {
            strategy: outcome.strategy,
            proposed: outcome.records,
            applied,
            rejected,
        };
        Ok((next, report))
    }

    /// Deselect everything and restore the initial target
    pub fn cleared(&self) -> Self {
        Self {
            remaining: self.initial_target,
            selected: Vec::new(),
            ..self.clone()
        }
    }

    /// Copy of this state with the recorded error replaced
    pub fn with_error(&self, error: Option<MatchError>) -> Self {
        Self {
            error,
            ..self.clone()
        }
    }
}

/// Apply `event` to `state`, producing the next state
///
/// A rejected event leaves everything but the recorded error unchanged.
pub fn transition(state: &SessionState, event: &SessionEvent, engine: &MatchEngine) -> Transition {
    let result = match event {
        SessionEvent::Toggle {
            record_id,
            selected,
        } => state.toggle(record_id, *selected).map(|next| match next {
            Some(next) => (next, EventOutcome::Applied),
            None => (state.clone(), EventOutcome::Unchanged),
        }),
        SessionEvent::AutoMatch { target } => state
            .auto_match(*target, engine)
            .map(|(next, report)| (next, EventOutcome::AutoMatched(report))),
        SessionEvent::ClearSelection => Ok((state.cleared(), EventOutcome::Applied)),
        SessionEvent::ClearError => Ok((state.with_error(None), EventOutcome::Applied)),
    };

    match result {
        Ok((next, outcome)) => Transition {
            state: next,
            outcome: Ok(outcome),
        },
        Err(error) => Transition {
            state: state.with_error(Some(error.clone())),
            outcome: Err(error),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::DefaultRecordValidator;

    fn record(id: &str, amount: i64) -> Record {
        Record::new(id, "Counterparty", "17 Sep", Money::from_minor(amount), "Sales Invoice")
    }

    fn state(records: Vec<Record>, target: i64) -> SessionState {
        SessionState::new(records, Money::from_minor(target), &DefaultRecordValidator).unwrap()
    }

    fn assert_invariant(state: &SessionState) {
        assert!(state.remaining() >= Money::ZERO);
        assert_eq!(
            state.remaining(),
            state.initial_target() - total_of(state.selected())
        );
    }

    #[test]
    fn test_rejects_non_positive_target() {
        for target in [0, -100] {
            assert_eq!(
                SessionState::new(vec![], Money::from_minor(target), &DefaultRecordValidator),
                Err(MatchError::InvalidTarget(Money::from_minor(target)))
            );
        }
    }

    #[test]
    fn test_candidates_filtered_against_initial_target() {
        let s = state(vec![record("a", 100), record("b", 900), record("c", 250)], 250);
        let ids: Vec<&str> = s.candidates().iter().map(Record::id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_second_toggle_rejected_when_budget_exhausted() {
        let s = state(vec![record("A", 100), record("B", 200)], 250);

        let s = s.toggle("A", true).unwrap().unwrap();
        assert_eq!(s.remaining(), Money::from_minor(150));

        let result = s.toggle("B", true);
        assert!(matches!(result, Err(MatchError::InsufficientBudget { .. })));
        assert_eq!(s.remaining(), Money::from_minor(150));
        assert_eq!(s.selected().len(), 1);
        assert_eq!(s.selected()[0].id(), "A");
        assert_invariant(&s);
    }

    #[test]
    fn test_deselect_restores_budget() {
        let s = state(vec![record("A", 100), record("B", 200)], 300);
        let s = s.toggle("A", true).unwrap().unwrap();
        let s = s.toggle("B", true).unwrap().unwrap();
        assert!(s.is_balanced());

        let s = s.toggle("A", false).unwrap().unwrap();
        assert_eq!(s.remaining(), Money::from_minor(100));
        assert!(!s.is_selected("A"));
        assert_invariant(&s);
    }

    #[test]
    fn test_toggle_to_current_state_is_noop() {
        let s = state(vec![record("A", 100)], 300);
        assert_eq!(s.toggle("A", false).unwrap(), None);

        let s = s.toggle("A", true).unwrap().unwrap();
        assert_eq!(s.toggle("A", true).unwrap(), None);
        assert_eq!(s.remaining(), Money::from_minor(200));
    }

    #[test]
    fn test_unknown_record() {
        let s = state(vec![record("A", 100), record("big", 1000)], 300);
        assert_eq!(
            s.toggle("missing", true),
            Err(MatchError::UnknownRecord("missing".to_string()))
        );
        // Filtered out at session start, so not a candidate either
        assert!(s.toggle("big", true).is_err());
    }

    #[test]
    fn test_can_select_is_pure() {
        let s = state(vec![record("A", 100), record("B", 200)], 250);
        let before = s.clone();
        for _ in 0..3 {
            assert!(s.can_select(&record("A", 100)));
            assert!(!s.can_select(&record("X", 300)));
        }
        assert_eq!(s, before);
    }

    #[test]
    fn test_auto_match_skips_selected_records() {
        let s = state(vec![record("A", 100), record("B", 200), record("C", 300)], 600);
        let s = s.toggle("C", true).unwrap().unwrap();

        let engine = MatchEngine::new(MatchStrategy::DynamicProgramming);
        let (next, report) = s.auto_match(s.remaining(), &engine).unwrap();

        let applied: Vec<&str> = report.applied.iter().map(Record::id).collect();
        assert_eq!(applied, vec!["A", "B"]);
        assert!(report.is_complete());
        assert!(next.is_balanced());
        assert_invariant(&next);
    }

    #[test]
    fn test_auto_match_applies_member_by_member() {
        // Target above the remaining total: 100 + 200 = 300 but only 250 left
        let s = state(vec![record("A", 100), record("B", 200), record("C", 50)], 300);
        let s = s.toggle("C", true).unwrap().unwrap();

        let engine = MatchEngine::new(MatchStrategy::Backtracking);
        let (next, report) = s.auto_match(Money::from_minor(300), &engine).unwrap();

        assert_eq!(report.proposed.len(), 2);
        assert_eq!(report.applied.len(), 1);
        assert_eq!(report.applied[0].id(), "A");
        assert_eq!(report.rejected[0].id(), "B");
        assert_eq!(next.remaining(), Money::from_minor(150));
        assert_invariant(&next);
    }

    #[test]
    fn test_transition_records_error_and_keeps_state() {
        let s = state(vec![record("A", 100), record("B", 200)], 250);
        let engine = MatchEngine::default();

        let t = transition(
            &s,
            &SessionEvent::AutoMatch {
                target: Money::from_minor(150),
            },
            &engine,
        );
        assert_eq!(
            t.outcome,
            Err(MatchError::NoMatchFound {
                target: Money::from_minor(150)
            })
        );
        assert_eq!(t.state.remaining(), s.remaining());
        assert_eq!(t.state.selected(), s.selected());
        assert!(t.state.error().is_some());

        let cleared = transition(&t.state, &SessionEvent::ClearError, &engine);
        assert!(cleared.state.error().is_none());
        assert_eq!(cleared.state, s);
    }

    #[test]
    fn test_transition_clear_selection() {
        let s = state(vec![record("A", 100), record("B", 200)], 250);
        let engine = MatchEngine::default();
        let t = transition(
            &s,
            &SessionEvent::Toggle {
                record_id: "B".to_string(),
                selected: true,
            },
            &engine,
        );
        assert_eq!(t.outcome, Ok(EventOutcome::Applied));
        assert_eq!(t.state.remaining(), Money::from_minor(50));

        let t = transition(&t.state, &SessionEvent::ClearSelection, &engine);
        assert_eq!(t.state.remaining(), Money::from_minor(250));
        assert!(t.state.selected().is_empty());
    }
}
