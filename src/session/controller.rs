//! Selection session controller that owns the state for one statement line

use tracing::warn;

use crate::config::EngineConfig;
use crate::format::CurrencyFormatter;
use crate::matching::MatchEngine;
use crate::session::state::*;
use crate::traits::*;
use crate::types::*;

/// Interactive selection of records against one statement line amount
///
/// Not safe for concurrent mutation; callers serialize access, for example by
/// owning the session on a single task or wrapping it in a mutex.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    state: SessionState,
    engine: MatchEngine,
    config: EngineConfig,
}

impl SelectionSession {
    /// Create a session over an already fetched candidate list
    pub fn new(records: Vec<Record>, initial_target: Money, config: EngineConfig) -> MatchResult<Self> {
        Self::with_validator(records, initial_target, config, &DefaultRecordValidator)
    }

    /// Create a session with custom candidate validation
    pub fn with_validator(
        records: Vec<Record>,
        initial_target: Money,
        config: EngineConfig,
        validator: &dyn RecordValidator,
    ) -> MatchResult<Self> {
        config.validate()?;
        let state = SessionState::new(records, initial_target, validator)?;
        let engine = MatchEngine::with_bounds(config.strategy, config.bounds.clone());
        Ok(Self {
            state,
            engine,
            config,
        })
    }

    /// Fetch candidates from `source` once and start a session over them
    pub async fn load<S>(source: &S, initial_target: Money, config: EngineConfig) -> MatchResult<Self>
    where
        S: RecordSource + ?Sized,
    {
        // Reject a bad target before paying for the fetch
        crate::utils::validation::validate_target(initial_target)?;
        let records = source.fetch_records().await.inspect_err(|e| {
            warn!(error = %e, "failed to load accounting records");
        })?;
        Self::new(records, initial_target, config)
    }

    /// Apply an event and keep the resulting state
    pub fn dispatch(&mut self, event: SessionEvent) -> MatchResult<EventOutcome> {
        let Transition { state, outcome } = transition(&self.state, &event, &self.engine);
        self.state = state;
        outcome
    }

    /// Select (`selected = true`) or deselect a candidate
    pub fn toggle(&mut self, record: &Record, selected: bool) -> MatchResult<()> {
        self.dispatch(SessionEvent::Toggle {
            record_id: record.id().to_string(),
            selected,
        })
        .map(|_| ())
    }

    /// Whether `record` fits in the remaining total. Never changes state.
    pub fn can_select(&self, record: &Record) -> bool {
        self.state.can_select(record)
    }

    /// Find records summing to `target` among the unselected candidates and
    /// select those that still fit
    pub fn apply_auto_match(&mut self, target: Money) -> MatchResult<AutoMatchReport> {
        match self.dispatch(SessionEvent::AutoMatch { target })? {
            EventOutcome::AutoMatched(report) => Ok(report),
            // transition only answers an auto match with a report
            _ => Err(MatchError::NoMatchFound { target }),
        }
    }

    /// Auto-match against whatever is left of the initial target
    pub fn auto_match(&mut self) -> MatchResult<AutoMatchReport> {
        self.apply_auto_match(self.state.remaining())
    }

    pub fn clear_selection(&mut self) {
        self.state = self.state.cleared();
    }

    pub fn clear_error(&mut self) {
        self.state = self.state.with_error(None);
    }

    /// Current state snapshot for rendering
    pub fn snapshot(&self) -> &SessionState {
        &self.state
    }

    pub fn initial_target(&self) -> Money {
        self.state.initial_target()
    }

    pub fn remaining(&self) -> Money {
        self.state.remaining()
    }

    pub fn selected(&self) -> &[Record] {
        self.state.selected()
    }

    pub fn candidates(&self) -> &[Record] {
        self.state.candidates()
    }

    /// User-facing message for the last rejected event
    pub fn error_message(&self) -> Option<String> {
        self.state.error().map(MatchError::user_message)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn formatted_remaining(&self, formatter: &CurrencyFormatter) -> String {
        formatter.format(self.state.remaining())
    }
}
