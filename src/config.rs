//! Engine configuration: strategy choice, search bounds and currency settings

use serde::{Deserialize, Serialize};

use crate::matching::MatchStrategy;
use crate::types::*;

/// Upper bounds on the inputs the subset strategies will accept
///
/// Inputs above a bound are rejected with `SearchBoundExceeded`, never
/// truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBounds {
    /// Largest target (in minor units) the dynamic programming table may cover
    pub max_dp_target_minor_units: i64,
    /// Largest candidate count the backtracking search may explore
    pub max_backtracking_candidates: usize,
    /// Largest candidate count the greedy pass may sort
    pub max_greedy_candidates: usize,
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self {
            max_dp_target_minor_units: 10_000_000,
            max_backtracking_candidates: 25,
            max_greedy_candidates: 100_000,
        }
    }
}

impl SearchBounds {
    /// No limits at all; only for callers that bound their inputs themselves
    pub fn unbounded() -> Self {
        Self {
            max_dp_target_minor_units: i64::MAX,
            max_backtracking_candidates: usize::MAX,
            max_greedy_candidates: usize::MAX,
        }
    }
}

/// Currency used at the ingestion and display boundaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencySettings {
    /// ISO 4217 code
    pub code: String,
    /// Digits after the decimal point that one minor unit represents
    pub minor_unit_digits: u32,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            code: "USD".to_string(),
            minor_unit_digits: 2,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Subset strategy used when the exact lookup misses
    pub strategy: MatchStrategy,
    pub bounds: SearchBounds,
    pub currency: CurrencySettings,
}

impl EngineConfig {
    /// Default configuration using the given subset strategy
    pub fn with_strategy(strategy: MatchStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json_str(json: &str) -> MatchResult<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| MatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> MatchResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| MatchError::Config(e.to_string()))
    }

    pub fn validate(&self) -> MatchResult<()> {
        if self.bounds.max_dp_target_minor_units <= 0 {
            return Err(MatchError::Config(
                "max_dp_target_minor_units must be positive".to_string(),
            ));
        }

        if self.bounds.max_backtracking_candidates == 0 || self.bounds.max_greedy_candidates == 0
        {
            return Err(MatchError::Config(
                "candidate bounds must be at least 1".to_string(),
            ));
        }

        if self.currency.code.trim().len() != 3 {
            return Err(MatchError::Config(format!(
                "currency code '{}' is not a three letter ISO code",
                self.currency.code
            )));
        }

        // Six digits covers every ISO currency and keeps 10^digits well inside i64
        if self.currency.minor_unit_digits > 6 {
            return Err(MatchError::Config(format!(
                "unsupported minor unit digits: {}",
                self.currency.minor_unit_digits
            )));
        }

        Ok(())
    }
}
