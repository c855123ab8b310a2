//! Validation utilities

use std::collections::HashSet;

use crate::traits::*;
use crate::types::*;

/// Validate that a target amount is strictly positive
pub fn validate_target(target: Money) -> MatchResult<()> {
    if target <= Money::ZERO {
        Err(MatchError::InvalidTarget(target))
    } else {
        Ok(())
    }
}

/// Validate the fields the engine relies on
pub fn validate_record(record: &Record) -> MatchResult<()> {
    if record.id().trim().is_empty() {
        return Err(MatchError::Validation(
            "Record ID cannot be empty".to_string(),
        ));
    }

    if record.amount().is_negative() {
        return Err(MatchError::Validation(format!(
            "Record '{}' has a negative amount: {}",
            record.id(),
            record.amount()
        )));
    }

    Ok(())
}

/// Validate that no two records share an id
pub fn validate_unique_ids(records: &[Record]) -> MatchResult<()> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.id()) {
            return Err(MatchError::Validation(format!(
                "Record ID '{}' appears more than once",
                record.id()
            )));
        }
    }
    Ok(())
}

/// Strict validator that also requires the descriptive fields
pub struct StrictRecordValidator;

impl RecordValidator for StrictRecordValidator {
    fn validate_record(&self, record: &Record) -> MatchResult<()> {
        validate_record(record)?;

        if record.counterparty().trim().is_empty() {
            return Err(MatchError::Validation(format!(
                "Record '{}' has no counterparty",
                record.id()
            )));
        }

        if record.doc_type().trim().is_empty() {
            return Err(MatchError::Validation(format!(
                "Record '{}' has no document type",
                record.id()
            )));
        }

        Ok(())
    }
}
