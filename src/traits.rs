//! Traits for the data source seam and candidate validation

use async_trait::async_trait;

use crate::types::*;
use crate::utils::validation::{validate_record, validate_unique_ids};

/// Source of candidate accounting records
///
/// The engine never fetches on its own. A session awaits one call to
/// `fetch_records` and works on the returned snapshot from then on, so any
/// backend (HTTP API, database, fixture file, in-memory) can sit behind this.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch all candidate records
    async fn fetch_records(&self) -> MatchResult<Vec<Record>>;
}

/// Trait for implementing custom candidate validation rules
pub trait RecordValidator: Send + Sync {
    /// Validate a single record before it becomes a candidate
    fn validate_record(&self, record: &Record) -> MatchResult<()>;

    /// Validate the candidate list as a whole
    fn validate_candidates(&self, records: &[Record]) -> MatchResult<()> {
        for record in records {
            self.validate_record(record)?;
        }
        validate_unique_ids(records)
    }
}

/// Default validator: non-empty id, non-negative amount, unique ids
pub struct DefaultRecordValidator;

impl RecordValidator for DefaultRecordValidator {
    fn validate_record(&self, record: &Record) -> MatchResult<()> {
        validate_record(record)
    }
}
