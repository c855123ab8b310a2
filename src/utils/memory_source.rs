//! In-memory record source for testing and development

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory record source for testing and development
#[derive(Debug, Clone)]
pub struct MemoryRecordSource {
    records: Arc<RwLock<Vec<Record>>>,
}

impl MemoryRecordSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a source serving the given records in order
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Create a source holding the sample sales invoices
    ///
    /// Two of them share the amount 249.00, so the exact-match index can only
    /// hold one of the pair.
    pub fn with_sample_records() -> Self {
        let sample = [
            ("1", "City Limousines", "30 Aug", 24900),
            ("2", "City Limousines", "30 Aug", 24900),
            ("3", "Ridgeway University", "12 Sep", 61850),
            ("4", "Cube Land", "22 Sep", 49500),
            ("5", "Bayside Club", "23 Sep", 23400),
            ("6", "SMART Agency", "12 Sep", 25000),
            ("7", "PowerDirect", "11 Sep", 10860),
            ("8", "PC Complete", "17 Sep", 21699),
            ("9", "Truxton Properties", "17 Sep", 18125),
            ("10", "MCO Cleaning Services", "17 Sep", 17050),
            ("11", "Gateway Motors", "18 Sep", 41135),
        ];

        Self::with_records(
            sample
                .iter()
                .map(|(id, counterparty, date, cents)| {
                    Record::new(
                        *id,
                        *counterparty,
                        *date,
                        Money::from_minor(*cents),
                        "Sales Invoice",
                    )
                })
                .collect(),
        )
    }

    /// Append a record
    pub fn push(&self, record: Record) -> MatchResult<()> {
        self.records
            .write()
            .map_err(|e| MatchError::Source(e.to_string()))?
            .push(record);
        Ok(())
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> MatchResult<()> {
        self.records
            .write()
            .map_err(|e| MatchError::Source(e.to_string()))?
            .clear();
        Ok(())
    }
}

impl Default for MemoryRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordSource for MemoryRecordSource {
    async fn fetch_records(&self) -> MatchResult<Vec<Record>> {
        let records = self
            .records
            .read()
            .map_err(|e| MatchError::Source(e.to_string()))?;
        Ok(records.clone())
    }
}
