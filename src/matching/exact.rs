//! Single-record exact match

use super::CandidateIndex;
use crate::types::*;

/// Find one record whose amount equals `target`
///
/// A zero target is matched by the empty set.
pub fn find_exact(index: &CandidateIndex, target: Money) -> Option<Vec<Record>> {
    if target.is_zero() {
        return Some(Vec::new());
    }
    index.lookup_exact(target).map(|record| vec![record.clone()])
}
