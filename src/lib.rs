//! # Bank Reconciliation Match Core
//!
//! Matches a bank statement line against candidate accounting records
//! (invoices and bills) by finding one record, or a set of records, whose
//! amounts add up exactly to the statement amount.
//!
//! ## Features
//!
//! - **Exact money arithmetic**: amounts are integer minor units, converted from decimals once
//! - **Candidate index**: O(1) exact-amount lookup over the records that fit the target
//! - **Match strategies**: dynamic programming, backtracking and greedy subset search behind an exact lookup
//! - **Selection session**: remaining-total bookkeeping shared by manual toggles and automatic matches
//! - **Source abstraction**: candidates come from any [`RecordSource`] implementation
//!
//! ## Quick Start
//!
//! ```rust
//! use bankrec_core::{EngineConfig, MatchStrategy, Money, Record, SelectionSession};
//!
//! let records = vec![
//!     Record::new("1", "Cube Land", "22 Sep", Money::parse("100.00", 2).unwrap(), "Sales Invoice"),
//!     Record::new("2", "PowerDirect", "11 Sep", Money::parse("200.00", 2).unwrap(), "Sales Invoice"),
//! ];
//! let config = EngineConfig::with_strategy(MatchStrategy::DynamicProgramming);
//! let mut session =
//!     SelectionSession::new(records, Money::parse("300.00", 2).unwrap(), config).unwrap();
//!
//! let report = session.auto_match().unwrap();
//! assert_eq!(report.applied.len(), 2);
//! assert_eq!(session.remaining(), Money::ZERO);
//! ```

pub mod config;
pub mod format;
pub mod matching;
pub mod session;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use format::*;
pub use matching::*;
pub use session::*;
pub use traits::*;
pub use types::*;
