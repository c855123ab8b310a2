//! Selection session: remaining-total bookkeeping for one statement line

pub mod controller;
pub mod state;

pub use controller::*;
pub use state::*;
