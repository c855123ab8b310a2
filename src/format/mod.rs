//! Presentation helpers consumed by the layer that renders a session

pub mod currency;

pub use currency::*;
