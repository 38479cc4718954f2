//! Data models for the galert controller

mod galert;
mod rule;

pub use galert::*;
pub use rule::*;
