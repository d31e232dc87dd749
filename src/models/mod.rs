//! Core data models for the team builder.

mod bracket;
mod formation;
mod match_result;
mod player;
mod stats;
mod team;

pub use bracket::*;
pub use formation::*;
pub use match_result::*;
pub use player::*;
pub use stats::*;
pub use team::*;
