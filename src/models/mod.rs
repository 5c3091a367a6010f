//! Core data models for the leaderboard pipeline.

mod aggregate;
mod keys;
mod long_entry;
mod match_result;
mod player;

pub use aggregate::*;
pub use keys::*;
pub use long_entry::*;
pub use match_result::*;
pub use player::*;
