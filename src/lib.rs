//! # Kartboard
//!
//! A live-refreshing leaderboard dashboard for head-to-head race results.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (match rows, roster, derived tables)
//! - **timing**: Best-effort race time parsing and display formatting
//! - **load**: Workbook reading, schema normalization, TTL read cache
//! - **reshape**: Wide match rows into long per-participant entries
//! - **calculate**: Rankings and per-group aggregate statistics
//! - **detect**: Session-scoped new-entry detection for animations
//! - **assets**: Player/character image resolution and embedding
//! - **render**: Server-side HTML/SVG page assembly
//! - **api**: HTTP endpoints and shared state
//! - **config**: Configuration loading and validation

pub mod api;
pub mod assets;
pub mod calculate;
pub mod config;
pub mod detect;
pub mod load;
pub mod models;
pub mod render;
pub mod reshape;
pub mod timing;

pub use models::*;
