//! Long-form (per-participant) entry model.

use chrono::NaiveDate;
use serde::Serialize;

/// One row per (match, participant) pair with roster metadata joined in.
///
/// Produced fresh on every reload by the reshaper. Roster fields are null
/// when the participant has no roster entry; the row itself is never
/// dropped.
#[derive(Debug, Clone, Serialize)]
pub struct LongEntry {
    /// Participant name
    pub player: String,

    /// Race time in seconds, null when unknown
    pub time_seconds: Option<f64>,

    /// Character label from the match row
    pub character: Option<String>,

    /// Race date from the match row
    pub date: Option<NaiveDate>,

    /// Picture filename joined from the roster
    pub picture: Option<String>,

    /// Group label joined from the roster
    pub group: Option<String>,
}
