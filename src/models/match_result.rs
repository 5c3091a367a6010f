//! Match result model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One recorded race between two participants.
///
/// Rows are immutable once loaded and rebuilt wholesale on every reload;
/// there is no incremental update path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// First participant (player name, roster key)
    pub p1: String,

    /// Second participant
    pub p2: String,

    /// Selected character/avatar label
    pub character: Option<String>,

    /// Raw time cell as it appeared in the source, for diagnostics
    pub raw_time: Option<String>,

    /// Date the race was run
    pub date: Option<NaiveDate>,

    /// Canonical race time in seconds. `None` means the raw value was
    /// absent or unparseable; it sorts and aggregates as unknown, never
    /// as zero.
    pub time_seconds: Option<f64>,
}

impl MatchResult {
    /// Create a result with just the required participants set.
    pub fn new(p1: String, p2: String) -> Self {
        Self {
            p1,
            p2,
            character: None,
            raw_time: None,
            date: None,
            time_seconds: None,
        }
    }

    /// Builder method to set the character label.
    pub fn with_character(mut self, character: &str) -> Self {
        self.character = Some(character.to_string());
        self
    }

    /// Builder method to set the parsed time.
    pub fn with_time(mut self, seconds: f64) -> Self {
        self.time_seconds = Some(seconds);
        self
    }

    /// Builder method to set the race date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// A match row paired with its 1-based leaderboard position.
///
/// Produced by [`crate::calculate::rank_results`]; rows with a null time
/// never appear here.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    /// Leaderboard position (1 = fastest)
    pub rank: u32,

    /// The underlying match row
    pub result: MatchResult,
}

impl RankedEntry {
    /// Podium finishes (top 3) get distinct card styling.
    pub fn is_podium(&self) -> bool {
        self.rank <= 3
    }

    pub fn is_winner(&self) -> bool {
        self.rank == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let result = MatchResult::new("Alice".to_string(), "Bob".to_string())
            .with_character("Mario")
            .with_time(65.3)
            .with_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());

        assert_eq!(result.p1, "Alice");
        assert_eq!(result.character.as_deref(), Some("Mario"));
        assert_eq!(result.time_seconds, Some(65.3));
    }

    #[test]
    fn test_defaults_are_null() {
        let result = MatchResult::new("Alice".to_string(), "Bob".to_string());
        assert!(result.time_seconds.is_none());
        assert!(result.character.is_none());
        assert!(result.date.is_none());
    }

    #[test]
    fn test_podium() {
        let make = |rank| RankedEntry {
            rank,
            result: MatchResult::new("A".to_string(), "B".to_string()),
        };
        assert!(make(1).is_winner());
        assert!(make(3).is_podium());
        assert!(!make(4).is_podium());
    }

    #[test]
    fn test_serialization_round_trip() {
        let result = MatchResult::new("Alice".to_string(), "Bob".to_string()).with_time(45.12);
        let json = serde_json::to_string(&result).unwrap();
        let back: MatchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.p1, "Alice");
        assert_eq!(back.time_seconds, Some(45.12));
    }
}
