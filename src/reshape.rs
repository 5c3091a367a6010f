//! Wide-to-long reshaping of match rows.

use std::collections::HashMap;

use crate::models::{LongEntry, MatchResult, Player};

/// Expand match rows into one entry per participant, joined against the
/// roster.
///
/// Ordering contract: all p1 entries first, then all p2 entries, original
/// match order preserved within each half. Downstream key bookkeeping
/// relies on this being stable across reloads.
///
/// Every match row yields exactly two entries, even when a participant has
/// no roster match (roster fields become null) and even when the time is
/// null. Empty results or an empty roster yield an empty table.
pub fn build_long_entries(results: &[MatchResult], players: &[Player]) -> Vec<LongEntry> {
    if results.is_empty() || players.is_empty() {
        return Vec::new();
    }

    let roster: HashMap<&str, &Player> = players.iter().map(|p| (p.name.as_str(), p)).collect();

    let mut entries = Vec::with_capacity(results.len() * 2);
    for result in results {
        entries.push(long_entry(result, &result.p1, &roster));
    }
    for result in results {
        entries.push(long_entry(result, &result.p2, &roster));
    }
    entries
}

fn long_entry(result: &MatchResult, participant: &str, roster: &HashMap<&str, &Player>) -> LongEntry {
    let player = roster.get(participant);
    LongEntry {
        player: participant.to_string(),
        time_seconds: result.time_seconds,
        character: result.character.clone(),
        date: result.date,
        picture: player.and_then(|p| p.picture.clone()),
        group: player.and_then(|p| p.group.clone()),
    }
}
