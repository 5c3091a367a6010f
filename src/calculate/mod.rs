//! Rankings and per-group aggregate statistics.
//!
//! All functions here are pure over their inputs; they run on every page
//! hit against the freshly loaded tables.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::models::{
    CumulativeSeries, GroupAggregate, GroupSeries, LongEntry, MatchResult, RankedEntry,
};

/// Rank match rows by ascending time.
///
/// Rows with a null time are excluded outright, not ranked last. Ties
/// keep original workbook row order; that tie-break is a contract, hence
/// the stable sort.
pub fn rank_results(results: &[MatchResult]) -> Vec<RankedEntry> {
    let mut timed: Vec<&MatchResult> = results
        .iter()
        .filter(|r| r.time_seconds.is_some())
        .collect();

    // Parsed times are finite by construction, so the comparison is total.
    timed.sort_by(|a, b| {
        a.time_seconds
            .partial_cmp(&b.time_seconds)
            .unwrap_or(Ordering::Equal)
    });

    timed
        .into_iter()
        .enumerate()
        .map(|(i, result)| RankedEntry {
            rank: (i + 1) as u32,
            result: result.clone(),
        })
        .collect()
}

/// Per-group entry counts and mean times.
///
/// Entries without a group label are skipped. Counts include null-time
/// entries; means cover only the non-null times, and an all-null group
/// gets a null mean rather than zero. Output is sorted fastest group
/// first (null means last), name as tie-break.
pub fn group_aggregates(entries: &[LongEntry]) -> Vec<GroupAggregate> {
    let mut counts: HashMap<&str, (u32, Vec<f64>)> = HashMap::new();

    for entry in entries {
        let Some(group) = entry.group.as_deref() else {
            continue;
        };
        let slot = counts.entry(group).or_default();
        slot.0 += 1;
        if let Some(t) = entry.time_seconds {
            slot.1.push(t);
        }
    }

    let mut aggregates: Vec<GroupAggregate> = counts
        .into_iter()
        .map(|(group, (entry_count, times))| GroupAggregate {
            group: group.to_string(),
            entry_count,
            mean_time_seconds: mean(&times),
        })
        .collect();

    aggregates.sort_by(|a, b| {
        match (a.mean_time_seconds, b.mean_time_seconds) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| a.group.cmp(&b.group))
    });

    aggregates
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Cumulative entry counts over time, one series per group.
///
/// Entries missing a date or group are dropped from the series (they
/// still count in [`group_aggregates`]). Dates with no entries anywhere
/// are a gap, not a zero row; within a series, dates after the group's
/// first entry are forward-filled with the last cumulative value. Never
/// backward-filled, never interpolated.
pub fn cumulative_series(entries: &[LongEntry]) -> CumulativeSeries {
    // (date, group) -> count, dates kept sorted by the BTreeMap
    let mut buckets: BTreeMap<NaiveDate, HashMap<&str, u32>> = BTreeMap::new();
    let mut group_names: BTreeSet<&str> = BTreeSet::new();

    for entry in entries {
        let (Some(date), Some(group)) = (entry.date, entry.group.as_deref()) else {
            continue;
        };
        *buckets.entry(date).or_default().entry(group).or_default() += 1;
        group_names.insert(group);
    }

    let dates: Vec<NaiveDate> = buckets.keys().copied().collect();

    let groups = group_names
        .into_iter()
        .map(|group| {
            let mut running = 0u32;
            let mut seen = false;
            let values = buckets
                .values()
                .map(|day| {
                    if let Some(count) = day.get(group) {
                        running += count;
                        seen = true;
                    }
                    seen.then_some(running)
                })
                .collect();
            GroupSeries {
                group: group.to_string(),
                values,
            }
        })
        .collect();

    CumulativeSeries { dates, groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(p1: &str, time: Option<f64>) -> MatchResult {
        MatchResult {
            p1: p1.to_string(),
            p2: "other".to_string(),
            character: None,
            raw_time: None,
            date: None,
            time_seconds: time,
        }
    }

    fn entry(group: Option<&str>, time: Option<f64>, date: Option<(i32, u32, u32)>) -> LongEntry {
        LongEntry {
            player: "p".to_string(),
            time_seconds: time,
            character: None,
            date: date.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            picture: None,
            group: group.map(|g| g.to_string()),
        }
    }

    #[test]
    fn test_rank_ascending() {
        let results = vec![
            result("mid", Some(70.0)),
            result("fast", Some(65.3)),
            result("slow", Some(80.0)),
        ];
        let ranked = rank_results(&results);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].result.p1, "fast");
        assert_eq!(ranked[2].result.p1, "slow");

        for pair in ranked.windows(2) {
            assert!(pair[0].result.time_seconds <= pair[1].result.time_seconds);
        }
    }

    #[test]
    fn test_rank_excludes_null_times() {
        let results = vec![
            result("timed", Some(70.0)),
            result("dnf", None),
        ];
        let ranked = rank_results(&results);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].result.p1, "timed");
    }

    #[test]
    fn test_rank_tie_break_keeps_row_order() {
        let results = vec![
            result("first", Some(70.0)),
            result("second", Some(70.0)),
            result("third", Some(70.0)),
        ];
        let ranked = rank_results(&results);

        let order: Vec<&str> = ranked.iter().map(|r| r.result.p1.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_results(&[]).is_empty());
    }

    #[test]
    fn test_aggregates_mean_excludes_nulls() {
        let entries = vec![
            entry(Some("Platform"), Some(30.0), None),
            entry(Some("Platform"), None, None),
            entry(Some("Platform"), Some(40.0), None),
        ];
        let aggregates = group_aggregates(&entries);

        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].entry_count, 3);
        assert_eq!(aggregates[0].mean_time_seconds, Some(35.0));
    }

    #[test]
    fn test_aggregates_all_null_group() {
        let entries = vec![
            entry(Some("Platform"), None, None),
            entry(Some("Platform"), None, None),
        ];
        let aggregates = group_aggregates(&entries);

        assert_eq!(aggregates[0].entry_count, 2);
        assert_eq!(aggregates[0].mean_time_seconds, None);
    }

    #[test]
    fn test_aggregates_sorted_fastest_first_nulls_last() {
        let entries = vec![
            entry(Some("Slow"), Some(90.0), None),
            entry(Some("Fast"), Some(30.0), None),
            entry(Some("Unknown"), None, None),
        ];
        let aggregates = group_aggregates(&entries);

        let order: Vec<&str> = aggregates.iter().map(|a| a.group.as_str()).collect();
        assert_eq!(order, vec!["Fast", "Slow", "Unknown"]);
    }

    #[test]
    fn test_aggregates_skip_unlabelled() {
        let entries = vec![entry(None, Some(30.0), None)];
        assert!(group_aggregates(&entries).is_empty());
    }

    #[test]
    fn test_cumulative_running_sum_and_ffill() {
        let entries = vec![
            entry(Some("A"), None, Some((2025, 6, 1))),
            entry(Some("A"), None, Some((2025, 6, 1))),
            entry(Some("B"), None, Some((2025, 6, 2))),
            entry(Some("A"), None, Some((2025, 6, 3))),
        ];
        let series = cumulative_series(&entries);

        assert_eq!(series.dates.len(), 3);
        assert_eq!(series.groups.len(), 2);

        let a = series.groups.iter().find(|g| g.group == "A").unwrap();
        // Day 2 has no A entries: forward-filled, not zeroed.
        assert_eq!(a.values, vec![Some(2), Some(2), Some(3)]);

        let b = series.groups.iter().find(|g| g.group == "B").unwrap();
        // B has not appeared yet on day 1: gap, not zero.
        assert_eq!(b.values, vec![None, Some(1), Some(1)]);
    }

    #[test]
    fn test_cumulative_drops_dateless_and_ungrouped() {
        let entries = vec![
            entry(Some("A"), None, None),
            entry(None, None, Some((2025, 6, 1))),
        ];
        let series = cumulative_series(&entries);
        assert!(series.is_empty());
    }
}
