//! Derived group statistics models.

use chrono::NaiveDate;
use serde::Serialize;

/// Aggregate statistics for one group label.
#[derive(Debug, Clone, Serialize)]
pub struct GroupAggregate {
    /// Group label
    pub group: String,

    /// Number of long-form entries in the group, null times included
    pub entry_count: u32,

    /// Mean of the non-null times. A group whose times are all null gets
    /// `None`, never zero.
    pub mean_time_seconds: Option<f64>,
}

/// Cumulative entry counts over time, one series per group.
///
/// `dates` is the sorted union of dates that have at least one entry;
/// dates with no entries anywhere do not appear. Within a series, a point
/// is `None` before the group's first entry and forward-filled with the
/// last known cumulative count afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CumulativeSeries {
    pub dates: Vec<NaiveDate>,
    pub groups: Vec<GroupSeries>,
}

/// One group's cumulative counts, aligned with [`CumulativeSeries::dates`].
#[derive(Debug, Clone, Serialize)]
pub struct GroupSeries {
    pub group: String,
    pub values: Vec<Option<u32>>,
}

impl CumulativeSeries {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.groups.is_empty()
    }

    /// Largest cumulative value across all series, for chart scaling.
    pub fn max_value(&self) -> u32 {
        self.groups
            .iter()
            .flat_map(|g| g.values.iter().flatten())
            .copied()
            .max()
            .unwrap_or(0)
    }
}
