//! Workbook loading and schema normalization.
//!
//! The source of truth is a single Excel workbook with a results sheet
//! and a players sheet. Column headers are matched case-insensitively
//! and whitespace-trimmed once at load time, then rows are mapped into
//! the fixed model structs. Rows missing a required field are
//! quarantined (counted and warned about) instead of carrying ambiguous
//! nulls further into the pipeline.
//!
//! An absent workbook is a deliberate "no data yet" state and yields
//! empty tables, not an error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::DataConfig;
use crate::models::{MatchResult, Player};
use crate::timing::parse_time_cell;

/// Errors that can occur while reading the workbook.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The two normalized tables plus load diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub results: Vec<MatchResult>,
    pub players: Vec<Player>,

    /// Result rows dropped for a missing participant field
    pub quarantined_results: u32,

    /// Roster rows dropped for a missing name
    pub quarantined_players: u32,
}

impl Tables {
    /// Rows whose time cell could not be parsed.
    pub fn unparsed_times(&self) -> u32 {
        self.results
            .iter()
            .filter(|r| r.raw_time.is_some() && r.time_seconds.is_none())
            .count() as u32
    }
}

/// Read both sheets from the workbook at `path`.
pub fn read_workbook(path: &Path, config: &DataConfig) -> Result<Tables, LoadError> {
    if !path.exists() {
        debug!("Workbook {} not found, serving empty tables", path.display());
        return Ok(Tables::default());
    }

    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let mut tables = Tables::default();

    if let Some(range) = sheet_range(&mut workbook, &config.results_sheet)? {
        let (results, quarantined) = results_from_rows(range.rows());
        tables.results = results;
        tables.quarantined_results = quarantined;
    }

    if let Some(range) = sheet_range(&mut workbook, &config.players_sheet)? {
        let (players, quarantined) = players_from_rows(range.rows());
        tables.players = players;
        tables.quarantined_players = quarantined;
    }

    debug!(
        results = tables.results.len(),
        players = tables.players.len(),
        quarantined = tables.quarantined_results + tables.quarantined_players,
        "Workbook loaded"
    );

    Ok(tables)
}

/// Find a sheet by case-insensitive name. A missing sheet is non-fatal.
fn sheet_range(
    workbook: &mut Xlsx<std::io::BufReader<std::fs::File>>,
    name: &str,
) -> Result<Option<calamine::Range<Data>>, LoadError> {
    let wanted = name.trim().to_lowercase();
    let actual = workbook
        .sheet_names()
        .iter()
        .find(|s| s.trim().to_lowercase() == wanted)
        .cloned();

    match actual {
        Some(actual) => Ok(Some(workbook.worksheet_range(&actual)?)),
        None => {
            warn!("Sheet '{}' not found in workbook", name);
            Ok(None)
        }
    }
}

/// Map normalized header names (trimmed, lowercased) to column indices.
fn header_index(header: &[Data]) -> HashMap<String, usize> {
    header
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| cell_to_string(cell).map(|name| (name.to_lowercase(), i)))
        .collect()
}

/// Build match results from raw sheet rows (header row first).
///
/// Required: both participant columns. Rows failing that are quarantined.
pub(crate) fn results_from_rows<'a>(
    mut rows: impl Iterator<Item = &'a [Data]>,
) -> (Vec<MatchResult>, u32) {
    let Some(header) = rows.next() else {
        return (Vec::new(), 0);
    };
    let columns = header_index(header);

    let mut results = Vec::new();
    let mut quarantined = 0u32;

    for row in rows {
        if row_is_blank(row) {
            continue;
        }

        let p1 = columns.get("p1").and_then(|&i| cell_string(row, i));
        let p2 = columns.get("p2").and_then(|&i| cell_string(row, i));

        let (Some(p1), Some(p2)) = (p1, p2) else {
            quarantined += 1;
            warn!("Quarantined result row with missing participant");
            continue;
        };

        let time_cell = columns.get("time").and_then(|&i| row.get(i));

        results.push(MatchResult {
            p1,
            p2,
            character: columns.get("character").and_then(|&i| cell_string(row, i)),
            raw_time: time_cell.and_then(cell_to_string),
            date: columns
                .get("date")
                .and_then(|&i| row.get(i))
                .and_then(parse_date_cell),
            time_seconds: time_cell.and_then(parse_time_cell),
        });
    }

    (results, quarantined)
}

/// Build roster entries from raw sheet rows (header row first).
///
/// Required: the player name column. The group label comes from the
/// "service line" column.
pub(crate) fn players_from_rows<'a>(
    mut rows: impl Iterator<Item = &'a [Data]>,
) -> (Vec<Player>, u32) {
    let Some(header) = rows.next() else {
        return (Vec::new(), 0);
    };
    let columns = header_index(header);

    let mut players = Vec::new();
    let mut quarantined = 0u32;

    for row in rows {
        if row_is_blank(row) {
            continue;
        }

        let Some(name) = columns.get("player").and_then(|&i| cell_string(row, i)) else {
            quarantined += 1;
            warn!("Quarantined roster row with missing player name");
            continue;
        };

        players.push(Player {
            name,
            picture: columns.get("picture").and_then(|&i| cell_string(row, i)),
            group: columns
                .get("service line")
                .and_then(|&i| cell_string(row, i)),
        });
    }

    (players, quarantined)
}

fn row_is_blank(row: &[Data]) -> bool {
    row.iter().all(|c| cell_to_string(c).is_none())
}

fn cell_string(row: &[Data], index: usize) -> Option<String> {
    row.get(index).and_then(cell_to_string)
}

/// Render a cell as a trimmed non-empty string, or `None`.
fn cell_to_string(cell: &Data) -> Option<String> {
    let s = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Empty | Data::Error(_) => String::new(),
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Parse a date cell, day-first for textual dates ("21/06/2025") with an
/// ISO fallback. Unparseable dates become `None`.
fn parse_date_cell(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().map(|d| d.date()),
        Data::String(s) => {
            let s = s.trim();
            // Strip any time-of-day suffix
            let day = s.split_whitespace().next().unwrap_or(s);
            NaiveDate::parse_from_str(day, "%d/%m/%Y")
                .or_else(|_| NaiveDate::parse_from_str(day, "%d/%m/%y"))
                .or_else(|_| NaiveDate::parse_from_str(day, "%Y-%m-%d"))
                .ok()
        }
        Data::DateTimeIso(s) => {
            let day = s.split('T').next().unwrap_or(s);
            NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
        }
        _ => None,
    }
}

/// A TTL cache around [`read_workbook`].
///
/// Every page hit recomputes the whole pipeline, so the workbook read is
/// cached for a few seconds to keep fine-grained refreshes from hammering
/// the file. The cache is global and keyed on nothing; a redundant
/// recompute is harmless.
pub struct CachedLoader {
    workbook: PathBuf,
    config: DataConfig,
    ttl: Duration,
    cache: Mutex<Option<(Instant, Tables)>>,
}

impl CachedLoader {
    pub fn new(config: DataConfig) -> Self {
        Self {
            workbook: config.workbook.clone(),
            ttl: Duration::from_secs(config.cache_ttl_seconds),
            config,
            cache: Mutex::new(None),
        }
    }

    /// Return the cached tables, re-reading the workbook when stale.
    pub fn load(&self) -> Result<Tables, LoadError> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());

        if let Some((loaded_at, tables)) = cache.as_ref() {
            if loaded_at.elapsed() < self.ttl {
                return Ok(tables.clone());
            }
        }

        let tables = read_workbook(&self.workbook, &self.config)?;
        *cache = Some((Instant::now(), tables.clone()));
        Ok(tables)
    }

    /// Seed the cache directly, bypassing the workbook read.
    #[cfg(test)]
    pub(crate) fn prime(&self, tables: Tables) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        *cache = Some((Instant::now(), tables));
    }
}
