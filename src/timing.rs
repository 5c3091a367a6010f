//! Best-effort race time parsing and display formatting.
//!
//! Source cells are loosely formatted: plain seconds ("45.12"), clock
//! notation ("1:05.30", "1:02:03"), Excel duration cells, or junk
//! ("DNF"). Parsing is total; anything unparseable becomes `None` and is
//! treated as unknown downstream, never as zero.

use calamine::Data;
use once_cell::sync::Lazy;
use regex::Regex;

static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d+):)?(\d+):(\d+(?:\.\d+)?)$").expect("valid clock regex"));

/// Parse a textual time value into seconds.
///
/// Strategies are tried in strict precedence order:
/// 1. empty string -> `None`
/// 2. direct float parse (value is already seconds)
/// 3. `[hh:]mm:ss[.fraction]` clock notation
/// 4. colon-split fallback: 2 segments as `m:s`, 3 as `h:m:s`, each a float
/// 5. `None`
///
/// Negative and non-finite values are rejected to `None`; a match row
/// either carries a valid non-negative time or an unknown.
pub fn parse_time_str(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(v) = s.parse::<f64>() {
        return checked(v);
    }

    if let Some(caps) = CLOCK_RE.captures(s) {
        let h: f64 = caps
            .get(1)
            .map(|m| m.as_str().parse().unwrap_or(0.0))
            .unwrap_or(0.0);
        let m: f64 = caps[2].parse().unwrap_or(0.0);
        let sec: f64 = caps[3].parse().unwrap_or(0.0);
        return checked(h * 3600.0 + m * 60.0 + sec);
    }

    // Looser fallback for segments the clock pattern rejects, e.g. "1:5"
    // with fractional minutes. Any malformed segment aborts the branch.
    if s.contains(':') {
        let parts: Result<Vec<f64>, _> = s.split(':').map(|p| p.trim().parse::<f64>()).collect();
        if let Ok(parts) = parts {
            match parts.len() {
                2 => return checked(parts[0] * 60.0 + parts[1]),
                3 => return checked(parts[0] * 3600.0 + parts[1] * 60.0 + parts[2]),
                _ => {}
            }
        }
    }

    None
}

/// Parse an arbitrary workbook cell into seconds.
///
/// Numeric cells are taken as already-seconds; Excel duration cells
/// convert through their day fraction; strings go through
/// [`parse_time_str`]. Never panics, whatever the cell holds.
pub fn parse_time_cell(cell: &Data) -> Option<f64> {
    match cell {
        Data::Empty => None,
        Data::Float(f) => checked(*f),
        Data::Int(i) => checked(*i as f64),
        Data::String(s) => parse_time_str(s),
        Data::DateTime(dt) => checked(dt.as_f64() * 86_400.0),
        Data::DateTimeIso(s) | Data::DurationIso(s) => parse_time_str(s),
        _ => None,
    }
}

fn checked(v: f64) -> Option<f64> {
    if v.is_finite() && v >= 0.0 {
        Some(v)
    } else {
        None
    }
}

/// Format seconds for display: `M:SS.ff` when minutes are present,
/// `SS.ff` otherwise, always two fractional digits and a two-digit
/// seconds field. Unknown times render as a dash.
pub fn format_seconds(t: Option<f64>) -> String {
    let Some(t) = t else {
        return "-".to_string();
    };
    let m = (t / 60.0).floor() as u64;
    let s = t % 60.0;
    if m > 0 {
        format!("{}:{:05.2}", m, s)
    } else {
        format!("{:05.2}", s)
    }
}
