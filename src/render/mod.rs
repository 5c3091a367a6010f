//! Server-side HTML assembly for the dashboard pages.
//!
//! The pages are self-contained strings: theme CSS inline, images as
//! `data:` URIs, and an auto-reload script on the configured interval.
//! Everything user-sourced goes through [`escape_html`]. Row rendering is
//! infallible by construction; all fallible work (file reads, parsing)
//! happens upstream with null fallbacks, so a bad row can degrade but
//! never abort the page.

mod chart;

pub use chart::line_chart_svg;

use std::collections::{HashMap, HashSet};

use crate::assets::{character_color, podium_style, AssetStore};
use crate::config::AppConfig;
use crate::models::{CumulativeSeries, EntryKey, GroupAggregate, Player, RankedEntry};
use crate::timing::format_seconds;

/// Which sidebar entry is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Leaderboard,
    GroupStats,
}

/// Escape a string for safe embedding in HTML text or attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the ranked leaderboard view.
///
/// `new_keys` marks the rows that get the one-shot entrance animation.
/// `total_results` is the loaded row count before rank filtering, so the
/// empty state can distinguish "no data" from "no parseable times".
pub fn leaderboard_page(
    config: &AppConfig,
    assets: &AssetStore,
    ranked: &[RankedEntry],
    total_results: usize,
    players: &[Player],
    new_keys: &HashSet<EntryKey>,
) -> String {
    let body = if ranked.is_empty() {
        if total_results == 0 {
            info_box("No results yet - add rows to the spreadsheet to get started.")
        } else {
            info_box(&format!(
                "No ranked results yet - {} row(s) loaded, none with a parseable time.",
                total_results
            ))
        }
    } else {
        let roster: HashMap<&str, &Player> =
            players.iter().map(|p| (p.name.as_str(), p)).collect();
        let crown = assets.crown_image();

        let mut cards = String::new();
        for entry in ranked {
            cards.push_str(&leaderboard_card(
                entry,
                &roster,
                assets,
                crown.as_deref(),
                new_keys.contains(&EntryKey::for_result(&entry.result)),
            ));
        }
        format!("<h2>Live Leaderboard</h2>\n{}", cards)
    };

    page_shell(config, assets, Page::Leaderboard, &body)
}

/// Render the group stats view: per-group panels plus the cumulative
/// entries chart.
pub fn stats_page(
    config: &AppConfig,
    assets: &AssetStore,
    aggregates: &[GroupAggregate],
    series: &CumulativeSeries,
) -> String {
    let body = if aggregates.is_empty() {
        info_box("No entries yet - add results to the spreadsheet.")
    } else {
        let mut html = String::from("<h2>Group stats</h2>\n");
        html.push_str(r#"<div class="section-banner">&#11088; Leaderboard by Group &#11088;</div>"#);

        for (i, aggregate) in aggregates.iter().enumerate() {
            html.push_str(&group_panel(aggregate, i));
        }

        if series.is_empty() {
            html.push_str(&info_box(
                "No dated entries yet - add a date column to plot cumulative entries over time.",
            ));
        } else {
            html.push_str("<h3>&#128200; Cumulative Entries Over Time</h3>\n");
            html.push_str(&line_chart_svg(series, 720, 360));
        }
        html
    };

    page_shell(config, assets, Page::GroupStats, &body)
}

fn leaderboard_card(
    entry: &RankedEntry,
    roster: &HashMap<&str, &Player>,
    assets: &AssetStore,
    crown: Option<&str>,
    is_new: bool,
) -> String {
    let result = &entry.result;
    let (border, glow) = podium_style(entry.rank);
    let accent = character_color(result.character.as_deref());
    let time_str = format_seconds(result.time_seconds);

    let mut players_html = String::new();
    for name in [&result.p1, &result.p2] {
        let picture = roster
            .get(name.as_str())
            .and_then(|p| p.picture.as_deref())
            .and_then(|filename| assets.player_image(filename));
        players_html.push_str(&player_tile(
            name,
            picture.as_deref(),
            border,
            glow,
            // Crown only on the winning card, pinned to the first tile.
            if entry.is_winner() && name == &result.p1 {
                crown
            } else {
                None
            },
        ));
    }

    let character_html = match result.character.as_deref() {
        Some(character) => {
            let icon = assets
                .character_image(character)
                .map(|uri| {
                    format!(
                        r#"<img class="char-icon" src="{}" width="90" style="filter:drop-shadow(0 0 6px #000) drop-shadow(0 0 10px {});">"#,
                        uri, accent
                    )
                })
                .unwrap_or_default();
            format!(
                r#"{}<div class="character-name">{}</div>"#,
                icon,
                escape_html(character)
            )
        }
        None => String::new(),
    };

    format!(
        r#"<div class="leaderboard-card{new_class}" style="border-color:{border};background:linear-gradient(135deg,{accent}ee,#ffffffdd);box-shadow:{glow};">
  <div class="leaderboard-rank">#{rank}</div>
  <div class="leaderboard-time">{time}</div>
  <div class="card-players">{players}</div>
  <div class="card-character">{character}</div>
</div>
"#,
        new_class = if is_new { " new-entry" } else { "" },
        border = border,
        accent = accent,
        glow = glow,
        rank = entry.rank,
        time = time_str,
        players = players_html,
        character = character_html,
    )
}

fn player_tile(
    name: &str,
    picture: Option<&str>,
    border: &str,
    glow: &str,
    crown: Option<&str>,
) -> String {
    let image = match picture {
        Some(uri) => format!(r#"<img class="img-round" src="{}">"#, uri),
        None => r#"<div class="img-round img-missing"></div>"#.to_string(),
    };
    let crown_html = crown
        .map(|uri| format!(r#"<img class="crown" src="{}">"#, uri))
        .unwrap_or_default();

    format!(
        r#"<div class="player-tile"><div class="player-frame" style="border-color:{};box-shadow:{};">{}{}</div><div class="player-name">{}</div></div>"#,
        border,
        glow,
        image,
        crown_html,
        escape_html(name),
    )
}

fn group_panel(aggregate: &GroupAggregate, position: usize) -> String {
    // Gold, silver, bronze, then red for the rest.
    let (main, light) = match position {
        0 => ("#FFD700", "#fff8e1"),
        1 => ("#C0C0C0", "#f0f0f0"),
        2 => ("#CD7F32", "#ffe0b2"),
        _ => ("#ff4b4b", "#ffe5e5"),
    };

    format!(
        r#"<div class="group-panel" style="background:linear-gradient(135deg,{main},{light});box-shadow:0 0 10px {main},0 0 20px {light};">
  <b>{group}</b><br>
  <span class="group-time">&#9201; {time}</span>
  <span class="group-count">{count} entries</span>
</div>
"#,
        main = main,
        light = light,
        group = escape_html(&aggregate.group),
        time = format_seconds(aggregate.mean_time_seconds),
        count = aggregate.entry_count,
    )
}

fn info_box(message: &str) -> String {
    format!(r#"<div class="info-box">{}</div>"#, escape_html(message))
}

fn page_shell(config: &AppConfig, assets: &AssetStore, active: Page, body: &str) -> String {
    let background_css = assets
        .background_image()
        .map(|uri| {
            format!(
                "body{{background-image:url(\"{}\");background-size:cover;background-position:center;background-attachment:fixed;}}",
                uri
            )
        })
        .unwrap_or_default();

    let nav_class = |page: Page| if page == active { "nav-link active" } else { "nav-link" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
@import url('https://fonts.googleapis.com/css2?family=Press+Start+2P&display=swap');
html, body, button {{ font-family: 'Press Start 2P', cursive; letter-spacing: 0.03em; }}
body {{ margin: 0; background: #1a1a2e; color: #fff; }}
{background_css}
h1, h2, h3 {{ color: #ffcc00; text-shadow: -2px -2px 0 #000, 2px 2px 0 #000, 0 0 10px #ff0000, 0 0 15px #00ccff; }}
.layout {{ display: flex; min-height: 100vh; }}
.sidebar {{ width: 220px; padding: 1.5rem 1rem; background: rgba(0,0,0,0.75); }}
.nav-link {{ display: block; color: #fff; text-decoration: none; font-size: 0.7rem; padding: 0.8rem; margin-bottom: 0.5rem; border: 2px solid transparent; border-radius: 0.6rem; }}
.nav-link.active {{ border-color: #ffcc00; color: #ffcc00; }}
.content {{ flex: 1; padding: 1.5rem 2rem; }}
.leaderboard-card {{ position: relative; display: flex; align-items: center; gap: 1rem; border-radius: 1.25rem; border: 4px solid; padding: 1rem 1.5rem; margin-bottom: 0.75rem; overflow: hidden; color: #fff; }}
.leaderboard-rank {{ flex: 1; min-width: 5rem; text-align: center; font-size: 1.2rem; filter: drop-shadow(1px 1px 0 #000) drop-shadow(-1px -1px 0 #000); }}
.leaderboard-time {{ flex: 2; text-align: center; font-size: 1rem; filter: drop-shadow(1px 1px 0 #000) drop-shadow(-1px -1px 0 #000); }}
.card-players {{ flex: 5; display: flex; align-items: center; justify-content: center; gap: 2rem; }}
.card-character {{ flex: 2; text-align: center; }}
.character-name {{ font-size: 0.9rem; color: #fff; filter: drop-shadow(1px 1px 0 #000) drop-shadow(-1px -1px 0 #000); }}
.player-tile {{ position: relative; text-align: center; }}
.player-frame {{ position: relative; display: inline-block; border: 4px solid; border-radius: 20%; }}
.img-round {{ border-radius: 16%; width: 70px; height: 100px; object-fit: cover; display: block; image-rendering: pixelated; background: rgba(255,255,255,0.25); }}
.img-missing {{ background: repeating-linear-gradient(45deg, #333, #333 8px, #444 8px, #444 16px); }}
.crown {{ position: absolute; top: -10px; right: -8px; width: 35px; transform: rotate(20deg); }}
.player-name {{ margin-top: 4px; font-size: 0.8rem; color: #fff; filter: drop-shadow(1px 1px 0 #000) drop-shadow(-1px -1px 0 #000); }}
.section-banner {{ background: linear-gradient(135deg, #ff0000cc, #ffcc00cc); border: 3px solid #fff200; box-shadow: 0 0 12px #ff0000, 0 0 20px #00ffff; color: #fff; padding: 0.8rem 1.2rem; border-radius: 1rem; font-size: 0.8rem; text-align: center; text-shadow: 2px 2px 0 #000; margin: 1rem 0; }}
.group-panel {{ border: 3px solid #fff; color: #000; padding: 0.8rem 1.2rem; border-radius: 1rem; font-size: 0.7rem; text-align: center; text-shadow: 1px 1px 0 #fff; margin: 0.5rem 0; }}
.group-time {{ display: block; margin-top: 0.4rem; font-size: 0.75rem; }}
.group-count {{ display: block; margin-top: 0.2rem; font-size: 0.6rem; color: #333; }}
.info-box {{ background: rgba(255,255,255,0.1); border: 2px solid #00ccff; border-radius: 0.8rem; padding: 1rem 1.5rem; font-size: 0.75rem; }}
.chart {{ background: rgba(0,0,0,0.45); border-radius: 0.8rem; padding: 0.5rem; }}
@keyframes riseUp {{ 0% {{ transform: translateY(40px); opacity: 0; }} 100% {{ transform: translateY(0); opacity: 1; }} }}
.new-entry {{ animation: riseUp 0.7s ease-out; }}
</style>
</head>
<body>
<div class="layout">
  <nav class="sidebar">
    <h1>&#127937; {title}</h1>
    <a class="{leaderboard_class}" href="/">Leaderboard</a>
    <a class="{stats_class}" href="/stats">Group stats</a>
  </nav>
  <main class="content">
{body}
  </main>
</div>
<script>setTimeout(function() {{ window.location.reload(); }}, {refresh_ms});</script>
</body>
</html>
"#,
        title = escape_html(&config.dashboard.title),
        background_css = background_css,
        leaderboard_class = nav_class(Page::Leaderboard),
        stats_class = nav_class(Page::GroupStats),
        body = body,
        refresh_ms = config.dashboard.refresh_seconds * 1000,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchResult;

    fn config() -> AppConfig {
        AppConfig::default()
    }

    fn assets() -> AssetStore {
        // Points at default (nonexistent) directories; every image lookup
        // degrades to no image, which the renderer must tolerate.
        AssetStore::new(&config().assets)
    }

    fn ranked(rank: u32, p1: &str, p2: &str, time: f64) -> RankedEntry {
        RankedEntry {
            rank,
            result: MatchResult::new(p1.to_string(), p2.to_string())
                .with_character("Mario")
                .with_time(time),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"a" & 'b'</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_leaderboard_empty_state() {
        let html = leaderboard_page(&config(), &assets(), &[], 0, &[], &HashSet::new());
        assert!(html.contains("No results yet"));
        assert!(html.contains("setTimeout"));
    }

    #[test]
    fn test_leaderboard_all_unranked_state() {
        // Rows loaded, but every time failed to parse: the page must not
        // claim there is no data.
        let html = leaderboard_page(&config(), &assets(), &[], 3, &[], &HashSet::new());
        assert!(!html.contains("No results yet"));
        assert!(html.contains("No ranked results yet"));
        assert!(html.contains("3 row(s) loaded"));
    }

    #[test]
    fn test_leaderboard_cards() {
        let entries = vec![ranked(1, "Alice", "Bob", 65.3), ranked(2, "Carol", "Dave", 70.0)];
        let html = leaderboard_page(&config(), &assets(), &entries, 2, &[], &HashSet::new());

        assert!(html.contains("#1"));
        assert!(html.contains("#2"));
        assert!(html.contains("1:05.30"));
        assert!(html.contains("Alice"));
        assert!(html.contains("Dave"));
        // Nothing flagged new on this render.
        assert!(!html.contains("new-entry\""));
    }

    #[test]
    fn test_leaderboard_marks_new_entries() {
        let entries = vec![ranked(1, "Alice", "Bob", 65.3)];
        let new_keys: HashSet<EntryKey> = entries
            .iter()
            .map(|e| EntryKey::for_result(&e.result))
            .collect();
        let html = leaderboard_page(&config(), &assets(), &entries, 1, &[], &new_keys);

        assert!(html.contains("leaderboard-card new-entry"));
    }

    #[test]
    fn test_leaderboard_escapes_names() {
        let entries = vec![ranked(1, "<script>", "Bob", 65.3)];
        let html = leaderboard_page(&config(), &assets(), &entries, 1, &[], &HashSet::new());

        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_stats_empty_state() {
        let html = stats_page(&config(), &assets(), &[], &CumulativeSeries::default());
        assert!(html.contains("No entries yet"));
    }

    #[test]
    fn test_stats_panels_and_chart_fallback() {
        let aggregates = vec![GroupAggregate {
            group: "Platform".to_string(),
            entry_count: 4,
            mean_time_seconds: Some(35.0),
        }];
        let html = stats_page(&config(), &assets(), &aggregates, &CumulativeSeries::default());

        assert!(html.contains("Platform"));
        assert!(html.contains("35.00"));
        assert!(html.contains("4 entries"));
        // No dated entries: info message instead of the chart.
        assert!(html.contains("No dated entries yet"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_stats_null_mean_renders_dash() {
        let aggregates = vec![GroupAggregate {
            group: "Unknown".to_string(),
            entry_count: 2,
            mean_time_seconds: None,
        }];
        let html = stats_page(&config(), &assets(), &aggregates, &CumulativeSeries::default());

        assert!(html.contains("&#9201; -"));
    }

    #[test]
    fn test_sidebar_active_state() {
        let leaderboard = leaderboard_page(&config(), &assets(), &[], 0, &[], &HashSet::new());
        assert!(leaderboard.contains(r#"class="nav-link active" href="/""#));

        let stats = stats_page(&config(), &assets(), &[], &CumulativeSeries::default());
        assert!(stats.contains(r#"class="nav-link active" href="/stats""#));
    }
}
