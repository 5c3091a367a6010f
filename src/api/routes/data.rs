//! JSON data endpoints backing the dashboard views.

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{cumulative_series, group_aggregates, rank_results};
use crate::models::{CumulativeSeries, GroupAggregate};
use crate::reshape::build_long_entries;
use crate::timing::format_seconds;

#[derive(Debug, Serialize)]
pub struct RankedRow {
    pub rank: u32,
    pub p1: String,
    pub p2: String,
    pub character: Option<String>,
    pub time_seconds: f64,
    pub time_display: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<RankedRow>,
    pub total_results: u32,
    pub unranked_results: u32,
}

/// `GET /api/leaderboard` - ranked rows, fastest first.
pub async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let tables = state.loader.load()?;
    let ranked = rank_results(&tables.results);

    let entries: Vec<RankedRow> = ranked
        .into_iter()
        .map(|entry| RankedRow {
            rank: entry.rank,
            time_display: format_seconds(entry.result.time_seconds),
            // Ranked rows always carry a time; rank_results filters nulls.
            time_seconds: entry.result.time_seconds.unwrap_or_default(),
            p1: entry.result.p1,
            p2: entry.result.p2,
            character: entry.result.character,
            date: entry.result.date,
        })
        .collect();

    let total = tables.results.len() as u32;
    let ranked_count = entries.len() as u32;

    Ok(Json(LeaderboardResponse {
        entries,
        total_results: total,
        unranked_results: total - ranked_count,
    }))
}

#[derive(Debug, Serialize)]
pub struct GroupStatsResponse {
    pub groups: Vec<GroupAggregate>,
    pub series: CumulativeSeries,
}

/// `GET /api/groups` - aggregates plus the cumulative series.
pub async fn groups(State(state): State<AppState>) -> Result<Json<GroupStatsResponse>, ApiError> {
    let tables = state.loader.load()?;
    let entries = build_long_entries(&tables.results, &tables.players);

    Ok(Json(GroupStatsResponse {
        groups: group_aggregates(&entries),
        series: cumulative_series(&entries),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::config::AppConfig;
    use crate::load::Tables;
    use crate::models::{MatchResult, Player};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn state_with(tables: Tables) -> AppState {
        let mut config = AppConfig::default();
        config.data.workbook = std::path::PathBuf::from("/nonexistent/results.xlsx");
        let state = AppState::new(config);
        state.loader.prime(tables);
        state
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(state_with(Tables::default()));
        let (status, json) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_leaderboard_json() {
        let tables = Tables {
            results: vec![
                MatchResult::new("Alice".to_string(), "Bob".to_string()).with_time(65.3),
                MatchResult::new("Carol".to_string(), "Dave".to_string()).with_time(59.0),
                MatchResult {
                    raw_time: Some("DNF".to_string()),
                    ..MatchResult::new("Eve".to_string(), "Frank".to_string())
                },
            ],
            ..Default::default()
        };
        let app = build_router(state_with(tables));
        let (status, json) = get_json(app, "/api/leaderboard").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_results"], 3);
        assert_eq!(json["unranked_results"], 1);

        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["rank"], 1);
        assert_eq!(entries[0]["p1"], "Carol");
        assert_eq!(entries[1]["time_display"], "1:05.30");
    }

    #[tokio::test]
    async fn test_leaderboard_json_empty() {
        let app = build_router(state_with(Tables::default()));
        let (status, json) = get_json(app, "/api/leaderboard").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["entries"].as_array().unwrap().len(), 0);
        assert_eq!(json["total_results"], 0);
    }

    #[tokio::test]
    async fn test_groups_json() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
        let tables = Tables {
            results: vec![MatchResult::new("Alice".to_string(), "Bob".to_string())
                .with_time(30.0)
                .with_date(date)],
            players: vec![
                Player::new("Alice".to_string()).with_group("Platform"),
                Player::new("Bob".to_string()).with_group("Platform"),
            ],
            ..Default::default()
        };
        let app = build_router(state_with(tables));
        let (status, json) = get_json(app, "/api/groups").await;

        assert_eq!(status, StatusCode::OK);
        let groups = json["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["group"], "Platform");
        assert_eq!(groups[0]["entry_count"], 2);
        assert_eq!(groups[0]["mean_time_seconds"], 30.0);

        let dates = json["series"]["dates"].as_array().unwrap();
        assert_eq!(dates.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = build_router(state_with(Tables::default()));
        let (status, _) = get_json(app, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
