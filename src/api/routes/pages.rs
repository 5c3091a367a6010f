//! HTML dashboard pages.

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Response};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{cumulative_series, group_aggregates, rank_results};
use crate::models::EntryKey;
use crate::render;
use crate::reshape::build_long_entries;

const SESSION_COOKIE: &str = "kb_session";

/// Extract the session cookie, if the browser sent one.
fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// `GET /` - the ranked leaderboard.
///
/// New-entry animation state is scoped to a session cookie issued on the
/// first hit; concurrent sessions never interact.
pub async fn leaderboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let tables = state.loader.load()?;
    let ranked = rank_results(&tables.results);
    let keys: Vec<EntryKey> = ranked
        .iter()
        .map(|entry| EntryKey::for_result(&entry.result))
        .collect();

    let (session, issued) = match session_from_headers(&headers) {
        Some(session) => (session, false),
        None => (Uuid::new_v4().to_string(), true),
    };

    let new_keys = {
        let mut sessions = state.sessions.write().await;
        sessions.observe(&session, &keys)
    };

    let html = render::leaderboard_page(
        &state.config,
        &state.assets,
        &ranked,
        tables.results.len(),
        &tables.players,
        &new_keys,
    );

    let mut response = Html(html).into_response();
    if issued {
        let cookie = format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, session);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    Ok(response)
}

/// `GET /stats` - per-group aggregates and the cumulative chart.
pub async fn group_stats(State(state): State<AppState>) -> Result<Response, ApiError> {
    let tables = state.loader.load()?;
    let entries = build_long_entries(&tables.results, &tables.players);
    let aggregates = group_aggregates(&entries);
    let series = cumulative_series(&entries);

    let html = render::stats_page(&state.config, &state.assets, &aggregates, &series);
    Ok(Html(html).into_response())
}
