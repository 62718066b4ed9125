//! HTTP request handlers

use super::state::AppState;
use crate::results::NormalizedItem;
use crate::search::{RawSearchBody, SearchParams};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Search results response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub items: Vec<NormalizedItem>,
    pub cached: bool,
}

/// Uniform error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Derive the rate-limiting client key from the forwarded-address header
///
/// First comma-separated token of `x-forwarded-for`, trimmed, with a
/// `"local"` fallback. The header is spoofable; the key identifies callers
/// on a best-effort basis only.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "local".to_string())
}

/// Search handler
///
/// A body that fails to parse degrades to defaults instead of erroring.
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let raw: RawSearchBody = serde_json::from_str(&body).unwrap_or_default();
    let params = SearchParams::from_raw(raw);
    let key = client_key(&headers);

    match state.gateway.search(&key, params).await {
        Ok(outcome) => Json(SearchResponse {
            items: outcome.items,
            cached: outcome.cached,
        })
        .into_response(),
        Err(e) => (
            e.status_code(),
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// Raw tracking event body
#[derive(Debug, Default, Deserialize)]
pub struct RawTrackBody {
    #[serde(rename = "itemId")]
    pub item_id: Option<String>,
    pub event: Option<String>,
}

/// Event names accepted by the track endpoint
const TRACK_EVENTS: [&str; 4] = ["click", "view", "fav", "purchase"];

/// Tracking event handler
///
/// Acknowledges the event without persisting it.
pub async fn track(State(state): State<AppState>, body: String) -> Response {
    let raw: RawTrackBody = serde_json::from_str(&body).unwrap_or_default();

    let item_id = match raw.item_id.filter(|id| !id.is_empty()) {
        Some(id) => id,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "itemId required".to_string(),
                }),
            )
                .into_response();
        }
    };

    let event = raw
        .event
        .filter(|e| TRACK_EVENTS.contains(&e.as_str()))
        .unwrap_or_else(|| "click".to_string());

    state.metrics.inc_tracked_event();
    info!("track {} {}", event, item_id);

    Json(serde_json::json!({"ok": true})).into_response()
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Stats handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "metrics": state.metrics.snapshot(),
        "cache_entries": state.gateway.cache().len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_client_key_takes_first_forwarded_token() {
        let headers = headers_with("1.2.3.4, 5.6.7.8");
        assert_eq!(client_key(&headers), "1.2.3.4");
    }

    #[test]
    fn test_client_key_trims_whitespace() {
        let headers = headers_with("  1.2.3.4  ");
        assert_eq!(client_key(&headers), "1.2.3.4");
    }

    #[test]
    fn test_client_key_falls_back_to_local() {
        assert_eq!(client_key(&HeaderMap::new()), "local");
        assert_eq!(client_key(&headers_with("   ")), "local");
    }

    #[test]
    fn test_track_body_tolerates_garbage() {
        let raw: RawTrackBody = serde_json::from_str("not json").unwrap_or_default();
        assert!(raw.item_id.is_none());

        let raw: RawTrackBody =
            serde_json::from_str(r#"{"itemId": "rakuten-x", "event": "view"}"#).unwrap();
        assert_eq!(raw.item_id.as_deref(), Some("rakuten-x"));
        assert_eq!(raw.event.as_deref(), Some("view"));
    }
}
