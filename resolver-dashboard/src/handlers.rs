use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::Serialize;

use resolver_dashboard::render_index;
use resolver_dashboard::view::{aggregate, summarize, Snapshot};

use crate::constants::NO_CACHE;
use crate::models::SummaryPayload;
use crate::state::AppState;
use crate::util::now_ms;

const WARMING_MESSAGE: &str = "status feed warming; try again shortly";

pub(crate) async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub(crate) async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let html = state.initial_html.read().await.clone();
    let mut response = Response::new(Body::from(html));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    response
}

pub(crate) async fn status_json_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.latest_snapshot().await {
        Some(entry) => json_response(entry.payload.as_ref()),
        None => unavailable_response(&state).await,
    }
}

pub(crate) async fn summary_handler(State(state): State<Arc<AppState>>) -> Response {
    let entry = match state.latest_snapshot().await {
        Some(entry) => entry,
        None => return unavailable_response(&state).await,
    };
    let nodes = entry.payload.as_ref();
    let totals = aggregate(nodes);
    let payload = SummaryPayload {
        online: totals.values().map(|load| load.count as usize).sum(),
        networks: summarize(&totals),
        nodes: nodes.len(),
        updated_ts: entry.ts_ms,
        ts: now_ms(),
    };
    json_response(&payload)
}

pub(crate) async fn options_handler() -> impl IntoResponse {
    (StatusCode::NO_CONTENT, cors_headers())
}

async fn unavailable_response(state: &AppState) -> Response {
    let message = match state.last_error.read().await.as_ref() {
        Some(err) => format!("status feed unavailable: {}", err),
        None => WARMING_MESSAGE.to_string(),
    };
    error_response(StatusCode::SERVICE_UNAVAILABLE, message)
}

fn json_response<T: Serialize + ?Sized>(payload: &T) -> Response {
    let body = match serde_json::to_string(payload) {
        Ok(body) => body,
        Err(err) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };
    let mut headers = cors_headers();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    (StatusCode::OK, headers, body).into_response()
}

fn error_response(status: StatusCode, message: String) -> Response {
    let mut headers = cors_headers();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    (status, headers, message).into_response()
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers
}

/// Re-renders the landing page with the latest snapshot inlined so the
/// first paint does not wait for a poll.
pub(crate) async fn refresh_initial_html(state: &AppState) {
    let entry = match state.latest_snapshot().await {
        Some(entry) => entry,
        None => return,
    };
    let payload_json = match serialize_payload_for_html(entry.payload.as_ref()) {
        Some(json) => json,
        None => return,
    };
    let html = render_index(&state.page, Some(&payload_json));
    let mut cache = state.initial_html.write().await;
    *cache = Bytes::from(html);
}

pub(crate) fn serialize_payload_for_html(nodes: &Snapshot) -> Option<String> {
    let json = serde_json::to_string(nodes).ok()?;
    if json.contains("</") {
        Some(json.replace("</", "<\\/"))
    } else {
        Some(json)
    }
}
