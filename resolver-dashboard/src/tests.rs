use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use resolver_dashboard::view::{parse_snapshot, LayoutKind, NodeRecord, PollPolicy};

use crate::config::{derive_status_url, Config};
use crate::constants::{DEFAULT_STATIC_DIR, NO_CACHE};
use crate::handlers::{refresh_initial_html, serialize_payload_for_html};
use crate::server::build_router;
use crate::state::AppState;
use crate::upstream::StatusClient;

fn test_config() -> Config {
    Config {
        upstream_url: "http://127.0.0.1:1/status/json".to_string(),
        port: 0,
        request_timeout: Duration::from_millis(200),
        poll: PollPolicy::default(),
        fleet_metrics_interval: Duration::from_millis(1000),
        layout: LayoutKind::Status,
    }
}

fn test_state() -> Arc<AppState> {
    test_state_with(test_config())
}

fn test_state_with(config: Config) -> Arc<AppState> {
    let client = StatusClient::new(config.upstream_url.clone(), config.request_timeout)
        .expect("status client");
    AppState::new(config, client)
}

fn test_app(state: Arc<AppState>) -> axum::Router {
    build_router(state, DEFAULT_STATIC_DIR.to_string())
}

fn node(uid: &str, network: &str, status: &str, clients: u64, capacity: u64) -> NodeRecord {
    NodeRecord {
        version: "v0.14.1".to_string(),
        sid: format!("sid-{}", uid),
        uid: uid.to_string(),
        url: Some(format!("wss://{}.kaspa.stream/kaspa/{}/wrpc/borsh", uid, network)),
        service: "kaspa".to_string(),
        network: network.to_string(),
        status: status.to_string(),
        clients: Some(clients),
        capacity: Some(capacity),
        ..NodeRecord::default()
    }
}

async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("response")
}

async fn body_text(response: axum::response::Response) -> String {
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8_lossy(&body).to_string()
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let response = get(test_app(test_state()), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn status_json_returns_latest_snapshot() {
    let state = test_state();
    state
        .record_snapshot(
            vec![
                node("ruby", "mainnet", "online", 145, 18432),
                node("lily", "mainnet", "offline", 0, 0),
            ],
            123,
        )
        .await;

    for uri in ["/status/json", "/json"] {
        let response = get(test_app(Arc::clone(&state)), uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("application/json")
        );
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some(NO_CACHE)
        );

        let text = body_text(response).await;
        let value: serde_json::Value = serde_json::from_str(&text).expect("status json");
        let nodes = value.as_array().expect("nodes array");
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0]["uid"], "ruby");
        assert_eq!(nodes[0]["clients"], 145);
        assert_eq!(nodes[1]["status"], "offline");
    }
}

#[tokio::test]
async fn status_json_is_unavailable_while_warming() {
    let response = get(test_app(test_state()), "/status/json").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_text(response).await.contains("warming"));
}

#[tokio::test]
async fn status_json_reports_last_upstream_error() {
    let state = test_state();
    state.record_failure("connection refused").await;
    assert_eq!(
        state
            .fetch_failures
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );

    let response = get(test_app(state), "/status/json").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_text(response).await.contains("connection refused"));
}

#[tokio::test]
async fn summary_aggregates_online_nodes() {
    let state = test_state();
    state
        .record_snapshot(
            vec![
                node("a", "mainnet", "online", 100, 200),
                node("b", "mainnet", "online", 50, 100),
                node("c", "mainnet", "offline", 30, 100),
                node("d", "testnet-10", "online", 1, 4),
            ],
            77,
        )
        .await;

    let response = get(test_app(state), "/api/summary").await;
    assert_eq!(response.status(), StatusCode::OK);
    let value: serde_json::Value =
        serde_json::from_str(&body_text(response).await).expect("summary json");
    assert_eq!(value["nodes"], 4);
    assert_eq!(value["online"], 3);
    assert_eq!(value["updatedTs"], 77);

    let networks = value["networks"].as_array().expect("networks array");
    assert_eq!(networks.len(), 2);
    assert_eq!(networks[0]["network"], "mainnet");
    assert_eq!(networks[0]["clients"], 150);
    assert_eq!(networks[0]["capacity"], 300);
    assert_eq!(networks[0]["count"], 2);
    assert_eq!(networks[0]["text"], "(2) 150 / 300  50.00%");
    assert_eq!(networks[1]["network"], "testnet-10");
}

#[tokio::test]
async fn index_embeds_latest_snapshot() {
    let state = test_state();
    let response = get(test_app(Arc::clone(&state)), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"<meta name="status-url" content="/status/json" />"#));
    assert!(html.contains(r#"<meta name="dashboard-layout" content="status" />"#));
    assert!(!html.contains("initial-data"));

    state
        .record_snapshot(vec![node("ruby", "mainnet", "online", 1, 10)], 1)
        .await;
    refresh_initial_html(&state).await;

    let response = get(test_app(state), "/status").await;
    let html = body_text(response).await;
    assert!(html.contains(r#"<script id="initial-data" type="application/json">"#));
    assert!(html.contains(r#""uid":"ruby""#));
}

#[tokio::test]
async fn index_carries_poll_policy_for_the_page() {
    let config = Config {
        poll: PollPolicy {
            interval_ms: 2500,
            retry_ms: 750,
            max_retry_ms: 12000,
        },
        ..test_config()
    };
    let response = get(test_app(test_state_with(config)), "/").await;
    let html = body_text(response).await;
    assert!(html.contains(r#"<meta name="poll-interval-ms" content="2500" />"#));
    assert!(html.contains(r#"<meta name="poll-retry-ms" content="750" />"#));
    assert!(html.contains(r#"<meta name="poll-max-retry-ms" content="12000" />"#));
}

#[tokio::test]
async fn relayed_feed_uses_normalized_field_names() {
    let upstream = r#"[{"uid":"ruby","network":"mainnet","status":"online","connections":145,"capacity":18432,"region":"eu"}]"#;
    let state = test_state();
    state
        .record_snapshot(parse_snapshot(upstream).expect("upstream snapshot"), 5)
        .await;

    let response = get(test_app(state), "/status/json").await;
    let value: serde_json::Value =
        serde_json::from_str(&body_text(response).await).expect("status json");
    let record = &value[0];
    assert_eq!(record["clients"], 145);
    assert!(record.get("connections").is_none());
    assert!(record.get("region").is_none());
    assert!(record.get("fqdn").is_none());
}

#[tokio::test]
async fn options_returns_cors_headers() {
    let app = test_app(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/status/json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("options response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
}

#[test]
fn status_url_defaults_to_layout_path() {
    assert_eq!(
        derive_status_url("http://127.0.0.1:8989", "/status/json"),
        "http://127.0.0.1:8989/status/json"
    );
    assert_eq!(
        derive_status_url("https://resolver.example.org/", "/json"),
        "https://resolver.example.org/json"
    );
    assert_eq!(
        derive_status_url("https://resolver.example.org/custom/feed", "/json"),
        "https://resolver.example.org/custom/feed"
    );
    assert_eq!(derive_status_url("not a url", "/json"), "not a url");
}

#[test]
fn inlined_payload_escapes_closing_tags() {
    let mut record = node("x", "mainnet", "online", 1, 2);
    record.version = "</script><b>".to_string();
    let json = serialize_payload_for_html(&vec![record]).expect("payload json");
    assert!(!json.contains("</"));
    assert!(json.contains(r#"<\/script>"#));
}
