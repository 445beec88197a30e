mod support;

use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;

const STATUS_DOC: &str = r#"[
  {"version":"v0.14.1","sid":"a1b2","uid":"ruby","url":"wss://ruby.kaspa.stream/kaspa/mainnet/wrpc/borsh","service":"kaspa","protocol":"wrpc","encoding":"borsh","encryption":"tls","network":"mainnet","status":"online","peers":42,"clients":145,"capacity":18432},
  {"version":"v0.14.1","sid":"c3d4","uid":"lily","service":"kaspa","network":"mainnet","status":"offline"},
  {"version":"v0.14.1","sid":"e5f6","uid":"iris","service":"kaspa","network":"testnet-11","status":"online","clients":5,"capacity":10}
]"#;

#[tokio::test]
async fn relays_upstream_snapshot() {
    let upstream = support::FakeUpstream::serve(STATUS_DOC).await;
    let upstream_url = upstream.base_url();
    let server = support::TestServer::spawn_with(&[
        ("RESOLVER_STATUS_URL", upstream_url.as_str()),
        ("POLL_INTERVAL_MS", "200"),
        ("POLL_RETRY_MS", "100"),
    ])
    .await;
    let client = Client::new();

    let mut nodes = None;
    for _ in 0..50 {
        let response = client
            .get(format!("{}/status/json", server.base_url()))
            .send()
            .await
            .expect("status request");
        if response.status().is_success() {
            let value: serde_json::Value = response.json().await.expect("status json");
            nodes = Some(value);
            break;
        }
        sleep(Duration::from_millis(100)).await;
    }
    let nodes = nodes.expect("relay never served a snapshot");
    let nodes = nodes.as_array().expect("nodes array");
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["uid"], "ruby");

    let summary: serde_json::Value = client
        .get(format!("{}/api/summary", server.base_url()))
        .send()
        .await
        .expect("summary request")
        .json()
        .await
        .expect("summary json");
    assert_eq!(summary["nodes"], 3);
    assert_eq!(summary["online"], 2);
    assert_eq!(summary["networks"][0]["network"], "mainnet");
    assert_eq!(summary["networks"][0]["text"], "(1) 145 / 18,432  0.79%");
    assert_eq!(summary["networks"][1]["network"], "testnet-11");

    let index = client
        .get(format!("{}/", server.base_url()))
        .send()
        .await
        .expect("index request")
        .text()
        .await
        .expect("index body");
    assert!(index.contains(r#"id="initial-data""#));
}
