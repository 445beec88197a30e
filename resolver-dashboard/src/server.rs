use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tracing::info;

use crate::handlers::{
    health_handler, index_handler, options_handler, status_json_handler, summary_handler,
};
use crate::state::AppState;

pub(crate) fn build_router(state: Arc<AppState>, static_dir: String) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/status", get(index_handler))
        .route(
            "/status/json",
            get(status_json_handler).options(options_handler),
        )
        .route("/json", get(status_json_handler).options(options_handler))
        .route(
            "/api/summary",
            get(summary_handler).options(options_handler),
        )
        .route("/health", get(health_handler))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(middleware::from_fn(log_request))
}

async fn log_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let remote_ip = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip().to_string())
        })
        .unwrap_or_else(|| "-".to_string());
    let start = Instant::now();
    let response = next.run(req).await;
    info!(
        remote_ip = %remote_ip,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis(),
        "request served"
    );
    response
}
