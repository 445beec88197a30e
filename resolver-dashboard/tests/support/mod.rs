#![allow(dead_code)]

use std::net::SocketAddr;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use portpicker::pick_unused_port;
use reqwest::Client;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::sleep;

pub struct TestServer {
    child: Child,
    base_url: String,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with(&[("DISABLE_BACKGROUND_TASKS", "1")]).await
    }

    pub async fn spawn_with(envs: &[(&str, &str)]) -> Self {
        let port = pick_unused_port().expect("free port");
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("resolver-dashboard"));
        cmd.env("PORT", port.to_string())
            .env("RUST_LOG", "warn")
            .env("RESOLVER_STATUS_URL", "http://127.0.0.1:1")
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        for (key, value) in envs {
            cmd.env(key, value);
        }

        let child = cmd.spawn().expect("spawn resolver-dashboard");
        let base_url = format!("http://127.0.0.1:{}", port);
        wait_for_ready(&base_url).await;

        Self { child, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends SIGTERM and waits for the process to exit on its own.
    #[cfg(unix)]
    pub async fn terminate(&mut self) -> ExitStatus {
        Command::new("kill")
            .args(["-TERM", &self.child.id().to_string()])
            .status()
            .expect("send SIGTERM");
        for _ in 0..50 {
            if let Some(status) = self.child.try_wait().expect("poll child") {
                return status;
            }
            sleep(Duration::from_millis(100)).await;
        }
        panic!("server did not exit after SIGTERM");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Serves a fixed status document at `/status/json`.
pub struct FakeUpstream {
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl FakeUpstream {
    pub async fn serve(body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake upstream");
        let addr = listener.local_addr().expect("fake upstream addr");
        let app = Router::new().route(
            "/status/json",
            get(move || async move {
                ([(axum::http::header::CONTENT_TYPE, "application/json")], body)
            }),
        );
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self { addr, task }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn wait_for_ready(base_url: &str) {
    let client = Client::new();
    let health_url = format!("{}/health", base_url);
    for _ in 0..50 {
        if let Ok(response) = client.get(&health_url).send().await {
            if response.status().is_success() {
                return;
            }
        }
        sleep(Duration::from_millis(100)).await;
    }
    panic!("server did not become ready at {}", health_url);
}
