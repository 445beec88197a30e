use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::RwLock;

use resolver_dashboard::view::{Layout, Snapshot};
use resolver_dashboard::{render_index, PageConfig};

use crate::config::Config;
use crate::models::CachedPayload;
use crate::upstream::StatusClient;
use crate::util::now_ms;

pub(crate) struct AppState {
    pub(crate) latest: RwLock<Option<CachedPayload<Arc<Snapshot>>>>,
    pub(crate) last_error: RwLock<Option<String>>,
    pub(crate) initial_html: RwLock<Bytes>,
    pub(crate) page: PageConfig,
    pub(crate) client: StatusClient,
    pub(crate) config: Config,
    pub(crate) fetch_failures: AtomicU64,
}

impl AppState {
    pub(crate) fn new(config: Config, client: StatusClient) -> Arc<Self> {
        let layout = Layout::for_kind(config.layout);
        let page = PageConfig {
            status_url: layout.json_path.to_string(),
            layout: config.layout,
            poll: config.poll,
            cache_bust: now_ms().to_string(),
        };
        let base_html = render_index(&page, None);
        Arc::new(Self {
            latest: RwLock::new(None),
            last_error: RwLock::new(None),
            initial_html: RwLock::new(Bytes::from(base_html)),
            page,
            client,
            config,
            fetch_failures: AtomicU64::new(0),
        })
    }

    pub(crate) async fn record_snapshot(&self, nodes: Snapshot, ts_ms: u64) {
        {
            let mut latest = self.latest.write().await;
            *latest = Some(CachedPayload {
                ts_ms,
                payload: Arc::new(nodes),
            });
        }
        let mut last_error = self.last_error.write().await;
        *last_error = None;
    }

    pub(crate) async fn record_failure(&self, message: impl Into<String>) {
        self.fetch_failures.fetch_add(1, Ordering::SeqCst);
        let mut last_error = self.last_error.write().await;
        *last_error = Some(message.into());
    }

    pub(crate) async fn latest_snapshot(&self) -> Option<CachedPayload<Arc<Snapshot>>> {
        self.latest.read().await.clone()
    }
}
