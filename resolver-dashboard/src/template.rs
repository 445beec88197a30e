use crate::view::{LayoutKind, PollPolicy};

const INDEX_TEMPLATE: &str = include_str!("index.html");
const STATUS_URL_TOKEN: &str = "{{status_url}}";
const LAYOUT_TOKEN: &str = "{{layout}}";
const POLL_INTERVAL_TOKEN: &str = "{{poll_interval_ms}}";
const POLL_RETRY_TOKEN: &str = "{{poll_retry_ms}}";
const POLL_MAX_RETRY_TOKEN: &str = "{{poll_max_retry_ms}}";
const TITLE_TOKEN: &str = "{{title}}";
const INITIAL_SCRIPT_TOKEN: &str = "{{initial_script}}";
const CACHE_BUST_TOKEN: &str = "{{cache_bust}}";

/// Values the dashboard page reads back from its `<meta>` tags.
#[derive(Clone, Debug)]
pub struct PageConfig {
    pub status_url: String,
    pub layout: LayoutKind,
    pub poll: PollPolicy,
    pub cache_bust: String,
}

pub fn render_index(config: &PageConfig, initial_payload: Option<&str>) -> String {
    let initial_script = initial_payload
        .map(|payload| {
            format!(
                r#"    <script id="initial-data" type="application/json">{}</script>"#,
                payload
            )
        })
        .unwrap_or_default();

    let title = match config.layout {
        LayoutKind::Status => "Resolver Status",
        LayoutKind::Public => "Resolver Nodes",
    };

    INDEX_TEMPLATE
        .replace(STATUS_URL_TOKEN, &config.status_url)
        .replace(LAYOUT_TOKEN, config.layout.as_str())
        .replace(POLL_INTERVAL_TOKEN, &config.poll.interval_ms.to_string())
        .replace(POLL_RETRY_TOKEN, &config.poll.retry_ms.to_string())
        .replace(POLL_MAX_RETRY_TOKEN, &config.poll.max_retry_ms.to_string())
        .replace(TITLE_TOKEN, title)
        .replace(CACHE_BUST_TOKEN, &config.cache_bust)
        .replace(INITIAL_SCRIPT_TOKEN, &initial_script)
}
