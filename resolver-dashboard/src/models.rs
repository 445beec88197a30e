use serde::Serialize;

use resolver_dashboard::view::SummaryEntry;

#[derive(Clone)]
pub(crate) struct CachedPayload<T> {
    pub(crate) ts_ms: u64,
    pub(crate) payload: T,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SummaryPayload {
    pub(crate) networks: Vec<SummaryEntry>,
    pub(crate) nodes: usize,
    pub(crate) online: usize,
    pub(crate) updated_ts: u64,
    pub(crate) ts: u64,
}
