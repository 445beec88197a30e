use serde::Serialize;

use crate::view::aggregate::{Aggregate, NetworkLoad};
use crate::view::format::{format_percent, group_thousands};
use crate::view::sort::locale_compare;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub network: String,
    #[serde(flatten)]
    pub load: NetworkLoad,
    pub text: String,
}

pub fn summary_text(load: &NetworkLoad) -> String {
    format!(
        "({}) {} / {}  {}%",
        group_thousands(load.count),
        group_thousands(load.clients),
        group_thousands(load.capacity),
        format_percent(load.load_percent())
    )
}

/// Aggregate entries ordered by network name.
pub fn summarize(aggregate: &Aggregate) -> Vec<SummaryEntry> {
    let mut entries: Vec<SummaryEntry> = aggregate
        .iter()
        .map(|(network, load)| SummaryEntry {
            network: network.clone(),
            load: *load,
            text: summary_text(load),
        })
        .collect();
    entries.sort_by(|a, b| locale_compare(&a.network, &b.network));
    entries
}
