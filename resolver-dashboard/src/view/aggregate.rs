use std::collections::HashMap;

use serde::Serialize;

use crate::view::model::NodeRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NetworkLoad {
    pub clients: u64,
    pub capacity: u64,
    pub count: u64,
}

impl NetworkLoad {
    pub fn load_percent(&self) -> f64 {
        self.clients as f64 / self.capacity as f64 * 100.0
    }
}

pub type Aggregate = HashMap<String, NetworkLoad>;

/// Per-network totals over online nodes. Visibility toggles play no part
/// here: the totals describe the fleet, not the current view.
pub fn aggregate(nodes: &[NodeRecord]) -> Aggregate {
    nodes
        .iter()
        .filter(|node| node.is_online())
        .fold(HashMap::new(), |mut acc, node| {
            let bucket: &mut NetworkLoad = acc.entry(node.network.clone()).or_default();
            bucket.clients = bucket.clients.saturating_add(node.clients.unwrap_or(0));
            bucket.capacity = bucket.capacity.saturating_add(node.capacity.unwrap_or(0));
            bucket.count = bucket.count.saturating_add(1);
            acc
        })
}
