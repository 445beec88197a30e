use serde::{Deserialize, Serialize};

pub const STATUS_ONLINE: &str = "online";
pub const STATUS_OFFLINE: &str = "offline";
pub const STATUS_DELEGATOR: &str = "delegator";

/// One node as reported by the status feed.
///
/// Every field is defaulted so a partial record still decodes; missing
/// numeric fields surface later as a non-finite load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRecord {
    pub version: String,
    pub sid: String,
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub service: String,
    pub protocol: String,
    pub encoding: String,
    pub encryption: String,
    pub network: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peers: Option<u64>,
    #[serde(alias = "connections", skip_serializing_if = "Option::is_none")]
    pub clients: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub delegates: Vec<String>,
}

impl NodeRecord {
    pub fn is_online(&self) -> bool {
        self.status == STATUS_ONLINE
    }

    pub fn is_offline(&self) -> bool {
        self.status == STATUS_OFFLINE
    }

    pub fn is_delegator(&self) -> bool {
        self.status == STATUS_DELEGATOR
    }

    /// The explicit `fqdn`, or the host of `url` for feeds that only carry
    /// the endpoint address.
    pub fn display_fqdn(&self) -> Option<String> {
        if let Some(fqdn) = self.fqdn.as_deref().map(str::trim) {
            if !fqdn.is_empty() {
                return Some(fqdn.to_string());
            }
        }
        let url = url::Url::parse(self.url.as_deref()?.trim()).ok()?;
        url.host_str().map(|host| host.to_string())
    }

    /// `clients / capacity * 100`; missing fields give `NaN`, a zero
    /// capacity gives an infinite (or `NaN`) value.
    pub fn load_percent(&self) -> f64 {
        match (self.clients, self.capacity) {
            (Some(clients), Some(capacity)) => clients as f64 / capacity as f64 * 100.0,
            _ => f64::NAN,
        }
    }
}

pub type Snapshot = Vec<NodeRecord>;

pub fn parse_snapshot(json: &str) -> serde_json::Result<Snapshot> {
    serde_json::from_str(json)
}
