use std::cmp::Ordering;
use std::fmt;

use crate::view::model::NodeRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortMode {
    Fqdn,
    Sid,
    Network,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [SortMode::Fqdn, SortMode::Sid, SortMode::Network];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Fqdn => "fqdn",
            SortMode::Sid => "sid",
            SortMode::Network => "network",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "fqdn" => Some(SortMode::Fqdn),
            "sid" => Some(SortMode::Sid),
            "network" => Some(SortMode::Network),
            _ => None,
        }
    }

    /// Key the rows are ordered by for this mode.
    pub fn key(&self, node: &NodeRecord) -> String {
        match self {
            SortMode::Fqdn => node.display_fqdn().unwrap_or_default(),
            SortMode::Sid => node.sid.clone(),
            SortMode::Network => node.network.clone(),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive ordering with lowercase placed before uppercase when
/// two keys differ only by case.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}
