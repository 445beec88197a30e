use std::collections::BTreeMap;

use crate::view::model::NodeRecord;

pub const HIDDEN_CLASS: &str = "hidden";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Toggles {
    pub show_offline: bool,
    pub show_delegators: bool,
    pub show_fqdn: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            show_offline: true,
            show_delegators: false,
            show_fqdn: true,
        }
    }
}

/// Network name to "visible" flag. Networks not yet observed count as
/// visible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkFilter {
    enabled: BTreeMap<String, bool>,
}

impl NetworkFilter {
    pub fn is_enabled(&self, network: &str) -> bool {
        self.enabled.get(network).copied().unwrap_or(true)
    }

    /// Records a network the first time it is seen; an existing choice is
    /// kept. Returns `true` when the network was new.
    pub fn observe(&mut self, network: &str) -> bool {
        if self.enabled.contains_key(network) {
            return false;
        }
        self.enabled.insert(network.to_string(), true);
        true
    }

    pub fn set(&mut self, network: &str, enabled: bool) {
        self.enabled.insert(network.to_string(), enabled);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.enabled
            .iter()
            .map(|(network, enabled)| (network.as_str(), *enabled))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Category {
    Hidden,
    Status(String),
}

impl Category {
    pub fn class_name(&self) -> &str {
        match self {
            Category::Hidden => HIDDEN_CLASS,
            Category::Status(status) => status,
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Category::Hidden)
    }
}

pub fn classify(node: &NodeRecord, toggles: &Toggles, networks: &NetworkFilter) -> Category {
    if !networks.is_enabled(&node.network) {
        Category::Hidden
    } else if node.is_offline() && !toggles.show_offline {
        Category::Hidden
    } else if node.is_delegator() && !toggles.show_delegators {
        Category::Hidden
    } else {
        Category::Status(node.status.clone())
    }
}
