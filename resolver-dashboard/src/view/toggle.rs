use crate::view::sort::SortMode;

const NETWORK_FILTER_SUFFIX: &str = "-filter";

/// Checkbox identifiers the page is expected to provide up front.
pub const STATIC_TOGGLE_IDS: [&str; 6] = [
    "offline",
    "delegators",
    "fqdn",
    "sort-fqdn",
    "sort-sid",
    "sort-network",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToggleId {
    Offline,
    Delegators,
    Fqdn,
    Sort(SortMode),
    Network(String),
}

impl ToggleId {
    pub fn parse(element_id: &str) -> Option<Self> {
        match element_id {
            "offline" => Some(ToggleId::Offline),
            "delegators" => Some(ToggleId::Delegators),
            "fqdn" => Some(ToggleId::Fqdn),
            _ => {
                if let Some(mode) = element_id.strip_prefix("sort-") {
                    return SortMode::parse(mode).map(ToggleId::Sort);
                }
                element_id
                    .strip_suffix(NETWORK_FILTER_SUFFIX)
                    .filter(|network| !network.is_empty())
                    .map(|network| ToggleId::Network(network.to_string()))
            }
        }
    }

    pub fn element_id(&self) -> String {
        match self {
            ToggleId::Offline => "offline".to_string(),
            ToggleId::Delegators => "delegators".to_string(),
            ToggleId::Fqdn => "fqdn".to_string(),
            ToggleId::Sort(mode) => format!("sort-{}", mode),
            ToggleId::Network(network) => network_filter_id(network),
        }
    }
}

pub fn network_filter_id(network: &str) -> String {
    format!("{}{}", network, NETWORK_FILTER_SUFFIX)
}

/// What the page has to do after a toggle changed state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleEffect {
    Render,
    Restyle,
    Ignored,
}
