use crate::view::format::{format_count, format_percent, pad_start};
use crate::view::model::NodeRecord;
use crate::view::sort::SortMode;

pub const FQDN_CLASS: &str = "fqdn";
const NUMERIC_CLASS: &str = "wide right";
const PADDED_NUMERIC_CLASS: &str = "wide right pre";
const PEERS_WIDTH: usize = 4;
const CLIENTS_WIDTH: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    SidUid,
    Service,
    Version,
    Fqdn,
    Protocol,
    Encoding,
    Encryption,
    Network,
    Status,
    Peers,
    ClientsCapacity,
    Load,
}

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Column::SidUid => "SID:UID",
            Column::Service => "SERVICE",
            Column::Version => "VERSION",
            Column::Fqdn => "FQDN",
            Column::Protocol => "PROTO",
            Column::Encoding => "ENCODING",
            Column::Encryption => "TLS",
            Column::Network => "NETWORK",
            Column::Status => "STATUS",
            Column::Peers => "PEERS",
            Column::ClientsCapacity => "CLIENTS / CAP",
            Column::Load => "LOAD",
        }
    }

    pub fn header_class(&self) -> &'static str {
        match self {
            Column::Fqdn => FQDN_CLASS,
            _ if self.is_numeric() => "right",
            _ => "",
        }
    }

    /// Numeric columns are left out of offline rows.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Peers | Column::ClientsCapacity | Column::Load)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub class: &'static str,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: "",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutKind {
    Status,
    Public,
}

impl LayoutKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "status" => Some(LayoutKind::Status),
            "public" => Some(LayoutKind::Public),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Status => "status",
            LayoutKind::Public => "public",
        }
    }
}

/// Which columns a dashboard shows and how it may be ordered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub kind: LayoutKind,
    pub columns: Vec<Column>,
    pub sort_modes: Vec<SortMode>,
    pub default_sort: SortMode,
    pub pad_numbers: bool,
    pub json_path: &'static str,
}

impl Layout {
    pub fn status() -> Self {
        Self {
            kind: LayoutKind::Status,
            columns: vec![
                Column::SidUid,
                Column::Service,
                Column::Version,
                Column::Fqdn,
                Column::Protocol,
                Column::Encoding,
                Column::Encryption,
                Column::Network,
                Column::Status,
                Column::Peers,
                Column::ClientsCapacity,
                Column::Load,
            ],
            sort_modes: SortMode::ALL.to_vec(),
            default_sort: SortMode::Fqdn,
            pad_numbers: false,
            json_path: "/status/json",
        }
    }

    pub fn public() -> Self {
        Self {
            kind: LayoutKind::Public,
            columns: vec![
                Column::SidUid,
                Column::Service,
                Column::Version,
                Column::Network,
                Column::Status,
                Column::Peers,
                Column::ClientsCapacity,
                Column::Load,
            ],
            sort_modes: vec![SortMode::Network, SortMode::Sid],
            default_sort: SortMode::Network,
            pad_numbers: true,
            json_path: "/json",
        }
    }

    pub fn for_kind(kind: LayoutKind) -> Self {
        match kind {
            LayoutKind::Status => Self::status(),
            LayoutKind::Public => Self::public(),
        }
    }

    pub fn supports(&self, mode: SortMode) -> bool {
        self.sort_modes.contains(&mode)
    }

    pub fn cells(&self, node: &NodeRecord) -> Vec<Cell> {
        let offline = node.is_offline();
        self.columns
            .iter()
            .filter(|column| !(offline && column.is_numeric()))
            .map(|column| self.cell(*column, node))
            .collect()
    }

    fn cell(&self, column: Column, node: &NodeRecord) -> Cell {
        let numeric_class = if self.pad_numbers {
            PADDED_NUMERIC_CLASS
        } else {
            NUMERIC_CLASS
        };
        match column {
            Column::SidUid => Cell::plain(format!("{}:{}", node.sid, node.uid)),
            Column::Service => Cell::plain(node.service.as_str()),
            Column::Version => Cell::plain(node.version.as_str()),
            Column::Fqdn => Cell {
                text: node.display_fqdn().unwrap_or_else(|| "-".to_string()),
                class: FQDN_CLASS,
            },
            Column::Protocol => Cell::plain(node.protocol.as_str()),
            Column::Encoding => Cell::plain(node.encoding.as_str()),
            Column::Encryption => Cell::plain(node.encryption.as_str()),
            Column::Network => Cell::plain(node.network.as_str()),
            Column::Status => Cell::plain(node.status.as_str()),
            Column::Peers => Cell {
                text: self.pad(format_count(node.peers), PEERS_WIDTH),
                class: numeric_class,
            },
            Column::ClientsCapacity => Cell {
                text: format!(
                    "{} / {}",
                    self.pad(format_count(node.clients), CLIENTS_WIDTH),
                    self.pad(format_count(node.capacity), CLIENTS_WIDTH)
                ),
                class: numeric_class,
            },
            Column::Load => Cell {
                text: format!("{}%", format_percent(node.load_percent())),
                class: NUMERIC_CLASS,
            },
        }
    }

    fn pad(&self, value: String, width: usize) -> String {
        if self.pad_numbers {
            pad_start(&value, width)
        } else {
            value
        }
    }
}

/// Stylesheet text for the `fqdn-style` element.
pub fn fqdn_style_rule(show_fqdn: bool) -> String {
    if show_fqdn {
        String::new()
    } else {
        format!(".{} {{ display: none; }}", FQDN_CLASS)
    }
}
