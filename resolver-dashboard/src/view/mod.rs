//! Target-independent dashboard logic: decoding status snapshots, deciding
//! row visibility, per-network totals, uid-keyed row reconciliation and
//! ordering. The browser module mirrors a [`RenderPass`] into the DOM; the
//! host reuses the aggregate for its summary endpoint and logs.

mod aggregate;
mod filter;
mod format;
mod layout;
mod model;
mod poll;
mod rows;
mod sort;
mod state;
mod summary;
mod toggle;


pub use aggregate::{aggregate, Aggregate, NetworkLoad};
pub use filter::{classify, Category, NetworkFilter, Toggles, HIDDEN_CLASS};
pub use format::{format_count, format_percent, group_thousands, pad_start};
pub use layout::{fqdn_style_rule, Cell, Column, Layout, LayoutKind, FQDN_CLASS};
pub use model::{
    parse_snapshot, NodeRecord, Snapshot, STATUS_DELEGATOR, STATUS_OFFLINE, STATUS_ONLINE,
};
pub use poll::{
    PollPolicy, PollSchedule, DEFAULT_MAX_RETRY_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_RETRY_MS,
};
pub use rows::{Reconciled, RenderedRow, RowSet};
pub use sort::{locale_compare, SortMode};
pub use state::{Dashboard, RenderPass, ViewState};
pub use summary::{summarize, summary_text, SummaryEntry};
pub use toggle::{network_filter_id, ToggleEffect, ToggleId, STATIC_TOGGLE_IDS};
