use crate::view::aggregate::{aggregate, Aggregate};
use crate::view::filter::{NetworkFilter, Toggles};
use crate::view::layout::Layout;
use crate::view::model::Snapshot;
use crate::view::rows::{Reconciled, RowSet};
use crate::view::sort::SortMode;
use crate::view::summary::{summarize, SummaryEntry};
use crate::view::toggle::{ToggleEffect, ToggleId};

#[derive(Clone, Debug)]
pub struct ViewState {
    pub nodes: Snapshot,
    pub networks: NetworkFilter,
    pub toggles: Toggles,
    pub sort_mode: SortMode,
    pub last_sort_mode: Option<SortMode>,
}

impl ViewState {
    pub fn new(sort_mode: SortMode) -> Self {
        Self {
            nodes: Vec::new(),
            networks: NetworkFilter::default(),
            toggles: Toggles::default(),
            sort_mode,
            last_sort_mode: None,
        }
    }

    /// Swaps in a whole snapshot and registers any network seen for the
    /// first time.
    pub fn replace_nodes(&mut self, nodes: Snapshot) {
        for node in &nodes {
            self.networks.observe(&node.network);
        }
        self.nodes = nodes;
    }

    pub fn apply_toggle(
        &mut self,
        toggle: &ToggleId,
        checked: bool,
        layout: &Layout,
    ) -> ToggleEffect {
        match toggle {
            ToggleId::Offline => {
                self.toggles.show_offline = checked;
                ToggleEffect::Render
            }
            ToggleId::Delegators => {
                self.toggles.show_delegators = checked;
                ToggleEffect::Render
            }
            ToggleId::Fqdn => {
                self.toggles.show_fqdn = checked;
                ToggleEffect::Restyle
            }
            ToggleId::Sort(mode) => {
                if !checked || !layout.supports(*mode) {
                    return ToggleEffect::Ignored;
                }
                self.sort_mode = *mode;
                ToggleEffect::Render
            }
            ToggleId::Network(network) => {
                self.networks.set(network, checked);
                ToggleEffect::Render
            }
        }
    }

    fn take_sort_mode_change(&mut self) -> bool {
        let changed = self.last_sort_mode != Some(self.sort_mode);
        self.last_sort_mode = Some(self.sort_mode);
        changed
    }
}

/// Outcome of one render, for the page to mirror into the document.
#[derive(Clone, Debug, Default)]
pub struct RenderPass {
    pub reconciled: Reconciled,
    pub resorted: bool,
    pub aggregate: Aggregate,
    pub summary: Vec<SummaryEntry>,
}

/// View state, the rows it renders to and the layout they follow.
#[derive(Debug)]
pub struct Dashboard {
    layout: Layout,
    state: ViewState,
    rows: RowSet,
}

impl Dashboard {
    pub fn new(layout: Layout) -> Self {
        let state = ViewState::new(layout.default_sort);
        Self {
            layout,
            state,
            rows: RowSet::new(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn rows(&self) -> &RowSet {
        &self.rows
    }

    pub fn apply_snapshot(&mut self, nodes: Snapshot) -> RenderPass {
        self.state.replace_nodes(nodes);
        self.render()
    }

    pub fn apply_toggle(&mut self, toggle: &ToggleId, checked: bool) -> ToggleEffect {
        self.state.apply_toggle(toggle, checked, &self.layout)
    }

    /// Reconcile, resort when needed, and aggregate the current snapshot.
    pub fn render(&mut self) -> RenderPass {
        let sort_mode_changed = self.state.take_sort_mode_change();
        let reconciled = self.rows.reconcile(
            &self.state.nodes,
            &self.layout,
            &self.state.toggles,
            &self.state.networks,
        );
        let resorted = self.rows.resort_if_needed(
            reconciled.membership_changed(),
            sort_mode_changed,
            self.state.sort_mode,
        );
        let aggregate = aggregate(&self.state.nodes);
        let summary = summarize(&aggregate);
        RenderPass {
            reconciled,
            resorted,
            aggregate,
            summary,
        }
    }
}
