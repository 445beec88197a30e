use std::collections::{HashMap, HashSet};

use crate::view::filter::{classify, Category, NetworkFilter, Toggles};
use crate::view::layout::{Cell, Layout};
use crate::view::model::NodeRecord;
use crate::view::sort::{locale_compare, SortMode};

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedRow {
    pub uid: String,
    pub network: String,
    pub category: Category,
    pub cells: Vec<Cell>,
    pub sort_key: String,
    record: NodeRecord,
}

impl RenderedRow {
    fn new(node: &NodeRecord) -> Self {
        Self {
            uid: node.uid.clone(),
            network: node.network.clone(),
            category: Category::Hidden,
            cells: Vec::new(),
            sort_key: String::new(),
            record: node.clone(),
        }
    }

    pub fn record(&self) -> &NodeRecord {
        &self.record
    }
}

/// Membership changes from one reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciled {
    pub created: Vec<String>,
    pub removed: Vec<String>,
}

impl Reconciled {
    pub fn membership_changed(&self) -> bool {
        !self.created.is_empty() || !self.removed.is_empty()
    }
}

/// Rendered rows in display order, looked up by uid.
#[derive(Debug, Default)]
pub struct RowSet {
    rows: Vec<RenderedRow>,
    index: HashMap<String, usize>,
}

impl RowSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, uid: &str) -> Option<&RenderedRow> {
        self.index.get(uid).and_then(|index| self.rows.get(*index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderedRow> {
        self.rows.iter()
    }

    pub fn uids(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.uid.as_str()).collect()
    }

    pub fn reconcile(
        &mut self,
        nodes: &[NodeRecord],
        layout: &Layout,
        toggles: &Toggles,
        networks: &NetworkFilter,
    ) -> Reconciled {
        let mut outcome = Reconciled::default();
        let mut seen: HashSet<&str> = HashSet::with_capacity(nodes.len());

        for node in nodes {
            seen.insert(node.uid.as_str());
            let index = match self.index.get(&node.uid) {
                Some(index) => *index,
                None => {
                    self.rows.push(RenderedRow::new(node));
                    let index = self.rows.len() - 1;
                    self.index.insert(node.uid.clone(), index);
                    outcome.created.push(node.uid.clone());
                    index
                }
            };
            let row = &mut self.rows[index];
            row.network = node.network.clone();
            row.category = classify(node, toggles, networks);
            row.cells = layout.cells(node);
            row.record = node.clone();
        }

        if self.rows.len() > seen.len() {
            self.rows.retain(|row| {
                let keep = seen.contains(row.uid.as_str());
                if !keep {
                    outcome.removed.push(row.uid.clone());
                }
                keep
            });
            self.reindex();
        }

        outcome
    }

    /// Recomputes the cached keys and re-orders the rows when membership or
    /// the sort mode changed. Returns whether a sort ran.
    pub fn resort_if_needed(
        &mut self,
        membership_changed: bool,
        sort_mode_changed: bool,
        mode: SortMode,
    ) -> bool {
        if !membership_changed && !sort_mode_changed {
            return false;
        }
        for row in self.rows.iter_mut() {
            row.sort_key = mode.key(&row.record);
        }
        self.rows
            .sort_by(|a, b| locale_compare(&a.sort_key, &b.sort_key));
        self.reindex();
        true
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (index, row) in self.rows.iter().enumerate() {
            self.index.insert(row.uid.clone(), index);
        }
    }
}
