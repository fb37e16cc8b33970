use crate::graph::{ArcId, NodeId, SelectedItem};
use slint::{Model, VecModel};
use std::collections::HashSet;

/// Index of the selected nodes and arcs of a graph.
///
/// [`Graph`](crate::Graph) keeps the per-item `selected` flags in sync with
/// this index; mutate selection through the graph rather than directly.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    nodes: HashSet<NodeId>,
    arcs: HashSet<ArcId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a click on `item`.
    ///
    /// With `toggle` the item flips in or out of the selection. Without it the
    /// selection collapses to just `item`.
    pub fn handle_interaction(&mut self, item: SelectedItem, toggle: bool) {
        if toggle {
            if self.contains(item) {
                self.remove(item);
            } else {
                self.insert(item);
            }
        } else {
            if self.len() == 1 && self.contains(item) {
                return;
            }
            self.clear();
            self.insert(item);
        }
    }

    pub fn insert(&mut self, item: SelectedItem) {
        match item {
            SelectedItem::Node(id) => self.nodes.insert(id),
            SelectedItem::Arc(id) => self.arcs.insert(id),
        };
    }

    pub fn remove(&mut self, item: SelectedItem) {
        match item {
            SelectedItem::Node(id) => self.nodes.remove(&id),
            SelectedItem::Arc(id) => self.arcs.remove(&id),
        };
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.arcs.clear();
    }

    /// Replace the selection with exactly `ids`; arcs are dropped.
    ///
    /// Used by box selection.
    pub fn replace_nodes<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.clear();
        self.nodes.extend(ids);
    }

    pub fn contains(&self, item: SelectedItem) -> bool {
        match item {
            SelectedItem::Node(id) => self.nodes.contains(&id),
            SelectedItem::Arc(id) => self.arcs.contains(&id),
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn arcs(&self) -> impl Iterator<Item = ArcId> + '_ {
        self.arcs.iter().copied()
    }

    /// The selected arc, if exactly one arc is selected
    pub fn sole_arc(&self) -> Option<ArcId> {
        if self.arcs.len() == 1 {
            self.arcs.iter().next().copied()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len() + self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.arcs.is_empty()
    }

    /// Write the selected node ids into a Slint `VecModel`, sorted.
    pub fn sync_to_model(&self, model: &VecModel<i32>) {
        let mut ids: Vec<i32> = self.nodes.iter().filter_map(|id| i32::try_from(id.0).ok()).collect();
        ids.sort_unstable();
        model.set_vec(ids);
    }

    /// Replace the node selection with the ids held by a Slint model.
    ///
    /// Negative ids are ignored. Arc selection is cleared.
    pub fn sync_from_model(&mut self, model: &dyn Model<Data = i32>) {
        let ids = (0..model.row_count())
            .filter_map(|i| model.row_data(i))
            .filter_map(|id| u32::try_from(id).ok())
            .map(NodeId);
        self.replace_nodes(ids.collect::<Vec<_>>());
    }
}
