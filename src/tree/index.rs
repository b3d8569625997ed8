use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use super::error::TreeError;
use super::marked::Marked;
use super::node::{Node, NodeId};

/// Invoked with the id being deselected when a newer single selection
/// supersedes it. Runs while the index is borrowed, so it must not call back
/// into the index.
pub type DeselectCallback = Box<dyn FnMut(NodeId)>;

/// One index per tree session, handed to every node view at construction.
pub type SharedIndex = Rc<RefCell<TreeSelectionIndex>>;

/// Collapsed and selected state for a tree of nodes, keyed by node id.
///
/// The index never owns nodes. It tracks which ids are closed, which are
/// selected, and which views are currently registered to receive a deselect
/// notification.
#[derive(Default)]
pub struct TreeSelectionIndex {
    closed: Marked,
    selected: BTreeMap<NodeId, NodeId>,
    views: HashMap<NodeId, DeselectCallback>,
    leaves: HashSet<NodeId>,
    revision: u64,
    dirty: bool,
}

impl TreeSelectionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedIndex {
        Rc::new(RefCell::new(self))
    }

    /// Refresh which ids are leaves. Closed marks on leaves and on ids
    /// missing from `roots` are dropped.
    pub fn sync_nodes(&mut self, roots: &[Node]) {
        let nodes = Node::walk(roots);
        let parents: HashSet<NodeId> = nodes
            .iter()
            .filter(|(_, node)| node.has_children())
            .map(|(_, node)| node.id)
            .collect();
        self.leaves = nodes
            .iter()
            .filter(|(_, node)| !node.has_children())
            .map(|(_, node)| node.id)
            .collect();

        let before = self.closed.len();
        self.closed.retain(|id| parents.contains(&id));
        if self.closed.len() != before {
            self.touch();
        }
        log::debug!(
            "index: synced {} leaf ids, {} collapsed ({} stale marks dropped)",
            self.leaves.len(),
            self.closed.len(),
            before - self.closed.len()
        );
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.leaves.contains(&id)
    }

    pub fn toggle_collapsed(&mut self, id: NodeId) -> bool {
        if self.is_leaf(id) {
            log::trace!("index: ignoring toggle on leaf {id}");
            return false;
        }
        let closed = self.closed.toggle(id);
        log::debug!("index: node {id} {}", if closed { "collapsed" } else { "expanded" });
        self.touch();
        closed
    }

    pub fn is_collapsed(&self, id: NodeId) -> bool {
        self.closed.contains(id)
    }

    pub fn collapse(&mut self, id: NodeId) {
        if self.is_leaf(id) || self.closed.contains(id) {
            return;
        }
        self.closed.mark(id);
        self.touch();
    }

    pub fn expand(&mut self, id: NodeId) {
        if !self.closed.contains(id) {
            return;
        }
        self.closed.clear(id);
        self.touch();
    }

    pub fn expand_all(&mut self) {
        self.closed.reset();
        self.touch();
    }

    pub fn collapse_all(&mut self, roots: &[Node]) {
        for (_, node) in Node::walk(roots) {
            if node.has_children() {
                self.closed.mark(node.id);
            }
        }
        self.touch();
    }

    /// Select or deselect `id`.
    ///
    /// Unless `multi` is set, every other selected id is deselected first and
    /// its view notified. If any of them has no registered view the call
    /// fails before anything changes.
    pub fn select(&mut self, id: NodeId, multi: bool, selected: bool) -> Result<(), TreeError> {
        if !multi {
            let others: Vec<NodeId> = self
                .selected
                .keys()
                .copied()
                .filter(|other| *other != id)
                .collect();

            if let Some(&missing) = others.iter().find(|other| !self.views.contains_key(*other)) {
                log::error!("index: selected id {missing} has no registered view");
                return Err(TreeError::ConsistencyViolation { id: missing });
            }

            for other in others {
                self.selected.remove(&other);
                if let Some(callback) = self.views.get_mut(&other) {
                    callback(other);
                }
            }
        }

        if selected {
            self.selected.insert(id, id);
        } else {
            self.selected.remove(&id);
        }
        log::debug!(
            "index: {} {id} (multi={multi}), {} selected",
            if selected { "selected" } else { "deselected" },
            self.selected.len()
        );
        self.touch();
        Ok(())
    }

    pub fn deselect(&mut self, id: NodeId) {
        self.selected.remove(&id);
        self.touch();
    }

    /// Deselect everything, notifying each registered view.
    pub fn clear_selection(&mut self) {
        let ids: Vec<NodeId> = self.selected.keys().copied().collect();
        for id in ids {
            self.selected.remove(&id);
            if let Some(callback) = self.views.get_mut(&id) {
                callback(id);
            }
        }
        self.touch();
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected.contains_key(&id)
    }

    pub fn selected_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.selected.keys().copied()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn register_view(&mut self, id: NodeId, callback: DeselectCallback) {
        if self.views.insert(id, callback).is_some() {
            log::trace!("index: replaced view for {id}");
        }
    }

    pub fn unregister(&mut self, id: NodeId) -> bool {
        self.views.remove(&id).is_some()
    }

    #[cfg(test)]
    pub fn is_registered(&self, id: NodeId) -> bool {
        self.views.contains_key(&id)
    }

    pub fn registered_count(&self) -> usize {
        self.views.len()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether anything changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.dirty = true;
    }
}
