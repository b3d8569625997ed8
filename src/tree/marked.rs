use std::collections::HashSet;

use super::node::NodeId;

/// A set of ids carrying a boolean mark. Absence means unmarked.
#[derive(Debug, Default, Clone)]
pub struct Marked {
    data: HashSet<NodeId>,
}

impl Marked {
    pub fn mark(&mut self, id: NodeId) {
        self.data.insert(id);
    }

    pub fn clear(&mut self, id: NodeId) {
        self.data.remove(&id);
    }

    /// Flip the mark for `id` and return the new state.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if self.data.remove(&id) {
            false
        } else {
            self.data.insert(id);
            true
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.data.contains(&id)
    }

    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Keep only the marks for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.data.retain(|id| keep(*id));
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_and_reports_new_state() {
        let mut marked = Marked::default();
        assert!(marked.toggle(3));
        assert!(marked.contains(3));
        assert!(!marked.toggle(3));
        assert!(!marked.contains(3));
    }

    #[test]
    fn mark_and_clear_are_idempotent() {
        let mut marked = Marked::default();
        marked.mark(1);
        marked.mark(1);
        assert_eq!(marked.len(), 1);
        marked.clear(1);
        marked.clear(1);
        assert_eq!(marked.len(), 0);
    }

    #[test]
    fn reset_drops_every_mark() {
        let mut marked = Marked::default();
        for id in 0..5 {
            marked.mark(id);
        }
        marked.reset();
        assert_eq!(marked.len(), 0);
        assert!(!marked.contains(2));
    }

    #[test]
    fn retain_drops_rejected_marks() {
        let mut marked = Marked::default();
        for id in 0..4 {
            marked.mark(id);
        }
        marked.retain(|id| id % 2 == 0);
        assert!(marked.contains(0));
        assert!(!marked.contains(1));
        assert!(marked.contains(2));
        assert_eq!(marked.len(), 2);
    }
}
