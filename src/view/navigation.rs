use crate::tree::{Node, NodeId};

impl super::TreeView {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_id(&self) -> Option<NodeId> {
        self.visible_rows().get(self.cursor).map(|row| row.id)
    }

    pub fn set_cursor_to(&mut self, id: NodeId) {
        if let Some(pos) = self.visible_rows().iter().position(|row| row.id == id) {
            self.cursor = pos;
            self.update_scroll();
        }
    }

    pub fn move_up(&mut self, amount: usize) {
        self.cursor = self.cursor.saturating_sub(amount);
        self.update_scroll();
    }

    pub fn move_down(&mut self, amount: usize) {
        let last = self.visible_rows().len().saturating_sub(1);
        self.cursor = (self.cursor + amount).min(last);
        self.update_scroll();
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
        self.update_scroll();
    }

    pub fn move_end(&mut self) {
        self.cursor = self.visible_rows().len().saturating_sub(1);
        self.update_scroll();
    }

    pub fn page_size(&self) -> usize {
        self.visible_height.max(1)
    }

    /// Right arrow: expand the node under the cursor.
    pub fn expand_cursor(&mut self) {
        if let Some(id) = self.cursor_id() {
            self.set_collapsed(id, false);
        }
    }

    /// Left arrow: collapse the node under the cursor, or move to its parent
    /// when it is already collapsed or has no children.
    pub fn collapse_cursor_or_parent(&mut self) {
        let Some(row) = self.visible_rows().into_iter().nth(self.cursor) else {
            return;
        };

        if row.has_children && !row.collapsed {
            self.set_collapsed(row.id, true);
            return;
        }

        match Node::parent_of(&self.roots, row.id).map(|parent| parent.id) {
            Some(parent) => {
                log::debug!("view: moved to parent {parent}");
                self.set_cursor_to(parent);
            }
            None => log::debug!("view: already at root level"),
        }
    }

    pub(super) fn clamp_cursor(&mut self) {
        let rows = self.visible_rows().len();
        if self.cursor >= rows {
            self.cursor = rows.saturating_sub(1);
        }
        self.update_scroll();
    }

    pub(super) fn update_scroll(&mut self) {
        self.update_scroll_with_height(self.visible_height);
    }

    pub(super) fn update_scroll_with_height(&mut self, visible_height: usize) {
        self.visible_height = visible_height;
        if visible_height == 0 {
            return;
        }

        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + visible_height {
            self.scroll_offset = self.cursor + 1 - visible_height;
        }

        let rows = self.visible_rows().len();
        let max_offset = rows.saturating_sub(visible_height);
        if self.scroll_offset > max_offset {
            self.scroll_offset = max_offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::{Node, TreeSelectionIndex};
    use crate::view::TreeView;

    fn view() -> TreeView {
        TreeView::new(
            Node::from_paths(&["/a/b/c", "/a/d", "/e"]),
            TreeSelectionIndex::new().shared(),
        )
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut view = view();
        view.move_up(3);
        assert_eq!(view.cursor(), 0);
        view.move_down(100);
        assert_eq!(view.cursor(), 4);
        view.move_home();
        assert_eq!(view.cursor_id(), Some(0));
        view.move_end();
        assert_eq!(view.cursor_id(), Some(4));
    }

    #[test]
    fn left_collapses_then_moves_to_parent() {
        let mut view = view();
        view.set_cursor_to(2);

        // c is a leaf: jump to b
        view.collapse_cursor_or_parent();
        assert_eq!(view.cursor_id(), Some(1));

        // b is expanded: collapse it, cursor stays
        view.collapse_cursor_or_parent();
        assert!(view.index().borrow().is_collapsed(1));
        assert_eq!(view.cursor_id(), Some(1));

        // b is collapsed: jump to a
        view.collapse_cursor_or_parent();
        assert_eq!(view.cursor_id(), Some(0));
    }

    #[test]
    fn right_expands_cursor() {
        let mut view = view();
        view.collapse_all();
        view.expand_cursor();
        assert!(!view.index().borrow().is_collapsed(0));
        assert!(view.index().borrow().is_collapsed(1));
    }

    #[test]
    fn collapsing_above_cursor_clamps_it() {
        let mut view = view();
        view.move_end();
        view.collapse_all();
        assert_eq!(view.cursor(), 1);
        assert_eq!(view.cursor_id(), Some(4));
    }

    #[test]
    fn scroll_follows_cursor() {
        let mut view = view();
        view.update_scroll_with_height(2);
        view.move_down(3);
        assert_eq!(view.scroll_offset, 2);
        view.move_home();
        assert_eq!(view.scroll_offset, 0);
    }
}
