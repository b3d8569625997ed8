use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use ratatui::layout::Rect;

use crate::tree::{Node, NodeId, SharedIndex, TreeError, TreeSelectionIndex};

mod mouse;
mod navigation;
mod render;

/// The view for one node. Registers itself with the index on construction so
/// a newer single selection can tell it to drop its highlight.
pub struct NodeView {
    id: NodeId,
    redraw: Rc<Cell<bool>>,
}

impl NodeView {
    pub fn new(id: NodeId, index: &SharedIndex) -> Self {
        let redraw = Rc::new(Cell::new(true));
        let flag = redraw.clone();
        index.borrow_mut().register_view(
            id,
            Box::new(move |deselected| {
                log::trace!("view: {deselected} deselected");
                flag.set(true);
            }),
        );
        Self { id, redraw }
    }

    pub fn mark_dirty(&self) {
        self.redraw.set(true);
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw.get()
    }

    fn take_redraw(&self) -> bool {
        self.redraw.replace(false)
    }

    pub fn teardown(self, index: &SharedIndex) {
        index.borrow_mut().unregister(self.id);
    }
}

/// A row of the flattened, currently visible tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: NodeId,
    pub name: String,
    pub level: usize,
    pub has_children: bool,
    pub collapsed: bool,
    pub selected: bool,
}

pub struct TreeView {
    index: SharedIndex,
    roots: Vec<Node>,
    views: HashMap<NodeId, NodeView>,

    // Cursor and scrolling
    cursor: usize,
    scroll_offset: usize,
    visible_height: usize,

    // Inner area of the last render, used for mouse hit testing
    area: Rect,
}

impl TreeView {
    pub fn new(roots: Vec<Node>, index: SharedIndex) -> Self {
        let mut view = Self {
            index,
            roots: Vec::new(),
            views: HashMap::new(),
            cursor: 0,
            scroll_offset: 0,
            visible_height: 0,
            area: Rect::default(),
        };
        view.set_roots(roots);
        view
    }

    pub fn index(&self) -> &SharedIndex {
        &self.index
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    #[cfg(test)]
    pub fn view(&self, id: NodeId) -> Option<&NodeView> {
        self.views.get(&id)
    }

    /// Whether any visible row was flagged since the last render.
    pub fn needs_redraw(&self) -> bool {
        self.visible_rows()
            .iter()
            .filter_map(|row| self.views.get(&row.id))
            .any(NodeView::needs_redraw)
    }

    /// Replace the hierarchy. Views for ids that vanished are deselected and
    /// torn down; surviving ids keep their collapsed and selected state.
    pub fn set_roots(&mut self, roots: Vec<Node>) {
        let ids: HashSet<NodeId> = Node::walk(&roots).iter().map(|(_, n)| n.id).collect();

        let vanished: Vec<NodeId> = self
            .views
            .keys()
            .copied()
            .filter(|id| !ids.contains(id))
            .collect();
        for id in &vanished {
            self.index.borrow_mut().deselect(*id);
            if let Some(view) = self.views.remove(id) {
                view.teardown(&self.index);
            }
        }

        let mut created = 0;
        for id in ids {
            if !self.views.contains_key(&id) {
                self.views.insert(id, NodeView::new(id, &self.index));
                created += 1;
            }
        }

        self.index.borrow_mut().sync_nodes(&roots);
        self.roots = roots;
        self.clamp_cursor();

        log::info!(
            "view: hierarchy set, {} views ({created} new, {} removed), {} registered",
            self.views.len(),
            vanished.len(),
            self.index.borrow().registered_count()
        );
    }

    /// Unregister every view from the index.
    pub fn teardown(&mut self) {
        for (_, view) in self.views.drain() {
            view.teardown(&self.index);
        }
    }

    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        fn visit(
            nodes: &[Node],
            level: usize,
            index: &TreeSelectionIndex,
            out: &mut Vec<VisibleRow>,
        ) {
            for node in nodes {
                let collapsed = index.is_collapsed(node.id);
                out.push(VisibleRow {
                    id: node.id,
                    name: node.name.clone(),
                    level,
                    has_children: node.has_children(),
                    collapsed,
                    selected: index.is_selected(node.id),
                });
                if !collapsed {
                    visit(&node.children, level + 1, index, out);
                }
            }
        }

        let index = self.index.borrow();
        let mut rows = Vec::new();
        visit(&self.roots, 0, &index, &mut rows);
        rows
    }

    /// Expand or collapse `id`. Nodes without children are ignored.
    pub fn toggle(&mut self, id: NodeId) {
        match Node::find(&self.roots, id) {
            Some(node) if node.has_children() => {}
            _ => return,
        }
        self.index.borrow_mut().toggle_collapsed(id);
        self.touch(id);
        self.clamp_cursor();
    }

    pub fn set_collapsed(&mut self, id: NodeId, collapsed: bool) {
        if collapsed {
            self.index.borrow_mut().collapse(id);
        } else {
            self.index.borrow_mut().expand(id);
        }
        self.touch(id);
        self.clamp_cursor();
    }

    /// Row click: make `id` the only selection.
    pub fn select_only(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.index.borrow_mut().select(id, false, true)?;
        self.touch(id);
        Ok(())
    }

    /// Checkbox change: add or remove `id` without touching other selections.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Result<(), TreeError> {
        self.index.borrow_mut().select(id, true, checked)?;
        self.touch(id);
        Ok(())
    }

    pub fn toggle_checked(&mut self, id: NodeId) -> Result<(), TreeError> {
        let checked = !self.index.borrow().is_selected(id);
        self.set_checked(id, checked)
    }

    pub fn clear_selection(&mut self) {
        self.index.borrow_mut().clear_selection();
    }

    pub fn expand_all(&mut self) {
        self.index.borrow_mut().expand_all();
        self.views.values().for_each(NodeView::mark_dirty);
    }

    pub fn collapse_all(&mut self) {
        self.index.borrow_mut().collapse_all(&self.roots);
        self.views.values().for_each(NodeView::mark_dirty);
        self.clamp_cursor();
    }

    pub fn selected_names(&self) -> Vec<String> {
        let index = self.index.borrow();
        let names = index
            .selected_ids()
            .filter_map(|id| Node::find(&self.roots, id))
            .map(|node| node.name.clone())
            .collect();
        names
    }

    fn touch(&self, id: NodeId) {
        if let Some(view) = self.views.get(&id) {
            view.mark_dirty();
        }
    }
}
