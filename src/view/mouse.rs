use crate::tree::{NodeId, TreeError};

pub(super) const INDENT_WIDTH: u16 = 2;
pub(super) const ICON_WIDTH: u16 = 3;
pub(super) const CHECKBOX_WIDTH: u16 = 3;

/// Columns taken by the indentation of a row at `level`.
pub(super) fn indent_columns(level: usize) -> u16 {
    u16::try_from(level)
        .unwrap_or(u16::MAX)
        .saturating_mul(INDENT_WIDTH)
}

/// Part of a tree row under the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRegion {
    Icon,
    Checkbox,
    Name,
}

impl super::TreeView {
    /// Map a terminal cell to the row and region it lands on.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<(NodeId, RowRegion)> {
        let area = self.area;
        if column < area.x
            || column >= area.x + area.width
            || row < area.y
            || row >= area.y + area.height
        {
            return None;
        }

        let position = self.scroll_offset + (row - area.y) as usize;
        let visible = self.visible_rows();
        let target = visible.get(position)?;

        let icon_start = indent_columns(target.level);
        let checkbox_start = icon_start.saturating_add(ICON_WIDTH + 1);
        let name_start = checkbox_start.saturating_add(CHECKBOX_WIDTH + 1);

        let x = column - area.x;
        let region = if x < icon_start {
            return None;
        } else if x < checkbox_start {
            RowRegion::Icon
        } else if x < name_start {
            RowRegion::Checkbox
        } else {
            RowRegion::Name
        };
        Some((target.id, region))
    }

    /// Dispatch a left click the way the row handles it: icon toggles,
    /// checkbox flips multi-selection, anywhere else selects the row alone.
    pub fn click(&mut self, column: u16, row: u16) -> Result<(), TreeError> {
        let Some((id, region)) = self.hit_test(column, row) else {
            return Ok(());
        };
        self.set_cursor_to(id);

        match region {
            RowRegion::Icon => {
                self.toggle(id);
                Ok(())
            }
            RowRegion::Checkbox => self.toggle_checked(id),
            RowRegion::Name => self.select_only(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, TreeSelectionIndex};
    use crate::view::TreeView;
    use ratatui::layout::Rect;

    fn view() -> TreeView {
        let mut view = TreeView::new(
            Node::from_paths(&["/root/leaf", "/other"]),
            TreeSelectionIndex::new().shared(),
        );
        view.area = Rect::new(1, 1, 30, 5);
        view
    }

    #[test]
    fn columns_map_to_regions() {
        let view = view();
        // row 0: "[-] [ ] root" starting at column 1
        assert_eq!(view.hit_test(1, 1), Some((0, RowRegion::Icon)));
        assert_eq!(view.hit_test(5, 1), Some((0, RowRegion::Checkbox)));
        assert_eq!(view.hit_test(9, 1), Some((0, RowRegion::Name)));
        // row 1 is indented by one level
        assert_eq!(view.hit_test(1, 2), None);
        assert_eq!(view.hit_test(3, 2), Some((1, RowRegion::Icon)));
    }

    #[test]
    fn deep_levels_saturate_indent() {
        assert_eq!(indent_columns(3), 6);
        assert_eq!(indent_columns(40_000), u16::MAX);
        assert_eq!(indent_columns(usize::MAX), u16::MAX);
    }

    #[test]
    fn clicks_outside_rows_are_ignored() {
        let view = view();
        assert_eq!(view.hit_test(0, 1), None);
        assert_eq!(view.hit_test(5, 4), None);
        assert_eq!(view.hit_test(5, 40), None);
    }

    #[test]
    fn click_dispatches_by_region() {
        let mut view = view();
        view.click(9, 1).unwrap();
        assert!(view.index().borrow().is_selected(0));

        view.click(7, 3).unwrap();
        assert!(view.index().borrow().is_selected(0));
        assert!(view.index().borrow().is_selected(2));

        view.click(1, 1).unwrap();
        assert!(view.index().borrow().is_collapsed(0));
        assert_eq!(view.visible_rows().len(), 2);
    }
}
