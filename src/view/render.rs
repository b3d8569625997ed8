use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use super::mouse::INDENT_WIDTH;
use super::VisibleRow;

impl super::TreeView {
    pub fn render(&mut self, f: &mut Frame, area: Rect, title: &str) {
        let block = Block::default()
            .title(title.to_string())
            .borders(Borders::ALL);
        let inner = block.inner(area);
        self.area = inner;
        self.update_scroll_with_height(inner.height as usize);

        let rows = self.visible_rows();
        let redrawn = rows
            .iter()
            .filter_map(|row| self.views.get(&row.id))
            .filter(|view| view.take_redraw())
            .count();
        if redrawn > 0 {
            log::trace!("view: {redrawn} rows redrawn");
        }

        let end = (self.scroll_offset + inner.height as usize).min(rows.len());
        let start = self.scroll_offset.min(end);
        let items: Vec<ListItem> = rows[start..end]
            .iter()
            .enumerate()
            .map(|(i, row)| ListItem::new(row_line(row, start + i == self.cursor)))
            .collect();

        f.render_widget(List::new(items).block(block), area);
    }

    /// Plain text rendering of the visible tree, one row per line.
    pub fn render_text(&self) -> String {
        self.visible_rows()
            .iter()
            .map(|row| {
                let line = row_line(row, false);
                line.spans.iter().map(|s| s.content.as_ref()).collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn row_line(row: &VisibleRow, at_cursor: bool) -> Line<'static> {
    let indent = " ".repeat(row.level * INDENT_WIDTH as usize);

    let icon = if row.has_children {
        if row.collapsed { "[+]" } else { "[-]" }
    } else {
        "   "
    };
    let checkbox = if row.selected { "[x]" } else { "[ ]" };

    let name_style = if row.selected {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let name_style = if at_cursor {
        name_style.add_modifier(Modifier::REVERSED)
    } else {
        name_style
    };

    Line::from(vec![
        Span::raw(indent),
        Span::styled(icon, Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(checkbox, Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(row.name.clone(), name_style),
    ])
}
