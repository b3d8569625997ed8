use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame, Terminal,
};
use std::{
    io::{self, Stdout},
    time::Duration,
};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget, TuiWidgetState};

use crate::statusbar::StatusBarRenderer;
use crate::tree::{Node, TreeError};
use crate::view::TreeView;

pub struct App {
    tree: TreeView,
    tick_rate: Duration,
    should_quit: bool,
    show_log: bool,
    logger_widget_state: TuiWidgetState,
    statusbar_renderer: StatusBarRenderer,
}

impl App {
    pub fn new(tree: TreeView, tick_rate: Duration) -> Self {
        Self {
            tree,
            tick_rate,
            should_quit: false,
            show_log: false,
            logger_widget_state: TuiWidgetState::new(),
            statusbar_renderer: StatusBarRenderer::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let stdout = io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        enable_raw_mode()?;
        execute!(terminal.backend_mut(), EnterAlternateScreen)?;
        execute!(terminal.backend_mut(), crossterm::event::EnableMouseCapture)?;

        let result = self.run_app(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), crossterm::event::DisableMouseCapture)?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        self.tree.teardown();
        result
    }

    async fn run_app(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut input_arrived = true;

        loop {
            if self.take_pending_redraw() || input_arrived {
                terminal.draw(|f| self.ui(f))?;
            }
            input_arrived = false;

            if event::poll(self.tick_rate)? {
                match event::read()? {
                    Event::Key(key) => {
                        self.handle_input(key.code, key.modifiers);
                        input_arrived = true;
                    }
                    Event::Mouse(mouse) => {
                        self.handle_mouse_event(mouse);
                        input_arrived = true;
                    }
                    Event::Resize(_, _) => input_arrived = true,
                    _ => {}
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Consume the index and row dirty flags. The log pane redraws every
    /// pass while it is shown.
    fn take_pending_redraw(&mut self) -> bool {
        let index_changed = self.tree.index().borrow_mut().take_dirty();
        if index_changed {
            let index = self.tree.index().borrow();
            log::trace!(
                "app: index revision {}, {} selected, {} views registered",
                index.revision(),
                index.selected_count(),
                index.registered_count()
            );
        }
        index_changed || self.tree.needs_redraw() || self.show_log
    }

    pub fn handle_input(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        let page = self.tree.page_size();
        let outcome = match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                Ok(())
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                Ok(())
            }
            KeyCode::Up => {
                self.tree.move_up(1);
                Ok(())
            }
            KeyCode::Down => {
                self.tree.move_down(1);
                Ok(())
            }
            KeyCode::PageUp => {
                self.tree.move_up(page);
                Ok(())
            }
            KeyCode::PageDown => {
                self.tree.move_down(page);
                Ok(())
            }
            KeyCode::Home => {
                self.tree.move_home();
                Ok(())
            }
            KeyCode::End => {
                self.tree.move_end();
                Ok(())
            }
            KeyCode::Right => {
                self.tree.expand_cursor();
                Ok(())
            }
            KeyCode::Left => {
                self.tree.collapse_cursor_or_parent();
                Ok(())
            }
            KeyCode::Tab => {
                if let Some(id) = self.tree.cursor_id() {
                    self.tree.toggle(id);
                }
                Ok(())
            }
            KeyCode::Enter => match self.tree.cursor_id() {
                Some(id) => self.tree.select_only(id),
                None => Ok(()),
            },
            KeyCode::Char(' ') => match self.tree.cursor_id() {
                Some(id) => self.tree.toggle_checked(id),
                None => Ok(()),
            },
            KeyCode::Char('c') => {
                self.tree.clear_selection();
                self.statusbar_renderer
                    .set_status_message("Selection cleared".to_string());
                Ok(())
            }
            KeyCode::Char('E') => {
                self.tree.expand_all();
                Ok(())
            }
            KeyCode::Char('C') => {
                self.tree.collapse_all();
                Ok(())
            }
            KeyCode::Char('l') => {
                self.show_log = !self.show_log;
                Ok(())
            }
            _ => Ok(()),
        };
        self.report(outcome);
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let outcome = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.tree.click(mouse.column, mouse.row),
            MouseEventKind::ScrollUp => {
                self.tree.move_up(1);
                Ok(())
            }
            MouseEventKind::ScrollDown => {
                self.tree.move_down(1);
                Ok(())
            }
            _ => Ok(()),
        };
        self.report(outcome);
    }

    /// A failed interaction is abandoned; the tree keeps its prior state.
    fn report(&mut self, outcome: Result<(), TreeError>) {
        match outcome {
            Ok(()) => {
                let selected = self.tree.selected_names();
                if !selected.is_empty() {
                    self.statusbar_renderer
                        .set_status_message(format!("Selected: {}", selected.join(", ")));
                }
            }
            Err(e) => {
                log::error!("app: interaction aborted: {e}");
                self.statusbar_renderer.set_error_message(format!("Error: {e}"));
            }
        }
    }

    fn ui(&mut self, f: &mut Frame) {
        if self.show_log {
            tui_logger::move_events();
        }

        let mut constraints = vec![Constraint::Min(0)];
        if self.show_log {
            constraints.push(Constraint::Length(8));
        }
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(f.area());

        self.tree.render(f, chunks[0], "Tree");

        if self.show_log {
            let logger_widget = TuiLoggerWidget::default()
                .block(Block::default().title("Log").borders(Borders::ALL))
                .output_timestamp(Some("%H:%M:%S".to_string()))
                .output_level(Some(TuiLoggerLevelOutput::Long))
                .output_target(false)
                .output_file(false)
                .output_line(false)
                .output_separator(' ')
                .style_info(Style::default().fg(Color::White))
                .style_warn(Style::default().fg(Color::Yellow))
                .style_error(Style::default().fg(Color::Red))
                .style_debug(Style::default().fg(Color::DarkGray))
                .style_trace(Style::default().fg(Color::Gray))
                .state(&self.logger_widget_state);
            f.render_widget(logger_widget, chunks[1]);
        }

        let rows = self.tree.visible_rows().len();
        let cursor_label = self
            .tree
            .cursor_id()
            .and_then(|id| Node::find(self.tree.roots(), id))
            .map(|node| format!("{} ({}/{rows})", node.name, self.tree.cursor() + 1));
        let selected = self.tree.index().borrow().selected_count();
        self.statusbar_renderer.render_status_bar(
            f,
            chunks[chunks.len() - 1],
            cursor_label.as_deref(),
            selected,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statusbar::StatusLevel;
    use crate::tree::TreeSelectionIndex;

    fn app() -> App {
        let tree = TreeView::new(
            Node::from_paths(&["/a/b", "/c"]),
            TreeSelectionIndex::new().shared(),
        );
        App::new(tree, Duration::from_millis(250))
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_input(key, KeyModifiers::NONE);
    }

    #[test]
    fn keys_drive_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        {
            let index = app.tree.index().borrow();
            assert!(!index.is_selected(0));
            assert!(index.is_selected(1));
        }

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.tree.selected_names(), vec!["b", "c"]);

        press(&mut app, KeyCode::Char('c'));
        assert!(app.tree.selected_names().is_empty());
    }

    #[test]
    fn consistency_violation_is_reported_not_applied() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        app.tree.index().borrow_mut().unregister(0);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.statusbar_renderer.level, StatusLevel::Error);
        let index = app.tree.index().borrow();
        assert!(index.is_selected(0));
        assert!(!index.is_selected(1));
    }

    #[test]
    fn frames_are_drawn_only_when_something_changed() {
        use ratatui::backend::TestBackend;

        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        assert!(app.take_pending_redraw());

        terminal.draw(|f| app.ui(f)).unwrap();
        assert!(!app.take_pending_redraw());

        press(&mut app, KeyCode::Enter);
        assert!(app.take_pending_redraw());
        terminal.draw(|f| app.ui(f)).unwrap();
        assert!(!app.take_pending_redraw());

        press(&mut app, KeyCode::Char('l'));
        assert!(app.take_pending_redraw());
        assert!(app.take_pending_redraw());
    }

    #[test]
    fn status_bar_shows_cursor_position() {
        use ratatui::backend::TestBackend;

        let mut app = app();
        press(&mut app, KeyCode::Down);
        let mut terminal = Terminal::new(TestBackend::new(80, 6)).unwrap();
        terminal.draw(|f| app.ui(f)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let status: String = (0..80u16)
            .map(|x| buffer[(x, 5u16)].symbol().to_string())
            .collect();
        assert!(status.contains("At: b (2/3)"));
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = self::app();
        app.handle_input(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn tab_toggles_cursor_node() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert!(app.tree.index().borrow().is_collapsed(0));
        press(&mut app, KeyCode::Char('E'));
        assert!(!app.tree.index().borrow().is_collapsed(0));
        press(&mut app, KeyCode::Char('C'));
        assert!(app.tree.index().borrow().is_collapsed(0));
    }
}
