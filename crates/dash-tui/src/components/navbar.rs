//! NavBar component — one-row top bar.
//!
//! Left: `Home > Dashboard` breadcrumb. Right: search box, notification and
//! profile glyphs. None of the controls do anything; the bar is not
//! focusable.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_NAV_BG, C_PANEL_BORDER, C_PRIMARY, C_SECONDARY},
};

const SEARCH_BOX: &str = "[ Search…           ⌕ ]";
const ICONS: &str = "  ♫  ◉ ";

pub struct NavBar;

impl NavBar {
    pub fn new() -> Self {
        Self
    }
}

impl Component for NavBar {
    fn id(&self) -> ComponentId {
        ComponentId::NavBar
    }

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        let bg = Style::default().bg(C_NAV_BG);
        frame.render_widget(Paragraph::new("").style(bg), area);

        let right_width = (SEARCH_BOX.chars().count() + ICONS.chars().count()) as u16;
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(right_width)])
            .split(area);

        let breadcrumb = Line::from(vec![
            Span::styled(" Home", Style::default().fg(C_SECONDARY).add_modifier(Modifier::UNDERLINED)),
            Span::styled("  >  ", Style::default().fg(C_MUTED)),
            Span::styled("Dashboard", Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)),
        ]);
        frame.render_widget(Paragraph::new(breadcrumb).style(bg), cols[0]);

        let controls = Line::from(vec![
            Span::styled(SEARCH_BOX, Style::default().fg(C_PANEL_BORDER)),
            Span::styled(ICONS, Style::default().fg(C_SECONDARY)),
        ]);
        frame.render_widget(Paragraph::new(controls).style(bg), cols[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_model::config::UiConfig;
    use dash_model::{Board, ChartCatalog, Session};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_breadcrumb_rendered() {
        let state = AppState::new(Session::new(Board::default()), ChartCatalog::empty(), &UiConfig::default());
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        let mut nav = NavBar::new();
        terminal
            .draw(|f| nav.draw(f, f.area(), false, &state))
            .unwrap();

        let row: String = (0..80)
            .map(|x| terminal.backend().buffer()[(x, 0)].symbol().to_string())
            .collect();
        assert!(row.contains("Home  >  Dashboard"));
        assert!(row.contains("Search…"));
    }
}
