//! Drawer component — right-side "Personalize your dashboard" panel.
//!
//! Lists every category as a collapsible header. The expanded category (at
//! most one) shows its widgets with a remove control, the "add widget" text
//! field and an `Add Widget` button. The field's text lives in the session;
//! the component only keeps the editor cursor.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_button, style_default, style_heading, style_muted, style_secondary,
        style_selected_focused, C_DANGER, C_DRAWER_BG, C_MUTED,
    },
    widgets::{
        pane_chrome::{pane_chrome, truncate, Badge},
        status_bar::draw_separator,
        text_input::{InputAction, TextInput},
    },
};

const TITLE: &str = "Personalize your dashboard";
const SUBTITLE: &str = "Add the following widgets:";
const CLOSE_LABEL: &str = "✕ close";
const REMOVE_GLYPH: &str = " ✕ ";

/// One selectable line of the drawer. Indices refer to the board's
/// category and widget positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerRow {
    Header(usize),
    Widget(usize, usize),
    Empty(usize),
    Input(usize),
    Submit(usize),
}

/// Rows for the current session: a header per category, plus the body of
/// the expanded one.
pub fn drawer_rows(state: &AppState) -> Vec<DrawerRow> {
    let mut rows = Vec::new();
    for (ci, cat) in state.session.board().categories().iter().enumerate() {
        rows.push(DrawerRow::Header(ci));
        if !state.session.is_expanded(&cat.id) {
            continue;
        }
        if cat.widgets.is_empty() {
            rows.push(DrawerRow::Empty(ci));
        } else {
            rows.extend((0..cat.widgets.len()).map(|wi| DrawerRow::Widget(ci, wi)));
        }
        rows.push(DrawerRow::Input(ci));
        rows.push(DrawerRow::Submit(ci));
    }
    rows
}

/// Where the selection should land after the next board change.
#[derive(Debug, Clone, PartialEq)]
enum Follow {
    Header(String),
    Input(String),
}

pub struct Drawer {
    selected: usize,
    scroll: usize,
    input: TextInput,
    follow: Option<Follow>,
    /// Clickable rects from the last draw: row index per rect.
    hits: Vec<(Rect, usize)>,
    close_hit: Rect,
}

impl Drawer {
    pub fn new() -> Self {
        Self {
            selected: 0,
            scroll: 0,
            input: TextInput::new(),
            follow: None,
            hits: Vec::new(),
            close_hit: Rect::default(),
        }
    }

    pub fn current_row(&self, state: &AppState) -> Option<DrawerRow> {
        drawer_rows(state).get(self.selected).copied()
    }

    /// True when the selection sits on the text field.
    pub fn is_editing(&self, state: &AppState) -> bool {
        matches!(self.current_row(state), Some(DrawerRow::Input(_)))
    }

    /// Re-resolve the selection against the current rows.
    fn sync(&mut self, state: &AppState) {
        let rows = drawer_rows(state);
        if let Some(follow) = self.follow.take() {
            let target = rows.iter().position(|row| match (row, &follow) {
                (DrawerRow::Header(ci), Follow::Header(id)) => state.category_id(*ci) == Some(id.as_str()),
                (DrawerRow::Input(ci), Follow::Input(id)) => state.category_id(*ci) == Some(id.as_str()),
                _ => false,
            });
            if let Some(pos) = target {
                self.selected = pos;
            }
        }
        self.selected = self.selected.min(rows.len().saturating_sub(1));
        self.sync_input(state);
    }

    /// Load the session's staged text into the editor when they differ.
    fn sync_input(&mut self, state: &AppState) {
        if let Some(DrawerRow::Input(ci)) = self.current_row(state) {
            let pending = state
                .category_id(ci)
                .map(|id| state.session.pending_input(id))
                .unwrap_or("");
            if self.input.text() != pending {
                self.input.set_value(pending);
            }
        }
    }

    fn move_selection(&mut self, state: &AppState, down: bool) {
        let len = drawer_rows(state).len();
        if len == 0 {
            return;
        }
        self.selected = if down {
            (self.selected + 1).min(len - 1)
        } else {
            self.selected.saturating_sub(1)
        };
        self.sync_input(state);
    }

    fn activate(&self, row: DrawerRow, state: &AppState) -> Vec<Action> {
        match row {
            DrawerRow::Header(ci) => state
                .category_id(ci)
                .map(|id| vec![Action::ToggleCategory(id.to_string())])
                .unwrap_or_default(),
            DrawerRow::Input(ci) | DrawerRow::Submit(ci) => state
                .category_id(ci)
                .map(|id| vec![Action::SubmitWidget(id.to_string())])
                .unwrap_or_default(),
            DrawerRow::Widget(..) | DrawerRow::Empty(_) => vec![],
        }
    }

    fn remove(&self, row: DrawerRow, state: &AppState) -> Vec<Action> {
        match row {
            DrawerRow::Widget(ci, wi) => state
                .category_id(ci)
                .map(|id| vec![Action::RemoveWidget(id.to_string(), wi)])
                .unwrap_or_default(),
            _ => vec![],
        }
    }

    fn row_line(&self, row: DrawerRow, width: usize, state: &AppState) -> Line<'static> {
        let cats = state.session.board().categories();
        match row {
            DrawerRow::Header(ci) => {
                let cat = &cats[ci];
                let arrow = if state.session.is_expanded(&cat.id) { "▾ " } else { "▸ " };
                Line::from(vec![
                    Span::styled(arrow, style_secondary()),
                    Span::styled(truncate(&cat.name, width.saturating_sub(2)), style_heading()),
                ])
            }
            DrawerRow::Widget(ci, wi) => {
                let name = &cats[ci].widgets[wi].name;
                let name_w = width.saturating_sub(4 + REMOVE_GLYPH.chars().count());
                let shown = truncate(name, name_w);
                let pad = name_w.saturating_sub(unicode_width::UnicodeWidthStr::width(shown.as_str()));
                Line::from(vec![
                    Span::raw("    "),
                    Span::styled(shown, style_default()),
                    Span::raw(" ".repeat(pad)),
                    Span::styled(REMOVE_GLYPH, Style::default().fg(C_DANGER).add_modifier(Modifier::BOLD)),
                ])
            }
            DrawerRow::Empty(_) => Line::from(Span::styled("    No widgets available.", style_muted())),
            DrawerRow::Submit(_) => Line::from(vec![
                Span::raw("    "),
                Span::styled(" Add Widget ", style_button()),
            ]),
            // Drawn by the text input.
            DrawerRow::Input(_) => Line::default(),
        }
    }
}

impl Default for Drawer {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Drawer {
    fn id(&self) -> ComponentId {
        ComponentId::Drawer
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        self.sync(state);
        let Some(row) = self.current_row(state) else {
            return match key.code {
                KeyCode::Esc => vec![Action::ToggleDrawer],
                _ => vec![],
            };
        };

        if let DrawerRow::Input(ci) = row {
            return match key.code {
                KeyCode::Up => {
                    self.move_selection(state, false);
                    vec![]
                }
                KeyCode::Down => {
                    self.move_selection(state, true);
                    vec![]
                }
                _ => match self.input.handle_key(key) {
                    InputAction::Changed(value) => state
                        .category_id(ci)
                        .map(|id| vec![Action::StageInput(id.to_string(), value)])
                        .unwrap_or_default(),
                    InputAction::Submitted => self.activate(row, state),
                    InputAction::Cancelled => vec![Action::ToggleDrawer],
                    InputAction::None => vec![],
                },
            };
        }

        match key.code {
            KeyCode::Esc => vec![Action::ToggleDrawer],
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(state, false);
                vec![]
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(state, true);
                vec![]
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(row, state),
            KeyCode::Char('d') | KeyCode::Delete => self.remove(row, state),
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollDown => {
                self.move_selection(state, true);
                vec![]
            }
            MouseEventKind::ScrollUp => {
                self.move_selection(state, false);
                vec![]
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let pos = (event.column, event.row).into();
                if self.close_hit.contains(pos) {
                    return vec![Action::ToggleDrawer];
                }
                let Some((rect, idx)) = self.hits.iter().find(|(r, _)| r.contains(pos)).copied() else {
                    return vec![];
                };
                self.selected = idx;
                self.sync_input(state);
                match self.current_row(state) {
                    Some(row @ DrawerRow::Widget(..)) => {
                        let glyph_w = REMOVE_GLYPH.chars().count() as u16;
                        if event.column >= rect.x + rect.width.saturating_sub(glyph_w) {
                            self.remove(row, state)
                        } else {
                            vec![]
                        }
                    }
                    Some(row @ (DrawerRow::Header(_) | DrawerRow::Submit(_))) => self.activate(row, state),
                    _ => vec![],
                }
            }
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::ToggleCategory(id) => self.follow = Some(Follow::Header(id.clone())),
            Action::SubmitWidget(id) => self.follow = Some(Follow::Input(id.clone())),
            Action::ToggleDrawer => {
                self.selected = 0;
                self.scroll = 0;
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.hits.clear();
        self.close_hit = Rect::default();
        if area.width < 10 || area.height < 5 {
            return;
        }
        self.sync(state);

        frame.render_widget(Clear, area);
        let count = format!("{} categories", state.session.board().len());
        let block = pane_chrome(
            TITLE,
            focused,
            Some(Badge {
                text: CLOSE_LABEL,
                color: C_MUTED,
            }),
        )
        .style(Style::default().bg(C_DRAWER_BG));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let close_w = CLOSE_LABEL.chars().count() as u16 + 2;
        self.close_hit = Rect::new(area.x + area.width.saturating_sub(close_w + 1), area.y, close_w, 1);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" {}", SUBTITLE), style_secondary()),
                Span::styled(format!("  ({})", count), style_muted()),
            ])),
            Rect::new(inner.x, inner.y, inner.width, 1),
        );
        draw_separator(frame, Rect::new(inner.x, inner.y + 1, inner.width, 1));

        let list = Rect::new(inner.x, inner.y + 2, inner.width, inner.height.saturating_sub(2));
        let height = list.height as usize;
        if height == 0 {
            return;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + height {
            self.scroll = self.selected + 1 - height;
        }

        let rows = drawer_rows(state);
        let width = list.width as usize;
        for (offset, (idx, row)) in rows.iter().enumerate().skip(self.scroll).take(height).enumerate() {
            let rect = Rect::new(list.x, list.y + offset as u16, list.width, 1);
            let selected = focused && idx == self.selected;
            self.hits.push((rect, idx));

            if let DrawerRow::Input(ci) = *row {
                let cat = &state.session.board().categories()[ci];
                let field = Rect::new(rect.x + 4, rect.y, rect.width.saturating_sub(5), 1);
                let placeholder = format!("Add a new widget to {}", cat.name);
                self.input.draw(
                    frame,
                    field,
                    state.session.pending_input(&cat.id),
                    &placeholder,
                    selected,
                );
                continue;
            }

            let mut para = Paragraph::new(self.row_line(*row, width, state));
            if selected {
                para = para.style(style_selected_focused());
            }
            frame.render_widget(para, rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_model::config::UiConfig;
    use dash_model::{Board, Category, ChartCatalog, Session, Widget};
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn state() -> AppState {
        let mut cloud = Category::new("cloud", "Cloud");
        cloud.widgets = vec![Widget::named("Cloud Accounts"), Widget::named("Risk")];
        let empty = Category::new("empty", "Empty");
        AppState::new(
            Session::new(Board::from_categories([cloud, empty])),
            ChartCatalog::builtin(),
            &UiConfig::default(),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_rows_follow_expansion() {
        let mut s = state();
        assert_eq!(drawer_rows(&s), vec![DrawerRow::Header(0), DrawerRow::Header(1)]);

        s.session.toggle_category("cloud");
        assert_eq!(
            drawer_rows(&s),
            vec![
                DrawerRow::Header(0),
                DrawerRow::Widget(0, 0),
                DrawerRow::Widget(0, 1),
                DrawerRow::Input(0),
                DrawerRow::Submit(0),
                DrawerRow::Header(1),
            ]
        );

        s.session.toggle_category("empty");
        assert_eq!(
            drawer_rows(&s),
            vec![
                DrawerRow::Header(0),
                DrawerRow::Header(1),
                DrawerRow::Empty(1),
                DrawerRow::Input(1),
                DrawerRow::Submit(1),
            ]
        );
    }

    #[test]
    fn test_enter_on_header_toggles_category() {
        let s = state();
        let mut drawer = Drawer::new();
        drawer.handle_key(key(KeyCode::Down), &s);
        assert_eq!(
            drawer.handle_key(key(KeyCode::Enter), &s),
            vec![Action::ToggleCategory("empty".into())]
        );
    }

    #[test]
    fn test_typing_stages_input_and_enter_submits() {
        let mut s = state();
        s.session.toggle_category("cloud");
        let mut drawer = Drawer::new();
        for _ in 0..3 {
            drawer.handle_key(key(KeyCode::Down), &s);
        }
        assert!(drawer.is_editing(&s));

        let actions = drawer.handle_key(key(KeyCode::Char('k')), &s);
        assert_eq!(actions, vec![Action::StageInput("cloud".into(), "k".into())]);
        s.session.stage_input("cloud", "k");

        assert_eq!(
            drawer.handle_key(key(KeyCode::Enter), &s),
            vec![Action::SubmitWidget("cloud".into())]
        );
    }

    #[test]
    fn test_delete_on_widget_row() {
        let mut s = state();
        s.session.toggle_category("cloud");
        let mut drawer = Drawer::new();
        drawer.handle_key(key(KeyCode::Down), &s);
        drawer.handle_key(key(KeyCode::Down), &s);
        assert_eq!(drawer.current_row(&s), Some(DrawerRow::Widget(0, 1)));
        assert_eq!(
            drawer.handle_key(key(KeyCode::Char('d')), &s),
            vec![Action::RemoveWidget("cloud".into(), 1)]
        );
    }

    #[test]
    fn test_selection_follows_toggled_header() {
        let mut s = state();
        s.session.toggle_category("cloud");
        let mut drawer = Drawer::new();
        // Header(1) sits after the expanded cloud body.
        for _ in 0..5 {
            drawer.handle_key(key(KeyCode::Down), &s);
        }
        let actions = drawer.handle_key(key(KeyCode::Enter), &s);
        assert_eq!(actions, vec![Action::ToggleCategory("empty".into())]);

        drawer.on_action(&actions[0], &s);
        s.session.toggle_category("empty");
        drawer.sync(&s);
        assert_eq!(drawer.current_row(&s), Some(DrawerRow::Header(1)));
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Draw into a 40x20 buffer. Border at row 0, subtitle row 1, separator
    /// row 2, list rows from 3; list cells span x = 1..39.
    fn draw(drawer: &mut Drawer, s: &AppState) {
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        terminal
            .draw(|f| drawer.draw(f, f.area(), true, s))
            .unwrap();
    }

    #[test]
    fn test_click_remove_glyph() {
        let mut s = state();
        s.session.toggle_category("cloud");
        let mut drawer = Drawer::new();
        draw(&mut drawer, &s);

        // Row 5 is the second cloud widget; the ✕ takes the last 3 columns.
        assert_eq!(
            drawer.handle_mouse(click(37, 5), Rect::default(), &s),
            vec![Action::RemoveWidget("cloud".into(), 1)]
        );
        // Clicking the name only selects the row.
        assert!(drawer.handle_mouse(click(8, 4), Rect::default(), &s).is_empty());
        assert_eq!(drawer.current_row(&s), Some(DrawerRow::Widget(0, 0)));
    }

    #[test]
    fn test_click_header_and_submit() {
        let mut s = state();
        s.session.toggle_category("cloud");
        let mut drawer = Drawer::new();
        draw(&mut drawer, &s);

        assert_eq!(
            drawer.handle_mouse(click(5, 8), Rect::default(), &s),
            vec![Action::ToggleCategory("empty".into())]
        );
        assert_eq!(
            drawer.handle_mouse(click(8, 7), Rect::default(), &s),
            vec![Action::SubmitWidget("cloud".into())]
        );
        // The field only takes the selection.
        assert!(drawer.handle_mouse(click(8, 6), Rect::default(), &s).is_empty());
        assert!(drawer.is_editing(&s));
    }

    #[test]
    fn test_click_close_badge() {
        let s = state();
        let mut drawer = Drawer::new();
        draw(&mut drawer, &s);
        // " ✕ close " is right-aligned in the top border.
        assert_eq!(
            drawer.handle_mouse(click(33, 0), Rect::default(), &s),
            vec![Action::ToggleDrawer]
        );
        assert!(drawer.handle_mouse(click(5, 0), Rect::default(), &s).is_empty());
    }

    #[test]
    fn test_esc_closes() {
        let s = state();
        let mut drawer = Drawer::new();
        assert_eq!(drawer.handle_key(key(KeyCode::Esc), &s), vec![Action::ToggleDrawer]);
    }
}
