//! WidgetGrid component — the main dashboard area.
//!
//! A toolbar row (`[+ Add Widget]`, inert refresh) above one section per
//! category: a heading, then the category's widget cards three per row,
//! followed by an `Add New Category` card. Sections are laid out in a
//! virtual column. Keyboard moves scroll the selected card into view; the
//! mouse wheel scrolls freely within the content height.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use dash_model::render::{project, WidgetBody};
use dash_model::Category;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_button, style_heading, style_muted, style_secondary, C_ACCENT, C_PRIMARY},
    widgets::{
        donut::Donut,
        pane_chrome::{card_chrome, truncate},
    },
};

pub const CARDS_PER_ROW: usize = 3;
const CARD_HEIGHT: u16 = 12;
/// Card height in virtual rows. Virtual coordinates are `u32` because the
/// number of categories is unbounded.
const CARD_SPAN: u32 = CARD_HEIGHT as u32;
const ADD_WIDGET_LABEL: &str = " + Add Widget ";
const REFRESH_LABEL: &str = " ⟳ ";
const EMPTY_TEXT: &str = "No widgets available.";

/// A card slot: `card == widgets.len()` is the category's add-category card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardPos {
    pub category: usize,
    pub card: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Hit {
    AddWidget,
    Refresh,
    Card(CardPos),
}

pub struct WidgetGrid {
    pub selected: CardPos,
    /// Virtual row at the top of the viewport.
    scroll: u32,
    /// Viewport height from the last draw.
    viewport: u16,
    /// Clickable rects from the last draw.
    hits: Vec<(Rect, Hit)>,
}

fn card_count(category: &Category) -> usize {
    category.widgets.len() + 1
}

fn card_rows(category: &Category) -> u32 {
    card_count(category).div_ceil(CARDS_PER_ROW) as u32
}

/// Rows above the first card row of a section: heading, plus the empty
/// notice when the category has no widgets.
fn section_header(category: &Category) -> u32 {
    if category.widgets.is_empty() {
        2
    } else {
        1
    }
}

fn section_height(category: &Category) -> u32 {
    section_header(category) + card_rows(category) * CARD_SPAN + 1
}

impl WidgetGrid {
    pub fn new() -> Self {
        Self {
            selected: CardPos::default(),
            scroll: 0,
            viewport: 0,
            hits: Vec::new(),
        }
    }

    fn categories(state: &AppState) -> &[std::sync::Arc<Category>] {
        state.session.board().categories()
    }

    /// Keep the selection on an existing card after the board changed, and
    /// bring it into view.
    pub fn clamp_selection(&mut self, state: &AppState) {
        self.clamp_index(state);
        self.ensure_visible(state);
    }

    fn clamp_index(&mut self, state: &AppState) {
        let cats = Self::categories(state);
        if cats.is_empty() {
            self.selected = CardPos::default();
            return;
        }
        self.selected.category = self.selected.category.min(cats.len() - 1);
        let cards = card_count(&cats[self.selected.category]);
        self.selected.card = self.selected.card.min(cards - 1);
    }

    fn move_horizontal(&mut self, state: &AppState, forward: bool) {
        let cats = Self::categories(state);
        let Some(cat) = cats.get(self.selected.category) else {
            return;
        };
        let cards = card_count(cat);
        if forward {
            if self.selected.card + 1 < cards {
                self.selected.card += 1;
            } else if self.selected.category + 1 < cats.len() {
                self.selected = CardPos {
                    category: self.selected.category + 1,
                    card: 0,
                };
            }
        } else if self.selected.card > 0 {
            self.selected.card -= 1;
        } else if self.selected.category > 0 {
            let prev = self.selected.category - 1;
            self.selected = CardPos {
                category: prev,
                card: card_count(&cats[prev]) - 1,
            };
        }
    }

    fn move_vertical(&mut self, state: &AppState, down: bool) {
        let cats = Self::categories(state);
        let Some(cat) = cats.get(self.selected.category) else {
            return;
        };
        let col = self.selected.card % CARDS_PER_ROW;
        if down {
            let below = self.selected.card + CARDS_PER_ROW;
            if below < card_count(cat) {
                self.selected.card = below;
            } else if self.selected.category + 1 < cats.len() {
                let next = self.selected.category + 1;
                self.selected = CardPos {
                    category: next,
                    card: col.min(card_count(&cats[next]) - 1),
                };
            }
        } else if self.selected.card >= CARDS_PER_ROW {
            self.selected.card -= CARDS_PER_ROW;
        } else if self.selected.category > 0 {
            let prev = self.selected.category - 1;
            let cards = card_count(&cats[prev]);
            let last_row_start = (cards - 1) / CARDS_PER_ROW * CARDS_PER_ROW;
            self.selected = CardPos {
                category: prev,
                card: (last_row_start + col).min(cards - 1),
            };
        }
    }

    fn content_height(state: &AppState) -> u32 {
        Self::categories(state).iter().map(|c| section_height(c)).sum()
    }

    /// Virtual y of the selected card's top edge.
    fn selected_y(&self, state: &AppState) -> u32 {
        let cats = Self::categories(state);
        let above: u32 = cats
            .iter()
            .take(self.selected.category)
            .map(|c| section_height(c))
            .sum();
        let Some(cat) = cats.get(self.selected.category) else {
            return above;
        };
        above + section_header(cat) + (self.selected.card / CARDS_PER_ROW) as u32 * CARD_SPAN
    }

    fn ensure_visible(&mut self, state: &AppState) {
        if self.viewport == 0 {
            return;
        }
        let viewport = u32::from(self.viewport);
        let top = self.selected_y(state);
        let bottom = top + CARD_SPAN;
        if top < self.scroll {
            // Keep the section heading in view when jumping to a first row.
            self.scroll = top.saturating_sub(2);
        } else if bottom > self.scroll + viewport {
            self.scroll = bottom.saturating_sub(viewport);
        }
    }

    /// Stop the wheel from scrolling past the last section.
    fn clamp_scroll(&mut self, state: &AppState) {
        let max = Self::content_height(state).saturating_sub(u32::from(self.viewport));
        self.scroll = self.scroll.min(max);
    }

    fn activate(&self, state: &AppState) -> Vec<Action> {
        match Self::categories(state).get(self.selected.category) {
            Some(cat) if self.selected.card == cat.widgets.len() => vec![Action::AddCategory],
            _ => vec![],
        }
    }

    fn draw_toolbar(&mut self, frame: &mut Frame, area: Rect) {
        let button_w = ADD_WIDGET_LABEL.chars().count() as u16;
        let refresh_w = REFRESH_LABEL.chars().count() as u16;
        let total = button_w + refresh_w + 2;
        if area.width < total {
            return;
        }
        let button = Rect::new(area.x + area.width - total, area.y, button_w, 1);
        let refresh = Rect::new(button.x + button_w + 1, area.y, refresh_w, 1);
        frame.render_widget(Paragraph::new(ADD_WIDGET_LABEL).style(style_button()), button);
        frame.render_widget(
            Paragraph::new(REFRESH_LABEL).style(Style::default().fg(C_ACCENT)),
            refresh,
        );
        self.hits.push((button, Hit::AddWidget));
        self.hits.push((refresh, Hit::Refresh));
    }

    fn draw_card(
        &self,
        frame: &mut Frame,
        rect: Rect,
        cat: &Category,
        pos: CardPos,
        focused: bool,
        state: &AppState,
    ) {
        let selected = focused && pos == self.selected;
        let title_width = rect.width.saturating_sub(4) as usize;

        let Some(widget) = cat.widgets.get(pos.card) else {
            let block = card_chrome(String::new(), selected);
            let inner = block.inner(rect);
            frame.render_widget(block, rect);
            let label = Line::from(vec![
                Span::styled("+ ", Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)),
                Span::styled("Add New Category", style_heading()),
            ]);
            let mid = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, inner.height.min(1));
            frame.render_widget(Paragraph::new(label).alignment(Alignment::Center), mid);
            return;
        };

        let block = card_chrome(format!(" {} ", truncate(&widget.name, title_width)), selected);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        match project(widget, &state.catalog) {
            WidgetBody::Chart { data, options } => {
                frame.render_widget(Donut::new(&data, &options), inner);
            }
            WidgetBody::Text(text) => {
                frame.render_widget(
                    Paragraph::new(text)
                        .style(style_secondary())
                        .wrap(Wrap { trim: true }),
                    inner,
                );
            }
        }
    }
}

impl Default for WidgetGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for WidgetGrid {
    fn id(&self) -> ComponentId {
        ComponentId::WidgetGrid
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        self.clamp_index(state);
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_horizontal(state, false),
            KeyCode::Right | KeyCode::Char('l') => self.move_horizontal(state, true),
            KeyCode::Up | KeyCode::Char('k') => self.move_vertical(state, false),
            KeyCode::Down | KeyCode::Char('j') => self.move_vertical(state, true),
            KeyCode::Home | KeyCode::Char('g') => self.selected = CardPos::default(),
            KeyCode::Enter => return self.activate(state),
            _ => return vec![],
        }
        self.ensure_visible(state);
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollDown => {
                self.scroll = self.scroll.saturating_add(3);
                self.clamp_scroll(state);
                vec![]
            }
            MouseEventKind::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(3);
                vec![]
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = self
                    .hits
                    .iter()
                    .find(|(r, _)| r.contains((event.column, event.row).into()))
                    .map(|(_, h)| *h);
                match hit {
                    Some(Hit::AddWidget) => vec![Action::ToggleDrawer],
                    Some(Hit::Refresh) => vec![Action::Refresh],
                    Some(Hit::Card(pos)) => {
                        self.selected = pos;
                        self.activate(state)
                    }
                    None => vec![],
                }
            }
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        if let Action::AddCategory = action {
            // The new category lands after the last one; follow it.
            self.selected = CardPos {
                category: Self::categories(state).len(),
                card: 0,
            };
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.hits.clear();
        if area.height < 2 {
            return;
        }
        self.clamp_index(state);

        let toolbar = Rect::new(area.x, area.y, area.width, 1);
        self.draw_toolbar(frame, toolbar);

        let view = Rect::new(area.x, area.y + 2, area.width, area.height.saturating_sub(2));
        self.viewport = view.height;
        self.clamp_scroll(state);

        let card_w = view.width / CARDS_PER_ROW as u16;
        let scroll = self.scroll;
        let height = u32::from(view.height);
        let visible = |y: u32, h: u32| y >= scroll && y + h <= scroll + height;
        // Only called on visible rows, so the offset fits the viewport.
        let to_screen = |y: u32| view.y + (y - scroll) as u16;

        let mut y = 0u32;
        for (ci, cat) in Self::categories(state).iter().enumerate() {
            if visible(y, 1) {
                let heading = Line::from(Span::styled(format!(" {}", cat.name), style_heading()));
                frame.render_widget(Paragraph::new(heading), Rect::new(view.x, to_screen(y), view.width, 1));
            }
            if cat.widgets.is_empty() && visible(y + 1, 1) {
                frame.render_widget(
                    Paragraph::new(format!("   {}", EMPTY_TEXT)).style(style_muted()),
                    Rect::new(view.x, to_screen(y + 1), view.width, 1),
                );
            }

            let cards_top = y + section_header(cat);
            for card in 0..card_count(cat) {
                let row = (card / CARDS_PER_ROW) as u32;
                let col = (card % CARDS_PER_ROW) as u16;
                let top = cards_top + row * CARD_SPAN;
                if !visible(top, CARD_SPAN) {
                    continue;
                }
                let rect = Rect::new(
                    view.x + col * card_w,
                    to_screen(top),
                    card_w.saturating_sub(1),
                    CARD_HEIGHT,
                );
                let pos = CardPos { category: ci, card };
                self.draw_card(frame, rect, cat, pos, focused, state);
                self.hits.push((rect, Hit::Card(pos)));
            }
            y += section_height(cat);
        }

        if Self::categories(state).is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" no categories", Style::default().fg(C_PRIMARY))),
                view,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_model::config::UiConfig;
    use dash_model::{Board, ChartCatalog, Seed, Session, Widget};
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        mouse(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    fn draw(grid: &mut WidgetGrid, state: &AppState, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| grid.draw(f, f.area(), true, state))
            .unwrap();
        terminal
    }

    fn state_with(counts: &[usize]) -> AppState {
        let cats = counts.iter().enumerate().map(|(i, &n)| {
            let mut c = Category::new(format!("c{}", i), format!("Cat {}", i));
            c.widgets = (0..n).map(|w| Widget::named(&format!("w{} {}", i, w))).collect();
            c
        });
        AppState::new(
            Session::new(Board::from_categories(cats)),
            ChartCatalog::builtin(),
            &UiConfig::default(),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_horizontal_wraps_into_next_category() {
        let state = state_with(&[1, 2]);
        let mut grid = WidgetGrid::new();
        grid.handle_key(key(KeyCode::Right), &state);
        assert_eq!(grid.selected, CardPos { category: 0, card: 1 });
        grid.handle_key(key(KeyCode::Right), &state);
        assert_eq!(grid.selected, CardPos { category: 1, card: 0 });
        grid.handle_key(key(KeyCode::Left), &state);
        assert_eq!(grid.selected, CardPos { category: 0, card: 1 });
    }

    #[test]
    fn test_vertical_keeps_column() {
        let state = state_with(&[4, 1]);
        let mut grid = WidgetGrid::new();
        grid.selected = CardPos { category: 0, card: 1 };
        grid.handle_key(key(KeyCode::Down), &state);
        assert_eq!(grid.selected, CardPos { category: 0, card: 4 });
        grid.handle_key(key(KeyCode::Down), &state);
        assert_eq!(grid.selected, CardPos { category: 1, card: 1 });
        grid.handle_key(key(KeyCode::Up), &state);
        assert_eq!(grid.selected, CardPos { category: 0, card: 4 });
    }

    #[test]
    fn test_enter_on_add_card_adds_category() {
        let state = state_with(&[2]);
        let mut grid = WidgetGrid::new();
        assert!(grid.handle_key(key(KeyCode::Enter), &state).is_empty());
        grid.selected = CardPos { category: 0, card: 2 };
        assert_eq!(grid.handle_key(key(KeyCode::Enter), &state), vec![Action::AddCategory]);
    }

    #[test]
    fn test_draw_seed_board() {
        let board = Seed::builtin().unwrap().into_board().unwrap();
        let state = AppState::new(Session::new(board), ChartCatalog::builtin(), &UiConfig::default());
        let mut grid = WidgetGrid::new();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|f| grid.draw(f, f.area(), true, &state))
            .unwrap();

        let buf = terminal.backend().buffer();
        let screen: String = (0..40)
            .map(|y| (0..120).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(screen.contains("+ Add Widget"));
        assert!(screen.contains("CSPM Executive Dashboard"));
        assert!(screen.contains("Cloud Accounts"));
        assert!(screen.contains("Connected 2 (50%)"));
        assert!(screen.contains("Add New Category"));
    }

    #[test]
    fn test_wheel_scroll_survives_redraw() {
        let state = state_with(&[5, 5, 5, 5]);
        let mut grid = WidgetGrid::new();
        draw(&mut grid, &state, 90, 30);

        for _ in 0..5 {
            grid.handle_mouse(mouse(MouseEventKind::ScrollDown, 10, 10), Rect::default(), &state);
        }
        assert_eq!(grid.scroll, 15);
        draw(&mut grid, &state, 90, 30);
        assert_eq!(grid.scroll, 15);

        // Four sections of 26 rows in a 28-row view.
        for _ in 0..100 {
            grid.handle_mouse(mouse(MouseEventKind::ScrollDown, 10, 10), Rect::default(), &state);
        }
        draw(&mut grid, &state, 90, 30);
        assert_eq!(grid.scroll, 104 - 28);

        // A key move brings the selection back into view.
        grid.handle_key(key(KeyCode::Home), &state);
        assert_eq!(grid.scroll, 0);
    }

    #[test]
    fn test_many_categories_layout() {
        let state = state_with(&[0; 5000]);
        let mut grid = WidgetGrid::new();
        grid.selected = CardPos { category: 4999, card: 0 };
        draw(&mut grid, &state, 90, 30);
        grid.handle_key(key(KeyCode::Right), &state);

        let terminal = draw(&mut grid, &state, 90, 30);
        let buf = terminal.backend().buffer();
        let screen: String = (0..30)
            .map(|y| (0..90).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect();
        assert!(screen.contains("Cat 4999"));
        assert!(grid.scroll > u32::from(u16::MAX));
    }

    #[test]
    fn test_click_toolbar_and_add_category_card() {
        let state = state_with(&[0]);
        let mut grid = WidgetGrid::new();
        draw(&mut grid, &state, 90, 20);

        // Toolbar button sits right-aligned on row 0: " + Add Widget " then " ⟳ ".
        assert_eq!(
            grid.handle_mouse(click(75, 0), Rect::default(), &state),
            vec![Action::ToggleDrawer]
        );
        assert_eq!(
            grid.handle_mouse(click(87, 0), Rect::default(), &state),
            vec![Action::Refresh]
        );
        // Empty category: heading and notice, then the add card from row 4.
        assert_eq!(
            grid.handle_mouse(click(10, 8), Rect::default(), &state),
            vec![Action::AddCategory]
        );
        assert!(grid.handle_mouse(click(80, 19), Rect::default(), &state).is_empty());
    }

    #[test]
    fn test_click_widget_card_selects_it() {
        let state = state_with(&[2]);
        let mut grid = WidgetGrid::new();
        draw(&mut grid, &state, 90, 20);
        // Second card of the first row starts at x = 30, y = 3.
        assert!(grid.handle_mouse(click(40, 6), Rect::default(), &state).is_empty());
        assert_eq!(grid.selected, CardPos { category: 0, card: 1 });
    }

    #[test]
    fn test_empty_category_notice() {
        let state = state_with(&[0]);
        let mut grid = WidgetGrid::new();
        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal
            .draw(|f| grid.draw(f, f.area(), true, &state))
            .unwrap();
        let buf = terminal.backend().buffer();
        let screen: String = (0..20)
            .map(|y| (0..90).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect();
        assert!(screen.contains(EMPTY_TEXT));
        assert!(screen.contains("Add New Category"));
    }
}
