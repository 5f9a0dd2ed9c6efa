//! Status bar — bottom line with the input mode, last status message and
//! keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::ComponentId;
use crate::theme::{C_MODE_INSERT, C_MODE_NORMAL, C_MUTED, C_SECONDARY, C_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    /// Typing into the drawer's "add widget" field.
    Insert,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Insert => C_MODE_INSERT,
        }
    }
}

/// Key hints for the current mode and focused pane.
pub fn key_hints(mode: InputMode, focused: Option<ComponentId>) -> &'static str {
    match mode {
        InputMode::Insert => " type widget name  Enter add  ↑↓ leave field  Esc close drawer",
        InputMode::Normal => match focused {
            Some(ComponentId::Drawer) => {
                " ↑↓/jk move  Enter toggle/add  d remove  Tab grid  Esc close  ? help  q quit"
            }
            _ => " ←→↑↓/hjkl select  Enter open  a add widget  Tab drawer  K keys  ? help  q quit",
        },
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(
    frame: &mut Frame,
    area: Rect,
    mode: InputMode,
    focused: Option<ComponentId>,
    status: Option<&str>,
) {
    let mut spans = vec![Span::styled(
        format!(" {} ", mode.label()),
        Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
    )];
    if let Some(msg) = status {
        spans.push(Span::styled(format!(" {} ", msg), Style::default().fg(C_SECONDARY)));
        spans.push(Span::styled("│", Style::default().fg(C_SEPARATOR)));
    }
    spans.push(Span::styled(key_hints(mode, focused), Style::default().fg(C_MUTED)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}
