//! TextInput — wraps tui-input as the drawer's "add widget" field.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{style_input, C_INPUT_BG, C_MUTED};

pub enum InputAction {
    Changed(String),
    Submitted,
    Cancelled,
    None,
}

#[derive(Default)]
pub struct TextInput {
    input: Input,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    /// Replace the text, cursor at the end.
    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
    }

    /// Handle a key event. Returns what happened.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        match key.code {
            KeyCode::Esc => InputAction::Cancelled,
            KeyCode::Enter => InputAction::Submitted,
            _ => match self.input.handle_event(&Event::Key(key)) {
                Some(changed) if changed.value => {
                    InputAction::Changed(self.input.value().to_string())
                }
                _ => InputAction::None,
            },
        }
    }

    /// Render a one-line field. `value` is what the session holds; when the
    /// field is active the cursor is placed after the editor's cursor.
    pub fn draw(&self, frame: &mut Frame, area: Rect, value: &str, placeholder: &str, active: bool) {
        if area.width < 3 {
            return;
        }
        let inner = area.width.saturating_sub(3) as usize;
        let scroll = if active { self.input.visual_scroll(inner) } else { 0 };

        let span = if value.is_empty() {
            Span::styled(format!("› {}", placeholder), Style::default().fg(C_MUTED))
        } else {
            let shown: String = value.chars().skip(scroll).collect();
            Span::styled(format!("› {}", shown), style_input())
        };

        frame.render_widget(
            Paragraph::new(Line::from(span)).style(Style::default().bg(C_INPUT_BG)),
            area,
        );

        if active {
            let cursor_x = area.x + 2 + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}
