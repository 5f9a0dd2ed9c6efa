//! PaneChrome — standardized bordered pane with focus styling and badges.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{
    style_focused_border, style_unfocused_border, C_CARD_BORDER, C_MUTED, C_PANEL_BORDER_FOCUSED,
    C_PRIMARY,
};

/// A badge shown in the top-right of the pane header (e.g. "3 categories").
pub struct Badge<'a> {
    pub text: &'a str,
    pub color: Color,
}

/// Bordered pane with the focused/unfocused border colours and an optional
/// right-aligned badge.
pub fn pane_chrome<'a>(title: &'a str, focused: bool, badge: Option<Badge<'a>>) -> Block<'a> {
    let border_style = if focused {
        style_focused_border()
    } else {
        style_unfocused_border()
    };

    let title_style = if focused {
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_MUTED)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Line::from(Span::styled(format!(" {} ", title), title_style)));

    match badge {
        Some(b) => block.title_top(
            Line::from(Span::styled(
                format!(" {} ", b.text),
                Style::default().fg(b.color).add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        ),
        None => block,
    }
}

/// Card frame for a single widget. The selected card gets the focus colour.
pub fn card_chrome(title: String, selected: bool) -> Block<'static> {
    let (border, title_style) = if selected {
        (
            Style::default().fg(C_PANEL_BORDER_FOCUSED),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Style::default().fg(C_CARD_BORDER),
            Style::default().fg(C_PRIMARY),
        )
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Line::from(Span::styled(title, title_style)))
}

/// Cut `text` to at most `width` columns, ending with `…` when shortened.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
