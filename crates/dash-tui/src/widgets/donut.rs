//! Donut — proportion chart drawn on a braille canvas, with a legend.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Painter, Shape},
        Paragraph, Widget,
    },
};
use unicode_width::UnicodeWidthStr;

use dash_model::chart::{ChartData, ChartOptions, LegendPosition, Slice};

use crate::theme::{to_color, C_SECONDARY};

/// Inner radius of the ring, as a share of the outer radius.
const HOLE: f64 = 0.55;

pub struct Donut<'a> {
    slices: Vec<Slice<'a>>,
    legend: Option<LegendPosition>,
}

impl<'a> Donut<'a> {
    pub fn new(data: &'a ChartData, options: &ChartOptions) -> Self {
        let legend = &options.plugins.legend;
        Self {
            slices: data.slices(),
            legend: legend.display.then_some(legend.position),
        }
    }

    fn legend_lines(&self) -> Vec<Line<'a>> {
        self.slices
            .iter()
            .map(|s| {
                Line::from(vec![
                    Span::styled("■ ", Style::default().fg(to_color(s.color))),
                    Span::raw(s.label),
                    Span::styled(
                        format!(" {} ({:.0}%)", format_value(s.value), s.fraction * 100.0),
                        Style::default().fg(C_SECONDARY),
                    ),
                ])
            })
            .collect()
    }

    fn legend_width(&self) -> u16 {
        self.legend_lines()
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.width()).sum::<usize>())
            .max()
            .unwrap_or(0) as u16
    }
}

impl Widget for Donut<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 2 {
            return;
        }

        let rows = self.slices.len() as u16;
        let (chart_area, legend_area) = match self.legend {
            None => (area, None),
            Some(pos @ (LegendPosition::Top | LegendPosition::Bottom)) => {
                let h = rows.min(area.height / 2);
                let (first, second) = if pos == LegendPosition::Top {
                    (Constraint::Length(h), Constraint::Min(1))
                } else {
                    (Constraint::Min(1), Constraint::Length(h))
                };
                let parts = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([first, second])
                    .split(area);
                if pos == LegendPosition::Top {
                    (parts[1], Some(parts[0]))
                } else {
                    (parts[0], Some(parts[1]))
                }
            }
            Some(pos) => {
                let w = self.legend_width().min(area.width / 2);
                let (first, second) = if pos == LegendPosition::Left {
                    (Constraint::Length(w), Constraint::Min(1))
                } else {
                    (Constraint::Min(1), Constraint::Length(w))
                };
                let parts = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([first, second])
                    .split(area);
                if pos == LegendPosition::Left {
                    (parts[1], Some(parts[0]))
                } else {
                    (parts[0], Some(parts[1]))
                }
            }
        };

        if let Some(legend_area) = legend_area {
            Paragraph::new(self.legend_lines()).render(legend_area, buf);
        }

        let square = square_rect(chart_area);
        if square.width == 0 || square.height == 0 {
            return;
        }
        let ring = Ring {
            colors: self.slices.iter().map(|s| to_color(s.color)).collect(),
            cumulative: cumulative(&self.slices),
            dots: (square.width as usize * 2, square.height as usize * 4),
        };
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-1.0, 1.0])
            .y_bounds([-1.0, 1.0])
            .paint(|ctx| ctx.draw(&ring))
            .render(square, buf);
    }
}

/// Largest centred rect whose braille dot grid is square (two columns per row).
fn square_rect(area: Rect) -> Rect {
    let h = area.height.min(area.width / 2);
    let w = h * 2;
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

/// Running totals of slice fractions.
fn cumulative(slices: &[Slice<'_>]) -> Vec<f64> {
    slices
        .iter()
        .scan(0.0, |acc, s| {
            *acc += s.fraction;
            Some(*acc)
        })
        .collect()
}

/// Slice covering position `turn` (0.0 = twelve o'clock, clockwise, < 1.0).
pub fn slice_index_at(cumulative: &[f64], turn: f64) -> Option<usize> {
    cumulative
        .iter()
        .position(|&end| turn < end)
        .filter(|_| cumulative.last().is_some_and(|&total| total > 0.0))
}

struct Ring {
    colors: Vec<Color>,
    cumulative: Vec<f64>,
    dots: (usize, usize),
}

impl Shape for Ring {
    fn draw(&self, painter: &mut Painter<'_, '_>) {
        let (cols, rows) = self.dots;
        for row in 0..rows {
            let y = 1.0 - (row as f64 + 0.5) * 2.0 / rows as f64;
            for col in 0..cols {
                let x = -1.0 + (col as f64 + 0.5) * 2.0 / cols as f64;
                let r = (x * x + y * y).sqrt();
                if !(HOLE..=1.0).contains(&r) {
                    continue;
                }
                let turn = x.atan2(y).rem_euclid(std::f64::consts::TAU) / std::f64::consts::TAU;
                let Some(idx) = slice_index_at(&self.cumulative, turn) else {
                    continue;
                };
                if let Some((px, py)) = painter.get_point(x, y) {
                    painter.paint(px, py, self.colors[idx]);
                }
            }
        }
    }
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}
