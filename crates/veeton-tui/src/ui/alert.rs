//! Alert popup
//!
//! Blocking notice drawn over the current view until the next key.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const POPUP_WIDTH: u16 = 50;
const POPUP_HEIGHT: u16 = 7;

/// Render `message` centered in `area`.
pub fn render(frame: &mut Frame, message: &str, area: Rect) {
    let popup = centered(area, POPUP_WIDTH.min(area.width), POPUP_HEIGHT.min(area.height));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(Span::styled(" Alert ", Style::default().add_modifier(Modifier::BOLD)));

    let lines = vec![
        Line::from(message.to_owned()),
        Line::default(),
        Line::from(Span::styled("Press any key", Style::default().fg(Color::DarkGray))),
    ];
    let paragraph =
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }).block(block);

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center).areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(row);
    popup
}
