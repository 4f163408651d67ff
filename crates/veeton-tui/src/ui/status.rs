//! Status bar
//!
//! Displays the route, the success notice, the display name and key hints.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use veeton_app::{App, ChatFocus, View};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" "), Span::raw(app.route().to_string()), Span::raw(" ")];

    if let Some(notice) = app.success() {
        spans.push(Span::styled(
            format!("| {notice} "),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    }

    let name = app.session().display_name().unwrap_or("anonymous");
    spans.push(Span::raw(format!("| {name} ")));
    spans.push(Span::styled(format!("| {}", hints(app)), Style::default().fg(Color::Gray)));

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn hints(app: &App) -> &'static str {
    match app.view() {
        View::Home(_) => "Tab: next field  Enter: submit  Esc: quit",
        View::Chat(chat) => match chat.focus() {
            ChatFocus::Username => "Enter: confirm name  Tab: composer  Esc: leave",
            ChatFocus::Composer => "Enter: send  Up: messages  /copy  /leave  Esc: leave",
            ChatFocus::Messages => "o: options  d: delete  t: time  y: copy id  Esc: back",
        },
    }
}
