//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod alert;
mod chat;
mod home;
mod input;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};
use veeton_app::{App, View};

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(MAIN_AREA_MIN_HEIGHT), Constraint::Length(STATUS_HEIGHT)])
        .split(frame.area());

    let [main_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, app, *main_area);
    status::render(frame, app, *status_area);

    if let Some(message) = app.alert() {
        let area = frame.area();
        alert::render(frame, message, area);
    }
}

fn render_main_area(frame: &mut Frame, app: &App, area: Rect) {
    match app.view() {
        View::Home(home) => home::render(frame, home, area),
        View::Chat(chat) => chat::render(frame, chat, area),
    }
}
