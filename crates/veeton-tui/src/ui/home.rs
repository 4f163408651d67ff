//! Landing view
//!
//! Join form on top, creation form below, each with its field errors.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use veeton_app::{HomeField, HomeView, validate::Field};

use super::input;

const INPUT_HEIGHT: u16 = 3;
const ERROR_HEIGHT: u16 = 1;

/// Render the landing view.
pub fn render(frame: &mut Frame, home: &HomeView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(INPUT_HEIGHT + ERROR_HEIGHT + 2),
            Constraint::Length(2 * (INPUT_HEIGHT + ERROR_HEIGHT) + 2),
            Constraint::Length(ERROR_HEIGHT),
            Constraint::Min(0),
        ])
        .split(area);

    let [join_area, create_area, general_area, _] = chunks.as_ref() else {
        return;
    };

    render_join(frame, home, *join_area);
    render_create(frame, home, *create_area);

    if let Some(message) = home.error_for(Field::General) {
        frame.render_widget(error_line(message), *general_area);
    }
}

fn render_join(frame: &mut Frame, home: &HomeView, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Join a room ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = field_rows(1).split(inner);
    let [room_id_area, room_id_error] = chunks.as_ref() else {
        return;
    };

    let focused = home.focus() == HomeField::RoomId;
    input::render(frame, home.room_id_input(), "Room ID", focused, false, *room_id_area);
    if let Some(message) = home.error_for(Field::RoomId) {
        frame.render_widget(error_line(message), *room_id_error);
    }
}

fn render_create(frame: &mut Frame, home: &HomeView, area: Rect) {
    let title = if home.is_submitting() { " Create a room (working...) " } else { " Create a room " };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = field_rows(2).split(inner);
    let [creator_area, creator_error, password_area, password_error] = chunks.as_ref() else {
        return;
    };

    let focus = home.focus();
    input::render(
        frame,
        home.creator_input(),
        "Creator name",
        focus == HomeField::Creator,
        false,
        *creator_area,
    );
    if let Some(message) = home.error_for(Field::Creator) {
        frame.render_widget(error_line(message), *creator_error);
    }

    input::render(
        frame,
        home.password_input(),
        "Password",
        focus == HomeField::Password,
        true,
        *password_area,
    );
    if let Some(message) = home.error_for(Field::Password) {
        frame.render_widget(error_line(message), *password_error);
    }
}

/// `count` pairs of input box and error line.
fn field_rows(count: usize) -> Layout {
    let constraints = (0..count)
        .flat_map(|_| [Constraint::Length(INPUT_HEIGHT), Constraint::Length(ERROR_HEIGHT)]);
    Layout::default().direction(Direction::Vertical).constraints(constraints)
}

fn error_line(message: &str) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(
        message,
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )))
}
