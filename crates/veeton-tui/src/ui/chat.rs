//! Chat room
//!
//! Room header, message list and the naming form or composer.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use veeton_app::{ChatFocus, ChatPhase, ChatView, MessageView};

use super::input;

const HEADER_HEIGHT: u16 = 3;
const INPUT_HEIGHT: u16 = 3;
const BORDER_SIZE: u16 = 2;

/// Render the chat view.
pub fn render(frame: &mut Frame, chat: &ChatView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(BORDER_SIZE + 1),
            Constraint::Length(INPUT_HEIGHT),
        ])
        .split(area);

    let [header_area, messages_area, input_area] = chunks.as_ref() else {
        return;
    };

    render_header(frame, chat, *header_area);

    if chat.phase() == ChatPhase::Loading {
        let block = Block::default().borders(Borders::ALL);
        let placeholder = Span::styled("Loading room...", Style::default().fg(Color::DarkGray));
        frame.render_widget(Paragraph::new(placeholder).block(block), *messages_area);
        return;
    }

    render_messages(frame, chat, *messages_area);

    if chat.shows_naming_form() {
        input::render(
            frame,
            chat.username_input(),
            "Choose a display name (Enter to confirm)",
            chat.focus() == ChatFocus::Username,
            false,
            *input_area,
        );
    } else {
        let title = if chat.is_sending() { "Message (sending...)" } else { "Message" };
        input::render(
            frame,
            chat.composer(),
            title,
            chat.focus() == ChatFocus::Composer,
            false,
            *input_area,
        );
    }
}

fn render_header(frame: &mut Frame, chat: &ChatView, area: Rect) {
    let mut spans = vec![
        Span::styled("Room ", Style::default().fg(Color::DarkGray)),
        Span::styled(chat.room_id().to_string(), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if let Some(room) = chat.room() {
        spans.push(Span::styled("  created by ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(room.creator.clone(), Style::default().fg(Color::Cyan)));
    }
    if chat.copy_confirmed() {
        spans.push(Span::styled(
            "  Copied!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_messages(frame: &mut Frame, chat: &ChatView, area: Rect) {
    let focused = chat.focus() == ChatFocus::Messages;
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Messages ");

    let items: Vec<ListItem> = if chat.messages().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No messages yet",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        chat.messages()
            .iter()
            .enumerate()
            .map(|(index, message)| {
                let selected = focused && chat.selected() == Some(index);
                message_item(message, chat.is_own(message), selected)
            })
            .collect()
    };

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let height_of = |item: &ListItem| item.height();
    let mut used = 0;
    // Keep the most recent messages, and the selection, on screen
    let last = chat
        .selected()
        .filter(|_| focused)
        .map_or(items.len(), |index| index + 1)
        .min(items.len());
    let mut first = last;
    while first > 0 && used + height_of(&items[first - 1]) <= visible_height {
        used += height_of(&items[first - 1]);
        first -= 1;
    }
    let visible_items: Vec<_> = items.into_iter().skip(first).take(last - first).collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

fn message_item(view: &MessageView, own: bool, selected: bool) -> ListItem<'static> {
    let message = view.message();
    let author_style = if own {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    let alignment = if own { Alignment::Right } else { Alignment::Left };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(message.author().to_owned(), author_style),
            Span::raw(": "),
            Span::raw(message.text.clone()),
        ])
        .alignment(alignment),
    ];
    if view.timestamp_shown() {
        lines.push(
            Line::from(Span::styled(
                message.display_timestamp().into_owned(),
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(alignment),
        );
    }
    if view.options_open() {
        let delete = Span::styled("[d] delete", Style::default().fg(Color::Red));
        lines.push(Line::from(delete).alignment(alignment));
    }

    let item = ListItem::new(lines);
    if selected {
        item.style(Style::default().bg(Color::DarkGray))
    } else {
        item
    }
}
