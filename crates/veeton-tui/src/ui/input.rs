//! Input boxes
//!
//! Displays a text buffer with a cursor when focused.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};
use veeton_app::TextInput;

const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const LEFT_PADDING: u16 = 1; // inside left border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render one bordered input box titled `title`.
///
/// `masked` replaces every character with `*`. The cursor is placed only when
/// `focused` holds.
pub fn render(
    frame: &mut Frame,
    input: &TextInput,
    title: &str,
    focused: bool,
    masked: bool,
    area: Rect,
) {
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {title} "));

    let shown = if masked { "*".repeat(input.text().chars().count()) } else { input.text().to_owned() };
    let paragraph = Paragraph::new(shown).style(Style::default().fg(Color::White)).block(block);

    frame.render_widget(paragraph, area);

    if !focused {
        return;
    }

    let available_width = area.width.saturating_sub(LEFT_PADDING + RIGHT_PADDING);
    #[allow(clippy::cast_possible_truncation)]
    let cursor_offset = (input.cursor().min(usize::from(u16::MAX)) as u16).min(available_width);

    let cursor_x = area.x.saturating_add(LEFT_PADDING).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);
    let cursor_x = cursor_x.min(max_x);

    frame.set_cursor_position((cursor_x, cursor_y));
}
