//! Terminal-agnostic keyboard input and a single-line text buffer.

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries (crossterm, termion,
/// etc.) enabling deterministic tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Tab key (cycle focus).
    Tab,
    /// Shift+Tab (cycle focus backwards).
    BackTab,
    /// Escape key (back / quit).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
}

/// Editable single-line text with a cursor.
///
/// The cursor counts characters, not bytes, so multi-byte input edits
/// correctly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
}

impl TextInput {
    /// Empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Input pre-filled with `text`, cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let buffer = text.into();
        let cursor = buffer.chars().count();
        Self { buffer, cursor }
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the input holds no characters.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Remove all text.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Apply an editing key. Returns `false` for keys that do not edit text.
    pub fn edit(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset();
                self.buffer.insert(at, c);
                self.cursor += 1;
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_offset();
                    self.buffer.remove(at);
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.len() {
                    let at = self.byte_offset();
                    self.buffer.remove(at);
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.len(),
            KeyInput::Enter
            | KeyInput::Tab
            | KeyInput::BackTab
            | KeyInput::Esc
            | KeyInput::Up
            | KeyInput::Down => {
                return false;
            },
        }
        true
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self) -> usize {
        self.buffer.char_indices().nth(self.cursor).map_or(self.buffer.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextInput {
        let mut input = TextInput::new();
        for c in text.chars() {
            input.edit(KeyInput::Char(c));
        }
        input
    }

    #[test]
    fn edits_at_cursor() {
        let mut input = typed("helo");
        input.edit(KeyInput::Left);
        input.edit(KeyInput::Char('l'));
        assert_eq!(input.text(), "hello");
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn multibyte_backspace_and_delete() {
        let mut input = typed("héé");
        input.edit(KeyInput::Backspace);
        assert_eq!(input.text(), "hé");
        input.edit(KeyInput::Home);
        input.edit(KeyInput::Delete);
        assert_eq!(input.text(), "é");
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut input = typed("ab");
        input.edit(KeyInput::Right);
        assert_eq!(input.cursor(), 2);
        input.edit(KeyInput::Home);
        input.edit(KeyInput::Left);
        input.edit(KeyInput::Backspace);
        assert_eq!(input.cursor(), 0);
        assert_eq!(input.text(), "ab");
    }

    #[test]
    fn non_editing_keys_are_reported() {
        let mut input = TextInput::new();
        assert!(!input.edit(KeyInput::Enter));
        assert!(!input.edit(KeyInput::Tab));
        assert!(!input.edit(KeyInput::BackTab));
    }
}
