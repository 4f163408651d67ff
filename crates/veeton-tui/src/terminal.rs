//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The clipboard is reached with
//! an OSC 52 escape sequence, which most terminal emulators forward to the
//! system clipboard, including over SSH.

use std::{
    io::{self, Stdout, Write, stdout},
    time::Duration,
};

use base64::{Engine, engine::general_purpose::STANDARD};
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use veeton_app::{App, AppEvent, Driver, KeyInput};

use crate::ui;

/// Interval between ticks when no input arrives.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Puts the terminal in raw mode on the alternate screen for its lifetime
/// and restores it on [`Driver::stop`] or drop.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    restored: bool,
}

/// What one terminal event means to the app.
#[derive(Debug)]
enum Input {
    Event(AppEvent),
    Ignore,
    Quit,
}

impl TerminalDriver {
    /// Create a new terminal driver.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self { terminal, event_stream, restored: false })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::BackTab => Some(KeyInput::BackTab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }

    fn convert_event(event: Event) -> Input {
        match event {
            Event::Key(KeyEvent { kind: KeyEventKind::Press, code, modifiers, .. }) => {
                if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                    return Input::Quit;
                }
                Self::convert_key(code).map_or(Input::Ignore, |key| Input::Event(AppEvent::Key(key)))
            },
            Event::Resize(cols, rows) => Input::Event(AppEvent::Resize(cols, rows)),
            _ => Input::Ignore,
        }
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        if let Err(e) = disable_raw_mode() {
            tracing::warn!(error = %e, "failed to leave raw mode");
        }
        if let Err(e) = stdout().execute(LeaveAlternateScreen) {
            tracing::warn!(error = %e, "failed to leave alternate screen");
        }
    }
}

/// OSC 52 "set clipboard" sequence for `text`.
fn osc52(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        loop {
            tokio::select! {
                biased;

                // Terminal events
                maybe_event = self.event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => match Self::convert_event(event) {
                            Input::Event(event) => return Ok(Some(event)),
                            Input::Quit => return Ok(None),
                            Input::Ignore => {},
                        },
                        Some(Err(e)) => return Err(TerminalError::Io(e)),
                        None => return Ok(None),
                    }
                }

                // Tick timeout
                () = tokio::time::sleep(TICK_INTERVAL) => return Ok(Some(AppEvent::Tick)),
            }
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, app))?;
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), Self::Error> {
        let backend = self.terminal.backend_mut();
        backend.write_all(osc52(text).as_bytes())?;
        backend.flush()?;
        Ok(())
    }

    fn stop(&mut self) {
        self.restore();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn keys_map_to_app_input() {
        assert!(matches!(
            TerminalDriver::convert_event(press(KeyCode::Char('a'), KeyModifiers::NONE)),
            Input::Event(AppEvent::Key(KeyInput::Char('a')))
        ));
        assert!(matches!(
            TerminalDriver::convert_event(press(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Input::Event(AppEvent::Key(KeyInput::BackTab))
        ));
        assert!(matches!(
            TerminalDriver::convert_event(press(KeyCode::F(1), KeyModifiers::NONE)),
            Input::Ignore
        ));
    }

    #[test]
    fn ctrl_c_quits() {
        assert!(matches!(
            TerminalDriver::convert_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Input::Quit
        ));
    }

    #[test]
    fn resize_is_forwarded() {
        assert!(matches!(
            TerminalDriver::convert_event(Event::Resize(100, 40)),
            Input::Event(AppEvent::Resize(100, 40))
        ));
    }

    #[test]
    fn osc52_wraps_base64_payload() {
        assert_eq!(osc52("abc"), "\x1b]52;c;YWJj\x07");
    }
}
