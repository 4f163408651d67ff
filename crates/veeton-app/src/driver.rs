//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific input, rendering and clipboard access, while the generic
//! [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use crate::{App, AppEvent};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal and in simulation.
///
/// # Implementations
///
/// - **TUI**: Uses crossterm for terminal events, ratatui for drawing and
///   OSC 52 for the clipboard
/// - **Simulation**: Scripted events and recorded frames in the harness crate
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input event.
    ///
    /// Returns `None` when the input source is exhausted.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Write `text` to the system clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard is unavailable.
    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Restore the platform and clean up resources.
    fn stop(&mut self);
}
