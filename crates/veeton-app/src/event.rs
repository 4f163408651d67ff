//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - User interactions (keyboard, resize) and system ticks.
//! - Completions of effects the runtime performed for a view: backend
//!   responses, timer expiries and clipboard writes.

use veeton_client::{ApiError, ApiRequest, ApiResponse};

use crate::{KeyInput, TimerKey, ViewId};

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// A backend request completed.
    ApiResult {
        /// View that issued the request.
        view: ViewId,
        /// The request as issued.
        request: ApiRequest,
        /// Outcome.
        result: Result<ApiResponse, ApiError>,
    },

    /// A scheduled timer fired.
    TimerFired(TimerKey),

    /// A clipboard write completed.
    ClipboardResult {
        /// View that asked for the copy.
        view: ViewId,
        /// Outcome; the error is only logged.
        result: Result<(), String>,
    },
}
