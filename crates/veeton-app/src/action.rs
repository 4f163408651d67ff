//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use std::time::Duration;

use veeton_client::ApiRequest;

use crate::{TimerKey, ViewId};

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Issue a backend request on behalf of a view.
    ///
    /// The outcome comes back as [`AppEvent::ApiResult`](crate::AppEvent)
    /// tagged with the same view.
    Request {
        /// Requesting view.
        view: ViewId,
        /// Call to perform.
        request: ApiRequest,
    },

    /// Start a one-shot timer, restarting it if the key is already pending.
    ScheduleTimer {
        /// Timer identity.
        timer: TimerKey,
        /// Delay until it fires.
        after: Duration,
    },

    /// Cancel every pending timer owned by a view.
    CancelTimers {
        /// View being torn down.
        view: ViewId,
    },

    /// Write text to the system clipboard.
    CopyToClipboard {
        /// Requesting view.
        view: ViewId,
        /// Text to copy.
        text: String,
    },

    /// Persist the confirmed display name.
    PersistUsername {
        /// Display name to store.
        username: String,
    },
}

/// Output of a view, interpreted by [`crate::App`].
///
/// Views cannot navigate or raise app-level notices themselves; they ask the
/// App to, and everything else passes through as an [`AppAction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ViewAction {
    /// Forward to the runtime.
    App(AppAction),
    /// Tear down the current view and mount `route`.
    Navigate(crate::Route),
    /// Show a blocking alert.
    Alert(String),
    /// Show a transient success notice.
    Success(String),
    /// Remove the success notice, if any.
    ClearSuccess,
}

impl From<AppAction> for ViewAction {
    fn from(action: AppAction) -> Self {
        Self::App(action)
    }
}
