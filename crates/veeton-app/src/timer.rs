//! View identity and one-shot timers.
//!
//! Every mounted view gets a fresh [`ViewId`]. Timers and requests are tagged
//! with it so that effects addressed to a view that has since been torn down
//! can be recognised and dropped.

use std::{fmt, time::Duration};

use veeton_proto::MessageId;

/// Identifier of one mounted view instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl ViewId {
    /// Owner of app-level timers, which survive navigation.
    pub const APP: Self = Self(0);
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// What a timer does when it fires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Chat session window elapsed.
    RoomExpiry,
    /// Hide the "Copied!" confirmation.
    CopyConfirmation,
    /// Clear the field-scoped or general error notice.
    ErrorNotice,
    /// Clear the success notice.
    SuccessNotice,
    /// Hide the timestamp of a message.
    TimestampReveal(MessageId),
}

/// Timer identity. Scheduling an existing key restarts that timer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimerKey {
    /// Owning view.
    pub view: ViewId,
    /// Timer purpose.
    pub kind: TimerKind,
}

impl TimerKey {
    /// Key for `kind` owned by `view`.
    pub fn new(view: ViewId, kind: TimerKind) -> Self {
        Self { view, kind }
    }
}

/// Durations of every timer the views schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTimings {
    /// Client-side lifetime of a chat view.
    pub room_expiry: Duration,
    /// How long "Copied!" stays visible.
    pub copy_confirmation: Duration,
    /// How long an error notice stays visible.
    pub error_notice: Duration,
    /// How long a success notice stays visible.
    pub success_notice: Duration,
    /// How long a revealed timestamp stays visible.
    pub timestamp_reveal: Duration,
}

impl Default for ChatTimings {
    fn default() -> Self {
        Self {
            room_expiry: Duration::from_secs(30 * 60),
            copy_confirmation: Duration::from_secs(2),
            error_notice: Duration::from_secs(2),
            success_notice: Duration::from_secs(3),
            timestamp_reveal: Duration::from_secs(1),
        }
    }
}
