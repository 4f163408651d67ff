//! Per-message view state.
//!
//! A [`MessageView`] wraps one [`Message`] with two independent toggles: the
//! options menu (holding the delete action) and a timestamp reveal that the
//! chat view hides again after a short delay. Whether the message is the
//! viewer's own is decided by the parent at render time.

use veeton_proto::{Message, MessageId};

/// One rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    message: Message,
    options_open: bool,
    timestamp_shown: bool,
}

impl MessageView {
    /// View with both toggles closed.
    pub fn new(message: Message) -> Self {
        Self { message, options_open: false, timestamp_shown: false }
    }

    /// Underlying message.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Message identifier.
    pub fn id(&self) -> &MessageId {
        &self.message.id
    }

    /// Whether the options menu is open.
    pub fn options_open(&self) -> bool {
        self.options_open
    }

    /// Whether the timestamp is visible.
    pub fn timestamp_shown(&self) -> bool {
        self.timestamp_shown
    }

    /// Open or close the options menu.
    pub fn toggle_options(&mut self) {
        self.options_open = !self.options_open;
    }

    pub(crate) fn close_options(&mut self) {
        self.options_open = false;
    }

    /// Show the timestamp. The caller schedules the hide.
    pub fn reveal_timestamp(&mut self) {
        self.timestamp_shown = true;
    }

    /// Hide the timestamp.
    pub fn hide_timestamp(&mut self) {
        self.timestamp_shown = false;
    }
}
