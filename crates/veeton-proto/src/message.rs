//! Chat messages and the post-message request body.

use std::borrow::Cow;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::MessageId;

/// Author label for messages without a username.
pub const ANONYMOUS: &str = "Anonymous";

/// A message in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server-issued message identifier.
    pub id: MessageId,
    /// Author display name. `None` when the backend sent null or omitted it.
    #[serde(default)]
    pub username: Option<String>,
    /// Message body.
    pub text: String,
    /// Creation time as sent by the backend (ISO-8601).
    #[serde(default)]
    pub timestamp: String,
}

impl Message {
    /// Author label, falling back to [`ANONYMOUS`] for missing or empty names.
    pub fn author(&self) -> &str {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => ANONYMOUS,
        }
    }

    /// Whether this message was written under `username`.
    pub fn is_authored_by(&self, username: &str) -> bool {
        self.username.as_deref() == Some(username)
    }

    /// Creation time rendered in the local timezone.
    ///
    /// Falls back to the raw backend text when it does not parse as RFC 3339.
    pub fn display_timestamp(&self) -> Cow<'_, str> {
        match DateTime::parse_from_rfc3339(&self.timestamp) {
            Ok(time) => {
                Cow::Owned(time.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
            },
            Err(_) => Cow::Borrowed(&self.timestamp),
        }
    }
}

/// Body of `POST /rooms/{roomId}/messages/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostMessageRequest {
    /// Message body.
    pub text: String,
    /// Author display name.
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(username: Option<&str>, timestamp: &str) -> Message {
        Message {
            id: MessageId::from(1),
            username: username.map(str::to_owned),
            text: "hello".into(),
            timestamp: timestamp.into(),
        }
    }

    #[test]
    fn missing_author_is_anonymous() {
        assert_eq!(message(None, "").author(), ANONYMOUS);
        assert_eq!(message(Some(""), "").author(), ANONYMOUS);
        assert_eq!(message(Some("Bob"), "").author(), "Bob");
    }

    #[test]
    fn unparseable_timestamp_is_shown_raw() {
        assert_eq!(message(None, "yesterday").display_timestamp(), "yesterday");
    }

    #[test]
    fn rfc3339_timestamp_is_reformatted() {
        let msg = message(None, "2024-07-01T12:34:56.789012Z");
        let shown = msg.display_timestamp();
        assert!(matches!(shown, Cow::Owned(_)));
        assert_eq!(shown.len(), "2024-07-01 12:34:56".len());
    }

    #[test]
    fn null_username_deserializes() {
        let msg: Message =
            serde_json::from_str(r#"{"id":7,"username":null,"text":"hi","timestamp":""}"#).unwrap();
        assert_eq!(msg.username, None);
        assert_eq!(msg.id.as_str(), "7");
    }
}
