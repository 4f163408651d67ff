//! API client errors.

use std::borrow::Cow;

use serde_json::Value;
use thiserror::Error;

/// Errors returned by [`ChatApi`](crate::ChatApi) operations.
///
/// Stored as text so the error can travel inside application events, which
/// are cloned and compared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// Connection, timeout or other transport failure. No response received.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body as text (may be empty).
        body: String,
    },

    /// The response body does not match the expected payload.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Server-provided error text, if the server answered with a body.
    ///
    /// A JSON body yields its `error` or `detail` field, or the string
    /// itself. Any other body is returned as text.
    pub fn server_message(&self) -> Option<Cow<'_, str>> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        let body = body.trim();
        if body.is_empty() {
            return None;
        }

        let extracted = match serde_json::from_str::<Value>(body) {
            Ok(Value::String(text)) => Some(text),
            Ok(Value::Object(fields)) => ["error", "detail"]
                .iter()
                .find_map(|key| fields.get(*key).and_then(Value::as_str).map(str::to_owned)),
            _ => None,
        };
        match extracted {
            Some(text) if !text.trim().is_empty() => Some(Cow::Owned(text.trim().to_owned())),
            _ => Some(Cow::Borrowed(body)),
        }
    }

    /// Text to show the user: the server's message, or `fallback` when the
    /// request never produced one.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().map_or_else(|| fallback.to_owned(), Cow::into_owned)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() { Self::Decode(err.to_string()) } else { Self::Transport(err.to_string()) }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_surfaces_server_body() {
        let err = ApiError::Status { status: 400, body: " Room is full \n".into() };
        assert_eq!(err.user_message("Error joining room"), "Room is full");
    }

    #[test]
    fn empty_body_and_transport_use_fallback() {
        let empty = ApiError::Status { status: 500, body: String::new() };
        let transport = ApiError::Transport("connection refused".into());
        assert_eq!(empty.user_message("Error creating room"), "Error creating room");
        assert_eq!(transport.user_message("Error creating room"), "Error creating room");
    }

    #[test]
    fn json_error_field_is_extracted() {
        let err = ApiError::Status { status: 400, body: r#"{"error": "Invalid password"}"#.into() };
        assert_eq!(err.user_message("Error creating room"), "Invalid password");

        let err = ApiError::Status { status: 404, body: r#"{"detail": "Not found."}"#.into() };
        assert_eq!(err.user_message("Error joining room"), "Not found.");

        let err = ApiError::Status { status: 400, body: r#""Room is closed""#.into() };
        assert_eq!(err.user_message("Error joining room"), "Room is closed");
    }

    #[test]
    fn json_without_message_falls_back_to_body() {
        let err = ApiError::Status { status: 400, body: r#"{"password": ["too short"]}"#.into() };
        assert_eq!(err.user_message("Error creating room"), r#"{"password": ["too short"]}"#);
    }
}
