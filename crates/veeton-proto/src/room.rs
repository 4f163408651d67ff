//! Room metadata and the create-room request body.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RoomId;

/// Room as returned by the backend.
///
/// The backend may include further fields; they are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Server-issued room identifier.
    pub id: RoomId,
    /// Display name of the creator.
    pub creator: String,
}

/// Room password.
///
/// Write-only from the client's perspective: serialized into the create
/// request and never displayed. `Debug` output is redacted so passwords do
/// not leak into logs.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    /// Wrap a password string.
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Raw password text, for validation only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Body of `POST /rooms/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRoomRequest {
    /// Display name of the creator.
    pub creator: String,
    /// Room password.
    pub password: Password,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_debug_is_redacted() {
        let request =
            CreateRoomRequest { creator: "Alice".into(), password: Password::new("Secret1!") };
        let debug = format!("{request:?}");
        assert!(!debug.contains("Secret1!"));
        assert!(debug.contains("Alice"));
    }

    #[test]
    fn room_ignores_unknown_fields() {
        let room: Room = serde_json::from_str(
            r#"{"id":"0b7e1f0a-9c1d-4c6e-8f00-1a2b3c4d5e6f","creator":"Alice","created_at":"x"}"#,
        )
        .unwrap();
        assert_eq!(room.creator, "Alice");
    }
}
