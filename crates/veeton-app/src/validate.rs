//! Client-side validation for the creation and join forms.
//!
//! Validation runs before any request is built. A failure is field-scoped and
//! blocks the request entirely.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use thiserror::Error;
use veeton_proto::RoomId;

/// Error shown when the creator name is missing.
pub const CREATOR_REQUIRED: &str = "Please provide the Creator Name.";

/// Error shown when the password does not meet the complexity policy.
pub const PASSWORD_RULE: &str = "Minimum 8 characters including at least one uppercase letter, one lowercase letter, one number, and one special character such as @$!%*?&.";

/// Error shown when the room identifier is not a UUID v4.
pub const INVALID_ROOM_ID: &str = "Please provide a valid UUID.";

/// Symbols accepted (and one of which is required) in passwords.
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Minimum password length in characters.
pub const PASSWORD_MIN_LEN: usize = 8;

#[allow(clippy::expect_used)]
static UUID_V4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("invariant: UUID v4 pattern is a valid regex")
});

/// Input slot an error is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Room identifier input of the join form.
    RoomId,
    /// Creator name input of the creation form.
    Creator,
    /// Password input of the creation form.
    Password,
    /// Not tied to an input; server and transport errors.
    General,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RoomId => "roomId",
            Self::Creator => "creator",
            Self::Password => "password",
            Self::General => "general",
        })
    }
}

/// Field-scoped validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Offending input.
    pub field: Field,
    /// User-facing explanation.
    pub message: &'static str,
}

/// Require a non-blank creator name.
pub fn validate_creator(creator: &str) -> Result<(), ValidationError> {
    if creator.trim().is_empty() {
        return Err(ValidationError { field: Field::Creator, message: CREATOR_REQUIRED });
    }
    Ok(())
}

/// Require the password to satisfy [`password_meets_policy`].
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if !password_meets_policy(password) {
        return Err(ValidationError { field: Field::Password, message: PASSWORD_RULE });
    }
    Ok(())
}

/// Require a canonical UUID v4 and wrap it as a [`RoomId`].
pub fn validate_room_id(room_id: &str) -> Result<RoomId, ValidationError> {
    if !is_uuid_v4(room_id) {
        return Err(ValidationError { field: Field::RoomId, message: INVALID_ROOM_ID });
    }
    Ok(RoomId::new(room_id))
}

/// Password complexity policy.
///
/// At least [`PASSWORD_MIN_LEN`] characters, drawn only from ASCII letters,
/// ASCII digits and [`PASSWORD_SYMBOLS`], with at least one of each of:
/// uppercase letter, lowercase letter, digit, symbol.
pub fn password_meets_policy(password: &str) -> bool {
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c);

    password.chars().count() >= PASSWORD_MIN_LEN
        && password.chars().all(allowed)
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

/// Canonical 8-4-4-4-12 hex shape with version nibble `4` and variant nibble
/// `8`, `9`, `a` or `b`. Case-insensitive.
pub fn is_uuid_v4(text: &str) -> bool {
    UUID_V4.is_match(text)
}
