//! Session identity.
//!
//! The display name is global to the client, not per room. It is handed to
//! the [`App`](crate::App) explicitly and persisted through an injected
//! [`IdentityStore`].

/// Locally remembered identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    display_name: Option<String>,
}

impl Session {
    /// Session with an optional previously stored display name.
    pub fn new(display_name: Option<String>) -> Self {
        Self { display_name: display_name.filter(|name| !name.is_empty()) }
    }

    /// Stored display name. `None` if the user never confirmed one.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub(crate) fn set_display_name(&mut self, name: String) {
        self.display_name = Some(name);
    }
}

/// Persistence for the display name.
///
/// # Implementations
///
/// - **TUI**: JSON file under the platform config directory
/// - **Tests**: in-memory store in the harness crate
pub trait IdentityStore: Send {
    /// Store-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Read the stored display name. `Ok(None)` if nothing is stored yet.
    fn load(&self) -> Result<Option<String>, Self::Error>;

    /// Replace the stored display name.
    fn save(&mut self, username: &str) -> Result<(), Self::Error>;
}
