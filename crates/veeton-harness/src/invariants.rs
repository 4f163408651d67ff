//! Invariant checking for simulation runs.
//!
//! Invariants are properties that must hold after every frame the runtime
//! renders, whatever sequence of input and backend behaviour led there.
//!
//! The observable state is extracted from [`App`] into an [`AppSnapshot`],
//! then every registered [`Invariant`] runs against it.

use std::collections::HashSet;

use veeton_app::{App, ChatPhase, Route};
use veeton_proto::MessageId;

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// Observable state of a chat view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSnapshot {
    /// Lifecycle phase.
    pub phase: ChatPhase,
    /// Room creator, once loaded.
    pub creator: Option<String>,
    /// Message identifiers in display order.
    pub message_ids: Vec<MessageId>,
    /// Whether the display name is confirmed.
    pub confirmed: bool,
    /// Whether the naming form is shown.
    pub naming_form: bool,
    /// Text held by the message composer.
    pub composer_text: String,
}

/// Observable application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSnapshot {
    /// Mounted route.
    pub route: Route,
    /// Stored display name.
    pub stored_name: Option<String>,
    /// Chat state when a room is mounted.
    pub chat: Option<ChatSnapshot>,
}

impl AppSnapshot {
    /// Extract the observable state of `app`.
    pub fn from_app(app: &App) -> Self {
        let chat = app.chat().map(|chat| ChatSnapshot {
            phase: chat.phase(),
            creator: chat.room().map(|room| room.creator.clone()),
            message_ids: chat.messages().iter().map(|m| m.id().clone()).collect(),
            confirmed: chat.is_confirmed(),
            naming_form: chat.shows_naming_form(),
            composer_text: chat.composer().text().to_owned(),
        });
        Self {
            route: app.route(),
            stored_name: app.session().display_name().map(str::to_owned),
            chat,
        }
    }
}

/// An invariant that can be checked against application state.
pub trait Invariant: Send + Sync {
    /// Invariant name for error reporting.
    fn name(&self) -> &'static str;

    /// Check the invariant against the current state.
    fn check(&self, state: &AppSnapshot) -> InvariantResult;
}

/// Message identifiers in a room are unique.
///
/// The list only grows by server-returned messages, so a duplicate means a
/// response was applied twice.
pub struct UniqueMessageIds;

impl Invariant for UniqueMessageIds {
    fn name(&self) -> &'static str {
        "unique_message_ids"
    }

    fn check(&self, state: &AppSnapshot) -> InvariantResult {
        let Some(chat) = &state.chat else {
            return Ok(());
        };
        let mut seen = HashSet::new();
        for id in &chat.message_ids {
            if !seen.insert(id) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("message {id} listed twice in {:?}", chat.message_ids),
                });
            }
        }
        Ok(())
    }
}

/// A loaded room whose creator is the stored name never asks for a name.
pub struct CreatorAutoConfirmed;

impl Invariant for CreatorAutoConfirmed {
    fn name(&self) -> &'static str {
        "creator_auto_confirmed"
    }

    fn check(&self, state: &AppSnapshot) -> InvariantResult {
        let Some(chat) = &state.chat else {
            return Ok(());
        };
        let is_creator =
            chat.creator.is_some() && chat.creator.as_deref() == state.stored_name.as_deref();
        if chat.phase == ChatPhase::Ready && is_creator && !chat.confirmed {
            return Err(Violation {
                invariant: self.name(),
                message: format!("creator {:?} not auto-confirmed", chat.creator),
            });
        }
        Ok(())
    }
}

/// The naming form is only shown in a ready, unconfirmed room.
pub struct NamingFormOnlyWhenUnconfirmed;

impl Invariant for NamingFormOnlyWhenUnconfirmed {
    fn name(&self) -> &'static str {
        "naming_form_only_when_unconfirmed"
    }

    fn check(&self, state: &AppSnapshot) -> InvariantResult {
        match &state.chat {
            Some(chat) if chat.naming_form && (chat.confirmed || chat.phase != ChatPhase::Ready) => {
                Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "naming form shown with confirmed={} phase={:?}",
                        chat.confirmed, chat.phase
                    ),
                })
            },
            _ => Ok(()),
        }
    }
}

/// Nothing can be composed before a display name is confirmed.
pub struct ComposerLockedUntilConfirmed;

impl Invariant for ComposerLockedUntilConfirmed {
    fn name(&self) -> &'static str {
        "composer_locked_until_confirmed"
    }

    fn check(&self, state: &AppSnapshot) -> InvariantResult {
        match &state.chat {
            Some(chat) if !chat.confirmed && !chat.composer_text.is_empty() => Err(Violation {
                invariant: self.name(),
                message: format!("unconfirmed composer holds {:?}", chat.composer_text),
            }),
            _ => Ok(()),
        }
    }
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with the standard App invariants.
    ///
    /// Includes:
    /// - [`UniqueMessageIds`]
    /// - [`CreatorAutoConfirmed`]
    /// - [`NamingFormOnlyWhenUnconfirmed`]
    /// - [`ComposerLockedUntilConfirmed`]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(UniqueMessageIds);
        registry.add(CreatorAutoConfirmed);
        registry.add(NamingFormOnlyWhenUnconfirmed);
        registry.add(ComposerLockedUntilConfirmed);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants, returning every violation found.
    pub fn check_all(&self, state: &AppSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking with every violation.
    ///
    /// Use this in tests where you want immediate failure with context.
    #[allow(clippy::panic, reason = "test support: fail the running test")]
    pub fn assert_all(&self, state: &AppSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use veeton_app::{ChatTimings, Session};

    use super::*;

    fn chat(phase: ChatPhase, creator: &str, confirmed: bool, naming_form: bool) -> ChatSnapshot {
        ChatSnapshot {
            phase,
            creator: Some(creator.into()),
            message_ids: vec![MessageId::from(1), MessageId::from(2)],
            confirmed,
            naming_form,
            composer_text: String::new(),
        }
    }

    #[test]
    fn fresh_app_passes() {
        let app = App::new(Session::default(), ChatTimings::default());
        let registry = InvariantRegistry::standard();

        assert_eq!(registry.len(), 4);
        assert!(registry.check_all(&AppSnapshot::from_app(&app)).is_ok());
    }

    #[test]
    fn duplicate_ids_are_flagged() {
        let mut snapshot = chat(ChatPhase::Ready, "Alice", true, false);
        snapshot.message_ids.push(MessageId::from(1));
        let state = AppSnapshot { route: Route::Home, stored_name: None, chat: Some(snapshot) };

        let violations = InvariantRegistry::standard().check_all(&state).unwrap_err();
        assert_eq!(violations[0].invariant, "unique_message_ids");
    }

    #[test]
    fn unconfirmed_creator_is_flagged() {
        let state = AppSnapshot {
            route: Route::Home,
            stored_name: Some("Alice".into()),
            chat: Some(chat(ChatPhase::Ready, "Alice", false, true)),
        };

        assert!(CreatorAutoConfirmed.check(&state).is_err());
        assert!(NamingFormOnlyWhenUnconfirmed.check(&state).is_ok());
    }

    #[test]
    fn unconfirmed_composer_text_is_flagged() {
        let mut snapshot = chat(ChatPhase::Ready, "Alice", false, true);
        snapshot.composer_text = "hidden".into();
        let state = AppSnapshot { route: Route::Home, stored_name: None, chat: Some(snapshot) };

        assert!(ComposerLockedUntilConfirmed.check(&state).is_err());
    }
}
