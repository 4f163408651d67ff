//! Application layer for the Veeton chat client
//!
//! Pure state machines and a generic runtime, so the same view logic runs in
//! the terminal frontend and in deterministic tests.
//!
//! # Components
//!
//! - [`App`]: top-level state machine (routing, alerts, notices, session)
//! - [`HomeView`]: room creation and join forms with validation
//! - [`ChatView`]: room session state, fetch-on-entry, send, delete, expiry
//! - [`MessageView`]: per-message toggles (options menu, timestamp reveal)
//! - [`Driver`]: trait for platform-specific input, rendering and clipboard
//! - [`IdentityStore`]: trait for loading and saving the display name
//! - [`Runtime`]: async orchestration loop executing [`AppAction`]s
//!
//! # Flow
//!
//! Views never perform I/O. They consume [`AppEvent`]s and produce
//! [`AppAction`]s; the runtime turns actions into API calls, timers, clipboard
//! writes and store updates, and feeds the outcomes back as events.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod chat;
mod driver;
mod event;
mod home;
mod input;
mod message;
mod route;
mod runtime;
mod session;
mod timer;
pub mod validate;

pub use action::AppAction;
pub use app::{App, View};
pub use chat::{
    ChatFocus, ChatPhase, ChatView, EMPTY_MESSAGE_ALERT, EMPTY_USERNAME_ALERT, EXPIRED_ALERT,
    DELETE_FAILED_ALERT, UNCONFIRMED_ALERT,
};
pub use driver::Driver;
pub use event::AppEvent;
pub use home::{HomeField, HomeView, Notice, ROOM_CREATED, ROOM_JOINED};
pub use input::{KeyInput, TextInput};
pub use message::MessageView;
pub use route::{Route, RouteParseError};
pub use runtime::Runtime;
pub use session::{IdentityStore, Session};
pub use timer::{ChatTimings, TimerKey, TimerKind, ViewId};
