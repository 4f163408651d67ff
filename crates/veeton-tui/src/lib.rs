//! Terminal UI for Veeton
//!
//! A thin shell over [`veeton_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`veeton_app::Runtime`].
//!
//! This crate handles terminal rendering, the clipboard and the session file.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod store;
pub mod terminal;
pub mod ui;

pub use store::{FileIdentityStore, StoreError};
pub use terminal::{TerminalDriver, TerminalError};
pub use veeton_app::{App, AppAction, AppEvent, Driver, KeyInput, Route, Runtime};
