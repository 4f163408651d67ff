//! Veeton wire model
//!
//! Data types exchanged with the chat REST backend. Everything here is plain
//! data with serde derives; no I/O happens in this crate.
//!
//! # Types
//!
//! - [`RoomId`], [`MessageId`]: opaque server-issued identifiers
//! - [`Room`]: room metadata as returned by the backend
//! - [`Message`]: a single authored text entry
//! - [`CreateRoomRequest`], [`PostMessageRequest`]: request bodies

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod ids;
mod message;
mod room;

pub use ids::{MessageId, RoomId};
pub use message::{ANONYMOUS, Message, PostMessageRequest};
pub use room::{CreateRoomRequest, Password, Room};
