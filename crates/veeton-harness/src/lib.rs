//! Deterministic simulation harness for the Veeton chat client.
//!
//! In-memory implementations of the [`veeton_app::Driver`],
//! [`veeton_client::ChatApi`] and [`veeton_app::IdentityStore`] seams, so the
//! production [`veeton_app::Runtime`] can run under a paused tokio clock.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true after every render, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the common
//! App invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod memory_store;
pub mod mock_api;
pub mod sim_driver;

pub use invariants::{
    AppSnapshot, ChatSnapshot, ComposerLockedUntilConfirmed, CreatorAutoConfirmed, Invariant, InvariantRegistry,
    InvariantResult, NamingFormOnlyWhenUnconfirmed, UniqueMessageIds, Violation,
};
pub use memory_store::{MemoryIdentityStore, MemoryStoreError};
pub use mock_api::{MOCK_TIMESTAMP, MockApi};
pub use sim_driver::{RenderedFrame, SimDriver, SimDriverError};
