//! In-memory identity store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use veeton_app::IdentityStore;

/// Error type for the in-memory store.
#[derive(Debug, Clone)]
pub struct MemoryStoreError(pub String);

impl std::fmt::Display for MemoryStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MemoryStoreError: {}", self.0)
    }
}

impl std::error::Error for MemoryStoreError {}

#[derive(Default)]
struct StoreState {
    username: Option<String>,
    saves: Vec<String>,
    fail_load: bool,
    fail_save: bool,
}

/// [`IdentityStore`] that keeps the display name in memory.
///
/// Clones share state so a test can inspect saves made by the runtime.
#[derive(Clone, Default)]
pub struct MemoryIdentityStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryIdentityStore {
    /// Store with nothing saved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store already holding `username`.
    pub fn with_username(username: &str) -> Self {
        let store = Self::new();
        store.lock().username = Some(username.to_owned());
        store
    }

    /// Make `load` fail.
    pub fn fail_load(&self) {
        self.lock().fail_load = true;
    }

    /// Make `save` fail.
    pub fn fail_save(&self) {
        self.lock().fail_save = true;
    }

    /// The stored display name.
    pub fn username(&self) -> Option<String> {
        self.lock().username.clone()
    }

    /// Every successful save, oldest first.
    pub fn saves(&self) -> Vec<String> {
        self.lock().saves.clone()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl IdentityStore for MemoryIdentityStore {
    type Error = MemoryStoreError;

    fn load(&self) -> Result<Option<String>, Self::Error> {
        let state = self.lock();
        if state.fail_load {
            return Err(MemoryStoreError("load refused".into()));
        }
        Ok(state.username.clone())
    }

    fn save(&mut self, username: &str) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if state.fail_save {
            return Err(MemoryStoreError("save refused".into()));
        }
        state.username = Some(username.to_owned());
        state.saves.push(username.to_owned());
        Ok(())
    }
}
