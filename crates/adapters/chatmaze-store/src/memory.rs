use std::sync::{Mutex, PoisonError};

use chatmaze_core::error::StoreError;
use chatmaze_core::store::{SaveDocument, StateStore};

/// Keeps the last saved document in memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<SaveDocument>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `document`.
    pub fn with_document(document: SaveDocument) -> Self {
        Self {
            document: Mutex::new(document),
            saves: Mutex::new(0),
        }
    }

    /// Copy of the last saved (or seeded) document.
    pub fn snapshot(&self) -> SaveDocument {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<SaveDocument, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, document: &SaveDocument) -> Result<(), StoreError> {
        *self.document.lock().unwrap_or_else(PoisonError::into_inner) = document.clone();
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}
