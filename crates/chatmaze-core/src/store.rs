use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::player::Player;

/// The persisted game state exchanged with a storage collaborator.
///
/// This is the only persisted contract the core commits to:
/// `{ "players": { id: Player }, "processedMessages": [id, ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDocument {
    #[serde(default)]
    pub players: BTreeMap<String, Player>,
    #[serde(default)]
    pub processed_messages: Vec<String>,
}

impl SaveDocument {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.processed_messages.is_empty()
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a stored document. Blank input decodes to the empty document.
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(text)?)
    }
}

/// Snapshot exchange with a persistence backend.
///
/// Load and save are whole-document operations; the core never sees partial
/// writes, retries, or the storage format.
pub trait StateStore {
    fn load(&self) -> Result<SaveDocument, StoreError>;

    fn save(&self, document: &SaveDocument) -> Result<(), StoreError>;
}
