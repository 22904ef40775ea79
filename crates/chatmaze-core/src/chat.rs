use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::time::Timestamp;

/// Prefix that marks a chat message as a game command.
pub const COMMAND_SIGIL: char = '!';

/// A single chat message as delivered by a live-chat service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub user_id: String,
    pub published_at: Timestamp,
}

impl ChatMessage {
    /// Whether the message starts with the command sigil.
    pub fn is_command(&self) -> bool {
        self.text.starts_with(COMMAND_SIGIL)
    }

    /// The command text with the sigil stripped, if this is a command.
    pub fn command_text(&self) -> Option<&str> {
        self.text.strip_prefix(COMMAND_SIGIL)
    }
}

/// A chat participant together with the messages the source currently
/// reports for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// A live-chat feed polled by the driver once per chat interval.
///
/// Implementations may return the same messages on consecutive polls; the
/// simulation deduplicates them by message id.
pub trait ChatSource {
    /// Short label used in logs, e.g. `"twitch"` or `"script"`.
    fn name(&self) -> &str;

    /// Fetch the current roster with each user's recent messages.
    fn poll(&mut self, now: Timestamp) -> Result<Vec<User>, SourceError>;
}
