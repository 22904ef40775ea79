pub mod chat;
pub mod error;
pub mod events;
pub mod player;
pub mod store;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::chat::{ChatMessage, User};
    use crate::time::Timestamp;

    /// Build a chat message from `user_id` with the given id and text.
    pub fn make_message(id: &str, user_id: &str, text: &str, published_at: Timestamp) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            text: text.to_string(),
            user_id: user_id.to_string(),
            published_at,
        }
    }

    /// Build a roster entry named after its id, with no messages.
    pub fn make_user(id: &str) -> User {
        User {
            id: id.to_string(),
            name: format!("Viewer {id}"),
            source: "test".to_string(),
            messages: Vec::new(),
        }
    }

    /// Build a roster entry that has sent `texts`, in order, all published at
    /// `published_at`. Message ids are `"{id}-{index}"`.
    pub fn chat(id: &str, texts: &[&str], published_at: Timestamp) -> User {
        let mut user = make_user(id);
        user.messages = texts
            .iter()
            .enumerate()
            .map(|(i, text)| make_message(&format!("{id}-{i}"), id, text, published_at))
            .collect();
        user
    }

    /// Build a roster entry carrying exactly one message with an explicit id.
    pub fn say(user_id: &str, message_id: &str, text: &str, published_at: Timestamp) -> User {
        let mut user = make_user(user_id);
        user.messages = vec![make_message(message_id, user_id, text, published_at)];
        user
    }
}
