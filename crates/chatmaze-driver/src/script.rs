//! Replays a recorded chat log as a [`ChatSource`].
//!
//! A script is a JSON array of lines:
//!
//! ```json
//! [{ "at": 1500, "user_id": "u1", "name": "Ann", "text": "!character jump" }]
//! ```
//!
//! `at` is milliseconds after the script start. `source` and `id` are
//! optional; lines without an id get `script-<n>`, where `n` is the line's
//! position in the file, so ids do not depend on playback order.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use chatmaze_core::chat::{ChatMessage, ChatSource, User};
use chatmaze_core::error::SourceError;
use chatmaze_core::time::Timestamp;

const DEFAULT_SOURCE: &str = "script";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptLine {
    pub at: u64,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
}

/// Chat source backed by a fixed script.
///
/// Each poll returns every user who has spoken so far with all of their
/// released messages, the same shape a live chat backend hands over.
#[derive(Debug, Clone)]
pub struct ScriptedChat {
    /// File position and line, ordered by release time.
    lines: Vec<(usize, ScriptLine)>,
    start: Timestamp,
}

impl ScriptedChat {
    /// Lines are ordered by `at`; ties keep file order.
    pub fn new(lines: Vec<ScriptLine>, start: Timestamp) -> Self {
        let mut lines: Vec<(usize, ScriptLine)> = lines.into_iter().enumerate().collect();
        lines.sort_by_key(|(_, line)| line.at);
        Self { lines, start }
    }

    pub fn from_json(text: &str, start: Timestamp) -> Result<Self, SourceError> {
        let lines: Vec<ScriptLine> =
            serde_json::from_str(text).map_err(|e| SourceError::Malformed(e.to_string()))?;
        Ok(Self::new(lines, start))
    }

    pub fn from_path(path: impl AsRef<Path>, start: Timestamp) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SourceError::Unavailable(format!("{}: {e}", path.display())))?;
        Self::from_json(&text, start)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether every line has been released by `now`.
    pub fn is_finished(&self, now: Timestamp) -> bool {
        self.lines
            .last()
            .is_none_or(|(_, line)| self.release_at(line) <= now)
    }

    fn release_at(&self, line: &ScriptLine) -> Timestamp {
        self.start.saturating_add(line.at)
    }
}

impl ChatSource for ScriptedChat {
    fn name(&self) -> &str {
        DEFAULT_SOURCE
    }

    fn poll(&mut self, now: Timestamp) -> Result<Vec<User>, SourceError> {
        let mut users: Vec<User> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();

        for (index, line) in &self.lines {
            let published_at = self.release_at(line);
            if published_at > now {
                break;
            }
            let slot = *slots.entry(line.user_id.as_str()).or_insert_with(|| {
                users.push(User {
                    id: line.user_id.clone(),
                    name: line.name.clone(),
                    source: line
                        .source
                        .clone()
                        .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
                    messages: Vec::new(),
                });
                users.len() - 1
            });
            users[slot].messages.push(ChatMessage {
                id: line
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("script-{index}")),
                text: line.text.clone(),
                user_id: line.user_id.clone(),
                published_at,
            });
        }

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"[
        { "at": 0, "user_id": "u1", "name": "Ann", "text": "hello" },
        { "at": 2000, "user_id": "u2", "name": "Bo", "source": "youtube", "text": "!character jump" },
        { "at": 1000, "user_id": "u1", "name": "Ann", "id": "custom", "text": "!character move up" }
    ]"#;

    #[test]
    fn releases_lines_by_time() {
        let mut chat = ScriptedChat::from_json(SCRIPT, 10_000).unwrap();

        assert!(chat.poll(9_999).unwrap().is_empty());

        let users = chat.poll(11_000).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, "u1");
        assert_eq!(users[0].source, "script");
        let ids: Vec<&str> = users[0].messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["script-0", "custom"]);
        assert_eq!(users[0].messages[1].published_at, 11_000);
    }

    #[test]
    fn later_polls_replay_earlier_messages() {
        let mut chat = ScriptedChat::from_json(SCRIPT, 0).unwrap();
        let first = chat.poll(5_000).unwrap();
        let second = chat.poll(6_000).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.len(), 2);
        assert_eq!(second[1].source, "youtube");
        assert_eq!(second[1].messages[0].id, "script-1");
    }

    #[test]
    fn generated_ids_follow_file_position() {
        let mut chat = ScriptedChat::from_json(SCRIPT, 0).unwrap();
        let users = chat.poll(5_000).unwrap();
        assert_eq!(users[0].messages[0].id, "script-0");
        assert_eq!(users[1].messages[0].id, "script-1");
    }

    #[test]
    fn appending_an_earlier_line_keeps_existing_ids() {
        let extended = r#"[
            { "at": 0, "user_id": "u1", "name": "Ann", "text": "hello" },
            { "at": 2000, "user_id": "u2", "name": "Bo", "text": "!character jump" },
            { "at": 500, "user_id": "u3", "name": "Cy", "text": "!character move up" }
        ]"#;
        let ids = |text: &str| {
            let mut chat = ScriptedChat::from_json(text, 0).unwrap();
            let mut ids: Vec<(String, String)> = chat
                .poll(5_000)
                .unwrap()
                .into_iter()
                .flat_map(|user| user.messages)
                .map(|m| (m.user_id, m.id))
                .collect();
            ids.sort();
            ids
        };

        let before = ids(SCRIPT);
        let after = ids(extended);

        let u2 = |ids: &[(String, String)]| {
            ids.iter().find(|(user, _)| user == "u2").map(|(_, id)| id.clone())
        };
        assert_eq!(u2(&before), u2(&after));
        assert!(after.contains(&("u3".to_string(), "script-2".to_string())));
    }

    #[test]
    fn finished_after_last_line() {
        let chat = ScriptedChat::from_json(SCRIPT, 100).unwrap();
        assert!(!chat.is_finished(2_099));
        assert!(chat.is_finished(2_100));
        assert!(ScriptedChat::new(Vec::new(), 0).is_finished(0));
    }

    #[test]
    fn malformed_script_is_reported() {
        let err = ScriptedChat::from_json("{\"at\": 1}", 0).unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[test]
    fn missing_script_is_unavailable() {
        let err = ScriptedChat::from_path("/nonexistent/chatmaze/script.json", 0).unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }
}
