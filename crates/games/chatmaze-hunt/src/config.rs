use serde::{Deserialize, Serialize};

/// Data-driven configuration for the coin hunt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuntConfig {
    /// Maze height in cells (the board adds a one-cell border on each side).
    pub maze_rows: u32,
    /// Maze width in cells.
    pub maze_columns: u32,
    /// Cooldown after a move or jump before the next queued letter runs (ms).
    /// Also how long a collected coin stays on screen before the round resets.
    pub animation_length_ms: u64,
    /// Players silent for longer than this are hidden from snapshots (ms).
    pub player_retention_ms: u64,
    /// Chat lines older than this are dropped from player snapshots (ms).
    pub message_window_ms: u64,
    /// Number of sprite variants a player can pick with `customize`.
    pub character_variants: u8,
    /// Fixed seed for maze generation and spawn placement. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for HuntConfig {
    fn default() -> Self {
        Self {
            maze_rows: 4,
            maze_columns: 6,
            animation_length_ms: 1000,
            player_retention_ms: 10 * 60 * 1000,
            message_window_ms: 5 * 60 * 1000,
            character_variants: 4,
            seed: None,
        }
    }
}

impl HuntConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("CHATMAZE_HUNT_CONFIG")
            && let Ok(contents) = std::fs::read_to_string(&path)
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        if let Ok(contents) = std::fs::read_to_string("config/hunt.toml")
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        Self::default()
    }

    /// Board height including the border.
    pub fn board_rows(&self) -> u32 {
        self.maze_rows + 2
    }

    /// Board width including the border.
    pub fn board_columns(&self) -> u32 {
        self.maze_columns + 2
    }
}
