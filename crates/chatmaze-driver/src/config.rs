use serde::Deserialize;

use chatmaze_hunt::HuntConfig;

/// Log output format for the driver binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Top-level driver configuration, loaded from `chatmaze.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Simulation tick period (ms).
    pub tick_ms: u64,
    /// Chat poll period (ms).
    pub poll_ms: u64,
    /// Period between automatic saves (ms).
    pub save_interval_ms: u64,
    /// Period between board renders on stdout (ms). 0 disables rendering.
    pub render_ms: u64,
    pub store_path: String,
    /// Recorded chat log to replay. Without one the game idles.
    pub script_path: Option<String>,
    /// Stop after this long (ms) instead of waiting for Ctrl-C.
    pub run_for_ms: Option<u64>,
    pub log_format: LogFormat,
    /// Game tuning. When absent, `HuntConfig::load()` is used.
    pub hunt: Option<HuntConfig>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            poll_ms: 1000,
            save_interval_ms: 10_000,
            render_ms: 0,
            store_path: "data/chatmaze.json".to_string(),
            script_path: None,
            run_for_ms: None,
            log_format: LogFormat::Pretty,
            hunt: None,
        }
    }
}

impl DriverConfig {
    /// Reject configurations the driver loop cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_ms == 0 {
            anyhow::bail!("tick_ms must be > 0");
        }
        if self.poll_ms == 0 {
            anyhow::bail!("poll_ms must be > 0");
        }
        if self.save_interval_ms == 0 {
            anyhow::bail!("save_interval_ms must be > 0");
        }
        if self.store_path.trim().is_empty() {
            anyhow::bail!("store_path must not be empty");
        }
        if self.run_for_ms == Some(0) {
            anyhow::bail!("run_for_ms must be > 0 when set");
        }
        let hunt = self.hunt_config();
        if hunt.maze_rows == 0 || hunt.maze_columns == 0 {
            anyhow::bail!("hunt maze dimensions must be > 0");
        }
        if hunt.character_variants == 0 {
            anyhow::bail!("hunt.character_variants must be > 0");
        }
        if self.poll_ms < self.tick_ms {
            tracing::warn!(
                poll_ms = self.poll_ms,
                tick_ms = self.tick_ms,
                "Polling faster than ticking, extra polls are wasted"
            );
        }
        Ok(())
    }

    /// The embedded `[hunt]` section, or the standalone hunt config.
    pub fn hunt_config(&self) -> HuntConfig {
        self.hunt.clone().unwrap_or_else(HuntConfig::load)
    }

    /// Load config from `CHATMAZE_CONFIG` or `chatmaze.toml`, then apply env
    /// var overrides. Returns the config and where it came from.
    pub fn load() -> (Self, String) {
        let path = std::env::var("CHATMAZE_CONFIG")
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "chatmaze.toml".to_string());
        let (mut config, origin) = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<DriverConfig>(&content) {
                Ok(cfg) => (cfg, path),
                Err(e) => (Self::default(), format!("defaults ({path} is invalid: {e})")),
            },
            Err(_) => (Self::default(), "defaults".to_string()),
        };
        config.apply_env_overrides();
        (config, origin)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("CHATMAZE_STORE_PATH")
            && !path.is_empty()
        {
            self.store_path = path;
        }
        if let Ok(path) = std::env::var("CHATMAZE_SCRIPT")
            && !path.is_empty()
        {
            self.script_path = Some(path);
        }
        if let Ok(val) = std::env::var("CHATMAZE_TICK_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            self.tick_ms = ms;
        }
    }
}
