//! Match configuration
//!
//! Loaded from TOML; every section and field falls back to its default.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::Player;
use crate::engine::Difficulty;
use crate::error::ConfigError;
use crate::game::GameMode;
use crate::rules::RuleConfig;

const MAX_AI_DELAY_MS: u64 = 10_000;

/// Top-level match configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: GameMode,
    pub rules: RuleConfig,
    pub ai: AiConfig,
    pub relay: RelayConfig,
}

/// Scripted opponent settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// Pause before the opponent answers, so its move reads as a separate turn
    pub delay_ms: u64,
    /// Fixed random stream for reproducible easy-mode games
    pub seed: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            delay_ms: 500,
            seed: None,
        }
    }
}

impl AiConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Where the transport collaborator should connect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub url: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8080".to_string(),
        }
    }
}

impl RelayConfig {
    /// Endpoint for one room, keyed by room id and role code
    pub fn endpoint(&self, room_id: &str, role: Player) -> String {
        format!("{}?roomId={}&role={}", self.url, room_id, u8::from(role))
    }
}

impl GameConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: GameConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.relay.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "relay.url must not be empty".to_string(),
            ));
        }
        if self.ai.delay_ms > MAX_AI_DELAY_MS {
            return Err(ConfigError::Validation(format!(
                "ai.delay_ms must be <= {MAX_AI_DELAY_MS}, got {}",
                self.ai.delay_ms
            )));
        }
        Ok(())
    }
}
