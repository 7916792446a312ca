use std::path::Path;

use tracing::warn;

use crate::ai::EngineConfig;
use crate::error::ConfigError;
use crate::game::BoardShape;
use crate::memory::MemoryConfig;
use crate::session::SessionConfig;
use crate::training::trainer::TrainerConfig;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardShape,
    pub memory: MemoryConfig,
    pub engine: EngineConfig,
    pub session: SessionConfig,
    pub training: TrainerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let board = &self.board;
        if board.connect < 2 {
            return Err(ConfigError::Validation(
                "board.connect must be >= 2".into(),
            ));
        }
        if board.rows < board.connect || board.cols < board.connect {
            return Err(ConfigError::Validation(
                "board.rows and board.cols must be >= board.connect".into(),
            ));
        }

        let memory = &self.memory;
        if memory.base_level_decay <= 0.0 {
            return Err(ConfigError::Validation(
                "memory.base_level_decay must be > 0".into(),
            ));
        }
        if memory.latency_factor < 0.0 {
            return Err(ConfigError::Validation(
                "memory.latency_factor must be >= 0".into(),
            ));
        }
        if !memory.retrieval_threshold.is_finite() {
            return Err(ConfigError::Validation(
                "memory.retrieval_threshold must be finite".into(),
            ));
        }
        if memory.activation_noise < 0.0 {
            return Err(ConfigError::Validation(
                "memory.activation_noise must be >= 0".into(),
            ));
        }
        if memory.mismatch_penalty < 0.0 {
            return Err(ConfigError::Validation(
                "memory.mismatch_penalty must be >= 0".into(),
            ));
        }

        let engine = &self.engine;
        if engine.base_activation <= 0.0 || engine.strong_activation <= 0.0 {
            return Err(ConfigError::Validation(
                "engine activations must be > 0".into(),
            ));
        }
        if engine.win_rate < 0.0 {
            return Err(ConfigError::Validation(
                "engine.win_rate must be >= 0".into(),
            ));
        }
        // A loss must never push a positive activation to zero or below
        if engine.loss_rate < 0.0 || engine.loss_rate * 2.0 >= 1.0 {
            return Err(ConfigError::Validation(
                "engine.loss_rate must be in [0, 0.5)".into(),
            ));
        }
        if engine.critical_importance < 1.0 {
            return Err(ConfigError::Validation(
                "engine.critical_importance must be >= 1".into(),
            ));
        }
        if engine.first_move_decay <= 0.0 || engine.first_move_latency < 0.0 {
            return Err(ConfigError::Validation(
                "engine.first_move_decay must be > 0 and engine.first_move_latency >= 0".into(),
            ));
        }
        if engine.seconds_per_move < 0.0 {
            return Err(ConfigError::Validation(
                "engine.seconds_per_move must be >= 0".into(),
            ));
        }

        if self.training.num_rounds == 0 {
            return Err(ConfigError::Validation(
                "training.num_rounds must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&AppConfig::default())?)
    }
}
